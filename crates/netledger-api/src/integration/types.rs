//! Integration API response types for the UniFi Network Integration API (v10.1.84).
//!
//! All types match the JSON responses from `/integration/v1/` endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Only the fields a snapshot needs are modelled strictly; everything
//! else is defaulted so firmware drift does not fail a pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ── Pagination ───────────────────────────────────────────────────────

/// Generic pagination wrapper returned by all list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub offset: i64,
    pub limit: i32,
    pub count: i32,
    pub total_count: i64,
    pub data: Vec<T>,
}

// ── Sites ────────────────────────────────────────────────────────────

/// Site overview, from `GET /v1/sites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResponse {
    pub id: Uuid,
    pub name: String,
    /// Short site name (`default`, `site2`, …).
    pub internal_reference: String,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Adopted device overview, from `GET /v1/sites/{siteId}/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Uuid,
    pub mac_address: String,
    pub ip_address: Option<String>,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    /// One of: `ONLINE`, `OFFLINE`, `PENDING_ADOPTION`, `UPDATING`,
    /// `GETTING_READY`, `ADOPTING`, `DELETING`, `CONNECTION_INTERRUPTED`, `ISOLATED`.
    pub state: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Complex nested interfaces object, kept as opaque JSON.
    #[serde(default)]
    pub interfaces: Value,
}

/// Latest statistics for a device, from `GET /v1/sites/{siteId}/devices/{deviceId}/statistics/latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatisticsResponse {
    pub uptime_sec: Option<i64>,
    pub cpu_utilization_pct: Option<f64>,
    pub memory_utilization_pct: Option<f64>,
    /// ISO 8601 date-time.
    pub last_heartbeat_at: Option<String>,
    /// Nested interface statistics; radios carry `txRetriesPct`.
    #[serde(default)]
    pub interfaces: Value,
    /// Uplink information (`txRateBps`, `rxRateBps`).
    pub uplink: Option<Value>,
}

/// Body for `POST /v1/sites/{siteId}/devices/{deviceId}/actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceAction {
    Restart,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Client overview, from `GET /v1/sites/{siteId}/clients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    /// One of: `WIRED`, `WIRELESS`, `VPN`, `TELEPORT`.
    #[serde(rename = "type", default)]
    pub client_type: Option<String>,
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub connected_at: Option<String>,
}

/// Client details, from `GET /v1/sites/{siteId}/clients/{clientId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetailsResponse {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    /// Adopted device the client is currently attached through.
    #[serde(default)]
    pub uplink_device_id: Option<Uuid>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── WiFi Broadcasts ──────────────────────────────────────────────────

/// WiFi broadcast overview, from `GET /v1/sites/{siteId}/wifi/broadcasts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiBroadcastResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub broadcast_type: Option<String>,
    pub enabled: bool,
}

/// WiFi broadcast details. The overview listing omits `hideName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiBroadcastDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub enabled: bool,
    /// `true` when the SSID is not advertised in beacons.
    #[serde(default)]
    pub hide_name: bool,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_action_serializes_screaming_case() {
        let body = serde_json::json!({ "action": DeviceAction::Restart });
        assert_eq!(body["action"], "RESTART");
    }

    #[test]
    fn broadcast_details_default_hide_name() {
        let id = Uuid::new_v4();
        let details: WifiBroadcastDetailsResponse = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Office",
            "enabled": true,
            "securityConfiguration": { "mode": "WPA2_PERSONAL" }
        }))
        .unwrap();

        assert!(!details.hide_name);
        assert!(details.extra.contains_key("securityConfiguration"));
    }
}
