// ── API-to-record conversions ──
//
// Bridges raw `netledger_api` response types into the records the store
// persists. Only the fields a snapshot needs are read; nested statistics
// are pulled out of opaque JSON with zero defaults.

use serde_json::Value;
use uuid::Uuid;

use netledger_api::integration_types::{
    ClientResponse, DeviceResponse, DeviceStatisticsResponse, WifiBroadcastDetailsResponse,
    WifiBroadcastResponse,
};
use netledger_store::{AccessPoint, DeviceAttributes, NewTrafficSample, WifiBroadcast};

/// Device state whose counters are recorded verbatim.
pub const ONLINE: &str = "ONLINE";

// ── Devices ─────────────────────────────────────────────────────────

pub fn access_point(d: DeviceResponse) -> AccessPoint {
    AccessPoint {
        attributes: DeviceAttributes {
            id: d.id,
            hostname: d.name,
            ip_address: d.ip_address,
            mac_address: Some(d.mac_address),
        },
        state: d.state,
    }
}

/// Whether a device in `state` reports live counters.
pub fn is_online(state: &str) -> bool {
    state == ONLINE
}

/// Build the traffic sample for an online device from its latest statistics.
///
/// `txRetriesPct` comes from the first radio; throughput from the uplink.
/// Missing numbers are recorded as zero.
pub fn traffic_sample(access_point_id: Uuid, stats: &DeviceStatisticsResponse) -> NewTrafficSample {
    let tx_retries_pct = stats
        .interfaces
        .get("radios")
        .and_then(Value::as_array)
        .and_then(|radios| radios.first())
        .and_then(|radio| radio.get("txRetriesPct"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let uplink_rate = |field: &str| {
        stats
            .uplink
            .as_ref()
            .and_then(|u| u.get(field))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    };

    NewTrafficSample {
        access_point_id,
        uptime_sec: stats.uptime_sec.unwrap_or(0),
        tx_retries_pct,
        tx_rate_bps: uplink_rate("txRateBps"),
        rx_rate_bps: uplink_rate("rxRateBps"),
    }
}

// ── Clients ─────────────────────────────────────────────────────────

/// A missing IP is stored as NULL rather than a placeholder string.
pub fn client_attributes(c: ClientResponse) -> DeviceAttributes {
    DeviceAttributes {
        id: c.id,
        hostname: c.name,
        ip_address: c.ip_address,
        mac_address: c.mac_address,
    }
}

// ── WiFi broadcasts ─────────────────────────────────────────────────

/// Merge the overview (`enabled`) with the details (`hideName`).
pub fn wifi_broadcast(
    overview: WifiBroadcastResponse,
    details: &WifiBroadcastDetailsResponse,
) -> WifiBroadcast {
    WifiBroadcast {
        id: overview.id,
        ssid: overview.name,
        active: overview.enabled,
        hide_name: details.hide_name,
    }
}
