//! Audit log and operation result message text.
//!
//! The wording is part of the ledger's output contract: existing databases
//! already hold entries in this form.

pub fn access_point_added(hostname: &str) -> String {
    format!("Access point {hostname} was added to the network.")
}

pub fn access_point_updated(hostname: &str) -> String {
    format!("Access point {hostname} was updated.")
}

pub fn access_point_restarted(hostname: &str) -> String {
    format!("Access point {hostname} was restarted.")
}

pub fn broadcast_added(ssid: &str) -> String {
    format!("Wifi broadcast {ssid} was added to the network.")
}

pub fn broadcast_updated(ssid: &str) -> String {
    format!("Wifi broadcast {ssid} was updated.")
}

pub fn client_new(hostname: &str) -> String {
    format!("New client {hostname} connected to the network.")
}

pub fn client_reconnected(hostname: &str) -> String {
    format!("Client {hostname} connected to the network again.")
}

pub fn client_disconnected(hostname: &str) -> String {
    format!("Client {hostname} disconnected from the network.")
}

pub fn client_roamed(client: &str, access_point: &str) -> String {
    format!("Client {client} roamed to AP {access_point}.")
}

/// `disabled` when the SSID is hidden, `enabled` otherwise.
pub fn broadcasting_state(hide_name: bool) -> &'static str {
    if hide_name { "disabled" } else { "enabled" }
}

pub fn ssid_broadcasting_changed(ssid: &str, hide_name: bool) -> String {
    format!(
        "SSID broadcasting for {ssid} has been {}.",
        broadcasting_state(hide_name)
    )
}

// ── Operation results ────────────────────────────────────────────────

pub const RESTART_REQUESTED: &str = "Access point is restarting.";
pub const RESTART_FAILED: &str = "Request to restart access point failed.";
pub const RESTART_NOT_RECORDED: &str =
    "Access point is restarting, but the restart could not be recorded in the audit log.";

pub const TOGGLE_FAILED: &str = "PUT request to toggle SSID broadcasting failed.";
pub const TOGGLE_LOOKUP_FAILED: &str = "Error occurred while toggling SSID broadcasting.";
pub const TOGGLE_NOT_RECORDED: &str =
    "SSID broadcasting was changed on the controller, but the local record could not be updated.";

pub fn broadcast_not_found(id: &uuid::Uuid) -> String {
    format!("Couldn't find wifi broadcast with id {id}.")
}

pub fn ssid_broadcasting_result(hide_name: bool) -> String {
    format!("SSID broadcasting has been {}.", broadcasting_state(hide_name))
}

pub fn retention_changed(days: u32) -> String {
    format!("Retention period changed to {days} days.")
}

pub const RETENTION_UPDATE_FAILED: &str = "Couldn't update retention period.";

pub fn pruned(deleted: usize) -> String {
    format!("Deleted {deleted} old network audit logs and traffic samples.")
}

pub const PRUNE_FAILED: &str = "Error while deleting old data from db.";
