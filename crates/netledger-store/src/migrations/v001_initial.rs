//! v001 -- Initial schema creation.
//!
//! Current-state tables (`access_points`, `clients`, `connections`,
//! `wifi_broadcasts`, `settings`) plus the append-only `audit_logs` and
//! `traffic_samples` tables.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r"
-- ── Access points ───────────────────────────────────────────────────
CREATE TABLE IF NOT EXISTS access_points (
    id          TEXT PRIMARY KEY NOT NULL,          -- controller-assigned UUID
    hostname    TEXT NOT NULL,
    ip_address  TEXT,
    mac_address TEXT,
    state       TEXT NOT NULL,                      -- ONLINE, OFFLINE, ...
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ── Clients ─────────────────────────────────────────────────────────
CREATE TABLE IF NOT EXISTS clients (
    id          TEXT PRIMARY KEY NOT NULL,
    hostname    TEXT NOT NULL,
    ip_address  TEXT,
    mac_address TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_clients_active ON clients (active);

-- ── Connections (one uplink edge per client) ────────────────────────
-- No foreign keys: an edge may be recorded before its endpoints are known.
CREATE TABLE IF NOT EXISTS connections (
    client_id       TEXT PRIMARY KEY NOT NULL,
    access_point_id TEXT NOT NULL,
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ── WiFi broadcasts ─────────────────────────────────────────────────
CREATE TABLE IF NOT EXISTS wifi_broadcasts (
    id          TEXT PRIMARY KEY NOT NULL,
    ssid        TEXT NOT NULL,
    active      INTEGER NOT NULL,
    hide_name   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ── Traffic samples (append-only) ───────────────────────────────────
CREATE TABLE IF NOT EXISTS traffic_samples (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    access_point_id TEXT NOT NULL,
    uptime_sec      INTEGER NOT NULL,
    tx_retries_pct  REAL NOT NULL,
    tx_rate_bps     INTEGER NOT NULL,
    rx_rate_bps     INTEGER NOT NULL,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),

    FOREIGN KEY (access_point_id) REFERENCES access_points(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_traffic_samples_ap
    ON traffic_samples (access_point_id, created_at);
CREATE INDEX IF NOT EXISTS idx_traffic_samples_created
    ON traffic_samples (created_at);

-- ── Audit log (append-only) ─────────────────────────────────────────
CREATE TABLE IF NOT EXISTS audit_logs (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    message         TEXT NOT NULL,
    client_id       TEXT,                           -- nullable FK -> clients(id)
    access_point_id TEXT,                           -- nullable FK -> access_points(id)
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),

    FOREIGN KEY (client_id)       REFERENCES clients(id)       ON DELETE SET NULL,
    FOREIGN KEY (access_point_id) REFERENCES access_points(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_audit_logs_created ON audit_logs (created_at);

-- ── Settings (singleton) ────────────────────────────────────────────
CREATE TABLE IF NOT EXISTS settings (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    retention_days INTEGER NOT NULL DEFAULT 30 CHECK (retention_days >= 1)
);

INSERT OR IGNORE INTO settings (id, retention_days) VALUES (1, 30);
";

/// Apply the v001 migration.
pub fn up(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(UP_SQL)
}
