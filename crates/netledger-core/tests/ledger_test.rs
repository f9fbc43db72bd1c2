#![allow(clippy::unwrap_used)]
// End-to-end tests for `Ledger` with wiremock standing in for the controller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netledger_core::{ControllerPlatform, EntityKind, Ledger, LedgerConfig};
use netledger_store::{Database, audit_log, clients, connections, traffic_samples};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    ledger: Ledger,
    site: Uuid,
    db_path: PathBuf,
    _dir: TempDir,
}

impl Harness {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("ledger.db");
        let site = Uuid::new_v4();

        let mut config = LedgerConfig::new(
            server.uri().parse().unwrap(),
            "test-key".to_string().into(),
            db_path.clone(),
        );
        config.site = site.to_string();
        config.platform = ControllerPlatform::Standalone;

        let ledger = Ledger::connect(config).await.unwrap();
        Self {
            server,
            ledger,
            site,
            db_path,
            _dir: dir,
        }
    }

    fn db(&self) -> Database {
        Database::open_at(&self.db_path).unwrap()
    }

    fn url(&self, rest: &str) -> String {
        format!("/integration/v1/sites/{}/{rest}", self.site)
    }

    /// Mount a single-page listing at `rest`.
    async fn serve_page(&self, rest: &str, data: serde_json::Value) {
        let count = data.as_array().map_or(0, Vec::len);
        Mock::given(method("GET"))
            .and(path(self.url(rest)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "offset": 0,
                "limit": 200,
                "count": count,
                "totalCount": count,
                "data": data,
            })))
            .mount(&self.server)
            .await;
    }

    async fn serve_json(&self, rest: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(self.url(rest)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Reset the server to serve only this client listing.
    async fn serve_clients(&self, clients: &[(Uuid, &str)]) {
        self.server.reset().await;
        let data: Vec<_> = clients
            .iter()
            .map(|(id, name)| {
                json!({
                    "id": id,
                    "name": name,
                    "type": "WIRELESS",
                    "ipAddress": "192.168.1.20",
                    "macAddress": "de:ad:be:ef:00:01",
                })
            })
            .collect();
        self.serve_page("clients", json!(data)).await;
    }

    /// Mount a client listing (plus details) without resetting other mocks.
    async fn serve_clients_keep(&self, clients: &[(Uuid, &str)]) {
        let data: Vec<_> = clients
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();
        self.serve_page("clients", json!(data)).await;
        for (id, name) in clients {
            self.serve_json(&format!("clients/{id}"), json!({ "id": id, "name": name }))
                .await;
        }
    }

    /// Two offline APs and one client whose uplink is `uplink`.
    async fn serve_topology(&self, ap1: Uuid, ap2: Uuid, laptop: Uuid, uplink: Uuid) {
        self.server.reset().await;
        self.serve_page(
            "devices",
            json!([device(ap1, "ap-lobby", "OFFLINE"), device(ap2, "ap-office", "OFFLINE")]),
        )
        .await;
        self.serve_page("wifi/broadcasts", json!([])).await;
        self.serve_page(
            "clients",
            json!([{ "id": laptop, "name": "laptop", "ipAddress": "192.168.1.5" }]),
        )
        .await;
        self.serve_json(
            &format!("clients/{laptop}"),
            json!({ "id": laptop, "name": "laptop", "uplinkDeviceId": uplink }),
        )
        .await;
    }

    fn messages(&self) -> Vec<String> {
        audit_log::recent(self.db().conn(), 100)
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect()
    }
}

fn device(id: Uuid, name: &str, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "macAddress": "aa:bb:cc:dd:ee:01",
        "ipAddress": "10.0.0.7",
        "name": name,
        "state": state,
        "features": ["accessPoint"],
    })
}

// ── Access points ───────────────────────────────────────────────────

#[tokio::test]
async fn identical_access_point_is_added_then_updated() {
    let h = Harness::start().await;
    let ap = Uuid::new_v4();
    h.serve_page("devices", json!([device(ap, "ap-east", "ONLINE")])).await;
    h.serve_json(
        &format!("devices/{ap}/statistics/latest"),
        json!({
            "uptimeSec": 3600,
            "interfaces": { "radios": [{ "txRetriesPct": 2.5 }] },
            "uplink": { "txRateBps": 100, "rxRateBps": 200 },
        }),
    )
    .await;

    let first = h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();
    let second = h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();

    assert_eq!((first.inserted, first.samples), (1, 1));
    assert_eq!((second.updated, second.samples), (1, 1));
    assert_eq!(
        h.messages(),
        vec![
            "Access point ap-east was updated.".to_string(),
            "Access point ap-east was added to the network.".to_string(),
        ]
    );

    let aps = h.ledger.db().access_points().await.unwrap();
    assert_eq!(aps.len(), 1);
    assert_eq!(aps[0].attributes.hostname, "ap-east");
    assert_eq!(aps[0].attributes.ip_address.as_deref(), Some("10.0.0.7"));

    let samples = h.ledger.db().traffic_samples(ap, 10).await.unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].sample.uptime_sec, 3600);
    assert!((samples[0].sample.tx_retries_pct - 2.5).abs() < f64::EPSILON);
    assert_eq!(samples[0].sample.rx_rate_bps, 200);
}

#[tokio::test]
async fn offline_access_point_records_zeroed_sample() {
    let h = Harness::start().await;
    let ap = Uuid::new_v4();
    h.serve_page("devices", json!([device(ap, "ap-west", "OFFLINE")])).await;
    Mock::given(method("GET"))
        .and(path(h.url(&format!("devices/{ap}/statistics/latest"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&h.server)
        .await;

    let report = h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();

    assert_eq!(report.samples, 1);
    let sample = &h.ledger.db().traffic_samples(ap, 1).await.unwrap()[0].sample;
    assert_eq!((sample.uptime_sec, sample.tx_rate_bps, sample.rx_rate_bps), (0, 0, 0));
}

#[tokio::test]
async fn counter_failure_skips_only_that_sample() {
    let h = Harness::start().await;
    let (good, bad) = (Uuid::new_v4(), Uuid::new_v4());
    h.serve_page(
        "devices",
        json!([device(good, "ap-good", "ONLINE"), device(bad, "ap-bad", "ONLINE")]),
    )
    .await;
    h.serve_json(
        &format!("devices/{good}/statistics/latest"),
        json!({ "uptimeSec": 10 }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(h.url(&format!("devices/{bad}/statistics/latest"))))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&h.server)
        .await;

    let report = h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.samples, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("ap-bad"));
    assert_eq!(traffic_samples::count(h.db().conn()).unwrap(), 1);
}

// ── Clients ─────────────────────────────────────────────────────────

#[tokio::test]
async fn replaying_client_snapshot_is_silent() {
    let h = Harness::start().await;
    h.serve_clients(&[(Uuid::new_v4(), "laptop"), (Uuid::new_v4(), "phone")])
        .await;

    h.ledger.reconcile(EntityKind::Clients).await.unwrap();
    let before = h.messages().len();
    let replay = h.ledger.reconcile(EntityKind::Clients).await.unwrap();

    assert_eq!(before, 2);
    assert_eq!(replay.events, 0);
    assert_eq!(h.messages().len(), before);
}

#[tokio::test]
async fn missing_client_is_disconnected_exactly_once() {
    let h = Harness::start().await;
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    h.serve_clients(&[(a, "a"), (b, "b"), (c, "c")]).await;
    h.ledger.reconcile(EntityKind::Clients).await.unwrap();

    h.serve_clients(&[(a, "a"), (c, "c")]).await;
    let report = h.ledger.reconcile(EntityKind::Clients).await.unwrap();

    assert_eq!(report.deactivated, 1);
    let db = h.db();
    assert!(!clients::get(db.conn(), &b).unwrap().unwrap().active);
    let disconnects: Vec<_> = audit_log::recent(db.conn(), 100)
        .unwrap()
        .into_iter()
        .filter(|e| e.message.contains("disconnected"))
        .collect();
    assert_eq!(disconnects.len(), 1);
    assert_eq!(disconnects[0].client_id, Some(b));
}

#[tokio::test]
async fn empty_client_snapshot_deactivates_nobody() {
    let h = Harness::start().await;
    h.serve_clients(&[(Uuid::new_v4(), "a"), (Uuid::new_v4(), "b")])
        .await;
    h.ledger.reconcile(EntityKind::Clients).await.unwrap();

    h.serve_clients(&[]).await;
    let report = h.ledger.reconcile(EntityKind::Clients).await.unwrap();

    assert_eq!(report.deactivated, 0);
    assert_eq!(clients::active_ids(h.db().conn()).unwrap().len(), 2);
}

// ── Connections ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_passes_of_one_kind_run_one_after_the_other() {
    let h = Harness::start().await;
    let laptop = Uuid::new_v4();
    let phone = Uuid::new_v4();
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
        .and(path(h.url("clients")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "offset": 0,
                    "limit": 200,
                    "count": 2,
                    "totalCount": 2,
                    "data": [
                        { "id": laptop, "name": "laptop" },
                        { "id": phone, "name": "phone" },
                    ],
                }))
                .set_delay(delay),
        )
        .mount(&h.server)
        .await;

    let started = Instant::now();
    let (first, second) = tokio::join!(
        h.ledger.reconcile(EntityKind::Clients),
        h.ledger.reconcile(EntityKind::Clients),
    );
    let elapsed = started.elapsed();

    // Both passes commit; the second fetch starts only after the first commit
    let first = first.unwrap();
    let second = second.unwrap();
    assert!(elapsed >= delay * 2, "passes overlapped: {elapsed:?}");
    assert_eq!((first.inserted, second.inserted), (2, 0));
    assert_eq!(second.events, 0);

    let messages = h.messages();
    for name in ["laptop", "phone"] {
        let expected = format!("New client {name} connected to the network.");
        assert_eq!(messages.iter().filter(|m| **m == expected).count(), 1);
    }
    assert_eq!(clients::list(h.db().conn()).unwrap().len(), 2);
}

#[tokio::test]
async fn roam_is_logged_once_per_move() {
    let h = Harness::start().await;
    let (ap1, ap2, laptop) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    h.serve_topology(ap1, ap2, laptop, ap1).await;
    let first = h.ledger.sync_all().await;
    assert!(first.iter().all(|o| o.result.successful), "{first:?}");

    h.serve_topology(ap1, ap2, laptop, ap2).await;
    let roam = h.ledger.reconcile(EntityKind::Connections).await.unwrap();
    let steady = h.ledger.reconcile(EntityKind::Connections).await.unwrap();

    assert_eq!((roam.updated, roam.events), (1, 1));
    assert_eq!(steady.events, 0);
    let db = h.db();
    assert_eq!(connections::uplink(db.conn(), &laptop).unwrap(), Some(ap2));
    let roams: Vec<_> = audit_log::recent(db.conn(), 100)
        .unwrap()
        .into_iter()
        .filter(|e| e.message.contains("roamed"))
        .map(|e| e.message)
        .collect();
    assert_eq!(
        roams,
        vec![
            "Client laptop roamed to AP ap-office.".to_string(),
            "Client laptop roamed to AP ap-lobby.".to_string(),
        ]
    );
}

#[tokio::test]
async fn failed_pass_rolls_back_and_later_passes_still_run() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(h.url("devices")))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&h.server)
        .await;
    h.serve_page("wifi/broadcasts", json!([])).await;
    h.serve_clients_keep(&[(Uuid::new_v4(), "laptop")]).await;

    let outcomes = h.ledger.sync_all().await;

    let kinds: Vec<_> = outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, EntityKind::SYNC_ORDER.to_vec());
    assert!(!outcomes[0].result.successful);
    assert!(outcomes[0].report.is_none());
    assert!(
        outcomes[0]
            .result
            .errors
            .contains(&"Status code: 502".to_string())
    );
    assert!(outcomes[2].result.successful);
    assert!(h.ledger.db().access_points().await.unwrap().is_empty());
    assert_eq!(h.ledger.db().clients().await.unwrap().len(), 1);
}

// ── Admin actions ───────────────────────────────────────────────────

#[tokio::test]
async fn restart_failure_writes_nothing() {
    let h = Harness::start().await;
    let ap = Uuid::new_v4();
    h.serve_page("devices", json!([device(ap, "ap-east", "OFFLINE")])).await;
    h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();
    let before = h.messages();

    Mock::given(method("POST"))
        .and(path(h.url(&format!("devices/{ap}/actions"))))
        .respond_with(ResponseTemplate::new(500).set_body_string("device busy"))
        .mount(&h.server)
        .await;

    let result = h.ledger.restart_access_point(&ap).await;

    assert!(!result.successful);
    assert_eq!(result.message, "Request to restart access point failed.");
    assert_eq!(
        result.errors,
        vec!["Status code: 500".to_string(), "Response: device busy".to_string()]
    );
    assert_eq!(h.messages(), before);
}

#[tokio::test]
async fn restart_success_is_audited_with_device_reference() {
    let h = Harness::start().await;
    let ap = Uuid::new_v4();
    h.serve_page("devices", json!([device(ap, "ap-east", "OFFLINE")])).await;
    h.ledger.reconcile(EntityKind::AccessPoints).await.unwrap();
    Mock::given(method("POST"))
        .and(path(h.url(&format!("devices/{ap}/actions"))))
        .and(body_json(json!({ "action": "RESTART" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h.ledger.restart_access_point(&ap).await;

    assert!(result.successful, "{result:?}");
    assert_eq!(result.message, "Access point is restarting.");
    let entry = &h.ledger.db().audit_log(1).await.unwrap()[0];
    assert_eq!(entry.message, "Access point ap-east was restarted.");
    assert_eq!(entry.access_point_id, Some(ap));
}

#[tokio::test]
async fn restart_of_unknown_device_reports_partial_success() {
    let h = Harness::start().await;
    let ap = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(h.url(&format!("devices/{ap}/actions"))))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h.ledger.restart_access_point(&ap).await;

    assert!(!result.successful);
    assert!(result.message.contains("restarting"));
    assert_eq!(result.errors.len(), 1);
    assert!(h.messages().is_empty());
}

#[tokio::test]
async fn toggle_flips_hide_name_and_logs() {
    let h = Harness::start().await;
    let wifi = Uuid::new_v4();
    h.serve_page(
        "wifi/broadcasts",
        json!([{ "id": wifi, "name": "Guest", "type": "STANDARD", "enabled": true }]),
    )
    .await;
    h.serve_json(
        &format!("wifi/broadcasts/{wifi}"),
        json!({ "id": wifi, "name": "Guest", "enabled": true, "hideName": false }),
    )
    .await;
    h.ledger.reconcile(EntityKind::WifiBroadcasts).await.unwrap();

    Mock::given(method("PUT"))
        .and(path(h.url(&format!("wifi/broadcasts/{wifi}"))))
        .and(body_json(json!({ "hideName": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h.ledger.toggle_broadcast(&wifi).await;

    assert!(result.successful, "{result:?}");
    assert_eq!(result.message, "SSID broadcasting has been disabled.");
    assert!(h.ledger.db().wifi_broadcasts().await.unwrap()[0].hide_name);
    let entry = &h.ledger.db().audit_log(1).await.unwrap()[0];
    assert_eq!(entry.message, "SSID broadcasting for Guest has been disabled.");
    assert!(entry.client_id.is_none() && entry.access_point_id.is_none());
}

#[tokio::test]
async fn toggle_remote_failure_leaves_flag_alone() {
    let h = Harness::start().await;
    let wifi = Uuid::new_v4();
    h.serve_page(
        "wifi/broadcasts",
        json!([{ "id": wifi, "name": "Guest", "enabled": true }]),
    )
    .await;
    h.serve_json(
        &format!("wifi/broadcasts/{wifi}"),
        json!({ "id": wifi, "name": "Guest", "enabled": true, "hideName": true }),
    )
    .await;
    h.ledger.reconcile(EntityKind::WifiBroadcasts).await.unwrap();
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&h.server)
        .await;

    let result = h.ledger.toggle_broadcast(&wifi).await;

    assert!(!result.successful);
    assert_eq!(result.message, "PUT request to toggle SSID broadcasting failed.");
    assert!(h.ledger.db().wifi_broadcasts().await.unwrap()[0].hide_name);
    assert_eq!(h.messages().len(), 1);
}

#[tokio::test]
async fn toggle_unknown_broadcast_makes_no_remote_call() {
    let h = Harness::start().await;
    let wifi = Uuid::new_v4();
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let result = h.ledger.toggle_broadcast(&wifi).await;

    assert!(!result.successful);
    assert_eq!(result.message, format!("Couldn't find wifi broadcast with id {wifi}."));
    assert!(result.errors.is_empty());
}

// ── Retention ───────────────────────────────────────────────────────

#[tokio::test]
async fn prune_reports_deleted_rows() {
    let h = Harness::start().await;
    {
        let db = h.db();
        let old = audit_log::append(
            db.conn(),
            &netledger_store::NewAuditEntry::plain("ancient"),
        )
        .unwrap();
        audit_log::append(db.conn(), &netledger_store::NewAuditEntry::plain("fresh")).unwrap();
        db.conn()
            .execute(
                "UPDATE audit_logs SET created_at = datetime('now', '-40 days') WHERE id = ?1",
                [old],
            )
            .unwrap();
    }

    let result = h.ledger.db().prune().await;

    assert!(result.successful);
    assert_eq!(
        result.message,
        "Deleted 1 old network audit logs and traffic samples."
    );
    assert_eq!(h.messages(), vec!["fresh".to_string()]);
}

#[tokio::test]
async fn retention_setting_round_trips() {
    let h = Harness::start().await;

    assert_eq!(h.ledger.db().retention_days().await.unwrap(), 30);
    let changed = h.ledger.db().set_retention_days(7).await;
    let rejected = h.ledger.db().set_retention_days(0).await;

    assert_eq!(changed.message, "Retention period changed to 7 days.");
    assert!(!rejected.successful);
    assert_eq!(rejected.message, "Couldn't update retention period.");
    assert_eq!(h.ledger.db().retention_days().await.unwrap(), 7);
}

// ── Daemon ──────────────────────────────────────────────────────────

#[tokio::test]
async fn run_stops_on_cancel() {
    let h = Harness::start().await;
    h.serve_page("devices", json!([])).await;
    h.serve_page("wifi/broadcasts", json!([])).await;
    h.serve_page("clients", json!([])).await;

    let cancel = tokio_util::sync::CancellationToken::new();
    let ledger = h.ledger.clone();
    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { ledger.run(cancel).await }
    });
    cancel.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
}
