use netledger_store::rusqlite::Connection;
use netledger_store::{NewAuditEntry, Upserted, audit_log, broadcasts};

use super::{PassReport, mismatch};
use crate::error::CoreError;
use crate::messages;
use crate::model::{EntityKind, Snapshot};

/// Upsert every broadcast and log "added"/"updated" by SSID, with no
/// client or access point reference.
pub fn apply(
    conn: &Connection,
    snapshot: &Snapshot,
    report: &mut PassReport,
) -> Result<(), CoreError> {
    let Snapshot::WifiBroadcasts(observed) = snapshot else {
        return Err(mismatch(EntityKind::WifiBroadcasts, snapshot));
    };

    for broadcast in observed {
        let outcome = broadcasts::upsert(conn, broadcast)?;
        let message = match outcome {
            Upserted::Inserted => messages::broadcast_added(&broadcast.ssid),
            Upserted::Updated => messages::broadcast_updated(&broadcast.ssid),
        };
        audit_log::append(conn, &NewAuditEntry::plain(message))?;
        report.record_upsert(outcome);
        report.events += 1;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use netledger_store::{Database, WifiBroadcast};

    use super::*;
    use crate::reconcile::apply_snapshot;

    #[test]
    fn broadcast_events_carry_no_references() {
        let mut db = Database::open_in_memory().unwrap();
        let wifi = WifiBroadcast {
            id: Uuid::new_v4(),
            ssid: "Guest".into(),
            active: true,
            hide_name: true,
        };
        let snapshot = Snapshot::WifiBroadcasts(vec![wifi.clone()]);

        let _: PassReport = db.with_transaction(|tx| apply_snapshot(tx, &snapshot)).unwrap();
        let report: PassReport = db.with_transaction(|tx| apply_snapshot(tx, &snapshot)).unwrap();

        assert_eq!(report.updated, 1);
        let entries = audit_log::recent(db.conn(), 10).unwrap();
        assert_eq!(entries[0].message, "Wifi broadcast Guest was updated.");
        assert_eq!(entries[1].message, "Wifi broadcast Guest was added to the network.");
        assert!(entries.iter().all(|e| e.client_id.is_none() && e.access_point_id.is_none()));
        assert_eq!(broadcasts::get(db.conn(), &wifi.id).unwrap(), Some(wifi));
    }
}
