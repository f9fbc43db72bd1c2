use netledger_store::rusqlite::Connection;
use netledger_store::{NewAuditEntry, Upserted, access_points, audit_log, traffic_samples};

use super::{PassReport, mismatch};
use crate::error::CoreError;
use crate::messages;
use crate::model::{EntityKind, Snapshot};

/// Upsert every access point, log "added"/"updated", and record its sample.
///
/// Every upsert of an existing row logs "updated", even when no field
/// changed.
pub fn apply(
    conn: &Connection,
    snapshot: &Snapshot,
    report: &mut PassReport,
) -> Result<(), CoreError> {
    let Snapshot::AccessPoints(observed) = snapshot else {
        return Err(mismatch(EntityKind::AccessPoints, snapshot));
    };

    for entry in observed {
        let ap = &entry.access_point;
        let outcome = access_points::upsert(conn, ap)?;

        let hostname = &ap.attributes.hostname;
        let message = match outcome {
            Upserted::Inserted => messages::access_point_added(hostname),
            Upserted::Updated => messages::access_point_updated(hostname),
        };
        audit_log::append(conn, &NewAuditEntry::for_access_point(message, ap.attributes.id))?;
        report.record_upsert(outcome);
        report.events += 1;

        if let Some(sample) = &entry.sample {
            traffic_samples::insert(conn, sample)?;
            report.samples += 1;
        }
    }

    Ok(())
}
