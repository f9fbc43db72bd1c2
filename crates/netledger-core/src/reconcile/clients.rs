use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use netledger_store::rusqlite::Connection;
use netledger_store::{NewAuditEntry, audit_log, clients};

use super::{PassReport, mismatch};
use crate::error::CoreError;
use crate::messages;
use crate::model::{EntityKind, Snapshot};

/// Walk each observed client through its lifecycle, then deactivate the
/// active clients the snapshot no longer contains.
///
/// | stored           | event          |
/// |------------------|----------------|
/// | none             | new client     |
/// | inactive         | reconnected    |
/// | active           | (silent)       |
pub fn apply(
    conn: &Connection,
    snapshot: &Snapshot,
    report: &mut PassReport,
) -> Result<(), CoreError> {
    let Snapshot::Clients(observed) = snapshot else {
        return Err(mismatch(EntityKind::Clients, snapshot));
    };

    for attributes in observed {
        match clients::get(conn, &attributes.id)? {
            None => {
                clients::insert(conn, attributes)?;
                audit_log::append(
                    conn,
                    &NewAuditEntry::for_client(
                        messages::client_new(&attributes.hostname),
                        attributes.id,
                    ),
                )?;
                report.inserted += 1;
                report.events += 1;
            }
            Some(existing) if !existing.active => {
                clients::update(conn, attributes, true)?;
                audit_log::append(
                    conn,
                    &NewAuditEntry::for_client(
                        messages::client_reconnected(&attributes.hostname),
                        attributes.id,
                    ),
                )?;
                report.reactivated += 1;
                report.events += 1;
            }
            Some(_) => {
                clients::update(conn, attributes, true)?;
                report.updated += 1;
            }
        }
    }

    let seen: Vec<Uuid> = observed.iter().map(|c| c.id).collect();
    let gone = detect_inactive(conn, &seen)?;
    report.deactivated += gone;
    report.events += gone;

    Ok(())
}

/// Mark every active client missing from `observed` as inactive and log
/// one "disconnected" entry per client. Returns how many were marked.
///
/// An empty `observed` set is treated as "no information", never as
/// "everyone left", so nothing is touched.
pub fn detect_inactive(conn: &Connection, observed: &[Uuid]) -> Result<usize, CoreError> {
    if observed.is_empty() {
        debug!("empty client snapshot, skipping inactive detection");
        return Ok(0);
    }

    let observed: HashSet<&Uuid> = observed.iter().collect();
    let missing: Vec<Uuid> = clients::active_ids(conn)?
        .into_iter()
        .filter(|id| !observed.contains(id))
        .collect();

    for id in &missing {
        let hostname = clients::hostname(conn, id)?.unwrap_or_else(|| id.to_string());
        clients::mark_inactive(conn, id)?;
        audit_log::append(
            conn,
            &NewAuditEntry::for_client(messages::client_disconnected(&hostname), *id),
        )?;
    }

    Ok(missing.len())
}
