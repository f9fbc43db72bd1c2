use tracing::{debug, warn};

use netledger_store::rusqlite::Connection;
use netledger_store::{NewAuditEntry, access_points, audit_log, clients, connections};

use super::{PassReport, mismatch};
use crate::error::CoreError;
use crate::messages;
use crate::model::{EntityKind, Snapshot};

/// Point each client's edge at its reported uplink and log a roam whenever
/// the target changes (a first edge counts as a roam from nowhere).
///
/// The roam message needs both hostnames. If either is unknown locally the
/// edge is still written; only the audit entry is skipped, with a warning.
pub fn apply(
    conn: &Connection,
    snapshot: &Snapshot,
    report: &mut PassReport,
) -> Result<(), CoreError> {
    let Snapshot::Connections(observed) = snapshot else {
        return Err(mismatch(EntityKind::Connections, snapshot));
    };

    let mut without_uplink = 0_usize;
    for uplink in observed {
        let Some(access_point_id) = uplink.access_point_id else {
            debug!(client = %uplink.client_id, "client reports no uplink device; edge left as is");
            without_uplink += 1;
            continue;
        };
        let client_id = uplink.client_id;

        let current = connections::uplink(conn, &client_id)?;
        if current == Some(access_point_id) {
            continue;
        }

        connections::set_uplink(conn, &client_id, &access_point_id)?;
        if current.is_some() {
            report.updated += 1;
        } else {
            report.inserted += 1;
        }
        report.roamed += 1;

        let client_name = clients::hostname(conn, &client_id)?;
        let ap_name = access_points::hostname(conn, &access_point_id)?;
        match (client_name, ap_name) {
            (Some(client_name), Some(ap_name)) => {
                audit_log::append(
                    conn,
                    &NewAuditEntry {
                        message: messages::client_roamed(&client_name, &ap_name),
                        client_id: Some(client_id),
                        access_point_id: Some(access_point_id),
                    },
                )?;
                report.events += 1;
            }
            (client_name, ap_name) => {
                warn!(
                    client = %client_id,
                    access_point = %access_point_id,
                    client_known = client_name.is_some(),
                    access_point_known = ap_name.is_some(),
                    "roam recorded without audit entry: hostname lookup failed"
                );
                report.warnings.push(format!(
                    "Roam of client {client_id} to {access_point_id} not logged: hostname unknown"
                ));
            }
        }
    }

    if without_uplink > 0 {
        report.warnings.push(format!(
            "{without_uplink} clients reported no uplink device; their connections were not updated"
        ));
    }

    Ok(())
}
