// ── Admin action executor ──
//
// Remote state changes with local bookkeeping. The remote call always goes
// first; local rows and audit entries are written only once the controller
// has confirmed, and then in a single transaction.

use tracing::{info, warn};
use uuid::Uuid;

use netledger_store::{NewAuditEntry, access_points, audit_log, broadcasts};

use crate::error::CoreError;
use crate::ledger::Ledger;
use crate::messages;
use crate::result::OperationResult;

impl Ledger {
    /// Restart an access point and log it.
    ///
    /// A restart the controller accepted for a device this ledger has never
    /// seen is reported as a failed result saying the restart did happen.
    pub async fn restart_access_point(&self, id: &Uuid) -> OperationResult {
        if let Err(e) = self.client().restart_device(&self.site_id(), id).await {
            let err = CoreError::from(e);
            warn!(access_point = %id, error = %err, "restart request rejected");
            return OperationResult::from_error(messages::RESTART_FAILED, &err);
        }
        info!(access_point = %id, "restart requested");

        let id = *id;
        let recorded = self
            .db()
            .with_db(move |db| {
                db.with_transaction(|tx| {
                    let hostname = access_points::hostname(tx, &id)?.ok_or_else(|| {
                        CoreError::PartialSuccess {
                            message: messages::RESTART_NOT_RECORDED.into(),
                            reason: format!("Access point {id} is not known locally."),
                        }
                    })?;
                    audit_log::append(
                        tx,
                        &NewAuditEntry::for_access_point(
                            messages::access_point_restarted(&hostname),
                            id,
                        ),
                    )?;
                    Ok::<_, CoreError>(())
                })
            })
            .await;

        match recorded {
            Ok(()) => OperationResult::success(messages::RESTART_REQUESTED),
            Err(e) => {
                warn!(access_point = %id, error = %e, "restart not recorded");
                OperationResult::from_error(messages::RESTART_NOT_RECORDED, &e)
            }
        }
    }

    /// Flip a broadcast's `hideName` on the controller, then locally.
    pub async fn toggle_broadcast(&self, id: &Uuid) -> OperationResult {
        let id = *id;
        let current = match self
            .db()
            .with_db(move |db| Ok(broadcasts::get(db.conn(), &id)?))
            .await
        {
            Ok(Some(broadcast)) => broadcast,
            Ok(None) => return OperationResult::failure(messages::broadcast_not_found(&id), vec![]),
            Err(e) => return OperationResult::from_error(messages::TOGGLE_LOOKUP_FAILED, &e),
        };

        let hide_name = !current.hide_name;
        if let Err(e) = self
            .client()
            .set_wifi_broadcast_hide_name(&self.site_id(), &id, hide_name)
            .await
        {
            let err = CoreError::from(e);
            warn!(broadcast = %id, error = %err, "SSID visibility change rejected");
            return OperationResult::from_error(messages::TOGGLE_FAILED, &err);
        }

        let ssid = current.ssid;
        let recorded = self
            .db()
            .with_db(move |db| {
                db.with_transaction(|tx| {
                    broadcasts::set_hide_name(tx, &id, hide_name)?;
                    audit_log::append(
                        tx,
                        &NewAuditEntry::plain(messages::ssid_broadcasting_changed(
                            &ssid, hide_name,
                        )),
                    )?;
                    Ok::<_, CoreError>(())
                })
            })
            .await;

        match recorded {
            Ok(()) => {
                info!(broadcast = %id, hide_name, "SSID visibility changed");
                OperationResult::success(messages::ssid_broadcasting_result(hide_name))
            }
            Err(e) => {
                warn!(broadcast = %id, error = %e, "SSID visibility change not recorded");
                OperationResult::from_error(messages::TOGGLE_NOT_RECORDED, &e)
            }
        }
    }
}
