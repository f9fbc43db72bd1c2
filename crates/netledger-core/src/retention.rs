//! Retention pruner.
//!
//! Deletes audit log entries and traffic samples older than the configured
//! horizon. Entity rows are never pruned, only their history.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use netledger_store::rusqlite::Connection;
use netledger_store::{audit_log, format_timestamp, settings, traffic_samples};

use crate::config::{DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS};
use crate::error::CoreError;

/// Rows removed by one pruning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub retention_days: u32,
    /// Rows created strictly before this instant were deleted.
    pub cutoff: String,
    pub audit_logs: usize,
    pub traffic_samples: usize,
}

impl PruneReport {
    pub fn total(&self) -> usize {
        self.audit_logs + self.traffic_samples
    }
}

/// Stored horizon, or the default when the settings row is missing.
pub fn retention_days(conn: &Connection) -> Result<u32, CoreError> {
    Ok(settings::retention_days(conn)?.unwrap_or(DEFAULT_RETENTION_DAYS))
}

pub fn set_retention_days(conn: &Connection, days: u32) -> Result<(), CoreError> {
    if days == 0 {
        return Err(CoreError::ValidationFailed {
            message: "retention period must be at least 1 day".into(),
        });
    }
    if days > MAX_RETENTION_DAYS {
        return Err(CoreError::ValidationFailed {
            message: format!("retention period must be at most {MAX_RETENTION_DAYS} days"),
        });
    }
    settings::set_retention_days(conn, days)?;
    Ok(())
}

/// `now - days`, in the store's timestamp format. Fails instead of
/// overflowing for horizons that reach past the representable range.
pub fn cutoff(now: DateTime<Utc>, days: u32) -> Result<String, CoreError> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|horizon| now.checked_sub_signed(horizon))
        .map(format_timestamp)
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!("retention period of {days} days is out of range"),
        })
}

/// Delete everything older than the horizon. Run inside one transaction so
/// a failure leaves both tables untouched.
pub fn prune(conn: &Connection, now: DateTime<Utc>) -> Result<PruneReport, CoreError> {
    let days = retention_days(conn)?;
    let cutoff = cutoff(now, days)?;

    let audit_logs = audit_log::delete_before(conn, &cutoff)?;
    let traffic_samples = traffic_samples::delete_before(conn, &cutoff)?;

    Ok(PruneReport {
        retention_days: days,
        cutoff,
        audit_logs,
        traffic_samples,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use netledger_store::rusqlite::params;
    use netledger_store::{
        AccessPoint, Database, DeviceAttributes, NewAuditEntry, NewTrafficSample, access_points,
    };

    use super::*;

    fn backdate(db: &Database, table: &str, id: i64, at: DateTime<Utc>) {
        db.conn()
            .execute(
                &format!("UPDATE {table} SET created_at = ?1 WHERE id = ?2"),
                params![format_timestamp(at), id],
            )
            .unwrap();
    }

    #[test]
    fn cutoff_uses_storage_format() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 30, 0).unwrap();
        assert_eq!(cutoff(now, 30).unwrap(), "2025-03-01 12:30:00");
    }

    #[test]
    fn unrepresentable_cutoff_is_an_error() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 30, 0).unwrap();
        assert!(matches!(
            cutoff(now, 100_000_000),
            Err(CoreError::ValidationFailed { .. })
        ));
        assert!(cutoff(now, MAX_RETENTION_DAYS).is_ok());
    }

    #[test]
    fn oversized_horizon_is_rejected_and_prune_keeps_working() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(matches!(
            set_retention_days(db.conn(), 100_000_000),
            Err(CoreError::ValidationFailed { .. })
        ));
        assert_eq!(retention_days(db.conn()).unwrap(), 30);

        // A horizon written behind our back fails the prune, never panics
        db.conn()
            .execute("UPDATE settings SET retention_days = 100000000", [])
            .unwrap();
        let result = db.with_transaction(|tx| prune(tx, Utc::now()));
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    }

    #[test]
    fn prunes_only_rows_past_the_horizon() {
        let mut db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let ap = Uuid::new_v4();
        access_points::upsert(
            db.conn(),
            &AccessPoint {
                attributes: DeviceAttributes {
                    id: ap,
                    hostname: "ap".into(),
                    ip_address: None,
                    mac_address: None,
                },
                state: "OFFLINE".into(),
            },
        )
        .unwrap();

        let fresh_log = audit_log::append(db.conn(), &NewAuditEntry::plain("today")).unwrap();
        let old_log = audit_log::append(db.conn(), &NewAuditEntry::plain("old")).unwrap();
        let fresh_sample = traffic_samples::insert(db.conn(), &NewTrafficSample::zeroed(ap)).unwrap();
        let old_sample = traffic_samples::insert(db.conn(), &NewTrafficSample::zeroed(ap)).unwrap();
        backdate(&db, "audit_logs", fresh_log, now);
        backdate(&db, "audit_logs", old_log, now - TimeDelta::days(40));
        backdate(&db, "traffic_samples", fresh_sample, now);
        backdate(&db, "traffic_samples", old_sample, now - TimeDelta::days(40));

        let report = db.with_transaction(|tx| prune(tx, now)).unwrap();

        assert_eq!(report.retention_days, 30);
        assert_eq!((report.audit_logs, report.traffic_samples), (1, 1));
        assert_eq!(report.total(), 2);
        let remaining = audit_log::recent(db.conn(), 10).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "today");
        assert_eq!(traffic_samples::count(db.conn()).unwrap(), 1);
    }

    #[test]
    fn horizon_change_applies_to_next_prune() {
        let mut db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let id = audit_log::append(db.conn(), &NewAuditEntry::plain("ten days")).unwrap();
        backdate(&db, "audit_logs", id, now - TimeDelta::days(10));

        assert_eq!(db.with_transaction(|tx| prune(tx, now)).unwrap().total(), 0);

        set_retention_days(db.conn(), 7).unwrap();
        assert_eq!(retention_days(db.conn()).unwrap(), 7);
        assert_eq!(db.with_transaction(|tx| prune(tx, now)).unwrap().total(), 1);
    }

    #[test]
    fn zero_day_horizon_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            set_retention_days(db.conn(), 0),
            Err(CoreError::ValidationFailed { .. })
        ));
        assert_eq!(retention_days(db.conn()).unwrap(), 30);
    }

    #[test]
    fn missing_settings_row_defaults_to_thirty() {
        let db = Database::open_in_memory().unwrap();
        db.conn().execute("DELETE FROM settings", []).unwrap();
        assert_eq!(retention_days(db.conn()).unwrap(), DEFAULT_RETENTION_DAYS);
    }
}
