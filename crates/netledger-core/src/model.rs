// ── Snapshot model ──
//
// A snapshot is one complete listing of a single entity kind, already
// converted from API responses into the records the store persists.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use netledger_store::{AccessPoint, DeviceAttributes, NewTrafficSample, WifiBroadcast};

/// The closed set of entity kinds a reconciliation pass can cover.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    AccessPoints,
    WifiBroadcasts,
    Clients,
    Connections,
}

impl EntityKind {
    /// Order `sync_all` runs passes in. Connections come last so roam
    /// messages can resolve hostnames written earlier in the same cycle.
    pub const SYNC_ORDER: [EntityKind; 4] = [
        EntityKind::AccessPoints,
        EntityKind::WifiBroadcasts,
        EntityKind::Clients,
        EntityKind::Connections,
    ];
}

/// One access point as observed, with the traffic sample to record for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedAccessPoint {
    pub access_point: AccessPoint,
    /// `None` when the counter fetch for this device failed.
    pub sample: Option<NewTrafficSample>,
}

/// The uplink a client reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedUplink {
    pub client_id: Uuid,
    pub access_point_id: Option<Uuid>,
}

/// One complete listing of a single entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    AccessPoints(Vec<ObservedAccessPoint>),
    WifiBroadcasts(Vec<WifiBroadcast>),
    Clients(Vec<DeviceAttributes>),
    Connections(Vec<ObservedUplink>),
}

impl Snapshot {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::AccessPoints(_) => EntityKind::AccessPoints,
            Self::WifiBroadcasts(_) => EntityKind::WifiBroadcasts,
            Self::Clients(_) => EntityKind::Clients,
            Self::Connections(_) => EntityKind::Connections,
        }
    }

    /// Number of observed rows.
    pub fn len(&self) -> usize {
        match self {
            Self::AccessPoints(rows) => rows.len(),
            Self::WifiBroadcasts(rows) => rows.len(),
            Self::Clients(rows) => rows.len(),
            Self::Connections(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!(
            EntityKind::from_str("wifi-broadcasts").unwrap(),
            EntityKind::WifiBroadcasts
        );
        assert_eq!(EntityKind::AccessPoints.to_string(), "access-points");
    }

    #[test]
    fn sync_order_covers_every_kind() {
        for kind in EntityKind::iter() {
            assert!(EntityKind::SYNC_ORDER.contains(&kind));
        }
        assert_eq!(EntityKind::SYNC_ORDER[3], EntityKind::Connections);
    }
}
