// ── Snapshot fetching ──
//
// Network half of a reconciliation pass. Runs before any transaction is
// opened; a failure here aborts only the pass that asked for the snapshot.

use tracing::{debug, warn};
use uuid::Uuid;

use netledger_api::IntegrationClient;
use netledger_store::NewTrafficSample;

use crate::convert;
use crate::error::CoreError;
use crate::model::{EntityKind, ObservedAccessPoint, ObservedUplink, Snapshot};

/// A fetched snapshot plus any non-fatal problems hit while building it.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub snapshot: Snapshot,
    pub warnings: Vec<String>,
}

impl From<Snapshot> for Fetched {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            warnings: Vec::new(),
        }
    }
}

/// Fetch one complete snapshot of `kind`.
pub(crate) async fn fetch(
    client: &IntegrationClient,
    site_id: &Uuid,
    kind: EntityKind,
) -> Result<Fetched, CoreError> {
    match kind {
        EntityKind::AccessPoints => fetch_access_points(client, site_id).await,
        EntityKind::WifiBroadcasts => fetch_wifi_broadcasts(client, site_id).await,
        EntityKind::Clients => fetch_clients(client, site_id).await,
        EntityKind::Connections => fetch_uplinks(client, site_id).await,
    }
}

/// Devices plus one traffic sample each.
///
/// Counters are only requested for online devices; everything else gets a
/// zeroed sample. A failed counter fetch drops that device's sample and is
/// reported as a warning.
async fn fetch_access_points(
    client: &IntegrationClient,
    site_id: &Uuid,
) -> Result<Fetched, CoreError> {
    let devices = client.list_all_devices(site_id).await?;
    let mut observed = Vec::with_capacity(devices.len());
    let mut warnings = Vec::new();

    for device in devices {
        let access_point = convert::access_point(device);
        let id = access_point.attributes.id;

        let sample = if convert::is_online(&access_point.state) {
            match client.get_device_statistics(site_id, &id).await {
                Ok(stats) => Some(convert::traffic_sample(id, &stats)),
                Err(e) => {
                    warn!(device = %id, error = %e, "counter fetch failed, skipping sample");
                    warnings.push(format!(
                        "No traffic sample for {}: {e}",
                        access_point.attributes.hostname
                    ));
                    None
                }
            }
        } else {
            Some(NewTrafficSample::zeroed(id))
        };

        observed.push(ObservedAccessPoint {
            access_point,
            sample,
        });
    }

    debug!(count = observed.len(), "fetched access points");
    Ok(Fetched {
        snapshot: Snapshot::AccessPoints(observed),
        warnings,
    })
}

/// Broadcast overviews merged with their `hideName` details.
async fn fetch_wifi_broadcasts(
    client: &IntegrationClient,
    site_id: &Uuid,
) -> Result<Fetched, CoreError> {
    let overviews = client.list_all_wifi_broadcasts(site_id).await?;
    let mut broadcasts = Vec::with_capacity(overviews.len());

    for overview in overviews {
        let details = client.get_wifi_broadcast(site_id, &overview.id).await?;
        broadcasts.push(convert::wifi_broadcast(overview, &details));
    }

    debug!(count = broadcasts.len(), "fetched wifi broadcasts");
    Ok(Snapshot::WifiBroadcasts(broadcasts).into())
}

async fn fetch_clients(client: &IntegrationClient, site_id: &Uuid) -> Result<Fetched, CoreError> {
    let clients: Vec<_> = client
        .list_all_clients(site_id)
        .await?
        .into_iter()
        .map(convert::client_attributes)
        .collect();

    debug!(count = clients.len(), "fetched clients");
    Ok(Snapshot::Clients(clients).into())
}

/// Reported uplink device for every connected client.
async fn fetch_uplinks(client: &IntegrationClient, site_id: &Uuid) -> Result<Fetched, CoreError> {
    let clients = client.list_all_clients(site_id).await?;
    let mut uplinks = Vec::with_capacity(clients.len());

    for summary in clients {
        let details = client.get_client(site_id, &summary.id).await?;
        uplinks.push(ObservedUplink {
            client_id: details.id,
            access_point_id: details.uplink_device_id,
        });
    }

    debug!(count = uplinks.len(), "fetched client uplinks");
    Ok(Snapshot::Connections(uplinks).into())
}
