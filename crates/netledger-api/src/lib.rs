// netledger-api: async client for the UniFi Network Integration API
//
// Covers the read endpoints a reconciliation pass snapshots (devices,
// device statistics, clients, WiFi broadcasts) and the two admin actions
// (device restart, SSID visibility).

pub mod error;
pub mod integration;
pub mod transport;

pub use error::Error;
pub use integration::IntegrationClient;
pub use integration::types as integration_types;
pub use transport::{TlsMode, TransportConfig};

/// Which URL layout the controller exposes the Integration API under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPlatform {
    /// UniFi OS console (UDM, UCG, Cloud Key Gen2+): `/proxy/network/integration/`.
    #[default]
    UnifiOs,
    /// Self-hosted Network Application: `/integration/`.
    Standalone,
}

impl ControllerPlatform {
    /// Path prefix inserted between the controller origin and `/integration/`.
    pub fn integration_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network/integration",
            Self::Standalone => "/integration",
        }
    }
}
