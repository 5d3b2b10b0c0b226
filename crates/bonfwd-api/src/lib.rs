// bonfwd-api: Async client for the cloud dashboard REST API (organizations,
// networks, wireless SSIDs, and per-SSID Bonjour forwarding).

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DashboardClient;
pub use error::Error;
pub use transport::TransportConfig;
