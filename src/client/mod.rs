// HTTP client for the service API
//
// Provides ServiceClient for talking to the local ZeroTier One service
// and the typed records its endpoints return.

mod service_client;
mod types;

pub use service_client::ServiceClient;
pub use types::{JoinOptions, Network, NodeStatus, Peer, PeerPath, Route};
