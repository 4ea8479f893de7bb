// ztone - Desktop client access layer for the ZeroTier One service
// Library exports

pub mod client; // HTTP client for the local service API
pub mod config; // Credential discovery and provisioning
pub mod errors;
