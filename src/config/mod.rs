// Configuration module
// Credential discovery and provisioning for the local service

mod discovery;
mod provision;

pub use discovery::{
    discover_credentials, Credentials, ServiceDirs, AUTH_TOKEN_FILE, DEFAULT_PORT, PORT_FILE,
};
pub use provision::{CredentialProvisioner, HelperProvisioner};
