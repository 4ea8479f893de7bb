// Credential discovery
//
// Finds the auth token and HTTP port the local service wrote to disk.
// The service keeps the originals in a system-wide directory; a
// per-user copy is provisioned on first use so the client never needs
// elevated reads afterward.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::ClientError;

use super::provision::CredentialProvisioner;

/// File holding the API auth token
pub const AUTH_TOKEN_FILE: &str = "authtoken.secret";

/// File holding the service's HTTP port as decimal text
pub const PORT_FILE: &str = "zerotier-one.port";

/// Port assumed when the port file is missing or unparseable
pub const DEFAULT_PORT: u16 = 9993;

/// Directories credential discovery reads from and provisions into
#[derive(Debug, Clone)]
pub struct ServiceDirs {
    /// Per-user directory holding readable copies of the credentials
    pub local: PathBuf,
    /// Service-owned directory holding the originals
    pub global: PathBuf,
}

impl ServiceDirs {
    /// Platform-default locations for this user and this OS.
    pub fn platform_defaults() -> Result<Self, ClientError> {
        let data_dir = dirs::data_local_dir().ok_or_else(|| ClientError::Provision {
            reason: "no local data directory for the current user".to_string(),
        })?;
        Ok(Self {
            local: data_dir.join("ZeroTier").join("One"),
            global: global_service_dir(),
        })
    }

    /// Defaults with the per-user directory overridden.
    pub fn with_local(local: PathBuf) -> Self {
        Self {
            local,
            global: global_service_dir(),
        }
    }
}

#[cfg(target_os = "windows")]
fn global_service_dir() -> PathBuf {
    let program_data =
        std::env::var("PROGRAMDATA").unwrap_or_else(|_| "C:\\ProgramData".to_string());
    PathBuf::from(program_data).join("ZeroTier").join("One")
}

#[cfg(target_os = "macos")]
fn global_service_dir() -> PathBuf {
    PathBuf::from("/Library/Application Support/ZeroTier/One")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn global_service_dir() -> PathBuf {
    PathBuf::from("/var/lib/zerotier-one")
}

/// Credentials read from disk
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Contents of authtoken.secret, trimmed
    pub auth_token: String,
    /// Service HTTP port
    pub port: u16,
}

/// Read the auth token and port from `dirs.local`, provisioning first
/// if either file is missing.
///
/// A missing or empty token is fatal. A missing or malformed port file
/// only produces a warning and falls back to [`DEFAULT_PORT`].
pub async fn discover_credentials(
    dirs: &ServiceDirs,
    provisioner: &dyn CredentialProvisioner,
) -> Result<Credentials, ClientError> {
    let token_path = dirs.local.join(AUTH_TOKEN_FILE);
    let port_path = dirs.local.join(PORT_FILE);

    if !token_path.exists() || !port_path.exists() {
        info!(dir = %dirs.local.display(), "credentials not found, provisioning");
        provisioner.provision(&dirs.global, &dirs.local).await?;
    }

    let auth_token = read_auth_token(&token_path)?;
    let port = read_port(&port_path);

    Ok(Credentials { auth_token, port })
}

fn read_auth_token(path: &Path) -> Result<String, ClientError> {
    let raw = std::fs::read_to_string(path).map_err(|_| ClientError::AuthTokenUnavailable {
        path: path.to_path_buf(),
    })?;

    let token = raw.trim();
    if token.is_empty() {
        return Err(ClientError::AuthTokenUnavailable {
            path: path.to_path_buf(),
        });
    }

    Ok(token.to_string())
}

fn read_port(path: &Path) -> u16 {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            warn!(
                path = %path.display(),
                port = DEFAULT_PORT,
                "port file unreadable, assuming default port"
            );
            return DEFAULT_PORT;
        }
    };

    // Parse as u32 first so values like 65536 land in the range check
    // instead of overflowing.
    match raw.trim().parse::<u32>() {
        Ok(port @ 1..=65535) => port as u16,
        Ok(out_of_range) => {
            warn!(
                value = out_of_range,
                port = DEFAULT_PORT,
                "port file value out of range, assuming default port"
            );
            DEFAULT_PORT
        }
        Err(_) => {
            warn!(
                path = %path.display(),
                port = DEFAULT_PORT,
                "port file not a number, assuming default port"
            );
            DEFAULT_PORT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_auth_token_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, AUTH_TOKEN_FILE, "abc123\r\n");
        assert_eq!(read_auth_token(&path).unwrap(), "abc123");
    }

    #[test]
    fn test_read_auth_token_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, AUTH_TOKEN_FILE, "  \n");
        let err = read_auth_token(&path).unwrap_err();
        assert!(matches!(err, ClientError::AuthTokenUnavailable { .. }));
    }

    #[test]
    fn test_read_auth_token_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(AUTH_TOKEN_FILE);
        let err = read_auth_token(&path).unwrap_err();
        assert!(matches!(err, ClientError::AuthTokenUnavailable { .. }));
    }

    #[test]
    fn test_read_port_accepts_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, PORT_FILE, "9994\n");
        assert_eq!(read_port(&path), 9994);
    }

    #[test]
    fn test_read_port_rejects_zero() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, PORT_FILE, "0");
        assert_eq!(read_port(&path), DEFAULT_PORT);
    }

    #[test]
    fn test_read_port_rejects_values_above_u16() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, PORT_FILE, "65536");
        assert_eq!(read_port(&path), DEFAULT_PORT);
    }

    #[test]
    fn test_read_port_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, PORT_FILE, "notaport");
        assert_eq!(read_port(&path), DEFAULT_PORT);
    }

    #[test]
    fn test_read_port_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, PORT_FILE, "");
        assert_eq!(read_port(&path), DEFAULT_PORT);
    }

    #[test]
    fn test_read_port_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PORT_FILE);
        assert_eq!(read_port(&path), DEFAULT_PORT);
    }
}
