// Credential provisioning
//
// The service's authtoken.secret and zerotier-one.port live in a
// directory the service owns; on a fresh install the per-user copies do
// not exist yet. Provisioning is the step that produces them. It is a
// capability passed into discovery, so callers decide how copies happen
// instead of the library reaching for a fixed process.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::ClientError;

#[cfg(target_family = "windows")]
const HELPER_EXE: &str = "copyutil.exe";

#[cfg(target_family = "unix")]
const HELPER_EXE: &str = "copyutil";

/// Copies service credentials into a directory the current user can read.
#[async_trait]
pub trait CredentialProvisioner: Send + Sync {
    /// Make the credential files under `global_dir` readable from
    /// `local_dir`. Implementations should leave `local_dir` untouched
    /// on failure rather than write partial files.
    async fn provision(&self, global_dir: &Path, local_dir: &Path) -> Result<(), ClientError>;
}

/// Provisioner that runs the bundled copy helper as a child process.
///
/// The helper is expected to sit next to the current executable and to
/// take the service directory and destination directory as arguments.
/// It carries whatever elevation the platform needs to read the
/// service-owned files.
#[derive(Debug, Default)]
pub struct HelperProvisioner;

impl HelperProvisioner {
    fn helper_path() -> Result<PathBuf, ClientError> {
        let exe = std::env::current_exe().map_err(|e| ClientError::Provision {
            reason: format!("cannot locate the running executable: {}", e),
        })?;
        Ok(exe.with_file_name(HELPER_EXE))
    }
}

#[async_trait]
impl CredentialProvisioner for HelperProvisioner {
    async fn provision(&self, global_dir: &Path, local_dir: &Path) -> Result<(), ClientError> {
        let helper = Self::helper_path()?;
        info!(
            helper = %helper.display(),
            from = %global_dir.display(),
            to = %local_dir.display(),
            "running credential copy helper"
        );

        let status = tokio::process::Command::new(&helper)
            .arg(global_dir)
            .arg(local_dir)
            .status()
            .await
            .map_err(|e| ClientError::Provision {
                reason: format!("failed to run {}: {}", helper.display(), e),
            })?;

        if !status.success() {
            // Non-zero exit is not fatal here; discovery fails later if
            // the files are still missing.
            warn!(code = ?status.code(), "credential copy helper exited with an error");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_sits_next_to_executable() {
        let path = HelperProvisioner::helper_path().unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), HELPER_EXE);
    }
}
