// Client error taxonomy
//
// Every failure a caller can observe is a ClientError value; the library
// never logs-and-swallows. Helpers at the bottom turn selected errors into
// actionable user-facing text for the CLI.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by credential discovery and the service client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable auth token, even after the provisioning attempt.
    /// Fatal configuration error: show it once, do not retry.
    #[error("unable to read the service auth token from {}", .path.display())]
    AuthTokenUnavailable { path: PathBuf },

    /// Credential provisioning failed before any file could be read
    /// (helper missing, spawn failure, unusable platform directories).
    #[error("credential provisioning failed: {reason}")]
    Provision { reason: String },

    /// Transport-level failure: connection refused, socket error, or the
    /// request never completed.
    #[error("cannot reach the service at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status} for {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// The service answered 2xx but the body was not the expected JSON.
    #[error("malformed response from {url}: {source}")]
    BadResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Text shown when a request cannot reach the service at all.
///
/// The desktop front-ends present this as a blocking notice; the CLI
/// prints it to stderr before exiting non-zero. `action` is the verb
/// phrase, e.g. "joining network" or "listing peers".
pub fn service_unreachable_notice(action: &str) -> String {
    format!(
        "Error {}: cannot connect to the ZeroTier One service.\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The service is not running\n\
        • The service is listening on a different port\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the service:\n\
           \x1b[36msudo systemctl status zerotier-one\x1b[0m  (Linux)\n\
           \x1b[36mlaunchctl list | grep zerotier\x1b[0m      (macOS)\n\
           \x1b[36msc query ZeroTierOneService\x1b[0m         (Windows)\n\n\
        2. Verify the port file matches the running service:\n\
           \x1b[36mztone status --port <port>\x1b[0m",
        action
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_notice_names_the_service() {
        let msg = service_unreachable_notice("joining network");
        assert!(msg.contains("Error joining network"));
        assert!(msg.contains("ZeroTier One service"));
        assert!(msg.contains("zerotier-one"));
    }

    #[test]
    fn test_auth_token_error_includes_path() {
        let err = ClientError::AuthTokenUnavailable {
            path: PathBuf::from("/tmp/authtoken.secret"),
        };
        assert!(err.to_string().contains("authtoken.secret"));
    }
}
