// HTTP client for the local service API
//
// A ServiceClient talks to the ZeroTier One service over its local HTTP
// endpoint at http://localhost:<port>. Every request carries the auth
// token as an `auth` query parameter. The client holds no global state
// and is cheap to clone, so callers construct one and pass it wherever
// requests are made.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::{discover_credentials, CredentialProvisioner, ServiceDirs};
use crate::errors::ClientError;

use super::types::{JoinOptions, Network, NodeStatus, Peer};

/// Client for the local ZeroTier One service API
#[derive(Clone)]
pub struct ServiceClient {
    base_url: String,
    auth_token: String,
    http: Client,
}

impl ServiceClient {
    /// Create a client for a service listening on `port` using an
    /// already-known auth token. No timeout is applied; local requests
    /// normally complete immediately and callers that want a bound use
    /// [`ServiceClient::with_timeout`].
    pub fn new(port: u16, auth_token: impl Into<String>) -> Self {
        Self::with_timeout(port, auth_token, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(
        port: u16,
        auth_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://localhost:{}", port),
            auth_token: auth_token.into(),
            http,
        }
    }

    /// Discover credentials on disk and build a client from them.
    ///
    /// Reads the auth token and port from `dirs`, running `provisioner`
    /// first if either file is missing from the local directory.
    pub async fn connect(
        dirs: &ServiceDirs,
        provisioner: &dyn CredentialProvisioner,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let credentials = discover_credentials(dirs, provisioner).await?;
        Ok(Self::with_timeout(
            credentials.port,
            credentials.auth_token,
            timeout,
        ))
    }

    /// Base URL this client sends requests to, e.g. `http://localhost:9993`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach auth and send, mapping transport and status failures.
    /// The token rides as a query parameter on the built request only,
    /// so it never appears in `url` or in error text.
    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request
            .query(&[("auth", self.auth_token.as_str())])
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: url.to_string(),
                // Strip the request URL from the source error; it carries
                // the auth query parameter.
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(endpoint = path, "GET");
        let url = self.endpoint(path);
        let response = self.send(self.http.get(&url), &url).await?;
        response
            .json()
            .await
            .map_err(|source| ClientError::BadResponse {
                url,
                source: source.without_url(),
            })
    }

    /// Fetch node status from GET /status
    pub async fn node_status(&self) -> Result<NodeStatus, ClientError> {
        self.get_json("/status").await
    }

    /// Fetch all joined networks from GET /network.
    ///
    /// Every record in the live feed is connected by definition, so the
    /// flag is forced on regardless of what the document carried.
    pub async fn list_networks(&self) -> Result<Vec<Network>, ClientError> {
        let mut networks: Vec<Network> = self.get_json("/network").await?;
        for network in &mut networks {
            network.connected = true;
        }
        Ok(networks)
    }

    /// Join a network via POST /network/{id}.
    ///
    /// The response body is ignored; the updated record shows up in the
    /// next [`ServiceClient::list_networks`] call.
    pub async fn join_network(
        &self,
        network_id: &str,
        options: &JoinOptions,
    ) -> Result<(), ClientError> {
        debug!(network_id = network_id, "joining network");
        let url = self.endpoint(&format!("/network/{}", network_id));
        self.send(self.http.post(&url).json(options), &url).await?;
        Ok(())
    }

    /// Leave a network via DELETE /network/{id}
    pub async fn leave_network(&self, network_id: &str) -> Result<(), ClientError> {
        debug!(network_id = network_id, "leaving network");
        let url = self.endpoint(&format!("/network/{}", network_id));
        self.send(self.http.delete(&url), &url).await?;
        Ok(())
    }

    /// Fetch all known peers from GET /peer
    pub async fn list_peers(&self) -> Result<Vec<Peer>, ClientError> {
        self.get_json("/peer").await
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}
