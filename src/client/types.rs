// Service API record types
//
// These mirror the JSON documents the ZeroTier One service returns from
// /status, /network, and /peer. Records are plain data: nothing mutates
// them after deserialization except the `connected` flag on Network,
// which the list operation forces to true. Unknown JSON fields are
// ignored so newer service versions keep deserializing.

use serde::{Deserialize, Serialize};

/// Node state reported by GET /status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    /// 10-digit hex node address
    pub address: String,
    /// Service version string, e.g. "1.12.2"
    pub version: String,
    #[serde(default)]
    pub version_major: i32,
    #[serde(default)]
    pub version_minor: i32,
    #[serde(default)]
    pub version_rev: i32,
    /// Whether the node currently has a path to a root server
    pub online: bool,
    /// Service clock, milliseconds since the epoch
    #[serde(default)]
    pub clock: i64,
    /// True when direct UDP is blocked and traffic rides the slow TCP relay
    #[serde(default)]
    pub tcp_fallback_active: bool,
    /// Full public identity (address:0:public key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_identity: Option<String>,
}

/// One joined network as reported by GET /network
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// 16-digit hex network id
    pub id: String,
    /// Network name assigned by the controller (empty until configured)
    #[serde(default)]
    pub name: String,
    /// Configuration status: OK, ACCESS_DENIED, NOT_FOUND, ...
    #[serde(default)]
    pub status: String,
    /// PUBLIC or PRIVATE
    #[serde(rename = "type", default)]
    pub network_type: String,
    /// MAC address of the virtual interface
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub mtu: u32,
    #[serde(default)]
    pub dhcp: bool,
    #[serde(default)]
    pub bridge: bool,
    #[serde(default)]
    pub broadcast_enabled: bool,
    /// Non-zero when the OS-level port failed to configure
    #[serde(default)]
    pub port_error: i32,
    #[serde(default)]
    pub netconf_revision: u64,
    /// Managed IP assignments, CIDR form
    #[serde(default)]
    pub assigned_addresses: Vec<String>,
    /// Managed routes pushed by the controller
    #[serde(default)]
    pub routes: Vec<Route>,
    /// OS name of the virtual interface, e.g. "ztr2qsmswx"
    #[serde(default)]
    pub port_device_name: String,
    #[serde(default)]
    pub allow_managed: bool,
    #[serde(default)]
    pub allow_global: bool,
    #[serde(default)]
    pub allow_default: bool,
    /// Membership in the live feed is what makes a network connected;
    /// the list operation sets this, whatever the raw JSON said.
    #[serde(default)]
    pub connected: bool,
}

/// Managed route entry on a network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub target: String,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub flags: u16,
    #[serde(default)]
    pub metric: u16,
}

/// One known remote endpoint as reported by GET /peer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    /// 10-digit hex node address
    pub address: String,
    /// Peer version, "-1.-1.-1" when unknown
    #[serde(default)]
    pub version: String,
    /// Round-trip latency in milliseconds, -1 when unknown
    #[serde(default)]
    pub latency: i64,
    /// LEAF, PLANET, or MOON
    #[serde(default)]
    pub role: String,
    /// Physical paths to this peer
    #[serde(default)]
    pub paths: Vec<PeerPath>,
}

/// Physical path to a peer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerPath {
    /// Physical endpoint, "ip/port" form
    pub address: String,
    #[serde(default)]
    pub last_send: i64,
    #[serde(default)]
    pub last_receive: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub trusted_path_id: u64,
}

/// Options sent as the body of a join request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOptions {
    /// Accept managed IP assignment and managed routes
    pub allow_managed: bool,
    /// Accept managed routes to public IP space
    pub allow_global: bool,
    /// Accept a managed default route (full tunnel)
    pub allow_default: bool,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            allow_managed: true,
            allow_global: false,
            allow_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserializes_service_document() {
        let body = r#"{
            "address": "9d2ac3b01a",
            "clock": 1724204400123,
            "online": true,
            "planetWorldId": 149604618,
            "publicIdentity": "9d2ac3b01a:0:f1a2b3",
            "tcpFallbackActive": false,
            "version": "1.12.2",
            "versionBuild": 0,
            "versionMajor": 1,
            "versionMinor": 12,
            "versionRev": 2
        }"#;

        let status: NodeStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.address, "9d2ac3b01a");
        assert_eq!(status.version, "1.12.2");
        assert_eq!(status.version_minor, 12);
        assert!(status.online);
        assert!(!status.tcp_fallback_active);
        assert_eq!(status.public_identity.as_deref(), Some("9d2ac3b01a:0:f1a2b3"));
    }

    #[test]
    fn test_network_deserializes_service_document() {
        let body = r#"{
            "allowDefault": false,
            "allowGlobal": false,
            "allowManaged": true,
            "assignedAddresses": ["10.147.20.190/24"],
            "bridge": false,
            "broadcastEnabled": true,
            "dhcp": false,
            "id": "8056c2e21c000001",
            "mac": "9e:02:57:aa:bb:cc",
            "mtu": 2800,
            "name": "earth",
            "netconfRevision": 7,
            "nwid": "8056c2e21c000001",
            "portDeviceName": "ztr2qsmswx",
            "portError": 0,
            "routes": [
                {"flags": 0, "metric": 0, "target": "10.147.20.0/24", "via": null}
            ],
            "status": "OK",
            "type": "PUBLIC"
        }"#;

        let network: Network = serde_json::from_str(body).unwrap();
        assert_eq!(network.id, "8056c2e21c000001");
        assert_eq!(network.name, "earth");
        assert_eq!(network.network_type, "PUBLIC");
        assert_eq!(network.assigned_addresses, vec!["10.147.20.190/24"]);
        assert_eq!(network.routes[0].target, "10.147.20.0/24");
        assert!(network.routes[0].via.is_none());
        assert!(network.allow_managed);
        // Not in the document, so it defaults off until the list
        // operation marks it.
        assert!(!network.connected);
    }

    #[test]
    fn test_peer_deserializes_service_document() {
        let body = r#"[{
            "address": "992fcf1db7",
            "isBonded": false,
            "latency": 40,
            "paths": [{
                "active": true,
                "address": "195.181.173.159/9993",
                "expired": false,
                "lastReceive": 1724204391000,
                "lastSend": 1724204392000,
                "localSocket": 94050861426448,
                "preferred": true,
                "trustedPathId": 0
            }],
            "role": "PLANET",
            "version": "-1.-1.-1",
            "versionMajor": -1,
            "versionMinor": -1,
            "versionRev": -1
        }]"#;

        let peers: Vec<Peer> = serde_json::from_str(body).unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].role, "PLANET");
        assert_eq!(peers[0].latency, 40);
        assert_eq!(peers[0].paths[0].address, "195.181.173.159/9993");
        assert!(peers[0].paths[0].preferred);
    }

    #[test]
    fn test_join_options_default_wire_form() {
        let body = serde_json::to_value(JoinOptions::default()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "allowManaged": true,
                "allowGlobal": false,
                "allowDefault": false
            })
        );
    }
}
