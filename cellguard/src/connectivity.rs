//! Network connectivity gate.
//!
//! Every network-bound operation first asks the [`ConnectivityGate`]
//! whether any transport is up. Lookup failures are never propagated: a
//! monitor that cannot answer counts as "offline".

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::platform::{NetworkMonitor, NetworkStateError, Transport};

/// Answers "is there a usable network right now?".
#[derive(Clone)]
pub struct ConnectivityGate {
    monitor: Arc<dyn NetworkMonitor>,
}

impl ConnectivityGate {
    /// Creates a gate backed by `monitor`.
    pub fn new(monitor: Arc<dyn NetworkMonitor>) -> Self {
        Self { monitor }
    }

    /// Returns true if at least one transport reports a connection.
    ///
    /// Every transport is queried first; a failed lookup on any of them
    /// makes the answer `false`, even when another transport is up.
    pub fn is_available(&self) -> bool {
        let mut connected = Vec::with_capacity(Transport::ALL.len());
        for transport in Transport::ALL {
            match self.monitor.is_connected(transport) {
                Ok(state) => connected.push((transport, state == Some(true))),
                Err(e) => {
                    warn!(
                        transport = transport.name(),
                        error = %e,
                        "Network state lookup failed, treating as offline"
                    );
                    return false;
                }
            }
        }

        match connected.iter().find(|(_, up)| *up) {
            Some((transport, _)) => {
                debug!(transport = transport.name(), "Network transport connected");
                true
            }
            None => false,
        }
    }
}

/// Default location of the kernel's network interface directory.
const SYS_CLASS_NET: &str = "/sys/class/net";

/// Network monitor reading interface state from Linux sysfs.
///
/// Interfaces are classified by their kernel name:
/// `wl*` is Wi-Fi, `ww*`/`rmnet*`/`ccmni*` is mobile data and
/// `en*`/`eth*` is Ethernet. An interface counts as connected when its
/// `operstate` is `up`.
#[derive(Debug, Clone)]
pub struct SysfsNetworkMonitor {
    root: PathBuf,
}

impl Default for SysfsNetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsNetworkMonitor {
    /// Creates a monitor reading from `/sys/class/net`.
    pub fn new() -> Self {
        Self::with_root(SYS_CLASS_NET)
    }

    /// Creates a monitor reading from a custom directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn classify(name: &str) -> Option<Transport> {
        if name.starts_with("wl") {
            Some(Transport::Wifi)
        } else if name.starts_with("ww") || name.starts_with("rmnet") || name.starts_with("ccmni")
        {
            Some(Transport::Mobile)
        } else if name.starts_with("en") || name.starts_with("eth") {
            Some(Transport::Ethernet)
        } else {
            None
        }
    }
}

impl NetworkMonitor for SysfsNetworkMonitor {
    fn is_connected(&self, transport: Transport) -> Result<Option<bool>, NetworkStateError> {
        let mut seen = false;

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if Self::classify(&name) != Some(transport) {
                continue;
            }
            seen = true;

            let state = fs::read_to_string(entry.path().join("operstate"))?;
            if state.trim() == "up" {
                return Ok(Some(true));
            }
        }

        Ok(seen.then_some(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::FixedNetwork;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn fake_sysfs(interfaces: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, state) in interfaces {
            let iface = dir.path().join(name);
            fs::create_dir(&iface).unwrap();
            fs::write(iface.join("operstate"), format!("{}\n", state)).unwrap();
        }
        dir
    }

    #[test]
    fn test_gate_online() {
        let gate = ConnectivityGate::new(Arc::new(FixedNetwork::online()));
        assert!(gate.is_available());
    }

    #[test]
    fn test_gate_offline() {
        let gate = ConnectivityGate::new(Arc::new(FixedNetwork::offline()));
        assert!(!gate.is_available());
    }

    #[test]
    fn test_gate_mobile_only() {
        let network = FixedNetwork {
            states: HashMap::from([(Transport::Wifi, false), (Transport::Mobile, true)]),
            fail: false,
        };
        let gate = ConnectivityGate::new(Arc::new(network));
        assert!(gate.is_available());
    }

    #[test]
    fn test_gate_no_transports() {
        let gate = ConnectivityGate::new(Arc::new(FixedNetwork::default()));
        assert!(!gate.is_available());
    }

    #[test]
    fn test_gate_lookup_error_is_offline() {
        let gate = ConnectivityGate::new(Arc::new(FixedNetwork::failing()));
        assert!(!gate.is_available());
    }

    /// Wi-Fi up, but the mobile lookup fails.
    struct WifiUpMobileFailing;

    impl NetworkMonitor for WifiUpMobileFailing {
        fn is_connected(&self, transport: Transport) -> Result<Option<bool>, NetworkStateError> {
            match transport {
                Transport::Wifi => Ok(Some(true)),
                Transport::Mobile => Err(NetworkStateError::Unavailable("radio".to_string())),
                Transport::Ethernet => Ok(None),
            }
        }
    }

    #[test]
    fn test_gate_lookup_error_wins_over_connected_transport() {
        let gate = ConnectivityGate::new(Arc::new(WifiUpMobileFailing));
        assert!(!gate.is_available());
    }

    #[test]
    fn test_sysfs_wifi_up() {
        let dir = fake_sysfs(&[("lo", "unknown"), ("wlp2s0", "up"), ("enp3s0", "down")]);
        let monitor = SysfsNetworkMonitor::with_root(dir.path());

        assert_eq!(monitor.is_connected(Transport::Wifi).unwrap(), Some(true));
        assert_eq!(monitor.is_connected(Transport::Ethernet).unwrap(), Some(false));
        assert_eq!(monitor.is_connected(Transport::Mobile).unwrap(), None);
    }

    #[test]
    fn test_sysfs_mobile_interface_names() {
        let dir = fake_sysfs(&[("rmnet_data0", "up")]);
        let monitor = SysfsNetworkMonitor::with_root(dir.path());
        assert_eq!(monitor.is_connected(Transport::Mobile).unwrap(), Some(true));
    }

    #[test]
    fn test_sysfs_missing_root_fails_gate_closed() {
        let monitor = SysfsNetworkMonitor::with_root("/nonexistent/sys/class/net");
        assert!(monitor.is_connected(Transport::Wifi).is_err());

        let gate = ConnectivityGate::new(Arc::new(monitor));
        assert!(!gate.is_available());
    }
}
