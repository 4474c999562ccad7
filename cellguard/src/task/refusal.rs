//! Precondition refusals.

use std::fmt;

/// Title of the dialog shown when no network is available.
pub const NO_NETWORK_TITLE: &str = "No network connection";

/// Body of the dialog shown when no network is available.
pub const NO_NETWORK_BODY: &str = "Downloading cell tower data requires an Internet connection. \
     Connect to Wi-Fi or mobile data and try again.";

/// Message shown when no OpenCellID API key is configured.
pub const NO_API_KEY_MESSAGE: &str =
    "No OpenCellID API key detected! Request a key and add it to the settings first.";

/// Reason a fetch or import was not started.
///
/// None of these paths touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No network transport is connected.
    NoNetwork,
    /// No usable API key is configured.
    NoApiKey,
    /// The device position is unknown.
    NoLocation,
    /// The same task is already running.
    AlreadyInFlight,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::NoNetwork => write!(f, "No network connection available"),
            Refusal::NoApiKey => write!(f, "No OpenCellID API key configured"),
            Refusal::NoLocation => write!(f, "Current location is unknown"),
            Refusal::AlreadyInFlight => write!(f, "A download is already in progress"),
        }
    }
}

impl std::error::Error for Refusal {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Refusal::NoApiKey.to_string(), "No OpenCellID API key configured");
        assert_eq!(
            Refusal::AlreadyInFlight.to_string(),
            "A download is already in progress"
        );
    }
}
