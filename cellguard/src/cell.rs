//! Serving cell identity.

use std::fmt;

/// Raw value radio stacks report for an identity field they do not know.
pub const UNKNOWN_RAW: i32 = i32::MAX;

/// Identity of a GSM/UMTS/LTE cell as far as the radio stack knows it.
///
/// Every part is optional: modems routinely report only the network part
/// (MCC/MNC) before registration completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellIdentity {
    /// Mobile country code.
    pub mcc: Option<u16>,
    /// Mobile network code.
    pub mnc: Option<u16>,
    /// Location area code (TAC on LTE).
    pub lac: Option<u32>,
    /// Cell id.
    pub cid: Option<u32>,
}

impl CellIdentity {
    /// Creates an identity with only the network part known.
    pub fn network(mcc: u16, mnc: u16) -> Self {
        Self {
            mcc: Some(mcc),
            mnc: Some(mnc),
            ..Default::default()
        }
    }

    /// Sets the location area code.
    pub fn with_lac(mut self, lac: u32) -> Self {
        self.lac = Some(lac);
        self
    }

    /// Sets the cell id.
    pub fn with_cid(mut self, cid: u32) -> Self {
        self.cid = Some(cid);
        self
    }

    /// Converts raw radio values, where [`UNKNOWN_RAW`] or a negative
    /// number marks an unknown field.
    pub fn from_raw(mcc: i32, mnc: i32, lac: i32, cid: i32) -> Self {
        Self {
            mcc: known(mcc).and_then(|v| u16::try_from(v).ok()),
            mnc: known(mnc).and_then(|v| u16::try_from(v).ok()),
            lac: known(lac),
            cid: known(cid),
        }
    }

    /// Whether `mcc`/`mnc` agree with the known parts of this identity.
    pub fn matches_network(&self, mcc: u16, mnc: u16) -> bool {
        self.mcc.map_or(true, |m| m == mcc) && self.mnc.map_or(true, |m| m == mnc)
    }
}

fn known(raw: i32) -> Option<u32> {
    if raw == UNKNOWN_RAW {
        None
    } else {
        u32::try_from(raw).ok()
    }
}

impl fmt::Display for CellIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part<T: fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| "?".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "{}-{}-{}-{}",
            part(self.mcc),
            part(self.mnc),
            part(self.lac),
            part(self.cid)
        )
    }
}
