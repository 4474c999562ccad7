//! Import of tower data from a user-supplied file.
//!
//! Accepts the OpenCellID bulk export (`cell_towers.csv`, optionally
//! `.gz`) or a saved `getInArea` response. Only towers on the serving
//! network and inside the search radius are kept, so importing a whole
//! country export only stores the neighbourhood.

mod task;

pub use task::{ImportSummary, ImportTask};

use std::path::PathBuf;

use crate::towers::TowerParseError;

/// Errors while reading an import file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file could not be opened.
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not tower CSV.
    #[error("Cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: TowerParseError,
    },
}
