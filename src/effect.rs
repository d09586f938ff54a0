//! Effects - side effects declared by the reducer

use crate::state::{LookupTarget, Unit};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current conditions; the completion carries `seq` back
    FetchWeather {
        seq: u64,
        target: LookupTarget,
        unit: Unit,
    },
    /// Ask the location service for coordinates
    Locate { seq: u64 },
    /// Overwrite the stored recent-search list
    SaveRecent { cities: Vec<String> },
}
