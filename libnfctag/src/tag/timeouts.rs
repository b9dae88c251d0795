// libnfctag/src/tag/timeouts.rs

use std::time::Duration;

use crate::types::TechnologyKind;

/// Per-technology transceive timeout, seeded with the RF protocol defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiveTimeoutTable {
    entries: [Duration; 9],
}

impl Default for TransceiveTimeoutTable {
    fn default() -> Self {
        Self {
            entries: TechnologyKind::ALL.map(TechnologyKind::default_timeout),
        }
    }
}

impl TransceiveTimeoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tech: TechnologyKind) -> Duration {
        self.entries[tech.index()]
    }

    pub fn set(&mut self, tech: TechnologyKind, timeout: Duration) {
        self.entries[tech.index()] = timeout;
    }

    /// Restore every default; done on full deactivation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
