// libnfctag/src/config.rs

use std::time::Duration;

use crate::discovery::SelectionPolicy;
use crate::types::{NciVersion, PresenceCheckAlgorithm};
use crate::utils::{
    DEFAULT_DEACTIVATE_TIMEOUT_MS, DEFAULT_PRESENCE_INTERVAL_MS, DEFAULT_SELECT_RETRY_BACKOFF_MS,
    DEFAULT_SELECT_TIMEOUT_MS, DEFAULT_SLEEP_FRAME_WINDOW_MS, RetryPolicy, ms,
};
use crate::{Error, Result};

/// Attempts per reselect: the first select plus three retries.
pub const DEFAULT_SELECT_ATTEMPTS: u32 = 4;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub p2p_enabled: bool,
    pub reader_only_mode: bool,
    /// Route Mifare Classic presence checks through the Mifare path.
    pub legacy_mifare_reader: bool,
    pub presence_check_algorithm: PresenceCheckAlgorithm,
    pub presence_check_interval: Duration,
    pub deactivate_timeout: Duration,
    pub select_timeout: Duration,
    pub select_retry: RetryPolicy,
    pub sleep_frame_window: Duration,
    pub nci_version: NciVersion,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            p2p_enabled: false,
            reader_only_mode: false,
            legacy_mifare_reader: true,
            presence_check_algorithm: PresenceCheckAlgorithm::Default,
            presence_check_interval: ms(DEFAULT_PRESENCE_INTERVAL_MS),
            deactivate_timeout: ms(DEFAULT_DEACTIVATE_TIMEOUT_MS),
            select_timeout: ms(DEFAULT_SELECT_TIMEOUT_MS),
            select_retry: RetryPolicy::new(
                DEFAULT_SELECT_ATTEMPTS,
                ms(DEFAULT_SELECT_RETRY_BACKOFF_MS),
            ),
            sleep_frame_window: ms(DEFAULT_SLEEP_FRAME_WINDOW_MS),
            nci_version: NciVersion::default(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(self.p2p_enabled, self.reader_only_mode)
    }

    pub fn validate(&self) -> Result<()> {
        if self.select_retry.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "select_retry.max_attempts must be at least 1".into(),
            ));
        }
        let durations = [
            ("presence_check_interval", self.presence_check_interval),
            ("deactivate_timeout", self.deactivate_timeout),
            ("select_timeout", self.select_timeout),
        ];
        for (name, d) in durations {
            if d.is_zero() {
                return Err(Error::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn p2p_enabled(mut self, enabled: bool) -> Self {
        self.config.p2p_enabled = enabled;
        self
    }

    pub fn reader_only_mode(mut self, reader_only: bool) -> Self {
        self.config.reader_only_mode = reader_only;
        self
    }

    pub fn legacy_mifare_reader(mut self, legacy: bool) -> Self {
        self.config.legacy_mifare_reader = legacy;
        self
    }

    pub fn presence_check_algorithm(mut self, algorithm: PresenceCheckAlgorithm) -> Self {
        self.config.presence_check_algorithm = algorithm;
        self
    }

    pub fn presence_check_interval(mut self, interval: Duration) -> Self {
        self.config.presence_check_interval = interval;
        self
    }

    pub fn deactivate_timeout(mut self, timeout: Duration) -> Self {
        self.config.deactivate_timeout = timeout;
        self
    }

    pub fn select_timeout(mut self, timeout: Duration) -> Self {
        self.config.select_timeout = timeout;
        self
    }

    pub fn select_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.select_retry = policy;
        self
    }

    pub fn sleep_frame_window(mut self, window: Duration) -> Self {
        self.config.sleep_frame_window = window;
        self
    }

    pub fn nci_version(mut self, version: NciVersion) -> Self {
        self.config.nci_version = version;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
