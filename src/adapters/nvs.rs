//! Configuration persistence adapter.
//!
//! Implements [`ConfigPort`] on top of ESP-IDF NVS (non-volatile storage)
//! when built with the `espidf` feature, storing the whole
//! [`HeatingConfig`] as one postcard-encoded blob. On host builds an
//! in-memory store stands in so the same load/validate/save path is
//! exercised in tests and the simulator.
//!
//! Both backends validate before persisting: a config that fails
//! [`HeatingConfig::validate`] never reaches storage.

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::HeatingConfig;

/// NVS key under which the encoded config blob lives.
pub const CONFIG_KEY: &str = "heating_cfg";

// ───────────────────────────────────────────────────────────────
// ESP-IDF NVS
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub use esp_impl::NvsConfigStore;

#[cfg(feature = "espidf")]
mod esp_impl {
    use super::{ConfigError, ConfigPort, HeatingConfig, CONFIG_KEY};
    use core::cell::RefCell;
    use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
    use log::{info, warn};

    const NAMESPACE: &str = "hydrozone";
    const BLOB_MAX: usize = 1024;

    pub struct NvsConfigStore {
        nvs: RefCell<EspNvs<NvsDefault>>,
    }

    impl NvsConfigStore {
        pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
            let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|_| ConfigError::IoError)?;
            Ok(Self {
                nvs: RefCell::new(nvs),
            })
        }
    }

    impl ConfigPort for NvsConfigStore {
        fn load(&self) -> Result<HeatingConfig, ConfigError> {
            let mut buf = [0u8; BLOB_MAX];
            let blob = self
                .nvs
                .borrow_mut()
                .get_blob(CONFIG_KEY, &mut buf)
                .map_err(|_| ConfigError::IoError)?
                .map(<[u8]>::to_vec);

            let Some(blob) = blob else {
                info!("no stored config, using defaults");
                return Ok(HeatingConfig::default());
            };

            let config: HeatingConfig = postcard::from_bytes(&blob).map_err(|_| {
                warn!("stored config failed to decode");
                ConfigError::Corrupted
            })?;
            config.validate().map_err(ConfigError::ValidationFailed)?;
            Ok(config)
        }

        fn save(&self, config: &HeatingConfig) -> Result<(), ConfigError> {
            config.validate().map_err(ConfigError::ValidationFailed)?;
            let blob = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            self.nvs
                .borrow_mut()
                .set_blob(CONFIG_KEY, &blob)
                .map_err(|_| ConfigError::IoError)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host in-memory store
// ───────────────────────────────────────────────────────────────

/// In-memory config store for host builds. Round-trips through the same
/// postcard encoding the NVS backend uses.
#[cfg(not(feature = "espidf"))]
#[derive(Default)]
pub struct MemConfigStore {
    blob: core::cell::RefCell<Option<Vec<u8>>>,
}

#[cfg(not(feature = "espidf"))]
impl MemConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with raw bytes (for corruption tests).
    pub fn seed_raw(&self, bytes: Vec<u8>) {
        *self.blob.borrow_mut() = Some(bytes);
    }
}

#[cfg(not(feature = "espidf"))]
impl ConfigPort for MemConfigStore {
    fn load(&self) -> Result<HeatingConfig, ConfigError> {
        let Some(blob) = self.blob.borrow().clone() else {
            return Ok(HeatingConfig::default());
        };
        let config: HeatingConfig =
            postcard::from_bytes(&blob).map_err(|_| ConfigError::Corrupted)?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }

    fn save(&self, config: &HeatingConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;
        let blob = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        *self.blob.borrow_mut() = Some(blob);
        Ok(())
    }
}
