//! JSON file config adapter.
//!
//! Implements [`ConfigPort`] for either node config.  On the board the
//! file lives on a SPIFFS partition mounted by [`mount_spiffs`]; on the
//! host any path works.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::NodeConfig;

pub struct JsonFileConfig<T> {
    path: PathBuf,
    _config: PhantomData<fn() -> T>,
}

impl<T: NodeConfig + Default> JsonFileConfig<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _config: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> T {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                warn!("CFG | {}: {}, using defaults", self.path.display(), e);
                T::default()
            }
        }
    }
}

impl<T: NodeConfig + Default> ConfigPort<T> for JsonFileConfig<T> {
    fn load(&self) -> Result<T, ConfigError> {
        let bytes = std::fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config = T::from_json(&bytes)?;
        info!("CFG | loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &T) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        std::fs::write(&self.path, json).map_err(|_| ConfigError::IoError)
    }
}

/// Register the default SPIFFS partition under `/spiffs`.
#[cfg(feature = "espidf")]
pub fn mount_spiffs() -> anyhow::Result<()> {
    use esp_idf_svc::sys::{esp, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};

    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 2,
        format_if_mount_failed: false,
    };
    esp!(unsafe { esp_vfs_spiffs_register(&conf) })?;
    info!("CFG | SPIFFS mounted at /spiffs");
    Ok(())
}
