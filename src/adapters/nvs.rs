//! Flash-backed persistence for the volume record and the station config.
//!
//! One adapter serves both ports. Records are opaque blobs addressed by
//! `(namespace, key)`; the config is a postcard blob under `station/cfg`,
//! range-checked on the way in and on the way out.
//!
//! On the board every access opens the namespace, does one blob operation
//! and commits. NVS commits are atomic, so a power cut leaves either the old
//! record or the new one. Host builds keep the records in memory.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::StationConfig;

const CONFIG_NAMESPACE: &str = "station";
const CONFIG_KEY: &str = "cfg";

/// Upper bound on the encoded config; postcard varints keep it well below.
const CONFIG_BLOB_MAX: usize = 64;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    records: memory::Records,
}

impl NvsAdapter {
    /// Bring up the NVS partition.
    ///
    /// A partition with no free pages or an older layout is erased once and
    /// initialised again. Anything else is `ConfigError::IoError`.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        flash::init().map_err(|e| {
            warn!("NVS init: {e}");
            ConfigError::IoError
        })?;

        info!("NVS ready");
        Ok(Self::unchecked())
    }

    fn unchecked() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            records: memory::Records::default(),
        }
    }

    #[cfg(target_os = "espidf")]
    fn get(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        flash::get(namespace, key, buf)
    }

    #[cfg(target_os = "espidf")]
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        flash::put(namespace, key, data)
    }

    #[cfg(not(target_os = "espidf"))]
    fn get(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.records.get(namespace, key, buf)
    }

    #[cfg(not(target_os = "espidf"))]
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.records.put(namespace, key, data)
    }
}

/// Falls back to an adapter whose every access fails when the partition
/// cannot be brought up, so the station still runs without persistence.
impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::unchecked())
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.get(namespace, key, buf)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.put(namespace, key, data)
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<StationConfig, ConfigError> {
        let mut blob = [0u8; CONFIG_BLOB_MAX];
        let len = match self.get(CONFIG_NAMESPACE, CONFIG_KEY, &mut blob) {
            Ok(len) => len,
            Err(StorageError::NotFound) => {
                info!("No stored config, using defaults");
                return Ok(StationConfig::default());
            }
            Err(e) => {
                warn!("Config read: {e}");
                return Err(ConfigError::IoError);
            }
        };

        let cfg: StationConfig =
            postcard::from_bytes(&blob[..len]).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn save(&self, config: &StationConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let mut blob = [0u8; CONFIG_BLOB_MAX];
        let encoded = postcard::to_slice(config, &mut blob).map_err(|_| ConfigError::IoError)?;
        self.put(CONFIG_NAMESPACE, CONFIG_KEY, encoded)
            .map_err(|e| {
                warn!("Config write: {e}");
                ConfigError::IoError
            })?;

        info!("Config saved");
        Ok(())
    }
}

// ── Board backend ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod flash {
    use esp_idf_svc::sys::{
        esp, nvs_close, nvs_commit, nvs_flash_erase, nvs_flash_init, nvs_get_blob, nvs_handle_t,
        nvs_open, nvs_open_mode_t, nvs_open_mode_t_NVS_READONLY, nvs_open_mode_t_NVS_READWRITE,
        nvs_set_blob, EspError, ESP_ERR_NVS_NEW_VERSION_FOUND, ESP_ERR_NVS_NOT_ENOUGH_SPACE,
        ESP_ERR_NVS_NOT_FOUND, ESP_ERR_NVS_NO_FREE_PAGES,
    };

    use crate::app::ports::StorageError;

    /// NVS names are at most 15 bytes plus the terminator.
    const NAME_LEN: usize = 16;

    pub(super) fn init() -> Result<(), EspError> {
        // SAFETY: runs once on the main task before any other NVS call.
        match esp!(unsafe { nvs_flash_init() }) {
            Err(e)
                if e.code() == ESP_ERR_NVS_NO_FREE_PAGES as i32
                    || e.code() == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 =>
            {
                log::warn!("NVS partition unusable ({e}), erasing");
                // SAFETY: as above.
                esp!(unsafe { nvs_flash_erase() })?;
                esp!(unsafe { nvs_flash_init() })
            }
            other => other,
        }
    }

    pub(super) fn get(namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let ns = Namespace::open(namespace, nvs_open_mode_t_NVS_READONLY)?;
        let key = c_name(key);
        let mut len = buf.len();
        // SAFETY: `buf` is writable for `len` bytes; NVS stores the record
        // length back into `len`.
        esp!(unsafe { nvs_get_blob(ns.0, key.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut len) })
            .map_err(storage_error)?;
        Ok(len)
    }

    pub(super) fn put(namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let ns = Namespace::open(namespace, nvs_open_mode_t_NVS_READWRITE)?;
        let key = c_name(key);
        // SAFETY: `data` is readable for its full length.
        esp!(unsafe { nvs_set_blob(ns.0, key.as_ptr().cast(), data.as_ptr().cast(), data.len()) })
            .map_err(storage_error)?;
        // SAFETY: `ns` holds an open read-write handle.
        esp!(unsafe { nvs_commit(ns.0) }).map_err(storage_error)
    }

    /// An open namespace handle, closed on drop.
    struct Namespace(nvs_handle_t);

    impl Namespace {
        fn open(name: &str, mode: nvs_open_mode_t) -> Result<Self, StorageError> {
            let name = c_name(name);
            let mut handle: nvs_handle_t = 0;
            // SAFETY: `name` is NUL-terminated and outlives the call.
            esp!(unsafe { nvs_open(name.as_ptr().cast(), mode, &mut handle) })
                .map_err(storage_error)?;
            Ok(Self(handle))
        }
    }

    impl Drop for Namespace {
        fn drop(&mut self) {
            // SAFETY: the handle came from a successful `nvs_open` and is
            // closed exactly once.
            unsafe { nvs_close(self.0) }
        }
    }

    /// Copy `s` into a NUL-terminated buffer, cutting it at 15 bytes.
    fn c_name(s: &str) -> [u8; NAME_LEN] {
        let mut out = [0u8; NAME_LEN];
        let n = s.len().min(NAME_LEN - 1);
        out[..n].copy_from_slice(&s.as_bytes()[..n]);
        out
    }

    fn storage_error(e: EspError) -> StorageError {
        match e.code() as u32 {
            ESP_ERR_NVS_NOT_FOUND => StorageError::NotFound,
            ESP_ERR_NVS_NOT_ENOUGH_SPACE => StorageError::Full,
            _ => StorageError::IoError,
        }
    }
}

// ── Host backend ──────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::app::ports::StorageError;

    #[derive(Default)]
    pub(super) struct Records(RefCell<HashMap<(String, String), Vec<u8>>>);

    impl Records {
        /// A record longer than `buf` is refused, as `nvs_get_blob` does.
        pub(super) fn get(
            &self,
            namespace: &str,
            key: &str,
            buf: &mut [u8],
        ) -> Result<usize, StorageError> {
            let records = self.0.borrow();
            let data = records
                .get(&(namespace.to_owned(), key.to_owned()))
                .ok_or(StorageError::NotFound)?;
            let dest = buf.get_mut(..data.len()).ok_or(StorageError::IoError)?;
            dest.copy_from_slice(data);
            Ok(data.len())
        }

        pub(super) fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
            self.0
                .borrow_mut()
                .insert((namespace.to_owned(), key.to_owned()), data.to_vec());
            Ok(())
        }
    }
}
