use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use log::{info, warn};
use once_cell::sync::Lazy;

static GLOBAL_CONFIG: Lazy<Mutex<Option<Config>>> = Lazy::new(|| Mutex::new(None));

// Bumped on every `set_global`; per-thread codec caches built under an older value are stale.
static GLOBAL_GENERATION: AtomicU64 = AtomicU64::new(0);

/// Key sizes accepted by the underlying AES block cipher: AES-128, AES-192 and AES-256.
pub(crate) const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Configuring the extid library.
#[derive(Clone)]
pub struct Config<'a> {
    pub(crate) key: &'a [u8],
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidKeyLength(usize),
    GlobalNotSet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidKeyLength(len) => {
                write!(f, "Key length was {} bytes, expected 16, 24 or 32", len)
            }
            ConfigError::GlobalNotSet => {
                write!(f, "Global configuration has not been set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub(crate) fn check_key_length(key: &[u8]) -> Result<(), ConfigError> {
    if KEY_LENGTHS.contains(&key.len()) {
        Ok(())
    } else {
        warn!("rejecting {}-byte key", key.len());
        Err(ConfigError::InvalidKeyLength(key.len()))
    }
}

impl<'a> Config<'a> {
    /// Creates a new configuration with the given secret `key`.
    ///
    /// The key is used as-is as the AES key, so it must be exactly 16, 24 or 32 bytes
    /// long.  16 bytes (AES-128) is the reference construction.
    pub fn new(key: &'a [u8]) -> Result<Self, ConfigError> {
        check_key_length(key)?;
        Ok(Config { key })
    }

    /// Sets the global configuration. This should be called before the `Field` type methods
    /// are called.
    ///
    /// Replacing the configuration later is allowed: codecs cached by `Field` on any thread
    /// are rebuilt with the new key on their next use.
    pub fn set_global(config: Config<'static>) {
        info!("installing global config ({}-byte key)", config.key.len());
        let mut global_config = GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *global_config = Some(config);
        GLOBAL_GENERATION.fetch_add(1, Ordering::Release);
    }

    /// Number of times the global configuration has been set.
    pub(crate) fn generation() -> u64 {
        GLOBAL_GENERATION.load(Ordering::Acquire)
    }

    /// Accesses the global configuration, if set.
    pub fn global() -> Option<Config<'static>> {
        GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
