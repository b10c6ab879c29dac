//! Firmware image loading.
//!
//! Images are raw byte streams with no header. They are read whole and
//! checked against the firmware region size before anything touches memory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use intel_8086::Fault;
use intel_8086::memory::FIRMWARE_SIZE;
use thiserror::Error;
use tracing::info;

/// Errors from reading a firmware image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read firmware {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("firmware image is {len} bytes, region holds {max}", max = FIRMWARE_SIZE)]
    TooLarge { len: usize },
    #[error(transparent)]
    Memory(#[from] Fault),
}

/// Read a firmware image from `path`.
pub fn load_firmware(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let image = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    check_size(&image)?;
    info!("loaded {} bytes of firmware from {}", image.len(), path.display());
    Ok(image)
}

pub(crate) fn check_size(image: &[u8]) -> Result<(), LoadError> {
    if image.len() > FIRMWARE_SIZE {
        return Err(LoadError::TooLarge { len: image.len() });
    }
    Ok(())
}
