//! Version records read from a host directory of dumped `version.bin` files.

use ctr_os::sysver::{VersionError, VersionRecord, VersionStorage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `nver.bin` and `cver.bin` from a directory.
#[derive(Debug, Clone)]
pub struct DirVersionStorage {
    dir: PathBuf,
}

impl DirVersionStorage {
    /// Storage rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the dump for `record`.
    pub fn path_of(&self, record: VersionRecord) -> PathBuf {
        let name = match record {
            VersionRecord::NVer => "nver.bin",
            VersionRecord::CVer => "cver.bin",
        };
        self.dir.join(name)
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl VersionStorage for DirVersionStorage {
    fn read_version_bin(&mut self, record: VersionRecord) -> Result<Vec<u8>, VersionError> {
        let path = self.path_of(record);
        debug!(?path, %record, "Reading version record");
        std::fs::read(&path).map_err(|e| VersionError::Io {
            record,
            errno: e.raw_os_error().unwrap_or(libc::EIO),
        })
    }
}
