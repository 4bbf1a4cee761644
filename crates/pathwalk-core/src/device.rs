//! Filesystem device boundaries.

use std::fs::Metadata;
use std::path::Path;

use crate::error::WalkError;

/// Device identifier of the filesystem a root lives on.
///
/// Built once per root before traversal begins; entries on any other device
/// are pruned so the walk never crosses a mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGuard {
    device: u64,
}

impl DeviceGuard {
    /// Record the device of `root` without following a trailing symlink.
    pub fn for_root(root: &Path) -> Result<Self, WalkError> {
        let metadata = std::fs::symlink_metadata(root).map_err(|e| WalkError::io(root, e))?;
        Ok(Self::new(device_of(&metadata)))
    }

    /// Create a guard for a known device id.
    pub fn new(device: u64) -> Self {
        Self { device }
    }

    /// The recorded device id.
    pub fn device(&self) -> u64 {
        self.device
    }

    /// Check if an entry on `device` stays within the boundary.
    pub fn admits(&self, device: u64) -> bool {
        self.device == device
    }
}

/// Get the device ID from metadata.
#[cfg(unix)]
pub fn device_of(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.dev()
}

#[cfg(not(unix))]
pub fn device_of(_metadata: &Metadata) -> u64 {
    0 // No device ids; every entry shares the root's device
}
