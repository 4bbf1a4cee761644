//! Directory entry classification.

use std::fs::FileType;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Longest pathname, in bytes, that the walker will construct.
#[cfg(unix)]
pub const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;

/// Longest pathname, in bytes, that the walker will construct.
#[cfg(not(unix))]
pub const MAX_PATH_LEN: usize = 32_767;

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

/// Cheap type tag of a directory entry, as reported by directory iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Sockets, FIFOs, devices and anything else.
    Other,
}

impl EntryKind {
    /// Classify a file type without following symlinks.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// Set of entry kinds accepted by a `types=` filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMask(u8);

impl TypeMask {
    pub const FILE: Self = Self(1);
    pub const DIRECTORY: Self = Self(2);
    pub const SYMLINK: Self = Self(4);

    /// An empty mask; matches nothing.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Parse a string of `f`, `d` and `s` letters.
    ///
    /// Any other character is ignored, so `"fx"` is the same as `"f"` and a
    /// string with no recognized letter yields an empty mask.
    pub fn from_letters(letters: &str) -> Self {
        let mut mask = Self::empty();
        for letter in letters.chars() {
            match letter {
                'f' => mask = mask.union(Self::FILE),
                'd' => mask = mask.union(Self::DIRECTORY),
                's' => mask = mask.union(Self::SYMLINK),
                other => tracing::debug!(letter = %other, "ignoring unknown type letter"),
            }
        }
        mask
    }

    /// Combine two masks.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if the mask has no kinds set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if entries of `kind` pass this mask.
    pub fn admits(self, kind: EntryKind) -> bool {
        let bit = match kind {
            EntryKind::File => Self::FILE,
            EntryKind::Directory => Self::DIRECTORY,
            EntryKind::Symlink => Self::SYMLINK,
            EntryKind::Other => return false,
        };
        self.0 & bit.0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_letters() {
        let mask = TypeMask::from_letters("fd");
        assert!(mask.admits(EntryKind::File));
        assert!(mask.admits(EntryKind::Directory));
        assert!(!mask.admits(EntryKind::Symlink));
        assert!(!mask.admits(EntryKind::Other));
    }

    #[test]
    fn test_unknown_letters_ignored() {
        assert_eq!(TypeMask::from_letters("xsz"), TypeMask::SYMLINK);
        assert!(TypeMask::from_letters("q").is_empty());
    }

    #[test]
    fn test_other_never_admitted() {
        let mask = TypeMask::from_letters("fds");
        assert!(!mask.admits(EntryKind::Other));
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::Symlink.to_string(), "symlink");
        let name: &'static str = EntryKind::Directory.into();
        assert_eq!(name, "directory");
    }

    #[test]
    fn test_from_file_type() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, "x").unwrap();

        let kind = EntryKind::from_file_type(std::fs::symlink_metadata(&file).unwrap().file_type());
        assert_eq!(kind, EntryKind::File);
        let kind =
            EntryKind::from_file_type(std::fs::symlink_metadata(temp.path()).unwrap().file_type());
        assert!(kind.is_dir());
    }
}
