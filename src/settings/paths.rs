//! Filesystem path feasibility checks.

use std::fs;
use std::path::Path;

/// Decides whether a path can be used as a directory for generated files.
pub trait PathCheck: Send + Sync {
    /// True if the path exists or could be created.
    fn is_usable(&self, path: &Path) -> bool;
}

/// Checks paths against the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPathCheck;

impl FsPathCheck {
    fn is_valid_pathname(path: &Path) -> bool {
        let raw = path.as_os_str();
        !raw.is_empty() && !raw.to_string_lossy().contains('\0')
    }

    /// A missing path is creatable when its parent is an existing, writable directory.
    fn is_creatable(path: &Path) -> bool {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        match fs::metadata(parent) {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }
}

impl PathCheck for FsPathCheck {
    fn is_usable(&self, path: &Path) -> bool {
        Self::is_valid_pathname(path) && (path.exists() || Self::is_creatable(path))
    }
}

impl<F> PathCheck for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_usable(&self, path: &Path) -> bool {
        self(path)
    }
}
