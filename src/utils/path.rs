//! Path manipulation utilities

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading '..' components, they cannot be resolved lexically
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Check that a relative path stays inside whatever directory it is joined to
///
/// Absolute paths and paths whose normalized form starts with `..` fail.
#[must_use]
pub fn stays_within(path: &Path) -> bool {
    if path.is_absolute() || path.has_root() {
        return false;
    }

    !matches!(
        normalize_path(path).components().next(),
        Some(Component::ParentDir)
    )
}
