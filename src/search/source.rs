//! Candidate source file names.

use std::env;
use std::path::{Component, Path, PathBuf};

/// A source file, identified by its absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceName {
    absolute_path: PathBuf,
}

impl SourceName {
    /// Resolves `path` against the current directory and folds `.` and `..`
    /// lexically, without touching the filesystem.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        Self {
            absolute_path: normalize(&joined),
        }
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Path relative to the current directory, or the absolute path when the
    /// file lives outside it.
    pub fn relative_path(&self) -> String {
        let relative = env::current_dir()
            .ok()
            .and_then(|cwd| self.absolute_path.strip_prefix(cwd).ok().map(Path::to_path_buf));
        relative
            .unwrap_or_else(|| self.absolute_path.clone())
            .display()
            .to_string()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
