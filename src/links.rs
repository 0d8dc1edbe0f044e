//! Link materialization.
//!
//! The [`Linker`] trait is the only place the refresh pipeline touches the
//! link directory. The production implementation is [`SymlinkLinker`]: each
//! shortcut is a symbolic link to the task folder (a directory symlink on
//! Windows, which needs Developer Mode or the matching privilege).
//!
//! Creating a link over an existing one replaces it, so when two tasks
//! render to the same name the later one wins. A real file or directory in
//! the way is never touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a link, refusing to replace: {0}")]
    Occupied(PathBuf),
}

/// Creates and removes shortcuts in the link directory.
pub trait Linker {
    /// Create a shortcut at `link` resolving to `target`.
    fn create_link(&self, target: &Path, link: &Path) -> Result<(), LinkError>;

    /// Remove an existing shortcut.
    fn remove_link(&self, link: &Path) -> Result<(), LinkError>;
}

/// Shortcuts as filesystem symlinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkLinker;

impl Linker for SymlinkLinker {
    fn create_link(&self, target: &Path, link: &Path) -> Result<(), LinkError> {
        if let Ok(meta) = fs::symlink_metadata(link) {
            if !meta.file_type().is_symlink() {
                return Err(LinkError::Occupied(link.to_path_buf()));
            }
            remove_entry(link)?;
        }
        make_symlink(target, link)?;
        Ok(())
    }

    fn remove_link(&self, link: &Path) -> Result<(), LinkError> {
        remove_entry(link)?;
        Ok(())
    }
}

/// Remove a file or symlink. Windows directory symlinks need `remove_dir`.
fn remove_entry(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        #[cfg(windows)]
        Err(_) if path.is_dir() => fs::remove_dir(path),
        Err(err) => Err(err),
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn make_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
