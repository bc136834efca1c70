use std::ffi::CString;
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::fs::resolver::{self, ResolveError, ResolvedResource};
use crate::fs::sys;

/// The directory every request is resolved against.
///
/// Opened once at startup and shared read-only for the rest of the process.
/// The handle is only ever lent out as a [`BorrowedFd`], so resolution can
/// never close it.
#[derive(Debug)]
pub struct ContentRoot {
    fd: OwnedFd,
    path: PathBuf,
}

impl ContentRoot {
    /// Opens `path` as the content root. Fails if it is missing, not a
    /// directory, or a symlink.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let fd = sys::open_dir_cwd(&c_path)?;

        Ok(Self {
            fd,
            path: path.to_path_buf(),
        })
    }

    /// Path the root was opened from, for logging only.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }

    /// Maps a raw URL path onto a file beneath this root.
    pub fn resolve(&self, url_path: &[u8]) -> Result<ResolvedResource, ResolveError> {
        resolver::resolve(self, url_path)
    }
}
