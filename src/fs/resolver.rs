//! URL path to file resolution, one directory at a time.
//!
//! The path is never joined into a filesystem path. Each segment is opened
//! relative to the directory handle reached by the previous one, with
//! `O_NOFOLLOW`/`AT_SYMLINK_NOFOLLOW` on every hop, so a symlink anywhere on
//! the way is a hard failure rather than a redirection.

use std::ffi::CString;
use std::fmt;
use std::fs::File;
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

use crate::fs::root::ContentRoot;
use crate::fs::segment::{is_dot_segment, is_safe_segment};
use crate::fs::sys::{self, EntryKind};
use crate::http::mime::content_type;

/// Upper bound on the URL path, NUL terminator budget included.
pub const PATH_MAX: usize = 512;

/// Document served for directory paths.
pub const INDEX_DOCUMENT: &str = "index.html";

/// An open file ready to be sent.
#[derive(Debug)]
pub struct ResolvedResource {
    pub file: File,
    pub size: u64,
    pub content_type: &'static str,
}

/// Why a path did not resolve.
///
/// Only used for logging: every variant is answered with the same 404 so
/// that "forbidden" and "absent" look identical from outside.
#[derive(Debug)]
pub enum ResolveError {
    /// Empty, oversized, or not starting with `/`.
    MalformedPath,
    /// `//` somewhere in the path.
    EmptySegment,
    /// `.` or `..`.
    DotSegment,
    /// Failed the character-class check.
    UnsafeSegment,
    /// Final entry is neither a regular file nor a directory.
    UnsupportedType(EntryKind),
    /// Stat reported a negative size.
    InvalidSize(i64),
    Io(io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MalformedPath => write!(f, "malformed path"),
            ResolveError::EmptySegment => write!(f, "empty path segment"),
            ResolveError::DotSegment => write!(f, "dot segment"),
            ResolveError::UnsafeSegment => write!(f, "unsafe path segment"),
            ResolveError::UnsupportedType(kind) => write!(f, "unsupported entry type {:?}", kind),
            ResolveError::InvalidSize(size) => write!(f, "invalid file size {}", size),
            ResolveError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<io::Error> for ResolveError {
    fn from(e: io::Error) -> Self {
        ResolveError::Io(e)
    }
}

/// Directory handle the walk is currently positioned at.
///
/// The root is borrowed and survives the walk; every other cursor is owned
/// and closed as soon as it is replaced or the walk returns.
enum Cursor<'r> {
    Root(BorrowedFd<'r>),
    Dir(OwnedFd),
}

impl Cursor<'_> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            Cursor::Root(fd) => *fd,
            Cursor::Dir(fd) => fd.as_fd(),
        }
    }
}

pub(crate) fn resolve(root: &ContentRoot, url_path: &[u8]) -> Result<ResolvedResource, ResolveError> {
    let full = rewrite_path(url_path)?;

    let mut cursor = Cursor::Root(root.handle());
    let mut segments = full[1..].split(|&b| b == b'/').peekable();

    while let Some(seg) = segments.next() {
        let name = checked_segment(seg)?;

        if segments.peek().is_some() {
            let next = sys::open_dir_at(cursor.as_fd(), &name)?;
            cursor = Cursor::Dir(next);
            continue;
        }

        let stat = sys::stat_at(cursor.as_fd(), &name)?;
        return match stat.kind {
            EntryKind::File => {
                let (file, size) = open_regular(cursor.as_fd(), &name, stat.size)?;
                Ok(ResolvedResource {
                    file,
                    size,
                    content_type: content_type(&full),
                })
            }
            EntryKind::Directory => {
                // `<path>/index.html` has to fit the same budget.
                if full.len() + 1 + INDEX_DOCUMENT.len() >= PATH_MAX {
                    return Err(ResolveError::MalformedPath);
                }

                let dir = sys::open_dir_at(cursor.as_fd(), &name)?;
                drop(cursor);
                let (file, size) = open_index(dir.as_fd())?;

                let mut virtual_path = full.clone();
                virtual_path.push(b'/');
                virtual_path.extend_from_slice(INDEX_DOCUMENT.as_bytes());

                Ok(ResolvedResource {
                    file,
                    size,
                    content_type: content_type(&virtual_path),
                })
            }
            kind => Err(ResolveError::UnsupportedType(kind)),
        };
    }

    // `full` always has at least one segment after the leading `/`.
    Err(ResolveError::MalformedPath)
}

/// Strips query and fragment, checks the shape, and appends the index
/// document to directory paths.
fn rewrite_path(url_path: &[u8]) -> Result<Vec<u8>, ResolveError> {
    if url_path.is_empty() || url_path.len() >= PATH_MAX {
        return Err(ResolveError::MalformedPath);
    }

    let end = url_path
        .iter()
        .position(|&b| b == b'?' || b == b'#')
        .unwrap_or(url_path.len());
    let path = &url_path[..end];

    if path.first() != Some(&b'/') {
        return Err(ResolveError::MalformedPath);
    }

    let mut full = Vec::with_capacity(PATH_MAX);
    full.extend_from_slice(path);
    if path.ends_with(b"/") {
        full.extend_from_slice(INDEX_DOCUMENT.as_bytes());
    }

    if full.len() >= PATH_MAX {
        return Err(ResolveError::MalformedPath);
    }

    Ok(full)
}

fn checked_segment(seg: &[u8]) -> Result<CString, ResolveError> {
    if seg.is_empty() {
        return Err(ResolveError::EmptySegment);
    }
    if is_dot_segment(seg) {
        return Err(ResolveError::DotSegment);
    }
    if !is_safe_segment(seg) {
        return Err(ResolveError::UnsafeSegment);
    }

    // Printable ASCII only at this point, so no interior NUL.
    CString::new(seg).map_err(|_| ResolveError::UnsafeSegment)
}

fn open_regular(dir: BorrowedFd<'_>, name: &CString, size: i64) -> Result<(File, u64), ResolveError> {
    let size = u64::try_from(size).map_err(|_| ResolveError::InvalidSize(size))?;
    let fd = sys::open_file_at(dir, name)?;
    Ok((File::from(fd), size))
}

fn open_index(dir: BorrowedFd<'_>) -> Result<(File, u64), ResolveError> {
    let name = CString::new(INDEX_DOCUMENT).map_err(|_| ResolveError::MalformedPath)?;
    let stat = sys::stat_at(dir, &name)?;
    if stat.kind != EntryKind::File {
        return Err(ResolveError::UnsupportedType(stat.kind));
    }
    open_regular(dir, &name, stat.size)
}
