//! Safe wrappers for the directory-relative `libc` calls the resolver needs.
//!
//! Every function returns `io::Result` with the OS error captured from
//! `errno`. Handles come back as [`OwnedFd`] so they are closed on drop.

use std::ffi::CStr;
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

#[cfg(any(target_os = "linux", target_os = "android"))]
const DIR_OPEN_FLAGS: libc::c_int = libc::O_PATH | libc::O_DIRECTORY;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const DIR_OPEN_FLAGS: libc::c_int = libc::O_RDONLY | libc::O_DIRECTORY;

/// File type reported by a no-follow stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// The two `stat` fields the resolver looks at.
#[derive(Debug, Clone, Copy)]
pub struct EntryStat {
    pub kind: EntryKind,
    pub size: i64,
}

fn cvt(ret: libc::c_int) -> io::Result<libc::c_int> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret)
    }
}

fn open_raw(dirfd: libc::c_int, name: &CStr, flags: libc::c_int) -> io::Result<OwnedFd> {
    // SAFETY: `name` is a NUL-terminated `CStr` that outlives the call, and
    // no `O_CREAT` is passed, so the variadic mode argument is not read.
    let fd = cvt(unsafe {
        libc::openat(
            dirfd,
            name.as_ptr(),
            flags | libc::O_NOFOLLOW | libc::O_CLOEXEC,
        )
    })?;

    // SAFETY: openat just returned this descriptor and nothing else owns it.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Opens `path` as a directory handle, relative to the working directory.
/// Only the final component is refused when it is a symlink.
pub fn open_dir_cwd(path: &CStr) -> io::Result<OwnedFd> {
    open_raw(libc::AT_FDCWD, path, DIR_OPEN_FLAGS)
}

/// Opens the directory `name` inside `dir` without following symlinks.
pub fn open_dir_at(dir: BorrowedFd<'_>, name: &CStr) -> io::Result<OwnedFd> {
    open_raw(dir.as_raw_fd(), name, DIR_OPEN_FLAGS)
}

/// Opens `name` inside `dir` read-only without following symlinks.
pub fn open_file_at(dir: BorrowedFd<'_>, name: &CStr) -> io::Result<OwnedFd> {
    open_raw(dir.as_raw_fd(), name, libc::O_RDONLY)
}

/// `fstatat(dir, name, AT_SYMLINK_NOFOLLOW)`.
pub fn stat_at(dir: BorrowedFd<'_>, name: &CStr) -> io::Result<EntryStat> {
    let mut st = MaybeUninit::<libc::stat>::zeroed();
    // SAFETY: `name` is a NUL-terminated `CStr`, and `st` is a properly
    // sized and aligned `libc::stat` buffer that fstatat only writes to.
    cvt(unsafe {
        libc::fstatat(
            dir.as_raw_fd(),
            name.as_ptr(),
            st.as_mut_ptr(),
            libc::AT_SYMLINK_NOFOLLOW,
        )
    })?;
    // SAFETY: fstatat succeeded and filled the buffer.
    let st = unsafe { st.assume_init() };

    let kind = match st.st_mode & libc::S_IFMT {
        libc::S_IFREG => EntryKind::File,
        libc::S_IFDIR => EntryKind::Directory,
        libc::S_IFLNK => EntryKind::Symlink,
        _ => EntryKind::Other,
    };

    Ok(EntryStat {
        kind,
        size: i64::from(st.st_size),
    })
}
