//! Checks applied to a single `/`-delimited URL path segment before it is
//! handed to the filesystem.

/// Longest segment accepted, matching the usual `NAME_MAX`.
pub const SEGMENT_MAX: usize = 255;

/// True for the literal `.` and `..` segments.
pub fn is_dot_segment(seg: &[u8]) -> bool {
    seg == b"." || seg == b".."
}

/// Character-class check for one segment.
///
/// Accepts 1..=255 bytes of printable ASCII, excluding `\`, `%` and `:`.
/// Dot segments pass this check; callers reject them with
/// [`is_dot_segment`] first.
pub fn is_safe_segment(seg: &[u8]) -> bool {
    if seg.is_empty() || seg.len() > SEGMENT_MAX {
        return false;
    }

    seg.iter()
        .all(|&b| (0x20..=0x7e).contains(&b) && !matches!(b, b'\\' | b'%' | b':'))
}
