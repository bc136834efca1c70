//! MIME type detection based on file extensions.

/// Fallback for names without a known extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the content type for a file name or path.
///
/// Only the text after the last `.` is considered, compared case-sensitively.
/// Unknown or missing extensions map to [`OCTET_STREAM`].
///
/// # Example
///
/// ```
/// # use rootserve::http::mime::content_type;
/// assert_eq!(content_type(b"/docs/index.html"), "text/html; charset=utf-8");
/// assert_eq!(content_type(b"archive.tar.gz"), "application/octet-stream");
/// ```
pub fn content_type(name: &[u8]) -> &'static str {
    let Some(dot) = name.iter().rposition(|&b| b == b'.') else {
        return OCTET_STREAM;
    };

    match &name[dot + 1..] {
        b"htm" | b"html" => "text/html; charset=utf-8",
        b"css" => "text/css; charset=utf-8",
        b"js" => "application/javascript; charset=utf-8",
        b"json" => "application/json; charset=utf-8",
        b"png" => "image/png",
        b"svg" => "image/svg+xml",
        b"txt" => "text/plain; charset=utf-8",
        _ => OCTET_STREAM,
    }
}
