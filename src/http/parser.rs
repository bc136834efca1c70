use crate::http::request::{Method, Request};

/// Size of the buffer a request is read into. One byte is kept spare, so at
/// most `REQUEST_BUFFER_SIZE - 1` bytes are parsed.
pub const REQUEST_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not `METHOD SP PATH ...`, or the path is unusable.
    Malformed,
    /// Method token is neither `GET` nor `HEAD`.
    MethodNotAllowed,
}

/// Extracts method and path from the start of `buf`.
///
/// `buf` holds the bytes of a single read; nothing is reassembled across
/// reads. Headers and the protocol version are ignored. A request cut short
/// by the buffer yields either an error or a truncated path, never a panic.
pub fn parse_request_line(buf: &[u8]) -> Result<Request<'_>, ParseError> {
    let method_end = find_delimiter(buf, 0);
    if method_end == 0 || buf.get(method_end) != Some(&b' ') {
        return Err(ParseError::Malformed);
    }

    let method = Method::from_bytes(&buf[..method_end]).ok_or(ParseError::MethodNotAllowed)?;

    let path_start = method_end + 1;
    let path_end = find_delimiter(buf, path_start);
    let path = &buf[path_start..path_end];

    if path.is_empty() {
        return Err(ParseError::Malformed);
    }

    // Absolute-form targets are not served.
    if path.starts_with(b"http://") || path.starts_with(b"https://") {
        return Err(ParseError::Malformed);
    }

    Ok(Request::new(method, path))
}

/// Index of the first space, CR or LF at or after `from`, or `buf.len()`.
fn find_delimiter(buf: &[u8], from: usize) -> usize {
    buf.get(from..)
        .and_then(|rest| rest.iter().position(|&b| matches!(b, b' ' | b'\r' | b'\n')))
        .map(|i| from + i)
        .unwrap_or(buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request_line(req).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.path, b"/");
    }

    #[test]
    fn delimiter_search_past_end() {
        assert_eq!(find_delimiter(b"GET", 4), 3);
        assert_eq!(find_delimiter(b"GET", 3), 3);
    }
}
