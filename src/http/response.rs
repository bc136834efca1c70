/// HTTP status codes the server can send.
///
/// - `Ok` (200): File found and sent
/// - `BadRequest` (400): Malformed request line or path
/// - `NotFound` (404): Any resolution failure
/// - `MethodNotAllowed` (405): Method other than GET or HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rootserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// Content type of the short status bodies.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A response head plus an in-memory body.
///
/// File contents are not held here; they are streamed by the writer after
/// the head. Headers keep insertion order on the wire.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in the order they are written
    pub headers: Vec<(String, String)>,
    /// In-memory body, empty for file responses
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hi\n".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header. Replacing keeps the original position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size unless already set, then
    /// `Connection: close`. Every response closes its connection.
    pub fn build(self) -> Response {
        let mut builder = self;

        if builder.get("Content-Length").is_none() {
            let len = builder.body.len().to_string();
            builder = builder.header("Content-Length", len);
        }
        builder = builder.header("Connection", "close");

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl Response {
    fn plain(status: StatusCode, body: &str) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", TEXT_PLAIN)
            .body(body.as_bytes().to_vec())
            .build()
    }

    /// 400 with body `bad request\n`.
    pub fn bad_request() -> Self {
        Self::plain(StatusCode::BadRequest, "bad request\n")
    }

    /// 404 with body `not found\n`.
    pub fn not_found() -> Self {
        Self::plain(StatusCode::NotFound, "not found\n")
    }

    /// 405 with body `method not allowed\n`.
    pub fn method_not_allowed() -> Self {
        Self::plain(StatusCode::MethodNotAllowed, "method not allowed\n")
    }

    /// 200 head for a file of `size` bytes. The body is streamed separately.
    pub fn file_head(size: u64, content_type: &str) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Length", size.to_string())
            .header("Content-Type", content_type)
            .build()
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
