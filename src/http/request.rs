/// HTTP request methods the server answers.
///
/// Anything else is rejected by the parser with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

/// A parsed request line.
///
/// Borrows the connection's read buffer, so it lives only as long as the
/// handling of that one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// The HTTP method (GET or HEAD)
    pub method: Method,
    /// The raw request target, query and fragment included
    pub path: &'a [u8],
}

impl Method {
    /// Parses a method token.
    ///
    /// # Arguments
    ///
    /// * `token` - Bytes of the method, matched exactly (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` for `GET` or `HEAD`, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use rootserve::http::request::Method;
    /// assert_eq!(Method::from_bytes(b"HEAD"), Some(Method::HEAD));
    /// assert_eq!(Method::from_bytes(b"get"), None);
    /// ```
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"GET" => Some(Method::GET),
            b"HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }
}

impl<'a> Request<'a> {
    pub fn new(method: Method, path: &'a [u8]) -> Self {
        Self { method, path }
    }

    /// Whether the response should omit its body.
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// The path as text, for logging.
    pub fn path_lossy(&self) -> std::borrow::Cow<'a, str> {
        String::from_utf8_lossy(self.path)
    }
}
