//! rootserve - read-only static file server
//!
//! Serves one content directory over plain HTTP/1.1. URL paths are resolved
//! beneath the content root one directory handle at a time, so `..`,
//! symlinks and swapped directories cannot lead outside it.

pub mod config;
pub mod fs;
pub mod http;
pub mod server;
