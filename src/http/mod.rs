//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server: one request per connection, GET and
//! HEAD only, every response closed with `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection handler implementing the request-response state machine
//! - **`parser`**: Extracts method and path from the bytes of a single read
//! - **`request`**: The parsed request line
//! - **`response`**: Status codes and response heads, with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read of the request
//!        └──────┬──────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve under the content root
//!        └──────┬───────────┘
//!               │ Reply ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then file body for GET
//!        └──────┬───────────┘
//!               │
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rootserve::fs::ContentRoot;
//! use rootserve::http::connection::Connection;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let root = Arc::new(ContentRoot::open("/dist")?);
//!     let listener = TcpListener::bind("0.0.0.0:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let root = Arc::clone(&root);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, root);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
