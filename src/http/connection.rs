use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::fs::{ContentRoot, ResolvedResource};
use crate::http::parser::{REQUEST_BUFFER_SIZE, ParseError, parse_request_line};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::{ResponseWriter, stream_file};

/// Serves exactly one request on a stream, then closes it.
pub struct Connection<S> {
    stream: S,
    root: Arc<ContentRoot>,
    read_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Vec<u8>),
    Writing(Reply),
    Closed,
}

/// What goes back to the client.
pub enum Reply {
    /// Short status response with an in-memory body.
    Status(Response),
    /// 200 head, followed by the file unless the request was HEAD.
    File {
        head: Response,
        body: Option<tokio::fs::File>,
        size: u64,
    },
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Status(resp) => resp.status,
            Reply::File { head, .. } => head.status,
        }
    }

    fn from_resource(resource: ResolvedResource, head_only: bool) -> Self {
        let head = Response::file_head(resource.size, resource.content_type);
        // HEAD drops the handle here without reading it.
        let body = (!head_only).then(|| tokio::fs::File::from_std(resource.file));

        Reply::File {
            head,
            body,
            size: resource.size,
        }
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, root: Arc<ContentRoot>) -> Self {
        Self {
            stream,
            root,
            read_timeout: None,
            state: ConnectionState::Reading,
        }
    }

    /// Bounds the request read. Without it a silent client holds the
    /// connection open indefinitely.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(buf) => ConnectionState::Processing(buf),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(buf) => {
                    let reply = self.handle_request(&buf).await?;
                    self.state = ConnectionState::Writing(reply);
                }

                ConnectionState::Writing(reply) => {
                    self.write_reply(reply).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    let _ = self.stream.shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// One read of at most `REQUEST_BUFFER_SIZE - 1` bytes. `None` when the
    /// peer closed or the read timed out.
    async fn read_request(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; REQUEST_BUFFER_SIZE];
        let read = self.stream.read(&mut buf[..REQUEST_BUFFER_SIZE - 1]);

        let n = match self.read_timeout {
            Some(limit) => match tokio::time::timeout(limit, read).await {
                Ok(res) => res.context("reading request")?,
                Err(_) => {
                    debug!(?limit, "request read timed out");
                    return Ok(None);
                }
            },
            None => read.await.context("reading request")?,
        };

        if n == 0 {
            return Ok(None);
        }

        buf.truncate(n);
        Ok(Some(buf))
    }

    async fn handle_request(&self, buf: &[u8]) -> anyhow::Result<Reply> {
        let req = match parse_request_line(buf) {
            Ok(req) => req,
            Err(e) => {
                let response = match e {
                    ParseError::Malformed => Response::bad_request(),
                    ParseError::MethodNotAllowed => Response::method_not_allowed(),
                };
                info!(status = response.status.as_u16(), error = ?e, "rejected request");
                return Ok(Reply::Status(response));
            }
        };

        let reply = self.resolve(&req).await?;
        info!(
            method = req.method.as_str(),
            path = %req.path_lossy(),
            status = reply.status().as_u16(),
            "served request"
        );
        Ok(reply)
    }

    /// Runs the blocking directory walk off the async workers.
    async fn resolve(&self, req: &Request<'_>) -> anyhow::Result<Reply> {
        let root = Arc::clone(&self.root);
        let path = req.path.to_vec();

        let resolved = tokio::task::spawn_blocking(move || root.resolve(&path))
            .await
            .context("path resolution task failed")?;

        Ok(match resolved {
            Ok(resource) => Reply::from_resource(resource, req.is_head()),
            Err(e) => {
                debug!(path = %req.path_lossy(), error = %e, "resolution failed");
                Reply::Status(Response::not_found())
            }
        })
    }

    async fn write_reply(&mut self, reply: Reply) -> anyhow::Result<()> {
        match reply {
            Reply::Status(response) => {
                ResponseWriter::new(&response)
                    .write_to_stream(&mut self.stream)
                    .await?;
            }

            Reply::File { head, body, size } => {
                ResponseWriter::new(&head)
                    .write_to_stream(&mut self.stream)
                    .await?;

                if let Some(mut file) = body {
                    let sent = stream_file(&mut file, &mut self.stream, size).await;
                    if sent < size {
                        debug!(sent, size, "file body truncated");
                    }
                }
            }
        }

        Ok(())
    }
}
