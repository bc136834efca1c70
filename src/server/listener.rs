use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, info, warn};

use crate::fs::ContentRoot;
use crate::http::connection::Connection;

/// A fatal failure while bringing the server up. Each step has its own
/// process exit code.
#[derive(Debug)]
pub enum StartupError {
    ContentRoot(io::Error),
    Socket(io::Error),
    Bind(io::Error),
    Listen(io::Error),
    Config(anyhow::Error),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::ContentRoot(_) => 1,
            StartupError::Socket(_) => 2,
            StartupError::Bind(_) => 3,
            StartupError::Listen(_) => 4,
            StartupError::Config(_) => 5,
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::ContentRoot(e) => write!(f, "cannot open content root: {}", e),
            StartupError::Socket(e) => write!(f, "cannot create socket: {}", e),
            StartupError::Bind(e) => write!(f, "cannot bind: {}", e),
            StartupError::Listen(e) => write!(f, "cannot listen: {}", e),
            StartupError::Config(e) => write!(f, "invalid configuration: {:#}", e),
        }
    }
}

impl std::error::Error for StartupError {}

/// Creates the listening socket with `SO_REUSEADDR` set.
pub fn bind(addr: SocketAddr, backlog: u32) -> Result<TcpListener, StartupError> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(StartupError::Socket)?;

    if let Err(e) = socket.set_reuseaddr(true) {
        debug!("SO_REUSEADDR not set: {}", e);
    }

    socket.bind(addr).map_err(StartupError::Bind)?;
    socket.listen(backlog).map_err(StartupError::Listen)
}

/// Accepts connections forever, one task per connection.
///
/// Accept failures are logged and skipped; a failing connection never
/// takes the listener down.
pub async fn serve(
    listener: TcpListener,
    root: Arc<ContentRoot>,
    read_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let root = Arc::clone(&root);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, root).with_read_timeout(read_timeout);
            if let Err(e) = conn.run().await {
                debug!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
