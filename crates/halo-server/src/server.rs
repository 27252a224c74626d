//! Listener ownership and the accept loop.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use halo_engine::ConfigError;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::session::{ControlSession, SessionError, SessionReport};

/// Errors from the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration is invalid.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    /// The listener could not bind.
    #[error("bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// `accept` failed.
    #[error("accept: {0}")]
    Accept(#[source] io::Error),
    /// The bound address could not be read back.
    #[error("local address: {0}")]
    LocalAddr(#[source] io::Error),
    /// A session served by [`Server::serve_one`] failed.
    #[error("session: {0}")]
    Session(#[from] SessionError),
}

/// A bound listener serving controller sessions.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Validate `config` and bind its address.
    ///
    /// Binding port 0 picks an ephemeral port; see [`local_addr`](Self::local_addr).
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr).map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
        let server = Self { listener, config };
        tracing::info!(addr = %server.local_addr()?, "listening");
        Ok(server)
    }

    /// Address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Accept one connection and run its session on the calling thread.
    pub fn serve_one(&self) -> Result<SessionReport, ServerError> {
        let stream = self.accept()?;
        Ok(ControlSession::new(stream, self.config.engine.clone()).run()?)
    }

    /// Accept connections forever, one named thread per session.
    ///
    /// Session failures are logged and do not stop the loop. Returns only
    /// if `accept` itself fails.
    pub fn run(&self) -> Result<(), ServerError> {
        for id in 0u64.. {
            let stream = self.accept()?;
            let engine = self.config.engine.clone();
            let spawned = thread::Builder::new()
                .name(format!("halo-session-{id}"))
                .spawn(move || match ControlSession::new(stream, engine).run() {
                    Ok(report) => tracing::debug!(
                        session = id,
                        exit = ?report.exit,
                        turn = report.turn,
                        "session finished"
                    ),
                    Err(e) => tracing::warn!(session = id, error = %e, "session failed"),
                });
            if let Err(e) = spawned {
                tracing::warn!(session = id, error = %e, "could not spawn session thread");
            }
        }
        Ok(())
    }

    fn accept(&self) -> Result<TcpStream, ServerError> {
        let (stream, peer) = self.listener.accept().map_err(ServerError::Accept)?;
        tracing::info!(%peer, "accepted");
        Ok(stream)
    }
}
