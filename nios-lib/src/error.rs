use std::io;
use thiserror::Error;

/// The primary error type for the `nios` client library.
///
/// Connection, transport and argument errors are fatal for the session.
/// Sequence-counter discontinuities during a decode are deliberately not
/// represented here: they are counted and logged by the decoder and the
/// acquisition still succeeds.
#[derive(Error, Debug)]
pub enum NiosError {
    #[error("Connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("Transport failure during {op}: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid response payload: expected {expected} bytes, got {actual}")]
    InvalidInput { expected: usize, actual: usize },
}
