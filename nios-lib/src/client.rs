use std::io;
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::command::CommandRequest;
use crate::decoder::{Acquisition, decode_stream};
use crate::error::NiosError;

/// A connected NIOS acquisition client.
///
/// One connection serves one request/decode cycle at a time: send the
/// command, accumulate the exact expected payload across however many
/// partial reads the socket delivers, decode. There are no timeouts; the
/// read loop blocks until the full payload arrives or the connection fails.
#[derive(Debug)]
pub struct NiosClient {
    stream: TcpStream,
    peer: String,
}

impl NiosClient {
    /// Resolve `host` and connect. Any failure here is fatal for the session.
    pub async fn connect(host: &str, port: u16) -> Result<Self, NiosError> {
        info!("Connecting to NIOS server at {}:{}...", host, port);
        let stream =
            TcpStream::connect((host, port))
                .await
                .map_err(|source| NiosError::Connection {
                    host: host.to_string(),
                    port,
                    source,
                })?;
        info!("Connected.");
        Ok(Self {
            stream,
            peer: format!("{host}:{port}"),
        })
    }

    /// Acquire `chunk_count` chunks of raw samples from `channel` (0-indexed).
    ///
    /// Sends the start command, reads the exact response payload and decodes
    /// it. Counter discontinuities are logged and counted on the returned
    /// [`Acquisition`], not raised as errors.
    pub async fn acquire(
        &mut self,
        channel: u8,
        chunk_count: u32,
    ) -> Result<Acquisition, NiosError> {
        let request = CommandRequest::start(channel, chunk_count)?;
        info!(
            "Requesting {} chunks ({} records) of {} from channel {}",
            chunk_count,
            request.record_count(),
            request.data_type(),
            channel
        );
        self.send_command(&request).await?;

        let expected = request.expected_response_len();
        let started = Instant::now();
        let payload = self.read_payload(expected).await?;
        let elapsed = started.elapsed();
        debug!(
            "Received {} bytes from {} in {:.1} ms ({:.0} kbit/s)",
            payload.len(),
            self.peer,
            elapsed.as_secs_f64() * 1e3,
            payload.len() as f64 * 8.0 / 1000.0 / elapsed.as_secs_f64().max(f64::EPSILON),
        );

        decode_stream(&payload, request.record_count())
    }

    /// Tell the server to stop the acquisition on `channel`. No response is
    /// read for a stop command.
    pub async fn stop(&mut self, channel: u8) -> Result<(), NiosError> {
        let request = CommandRequest::stop(channel)?;
        self.send_command(&request).await
    }

    async fn send_command(&mut self, request: &CommandRequest) -> Result<(), NiosError> {
        let command = request.encode();
        self.stream
            .write_all(&command)
            .await
            .map_err(|source| NiosError::Transport {
                op: "write",
                source,
            })?;
        debug!("Sent command {}", hex::encode(command));
        Ok(())
    }

    /// Read exactly `expected` bytes into a buffer sized once up front.
    ///
    /// A single read may return fewer bytes than requested; that is normal
    /// and the loop keeps accumulating. A read returning zero bytes before
    /// the total is reached means the peer closed the stream: fatal, never
    /// retried, never a truncated result.
    async fn read_payload(&mut self, expected: usize) -> Result<Vec<u8>, NiosError> {
        let mut payload = vec![0u8; expected];
        let mut filled = 0;
        while filled < expected {
            let n = self
                .stream
                .read(&mut payload[filled..])
                .await
                .map_err(|source| NiosError::Transport { op: "read", source })?;
            if n == 0 {
                return Err(NiosError::Transport {
                    op: "read",
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("server closed the stream after {filled} of {expected} bytes"),
                    ),
                });
            }
            filled += n;
        }
        Ok(payload)
    }
}
