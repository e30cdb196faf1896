use super::message::{ClientMessage, ServerMessage};
use crate::infrastructure::in_memory::InMemoryRouter;
use std::io;
use std::time::Duration;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;

/// Longest call line accepted from a caller, newline excluded.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts caller connections and dispatches their calls to a router.
///
/// Each connection is served on its own task. Calls from one connection are
/// answered in order; calls from different connections may interleave, the
/// procedures themselves serialize access to shared state.
pub struct RpcServer {
    router: InMemoryRouter,
}

impl RpcServer {
    pub fn new(router: InMemoryRouter) -> Self {
        Self { router }
    }

    /// Serves connections until the task is dropped.
    ///
    /// A failed `accept` (descriptor exhaustion, a peer resetting during the
    /// handshake) is logged and retried; it never stops the endpoint.
    pub async fn serve(self, listener: TcpListener) {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            let router = self.router.clone();
            tracing::info!(%peer, "caller connected");

            tokio::spawn(async move {
                match handle_connection(&router, stream).await {
                    Ok(()) => tracing::info!(%peer, "caller disconnected"),
                    Err(e) => tracing::warn!(%peer, error = %e, "connection closed with error"),
                }
            });
        }
    }
}

/// Reads calls line by line from `stream` and writes one reply per call.
///
/// Lines are handled as raw bytes: invalid UTF-8 and lines longer than
/// [`MAX_LINE_BYTES`] are answered with a protocol violation and the
/// connection stays open.
pub async fn handle_connection<S>(router: &InMemoryRouter, stream: S) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut line)
            .await?;
        if read == 0 {
            break;
        }

        let reply = if line.len() > MAX_LINE_BYTES && line.last() != Some(&b'\n') {
            skip_line(&mut reader).await?;
            tracing::debug!(limit = MAX_LINE_BYTES, "oversized message");
            ServerMessage::protocol_violation(format!(
                "message exceeds {MAX_LINE_BYTES} bytes"
            ))
        } else {
            let call = line.trim_ascii();
            if call.is_empty() {
                continue;
            }
            dispatch(router, call).await
        };

        let mut encoded = serde_json::to_vec(&reply).map_err(io::Error::other)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    Ok(())
}

// Drops input up to and including the next newline, or to EOF
async fn skip_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Decodes one line, runs the call and builds the reply.
pub async fn dispatch(router: &InMemoryRouter, line: &[u8]) -> ServerMessage {
    let message = match serde_json::from_slice::<ClientMessage>(line) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(error = %e, "malformed message");
            return ServerMessage::protocol_violation(e.to_string());
        }
    };

    let ClientMessage::Call {
        request,
        procedure,
        args,
    } = message;
    tracing::debug!(request, %procedure, "call");

    match router.call(&procedure, args).await {
        Ok(value) => ServerMessage::Result { request, value },
        Err(e) => ServerMessage::from_error(request, &e),
    }
}
