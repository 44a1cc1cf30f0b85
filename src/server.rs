use crate::{
    config::Config,
    errors::{into_response, CommandError, CommandResult},
    protocol::registry::CommandRegistry,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::Semaphore,
};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub registry: Arc<CommandRegistry>,
    pub slots: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(cfg: Config, registry: CommandRegistry) -> Self {
        let slots = cfg.limits.max_connections.map(|n| Arc::new(Semaphore::new(n)));
        Self { cfg: Arc::new(cfg), registry: Arc::new(registry), slots }
    }
}

pub async fn serve(cfg: Config, registry: CommandRegistry) -> anyhow::Result<()> {
    let listener = TcpListener::bind((cfg.server.bind_addr.as_str(), cfg.server.port)).await?;
    run(listener, AppState::new(cfg, registry)).await
}

/// Accepts connections until the process is killed, one task per connection.
pub async fn run(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    loop {
        // wait for a free slot before accepting so excess clients queue in the backlog
        let permit = match &state.slots {
            Some(slots) => Some(slots.clone().acquire_owned().await?),
            None => None,
        };
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        let state = state.clone();
        tokio::spawn(async move {
            handle_connection(socket, peer, &state).await;
            drop(permit);
        });
    }
}

async fn handle_connection(mut socket: TcpStream, peer: SocketAddr, state: &AppState) {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let buf = match read_request(&mut socket, state.cfg.limits.max_request_bytes).await {
        Ok(buf) if buf.is_empty() => {
            tracing::debug!(request_id = %request_id, peer = %peer, "closed without request");
            return;
        }
        Ok(buf) => buf,
        Err(e) => {
            tracing::warn!(request_id = %request_id, peer = %peer, error = %e, "read failed");
            return;
        }
    };
    let bytes_in = buf.len();

    let command = String::from_utf8_lossy(&buf).split_whitespace().next().unwrap_or("").to_string();
    let oversized = bytes_in > state.cfg.limits.max_request_bytes;
    let result = if oversized {
        Err(CommandError::RequestTooLarge)
    } else {
        match std::str::from_utf8(&buf) {
            Ok(line) => state.registry.execute(line).await,
            Err(_) => Err(CommandError::InvalidEncoding),
        }
    };
    let (decision, kind, code, response) = outcome(result);
    let (body, truncated) = cap_response(&response, state.cfg.limits.max_response_bytes);

    if let Err(e) = write_response(&mut socket, body, oversized).await {
        tracing::warn!(request_id = %request_id, peer = %peer, error = %e, "write failed");
    }
    audit_end(
        &request_id,
        &peer.to_string(),
        &command,
        decision,
        kind,
        code,
        started.elapsed().as_millis() as u64,
        bytes_in,
        body.len(),
        truncated,
    );
}

/// Reads one request of up to `max + 1` bytes: a blocking read for the first bytes,
/// then whatever else is already buffered. More than `max` bytes means the request
/// was too large.
async fn read_request(socket: &mut TcpStream, max: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = vec![0u8; max + 1];
    let mut filled = socket.read(&mut buf).await?;
    while filled > 0 && filled < buf.len() {
        match socket.try_read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Splits a dispatch result into audit fields and the response text.
pub fn outcome(result: CommandResult<String>) -> (&'static str, Option<&'static str>, &'static str, String) {
    match result {
        Ok(body) => ("ok", None, "OK", body),
        Err(e) => ("error", Some(e.kind().as_str()), e.code(), into_response(e)),
    }
}

/// Writes the reply and half-closes. With `drain`, unread request bytes are consumed
/// until the client closes, since closing over unread input resets the connection.
async fn write_response(socket: &mut TcpStream, body: &str, drain: bool) -> std::io::Result<()> {
    socket.write_all(body.as_bytes()).await?;
    socket.shutdown().await?;
    if drain {
        tokio::io::copy(socket, &mut tokio::io::sink()).await?;
    }
    Ok(())
}

/// Truncates `response` to at most `limit` bytes without splitting a UTF-8 sequence.
pub fn cap_response(response: &str, limit: Option<usize>) -> (&str, bool) {
    match limit {
        Some(max) if response.len() > max => {
            let mut end = max;
            while !response.is_char_boundary(end) {
                end -= 1;
            }
            (&response[..end], true)
        }
        _ => (response, false),
    }
}

#[allow(clippy::too_many_arguments)]
fn audit_end(
    request_id: &str,
    peer: &str,
    command: &str,
    decision: &str,
    kind: Option<&str>,
    code: &str,
    duration_ms: u64,
    bytes_in: usize,
    bytes_out: usize,
    truncated: bool,
) {
    tracing::info!(
        request_id = request_id,
        peer = peer,
        command = command,
        decision = decision,
        kind = kind,
        code = code,
        duration_ms = duration_ms,
        bytes_in = bytes_in,
        bytes_out = bytes_out,
        truncated = truncated,
        "audit"
    );
}
