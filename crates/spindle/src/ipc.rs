use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::protocol::{MpvCommand, MpvMessage, MpvResponse};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the IPC channel to the player process.
#[derive(Debug)]
pub enum IpcError {
	/// Could not connect to the socket.
	Connect(std::io::Error),
	/// Failed to encode a command.
	Encode(serde_json::Error),
	/// The connection went away before a response arrived.
	Closed,
	/// No response within the per-command timeout.
	Timeout,
}

impl std::fmt::Display for IpcError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			IpcError::Connect(e) => write!(f, "ipc connect failed: {}", e),
			IpcError::Encode(e) => write!(f, "ipc encode failed: {}", e),
			IpcError::Closed => write!(f, "ipc connection closed"),
			IpcError::Timeout => write!(f, "ipc command timed out"),
		}
	}
}

impl std::error::Error for IpcError {}

type Pending = Arc<Mutex<HashMap<i64, oneshot::Sender<MpvResponse>>>>;

/// Connection to a player's JSON IPC socket.
///
/// Writes funnel through a single writer task, so commands reach the socket
/// in issue order and are queued rather than dropped while earlier ones are
/// in flight. A reader task matches responses back to callers by request id;
/// unsolicited events are logged at trace level and discarded.
#[derive(Clone)]
pub struct Ipc {
	pending: Pending,
	write_tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl Ipc {
	pub async fn connect(path: &Path) -> Result<Self, IpcError> {
		let stream = UnixStream::connect(path).await.map_err(IpcError::Connect)?;
		let (reader, writer) = stream.into_split();

		let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
		let (write_tx, write_rx) = mpsc::unbounded_channel();

		let reader_pending = Arc::clone(&pending);
		tokio::spawn(async move {
			reader_loop(reader, reader_pending).await;
		});
		tokio::spawn(async move {
			writer_loop(writer, write_rx).await;
		});

		Ok(Self { pending, write_tx })
	}

	/// Send a command and wait for the matching response.
	pub async fn send(&self, cmd: MpvCommand) -> Result<MpvResponse, IpcError> {
		let request_id = cmd.request_id;

		let (tx, rx) = oneshot::channel();
		self.pending.lock().await.insert(request_id, tx);

		let mut data = match serde_json::to_vec(&cmd) {
			Ok(d) => d,
			Err(e) => {
				self.pending.lock().await.remove(&request_id);
				return Err(IpcError::Encode(e));
			}
		};
		data.push(b'\n');

		if self.write_tx.send(data).is_err() {
			self.pending.lock().await.remove(&request_id);
			return Err(IpcError::Closed);
		}

		match tokio::time::timeout(RESPONSE_TIMEOUT, rx).await {
			Ok(Ok(resp)) => Ok(resp),
			Ok(Err(_)) => Err(IpcError::Closed),
			Err(_) => {
				self.pending.lock().await.remove(&request_id);
				Err(IpcError::Timeout)
			}
		}
	}
}

async fn reader_loop(reader: OwnedReadHalf, pending: Pending) {
	let mut lines = BufReader::new(reader).lines();

	loop {
		match lines.next_line().await {
			Ok(Some(line)) => {
				let trimmed = line.trim();
				if trimmed.is_empty() {
					continue;
				}
				match MpvMessage::parse(trimmed) {
					Ok(MpvMessage::Response(resp)) => {
						if let Some(tx) = pending.lock().await.remove(&resp.request_id) {
							let _ = tx.send(resp);
						}
					}
					Ok(MpvMessage::Event(event)) => {
						tracing::trace!("player event: {}", event.event);
					}
					Err(e) => {
						tracing::warn!("unparseable ipc line: {} ({})", trimmed, e);
					}
				}
			}
			Ok(None) => break,
			Err(e) => {
				tracing::debug!("ipc read error: {}", e);
				break;
			}
		}
	}

	// Wake any callers still waiting; their oneshot senders drop here.
	pending.lock().await.clear();
	tracing::debug!("ipc reader closed");
}

async fn writer_loop(mut writer: OwnedWriteHalf, mut write_rx: mpsc::UnboundedReceiver<Vec<u8>>) {
	while let Some(data) = write_rx.recv().await {
		if let Err(e) = writer.write_all(&data).await {
			tracing::debug!("ipc write error: {}", e);
			break;
		}
	}
}
