//! TCP implementation of the peer link: newline-delimited text.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::{Link, PeerId, RelayError};

/// Counter for generating unique peer IDs.
static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

/// A TCP listener accepting peer links.
pub struct TcpRelay {
    listener: TcpListener,
}

impl TcpRelay {
    /// Binds a relay to the given address (`"127.0.0.1:0"` lets the OS
    /// pick a free port; read it back with
    /// [`local_addr`](Self::local_addr)).
    pub async fn bind(addr: &str) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(RelayError::BindFailed)?;
        tracing::info!(addr, "relay listening");
        Ok(Self { listener })
    }

    /// The address the relay is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and accepts the next incoming peer.
    pub async fn accept(&self) -> Result<TcpLink, RelayError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(RelayError::AcceptFailed)?;
        let link = TcpLink::from_stream(stream);
        tracing::debug!(peer = %link.id(), %addr, "accepted peer");
        Ok(link)
    }
}

/// One TCP peer link. Reader and writer halves are locked separately
/// so a blocked send never stalls receiving.
pub struct TcpLink {
    id: PeerId,
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpLink {
    /// Connects out to a listening relay.
    pub async fn connect(addr: &str) -> Result<Self, RelayError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(RelayError::ConnectFailed)?;
        let link = Self::from_stream(stream);
        tracing::debug!(peer = %link.id(), addr, "connected to relay");
        Ok(link)
    }

    fn from_stream(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            id: PeerId::new(NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed)),
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Mutex::new(write_half),
        }
    }
}

impl Link for TcpLink {
    type Error = RelayError;

    async fn send_line(&self, line: &str) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(RelayError::SendFailed)?;
        writer
            .write_all(b"\n")
            .await
            .map_err(RelayError::SendFailed)?;
        writer.flush().await.map_err(RelayError::SendFailed)
    }

    async fn recv_line(&self) -> Result<Option<String>, Self::Error> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(RelayError::ReceiveFailed)?;
        if read == 0 {
            return Ok(None); // clean close
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(RelayError::SendFailed)
    }

    fn id(&self) -> PeerId {
        self.id
    }
}
