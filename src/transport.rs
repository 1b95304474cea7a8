//! Destinations for formatted payloads.

use std::fmt::Debug;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use crate::ExporterError;

/// Default statsd port.
pub const DEFAULT_STATSD_PORT: u16 = 8125;

/// A fire-and-forget payload sink.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send one payload.
    async fn send(&self, payload: &[u8]) -> Result<(), ExporterError>;
}

/// Sends each payload as a single UDP datagram.
///
/// The socket is bound once and may be shared across tasks.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local socket and connect it to `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ExporterError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect((host, port)).await?;
        let peer = socket.peer_addr()?;
        Ok(Self { socket, peer })
    }

    /// The resolved aggregator address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, payload: &[u8]) -> Result<(), ExporterError> {
        self.socket.send(payload).await?;
        Ok(())
    }
}

/// Writes payloads to standard output, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

#[async_trait]
impl Transport for StdoutSink {
    async fn send(&self, payload: &[u8]) -> Result<(), ExporterError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(payload).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Forwards payloads into a channel.
///
/// Use [`ChannelTransport::create`] to get the transport and its receiver.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    /// Create a channel transport and return both ends.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pihole_statsd::ChannelTransport;
    ///
    /// let (transport, mut rx) = ChannelTransport::create();
    /// // while let Some(payload) = rx.recv().await { ... }
    /// # drop((transport, rx.try_recv()));
    /// ```
    pub fn create() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, payload: &[u8]) -> Result<(), ExporterError> {
        let payload = String::from_utf8_lossy(payload).into_owned();
        self.tx.send(payload).map_err(|_| {
            ExporterError::Send(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "channel receiver dropped",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_udp_send() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let transport = UdpTransport::connect("127.0.0.1", port).await.unwrap();
        assert_eq!(transport.peer(), receiver.local_addr().unwrap());

        transport.send(b"foo._t_location.pihole:1|c").await.unwrap();

        let mut buf = [0u8; 1024];
        let n = receiver.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"foo._t_location.pihole:1|c");
    }

    #[tokio::test]
    async fn test_channel_send() {
        let (transport, mut rx) = ChannelTransport::create();
        transport.send(b"a:1|c\nb:2|c").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "a:1|c\nb:2|c");
    }

    #[tokio::test]
    async fn test_channel_send_after_receiver_dropped() {
        let (transport, rx) = ChannelTransport::create();
        drop(rx);
        let err = transport.send(b"a:1|c").await.unwrap_err();
        assert!(matches!(err, ExporterError::Send(_)));
    }

    #[tokio::test]
    async fn test_stdout_sink() {
        StdoutSink.send(b"a:1|c").await.unwrap();
    }
}
