//! One WebSocket connection to the generation queue.
//!
//! A [`QueueConnection`] is opened per generation attempt and never reused.
//! It owns:
//!
//! - the write half of the socket (outgoing JSON text frames)
//! - a reader task that pulls incoming frames off the read half and parks them
//!   in a bounded channel whose depth is the configured `max_queue`; when the
//!   channel is full the reader stops polling the socket, so a flooding server
//!   is throttled by TCP back-pressure instead of growing memory
//!
//! Every [`QueueConnection::recv_text`] call is bounded by the configured
//! timeout on its own.  There is no aggregate deadline across reads.
//!
//! # Cancellation
//!
//! Dropping a `QueueConnection` (for example because the caller's future was
//! dropped) drops the write half and aborts the reader task, which drops the
//! read half.  Once both halves are gone the TCP socket is closed; nothing is
//! left running in the background.

use std::sync::Once;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use sdxl_core::ClientConfig;

use crate::application::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Aborts the wrapped reader task when dropped.
struct ReaderTask(JoinHandle<()>);

impl Drop for ReaderTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// An open connection to the queue endpoint.
pub struct QueueConnection {
    sink: SplitSink<WsStream, WsMessage>,
    inbox: mpsc::Receiver<Result<WsMessage, WsError>>,
    _reader: ReaderTask,
    read_timeout: Duration,
}

impl QueueConnection {
    /// Connects to `config.ws_url()` with the configured frame-size limit.
    ///
    /// The connect attempt (TCP, TLS and the HTTP upgrade) is bounded by
    /// `config.timeout()`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConnectionFailed`] for every failure, including
    /// a connect timeout.
    pub async fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        install_tls_provider();

        let url = config.ws_url().as_str();

        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(config.max_size());
        ws_config.max_frame_size = Some(config.max_size());

        let (stream, _response) =
            match timeout(config.timeout(), connect_async_with_config(url, Some(ws_config), false))
                .await
            {
                Ok(Ok(pair)) => pair,
                Ok(Err(e)) => {
                    return Err(ClientError::ConnectionFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
                Err(_) => {
                    return Err(ClientError::ConnectionFailed {
                        url: url.to_string(),
                        reason: format!("connect timed out after {:?}", config.timeout()),
                    })
                }
            };

        debug!("connected to queue at {url}");

        let (sink, mut source) = stream.split();
        let (tx, inbox) = mpsc::channel(config.max_queue());

        let reader = tokio::spawn(async move {
            while let Some(item) = source.next().await {
                let failed = item.is_err();
                if tx.send(item).await.is_err() {
                    // Receiver dropped: the generation call is over.
                    break;
                }
                if failed {
                    break;
                }
            }
        });

        Ok(Self {
            sink,
            inbox,
            _reader: ReaderTask(reader),
            read_timeout: config.timeout(),
        })
    }

    /// Waits for the next text (or binary) frame and returns it as a string.
    ///
    /// Ping, pong and raw frames are skipped inside the same timeout window.
    /// `stage` names what the caller is waiting for and ends up in the
    /// timeout error.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ConnectionTimeout`] if no frame arrives in time.
    /// - [`ClientError::ConnectionClosed`] on a close frame, end of stream, or
    ///   a transport failure that ends the connection.
    pub async fn recv_text(&mut self, stage: &'static str) -> Result<String, ClientError> {
        match timeout(self.read_timeout, self.next_data_frame()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::ConnectionTimeout {
                stage,
                timeout: self.read_timeout,
            }),
        }
    }

    async fn next_data_frame(&mut self) -> Result<String, ClientError> {
        loop {
            let message = match self.inbox.recv().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(map_ws_error(e)),
                None => return Err(ClientError::ConnectionClosed("stream ended".to_string())),
            };

            match message {
                WsMessage::Text(text) => return Ok(text),
                // The queue speaks JSON; a binary frame is decoded as UTF-8 and
                // left to the JSON parser to judge.
                WsMessage::Binary(bytes) => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
                WsMessage::Close(frame) => {
                    return Err(ClientError::ConnectionClosed(describe_close(frame.as_ref())))
                }
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            }
        }
    }

    /// Sends `text` as one WebSocket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConnectionClosed`] if the socket is gone, or
    /// [`ClientError::Other`] for unexpected transport failures.
    pub async fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        self.sink.send(WsMessage::Text(text)).await.map_err(map_ws_error)
    }

    /// Sends a close frame, bounded by the read timeout, then drops the
    /// connection.  Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        match timeout(self.read_timeout, self.sink.close()).await {
            Ok(Ok(())) => debug!("queue connection closed"),
            Ok(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {}
            Ok(Err(e)) => warn!("error while closing queue connection: {e}"),
            Err(_) => warn!("timed out sending close frame; dropping connection"),
        }
    }
}

/// Maps a transport error to the client taxonomy.
///
/// Anything that means "the connection is gone" becomes `ConnectionClosed`;
/// the rest is unanticipated and wrapped.
fn map_ws_error(err: WsError) -> ClientError {
    match err {
        err @ (WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Io(_)
        | WsError::Protocol(_)
        | WsError::Capacity(_)) => ClientError::ConnectionClosed(err.to_string()),
        other => ClientError::Other(anyhow::Error::new(other).context("WebSocket transport failure")),
    }
}

fn describe_close(frame: Option<&CloseFrame<'_>>) -> String {
    match frame {
        Some(frame) if frame.reason.is_empty() => format!("server sent close ({})", frame.code),
        Some(frame) => format!("server sent close ({}: {})", frame.code, frame.reason),
        None => "server sent close".to_string(),
    }
}

/// `tokio-tungstenite` builds its rustls client config from the process-wide
/// crypto provider, so one must be installed before the first `wss://` connect.
fn install_tls_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // Err means another component already installed one; keep theirs.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::error::{CapacityError, ProtocolError as WsProtocolError};
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    #[test]
    fn test_closed_errors_map_to_connection_closed() {
        let cases = [
            WsError::ConnectionClosed,
            WsError::AlreadyClosed,
            WsError::Io(std::io::Error::from(std::io::ErrorKind::ConnectionReset)),
            WsError::Protocol(WsProtocolError::ResetWithoutClosingHandshake),
            WsError::Capacity(CapacityError::MessageTooLong {
                size: 20,
                max_size: 10,
            }),
        ];
        for err in cases {
            let mapped = map_ws_error(err);
            assert!(
                matches!(mapped, ClientError::ConnectionClosed(_)),
                "got {mapped:?}"
            );
        }
    }

    #[test]
    fn test_other_errors_are_wrapped() {
        let mapped = map_ws_error(WsError::AttackAttempt);
        assert!(matches!(mapped, ClientError::Other(_)));
    }

    #[test]
    fn test_describe_close_includes_code_and_reason() {
        let frame = CloseFrame {
            code: CloseCode::Away,
            reason: "queue full".into(),
        };
        let text = describe_close(Some(&frame));
        assert!(text.contains("queue full"), "{text}");
        assert_eq!(describe_close(None), "server sent close");
    }

    #[tokio::test]
    async fn test_open_refused_port_is_connection_failed() {
        // Arrange: bind then drop a listener so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let cfg = ClientConfig::new(&format!("ws://{addr}/queue/join"))
            .unwrap()
            .with_timeout(Duration::from_secs(2));

        // Act
        let result = QueueConnection::open(&cfg).await;

        // Assert
        assert!(matches!(result, Err(ClientError::ConnectionFailed { .. })));
    }
}
