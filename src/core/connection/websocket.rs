//! WebSocket transport for an opened speech connection.
//!
//! [`WebsocketConnection::open`] performs the upgrade with the connection's
//! headers and hands back a [`SpeechSocket`] that speaks
//! [`SpeechConnectionMessage`]s through the connection's formatter.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError as WsProtocolError};
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

use super::factory::WebsocketConnection;
use crate::core::protocol::{
    MessageFormatter, RawFrame, SpeechConnectionMessage, WebsocketMessageFormatter,
};
use crate::errors::connection_error::{ConnectionError, ConnectionResult};

/// Upper bound on the WebSocket handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl WebsocketConnection {
    /// Open the WebSocket and return a socket bound to this connection's codec.
    pub async fn open(&self) -> ConnectionResult<SpeechSocket> {
        let mut request = self
            .url()
            .as_str()
            .into_client_request()
            .map_err(|e| ConnectionError::Handshake(format!("Failed to build request: {e}")))?;

        for (name, value) in self.headers().iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConnectionError::InvalidHeader(name.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConnectionError::InvalidHeader(name.to_string()))?;
            request.headers_mut().insert(header_name, header_value);
        }

        let (stream, _response) = match timeout(CONNECT_TIMEOUT, connect_async(request)).await {
            Ok(Ok(connected)) => connected,
            Ok(Err(e)) => {
                let err = handshake_error(e);
                error!("Speech connection {} failed: {}", self.id(), err);
                return Err(err);
            }
            Err(_) => {
                let err = ConnectionError::Handshake(format!(
                    "Connection timed out after {} seconds",
                    CONNECT_TIMEOUT.as_secs()
                ));
                error!("Speech connection {} failed: {}", self.id(), err);
                return Err(err);
            }
        };

        info!("Connected speech connection {}", self.id());

        Ok(SpeechSocket {
            connection_id: self.id().to_string(),
            stream,
            formatter: *self.formatter(),
            closed: false,
        })
    }
}

fn handshake_error(e: WsError) -> ConnectionError {
    match e {
        WsError::Http(response) => {
            let status = response.status();
            let reason = response
                .body()
                .as_deref()
                .and_then(|body| std::str::from_utf8(body).ok())
                .map(str::trim)
                .filter(|body| !body.is_empty())
                .or_else(|| status.canonical_reason())
                .unwrap_or_default()
                .to_string();
            ConnectionError::Rejected {
                status: status.as_u16(),
                reason,
            }
        }
        other => ConnectionError::Handshake(other.to_string()),
    }
}

fn transport_error(e: WsError) -> ConnectionError {
    match e {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(WsProtocolError::SendAfterClosing) => ConnectionError::Closed,
        other => ConnectionError::Transport(other.to_string()),
    }
}

/// An open speech connection.
pub struct SpeechSocket {
    connection_id: String,
    stream: WsStream,
    formatter: WebsocketMessageFormatter,
    /// Set once the close handshake has started from either side.
    closed: bool,
}

impl std::fmt::Debug for SpeechSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSocket")
            .field("connection_id", &self.connection_id)
            .field("formatter", &self.formatter)
            .field("closed", &self.closed)
            .finish()
    }
}

impl SpeechSocket {
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Encode `message` and send it as one WebSocket frame.
    pub async fn send(&mut self, message: &SpeechConnectionMessage) -> ConnectionResult<()> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }

        let frame = self.formatter.to_frame(&message.to_connection_message())?;
        let ws_message = match frame {
            RawFrame::Text(text) => Message::Text(text.into()),
            RawFrame::Binary(data) => Message::Binary(data),
        };

        debug!(
            "Sending {} on connection {}",
            message.path(),
            self.connection_id
        );
        self.stream.send(ws_message).await.map_err(transport_error)
    }

    /// Next speech message from the service.
    ///
    /// Control frames are skipped. Returns `Ok(None)` once the service has
    /// closed the connection.
    pub async fn read(&mut self) -> ConnectionResult<Option<SpeechConnectionMessage>> {
        if self.closed {
            return Ok(None);
        }

        while let Some(next) = self.stream.next().await {
            let frame = match next.map_err(transport_error)? {
                Message::Text(text) => RawFrame::Text(text.as_str().to_string()),
                Message::Binary(data) => RawFrame::Binary(data),
                Message::Close(close_frame) => {
                    self.closed = true;
                    info!(
                        "Speech connection {} closed by service: {:?}",
                        self.connection_id, close_frame
                    );
                    return Ok(None);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            let message = self.formatter.from_frame(&frame)?;
            let message = SpeechConnectionMessage::try_from(message).inspect_err(|e| {
                warn!(
                    "Malformed message on connection {}: {}",
                    self.connection_id, e
                );
            })?;

            debug!(
                "Received {} on connection {}",
                message.path(),
                self.connection_id
            );
            return Ok(Some(message));
        }

        self.closed = true;
        Ok(None)
    }

    /// Send a close frame and wait for the close handshake.
    ///
    /// Closing a socket the service already closed is a no-op.
    pub async fn close(&mut self) -> ConnectionResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(e) => match transport_error(e) {
                ConnectionError::Closed => Ok(()),
                other => Err(other),
            },
        }
    }
}
