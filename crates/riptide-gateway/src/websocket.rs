//! WebSocket connector backed by tokio-tungstenite.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};

use crate::connection::{ConnectionError, Connector, FrameSink, FrameStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to the gateway over WebSocket.
#[derive(Debug, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), ConnectionError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| ConnectionError::ConnectFailed(e.to_string()))?;

        debug!(url = %url, status = %response.status(), "WebSocket handshake completed");

        let (sink, stream) = stream.split();
        Ok((
            Box::new(WebSocketSink { sink }),
            Box::new(WebSocketFrames { stream }),
        ))
    }

    fn name(&self) -> &'static str {
        "websocket"
    }
}

struct WebSocketSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WebSocketSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), ConnectionError> {
        self.sink
            .send(Message::Text(frame))
            .await
            .map_err(|e| ConnectionError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        // SinkExt::close flushes pending frames and sends the close
        // handshake.
        match self.sink.close().await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(ConnectionError::SendFailed(e.to_string())),
        }
    }
}

struct WebSocketFrames {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl FrameStream for WebSocketFrames {
    async fn next_frame(&mut self) -> Result<Option<String>, ConnectionError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => {
                        warn!("dropping non-UTF-8 binary frame");
                    }
                },
                // tungstenite queues the pong reply internally.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) => {
                    debug!("received close frame");
                    return Ok(None);
                }
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return Ok(None);
                }
                Some(Err(e)) => return Err(ConnectionError::ReceiveFailed(e.to_string())),
            }
        }
    }
}
