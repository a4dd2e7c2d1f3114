//! WebSocket connection to the remote control endpoint.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use obs_protocol::{
    Identify, OpCode, RPC_VERSION, Request, RequestType, ServerMessage, auth, codec,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, trace};

use crate::{Error, Result};

/// Socket type produced by `connect_async`.
type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Optional password; `None` for servers without authentication.
    pub password: Option<String>,
    /// Bound on the handshake and on each request.
    pub request_timeout: Duration,
}

impl ConnectOptions {
    /// `host:port` used in logs and errors.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// WebSocket URL for the endpoint.
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

/// An identified session with the server.
///
/// Requests are strictly sequential: each call writes one request frame and
/// reads until the response with the matching id arrives, skipping events.
pub struct Connection {
    /// Underlying socket.
    socket: Socket,
    /// Counter for request correlation ids.
    next_id: u64,
    /// Per-request bound.
    request_timeout: Duration,
}

impl Connection {
    /// Open the socket and complete the identify handshake.
    pub async fn open(options: &ConnectOptions) -> Result<Self> {
        let addr = options.addr();
        debug!("Connecting to {}", options.url());
        let (socket, _response) = timeout(options.request_timeout, connect_async(options.url()))
            .await
            .map_err(|_| Error::Connect {
                addr: addr.clone(),
                message: format!("timed out after {:?}", options.request_timeout),
            })?
            .map_err(|e| Error::from_connect(&addr, e))?;

        let mut conn = Self {
            socket,
            next_id: 1,
            request_timeout: options.request_timeout,
        };
        timeout(
            options.request_timeout,
            conn.identify(options.password.as_deref()),
        )
        .await
        .map_err(|_| Error::Handshake("timed out waiting for server".to_string()))??;
        info!("Identified with {}", addr);
        Ok(conn)
    }

    /// Read the next text frame, skipping pings and binary frames.
    async fn next_text(&mut self) -> Result<String> {
        loop {
            match self.socket.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Close(_))) | None => return Err(Error::Closed),
                Some(Ok(other)) => trace!("ignoring frame: {:?}", other),
                Some(Err(e)) => return Err(Error::Transport(e)),
            }
        }
    }

    /// Wait for `Hello`, answer with `Identify`, and wait for `Identified`.
    async fn identify(&mut self, password: Option<&str>) -> Result<()> {
        let hello = match codec::decode(&self.next_text().await?)? {
            ServerMessage::Hello(h) => h,
            other => {
                return Err(Error::Handshake(format!(
                    "expected Hello, got {:?}",
                    other
                )));
            }
        };
        debug!(
            "Server hello: obs-websocket {} (rpc {})",
            hello.obs_web_socket_version, hello.rpc_version
        );

        let authentication = match (&hello.authentication, password) {
            (Some(challenge), Some(pw)) => Some(auth::auth_response(
                pw,
                &challenge.salt,
                &challenge.challenge,
            )),
            (Some(_), None) => return Err(Error::AuthRequired),
            (None, _) => None,
        };
        let identify = Identify {
            rpc_version: RPC_VERSION,
            authentication,
            event_subscriptions: 0,
        };
        self.socket
            .send(Message::Text(codec::encode_identify(&identify)?))
            .await?;

        loop {
            match codec::decode(&self.next_text().await?)? {
                ServerMessage::Identified(ok) => {
                    debug!("Negotiated rpc version {}", ok.negotiated_rpc_version);
                    return Ok(());
                }
                ServerMessage::Event(_) => continue,
                other => {
                    return Err(obs_protocol::Error::UnexpectedOp {
                        expected: OpCode::Identified.as_u8(),
                        got: other.op(),
                    }
                    .into());
                }
            }
        }
    }

    /// Send one request and decode its response data.
    pub async fn request<T: DeserializeOwned>(
        &mut self,
        request_type: RequestType,
        data: Option<Value>,
    ) -> Result<T> {
        let name = request_type.as_str();
        match timeout(self.request_timeout, self.round_trip(request_type, data)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout { request_type: name }),
        }
    }

    /// Write a request frame and read until its response.
    async fn round_trip<T: DeserializeOwned>(
        &mut self,
        request_type: RequestType,
        data: Option<Value>,
    ) -> Result<T> {
        let request_id = self.next_id.to_string();
        self.next_id += 1;
        let request = Request {
            request_type: request_type.as_str().to_string(),
            request_id: request_id.clone(),
            request_data: data,
        };
        trace!("-> {} #{}", request.request_type, request_id);
        self.socket
            .send(Message::Text(codec::encode_request(&request)?))
            .await?;

        loop {
            let response = match codec::decode(&self.next_text().await?)? {
                ServerMessage::RequestResponse(r) if r.request_id == request_id => r,
                ServerMessage::RequestResponse(r) => {
                    debug!("Dropping stale response #{}", r.request_id);
                    continue;
                }
                _ => continue,
            };
            trace!("<- {} #{}", response.request_type, request_id);
            if !response.request_status.result {
                return Err(Error::RequestFailed {
                    request_type: request_type.as_str(),
                    code: response.request_status.code,
                    comment: response.request_status.comment,
                });
            }
            return Ok(codec::response_data(&response)?);
        }
    }

    /// Send a close frame.
    pub async fn close(&mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}
