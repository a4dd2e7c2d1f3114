//! Wire types for the OBS WebSocket v5 protocol.
//!
//! Every frame on the socket is a JSON text message of the form
//! `{"op": <u8>, "d": {...}}`. This crate models the handful of frames csvsync
//! needs (the identify handshake and request/response pairs) and leaves the
//! transport to `obs-client`.
//!
//! - [`codec`]: encode client frames and decode server frames.
//! - [`auth`]: the challenge/salt digest used during identification.
//! - [`request`]: request type names, payloads, and typed response data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod auth;
pub mod codec;
pub mod request;

pub use codec::Error;
pub use request::{
    CreateInput, CreateScene, GetInputSettings, RequestType, SceneEntry, SceneList,
    SetInputSettings, VersionInfo,
};

/// RPC version this client speaks.
pub const RPC_VERSION: u32 = 1;

/// Request status code reported for a successful request.
pub const STATUS_SUCCESS: u16 = 100;

/// Request status code reported when a named resource (input, scene) is absent.
pub const STATUS_RESOURCE_NOT_FOUND: u16 = 600;

/// Frame op codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Server greeting, sent on connect.
    Hello,
    /// Client identification in response to `Hello`.
    Identify,
    /// Server acknowledgement of a successful `Identify`.
    Identified,
    /// Client update of session parameters.
    Reidentify,
    /// Server-pushed event.
    Event,
    /// Client request.
    Request,
    /// Server response to a `Request`.
    RequestResponse,
}

impl OpCode {
    /// Numeric value carried in the `op` field.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Hello => 0,
            Self::Identify => 1,
            Self::Identified => 2,
            Self::Reidentify => 3,
            Self::Event => 5,
            Self::Request => 6,
            Self::RequestResponse => 7,
        }
    }

    /// Parse an `op` value received from the server.
    pub fn from_u8(op: u8) -> Option<Self> {
        match op {
            0 => Some(Self::Hello),
            1 => Some(Self::Identify),
            2 => Some(Self::Identified),
            3 => Some(Self::Reidentify),
            5 => Some(Self::Event),
            6 => Some(Self::Request),
            7 => Some(Self::RequestResponse),
            _ => None,
        }
    }
}

/// Untyped frame envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Op code.
    pub op: u8,
    /// Op-specific payload.
    pub d: Value,
}

/// Authentication parameters offered by the server in `Hello`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthChallenge {
    /// Per-session challenge.
    pub challenge: String,
    /// Per-password salt.
    pub salt: String,
}

/// Server greeting (op 0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Version of the obs-websocket plugin.
    pub obs_web_socket_version: String,
    /// Latest RPC version the server supports.
    pub rpc_version: u32,
    /// Present when the server requires a password.
    #[serde(default)]
    pub authentication: Option<AuthChallenge>,
}

/// Client identification (op 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    /// Requested RPC version.
    pub rpc_version: u32,
    /// Authentication digest, required when `Hello` carried a challenge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    /// Event subscription bitmask; csvsync subscribes to nothing.
    pub event_subscriptions: u32,
}

/// Server acknowledgement of identification (op 2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    /// RPC version both sides agreed on.
    pub negotiated_rpc_version: u32,
}

/// Client request (op 6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request type name, e.g. `GetVersion`.
    pub request_type: String,
    /// Client-chosen correlation id.
    pub request_id: String,
    /// Request-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<Value>,
}

/// Outcome block of a request response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestStatus {
    /// True when the request succeeded.
    pub result: bool,
    /// Status code; see [`STATUS_SUCCESS`] and [`STATUS_RESOURCE_NOT_FOUND`].
    pub code: u16,
    /// Optional human-readable failure detail.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Server response to a request (op 7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    /// Echo of the request type.
    pub request_type: String,
    /// Echo of the correlation id.
    pub request_id: String,
    /// Outcome.
    pub request_status: RequestStatus,
    /// Response payload, if any.
    #[serde(default)]
    pub response_data: Option<Value>,
}

/// Decoded server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Greeting.
    Hello(Hello),
    /// Identification accepted.
    Identified(Identified),
    /// Pushed event; csvsync ignores the payload.
    Event(Value),
    /// Response to one of our requests.
    RequestResponse(RequestResponse),
    /// Any other op code.
    Other(u8),
}

impl ServerMessage {
    /// Op code the message arrived with.
    pub fn op(&self) -> u8 {
        match self {
            Self::Hello(_) => OpCode::Hello.as_u8(),
            Self::Identified(_) => OpCode::Identified.as_u8(),
            Self::Event(_) => OpCode::Event.as_u8(),
            Self::RequestResponse(_) => OpCode::RequestResponse.as_u8(),
            Self::Other(op) => *op,
        }
    }
}
