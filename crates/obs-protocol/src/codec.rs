use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{Frame, Identify, OpCode, Request, RequestResponse, ServerMessage};

/// Errors from encoding/decoding protocol frames.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A frame arrived with an op code other than the one expected.
    #[error("expected op {expected}, got op {got}")]
    UnexpectedOp {
        /// Op code the caller was waiting for.
        expected: u8,
        /// Op code actually received.
        got: u8,
    },
}

fn encode_frame<T: Serialize>(op: OpCode, payload: &T) -> Result<String, Error> {
    let frame = Frame {
        op: op.as_u8(),
        d: serde_json::to_value(payload)?,
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Encode an `Identify` frame.
pub fn encode_identify(identify: &Identify) -> Result<String, Error> {
    encode_frame(OpCode::Identify, identify)
}

/// Encode a `Request` frame.
pub fn encode_request(request: &Request) -> Result<String, Error> {
    encode_frame(OpCode::Request, request)
}

/// Decode a text frame received from the server.
///
/// # Errors
/// Returns an error if the text is not a JSON frame or the payload does not
/// match the shape its op code promises.
pub fn decode(text: &str) -> Result<ServerMessage, Error> {
    let frame: Frame = serde_json::from_str(text)?;
    let msg = match OpCode::from_u8(frame.op) {
        Some(OpCode::Hello) => ServerMessage::Hello(serde_json::from_value(frame.d)?),
        Some(OpCode::Identified) => ServerMessage::Identified(serde_json::from_value(frame.d)?),
        Some(OpCode::Event) => ServerMessage::Event(frame.d),
        Some(OpCode::RequestResponse) => {
            ServerMessage::RequestResponse(serde_json::from_value(frame.d)?)
        }
        _ => ServerMessage::Other(frame.op),
    };
    Ok(msg)
}

/// Deserialize a response's `responseData` into a typed value.
///
/// Missing data decodes as JSON `null`, which suits `()` and `Option<T>`.
pub fn response_data<T: DeserializeOwned>(response: &RequestResponse) -> Result<T, Error> {
    let data = response.response_data.clone().unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{RequestStatus, SceneList, VersionInfo};

    #[test]
    fn identify_without_auth_omits_field() {
        let text = encode_identify(&Identify {
            rpc_version: 1,
            authentication: None,
            event_subscriptions: 0,
        })
        .unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["op"], 1);
        assert_eq!(v["d"]["rpcVersion"], 1);
        assert_eq!(v["d"]["eventSubscriptions"], 0);
        assert!(v["d"].get("authentication").is_none());
    }

    #[test]
    fn request_uses_camel_case_keys() {
        let text = encode_request(&Request {
            request_type: "GetInputSettings".into(),
            request_id: "7".into(),
            request_data: Some(json!({"inputName": "Score"})),
        })
        .unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["op"], 6);
        assert_eq!(v["d"]["requestType"], "GetInputSettings");
        assert_eq!(v["d"]["requestId"], "7");
        assert_eq!(v["d"]["requestData"]["inputName"], "Score");
    }

    #[test]
    fn decode_hello_with_challenge() {
        let text = r#"{"op":0,"d":{"obsWebSocketVersion":"5.1.0","rpcVersion":1,
            "authentication":{"challenge":"c","salt":"s"}}}"#;
        match decode(text).unwrap() {
            ServerMessage::Hello(h) => {
                assert_eq!(h.rpc_version, 1);
                let auth = h.authentication.unwrap();
                assert_eq!(auth.challenge, "c");
                assert_eq!(auth.salt, "s");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_failed_response_keeps_status() {
        let text = r#"{"op":7,"d":{"requestType":"GetInputSettings","requestId":"3",
            "requestStatus":{"result":false,"code":600,"comment":"No source was found"}}}"#;
        match decode(text).unwrap() {
            ServerMessage::RequestResponse(r) => {
                assert_eq!(
                    r.request_status,
                    RequestStatus {
                        result: false,
                        code: 600,
                        comment: Some("No source was found".into()),
                    }
                );
                assert!(r.response_data.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_op_is_passed_through() {
        assert_eq!(
            decode(r#"{"op":9,"d":{}}"#).unwrap(),
            ServerMessage::Other(9)
        );
    }

    #[test]
    fn typed_response_data() {
        let text = r#"{"op":7,"d":{"requestType":"GetSceneList","requestId":"1",
            "requestStatus":{"result":true,"code":100},
            "responseData":{"currentProgramSceneName":"Main",
              "scenes":[{"sceneName":"Main","sceneIndex":0},{"sceneName":"Break","sceneIndex":1}]}}}"#;
        let ServerMessage::RequestResponse(r) = decode(text).unwrap() else {
            panic!("expected response");
        };
        let list: SceneList = response_data(&r).unwrap();
        let names: Vec<_> = list.scenes.iter().map(|s| s.scene_name.as_str()).collect();
        assert_eq!(names, ["Main", "Break"]);

        let text = r#"{"op":7,"d":{"requestType":"GetVersion","requestId":"2",
            "requestStatus":{"result":true,"code":100},
            "responseData":{"obsVersion":"30.1.2","obsWebSocketVersion":"5.4.2","rpcVersion":1}}}"#;
        let ServerMessage::RequestResponse(r) = decode(text).unwrap() else {
            panic!("expected response");
        };
        let version: VersionInfo = response_data(&r).unwrap();
        assert_eq!(version.obs_version, "30.1.2");
    }
}
