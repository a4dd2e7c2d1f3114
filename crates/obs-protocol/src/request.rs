//! Request type names, payloads, and typed response data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requests csvsync issues against the remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// Plugin and application version; doubles as a connection probe.
    GetVersion,
    /// All scenes, in display order.
    GetSceneList,
    /// Create an empty scene.
    CreateScene,
    /// Settings of a named input; doubles as an existence probe.
    GetInputSettings,
    /// Create an input inside a scene.
    CreateInput,
    /// Patch the settings of a named input.
    SetInputSettings,
}

impl RequestType {
    /// Stable request type name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetVersion => "GetVersion",
            Self::GetSceneList => "GetSceneList",
            Self::CreateScene => "CreateScene",
            Self::GetInputSettings => "GetInputSettings",
            Self::CreateInput => "CreateInput",
            Self::SetInputSettings => "SetInputSettings",
        }
    }

    /// Parse a request type name echoed back by the server.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "GetVersion" => Some(Self::GetVersion),
            "GetSceneList" => Some(Self::GetSceneList),
            "CreateScene" => Some(Self::CreateScene),
            "GetInputSettings" => Some(Self::GetInputSettings),
            "CreateInput" => Some(Self::CreateInput),
            "SetInputSettings" => Some(Self::SetInputSettings),
            _ => None,
        }
    }
}

/// `CreateScene` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateScene {
    /// Name of the new scene.
    pub scene_name: String,
}

/// `GetInputSettings` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetInputSettings {
    /// Input to look up.
    pub input_name: String,
}

/// `CreateInput` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInput {
    /// Scene the new input is added to.
    pub scene_name: String,
    /// Name of the new input.
    pub input_name: String,
    /// Remote kind, e.g. `text_ft2_source_v2`.
    pub input_kind: String,
    /// Initial settings object.
    pub input_settings: Value,
    /// Whether the created scene item starts visible.
    pub scene_item_enabled: bool,
}

/// `SetInputSettings` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetInputSettings {
    /// Input to patch.
    pub input_name: String,
    /// Settings object to apply.
    pub input_settings: Value,
    /// When true, merge into existing settings instead of replacing them.
    pub overlay: bool,
}

/// `GetVersion` response data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Application version.
    pub obs_version: String,
    /// Plugin version.
    pub obs_web_socket_version: String,
    /// Negotiable RPC version.
    pub rpc_version: u32,
}

/// One entry of `GetSceneList`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntry {
    /// Scene name.
    pub scene_name: String,
    /// Position in the scene list.
    #[serde(default)]
    pub scene_index: u32,
}

/// `GetSceneList` response data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SceneList {
    /// Scenes in the order the server reports them.
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_type_names_round_trip() {
        for rt in [
            RequestType::GetVersion,
            RequestType::GetSceneList,
            RequestType::CreateScene,
            RequestType::GetInputSettings,
            RequestType::CreateInput,
            RequestType::SetInputSettings,
        ] {
            assert_eq!(RequestType::try_from_str(rt.as_str()), Some(rt));
        }
        assert_eq!(RequestType::try_from_str("GetStats"), None);
    }

    #[test]
    fn set_settings_payload_shape() {
        let v = serde_json::to_value(SetInputSettings {
            input_name: "P1 Color".into(),
            input_settings: serde_json::json!({"color": 4281558783u32}),
            overlay: true,
        })
        .unwrap();
        assert_eq!(v["inputName"], "P1 Color");
        assert_eq!(v["inputSettings"]["color"], 4281558783u32);
        assert_eq!(v["overlay"], true);
    }
}
