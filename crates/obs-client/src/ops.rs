//! Capability trait over the remote source operations csvsync needs.
//!
//! The reconciler only ever talks to the remote endpoint through
//! [`SourceOps`], so it can be exercised against [`MockSourceOps`] without a
//! running server.

use async_trait::async_trait;
use obs_protocol::{CreateInput, VersionInfo};
use serde_json::Value;

use crate::Result;

/// Remote operations over named inputs and scenes.
#[async_trait]
pub trait SourceOps: Send {
    /// Make one connection attempt and return the server version.
    async fn connect(&mut self) -> Result<VersionInfo>;
    /// Drop the connection, if any.
    async fn disconnect(&mut self);
    /// True while a connection is established.
    fn is_connected(&self) -> bool;
    /// Existence probe for a named input.
    async fn input_exists(&mut self, name: &str) -> Result<bool>;
    /// Scene names in server order.
    async fn list_scenes(&mut self) -> Result<Vec<String>>;
    /// Create an empty scene.
    async fn create_scene(&mut self, name: &str) -> Result<()>;
    /// Create an input inside a scene.
    async fn create_input(&mut self, input: CreateInput) -> Result<()>;
    /// Patch an input's settings.
    async fn set_input_settings(&mut self, name: &str, settings: Value, overlay: bool)
    -> Result<()>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockInput, MockSourceOps};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::{
        collections::{BTreeMap, BTreeSet},
        sync::Arc,
    };

    use async_trait::async_trait;
    use obs_protocol::{CreateInput, STATUS_RESOURCE_NOT_FOUND, VersionInfo};
    use parking_lot::Mutex;
    use serde_json::Value;

    use super::SourceOps;
    use crate::{Error, Result};

    /// A remote input as the mock stores it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct MockInput {
        /// Scene the input was created in.
        pub scene: String,
        /// Remote kind.
        pub kind: String,
        /// Current settings object.
        pub settings: Value,
    }

    /// Shared mock state.
    #[derive(Default)]
    struct State {
        /// Every call in order, e.g. `exists:P1 Name`.
        calls: Vec<String>,
        /// Whether a connection is up.
        connected: bool,
        /// Remaining connection attempts to refuse.
        refuse_connects: u32,
        /// Scene names in listing order.
        scenes: Vec<String>,
        /// Inputs by name.
        inputs: BTreeMap<String, MockInput>,
        /// Inputs whose creation fails.
        fail_create: BTreeSet<String>,
        /// Inputs whose settings patch fails.
        fail_set: BTreeSet<String>,
        /// Inputs whose settings patch drops the connection.
        drop_on_set: BTreeSet<String>,
    }

    /// Recording fake of the remote endpoint (enabled with `test-utils`).
    ///
    /// Clones share state, so a test can hand one clone to the code under test
    /// and inspect the other.
    #[derive(Clone, Default)]
    pub struct MockSourceOps {
        /// State shared between clones.
        state: Arc<Mutex<State>>,
    }

    impl MockSourceOps {
        /// A disconnected mock with no scenes or inputs.
        pub fn new() -> Self {
            Self::default()
        }

        /// Refuse the next `n` connection attempts.
        pub fn refuse_connects(&self, n: u32) {
            self.state.lock().refuse_connects = n;
        }

        /// Add an existing scene.
        pub fn add_scene(&self, name: &str) {
            self.state.lock().scenes.push(name.to_string());
        }

        /// Add an existing input in the first scene.
        pub fn add_input(&self, name: &str, kind: &str, settings: Value) {
            let mut st = self.state.lock();
            let scene = st.scenes.first().cloned().unwrap_or_default();
            st.inputs.insert(
                name.to_string(),
                MockInput {
                    scene,
                    kind: kind.to_string(),
                    settings,
                },
            );
        }

        /// Make `create_input` fail for `name`.
        pub fn fail_create(&self, name: &str) {
            self.state.lock().fail_create.insert(name.to_string());
        }

        /// Make `set_input_settings` fail for `name`.
        pub fn fail_set(&self, name: &str) {
            self.state.lock().fail_set.insert(name.to_string());
        }

        /// Simulate the server going away.
        pub fn drop_connection(&self) {
            self.state.lock().connected = false;
        }

        /// Drop the connection when `set_input_settings` is called for `name`.
        pub fn drop_on_set(&self, name: &str) {
            self.state.lock().drop_on_set.insert(name.to_string());
        }

        /// Current state of input `name`.
        pub fn input(&self, name: &str) -> Option<MockInput> {
            self.state.lock().inputs.get(name).cloned()
        }

        /// Scene names in listing order.
        pub fn scenes(&self) -> Vec<String> {
            self.state.lock().scenes.clone()
        }

        /// Recorded calls in order.
        pub fn calls(&self) -> Vec<String> {
            self.state.lock().calls.clone()
        }

        /// Number of recorded calls whose name starts with `prefix`.
        pub fn count(&self, prefix: &str) -> usize {
            self.state
                .lock()
                .calls
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        /// Forget recorded calls.
        pub fn clear_calls(&self) {
            self.state.lock().calls.clear();
        }

        /// Record a call.
        fn note(&self, s: String) {
            self.state.lock().calls.push(s);
        }

        /// `NotConnected` unless a connection is up.
        fn ensure_connected(&self) -> Result<()> {
            if self.state.lock().connected {
                Ok(())
            } else {
                Err(Error::NotConnected)
            }
        }
    }

    #[async_trait]
    impl SourceOps for MockSourceOps {
        async fn connect(&mut self) -> Result<VersionInfo> {
            self.note("connect".to_string());
            let mut st = self.state.lock();
            if st.refuse_connects > 0 {
                st.refuse_connects -= 1;
                return Err(Error::ConnectionRefused {
                    addr: "mock:4455".to_string(),
                });
            }
            st.connected = true;
            Ok(VersionInfo {
                obs_version: "30.0.0".to_string(),
                obs_web_socket_version: "5.3.0".to_string(),
                rpc_version: 1,
            })
        }

        async fn disconnect(&mut self) {
            self.note("disconnect".to_string());
            self.state.lock().connected = false;
        }

        fn is_connected(&self) -> bool {
            self.state.lock().connected
        }

        async fn input_exists(&mut self, name: &str) -> Result<bool> {
            self.note(format!("exists:{name}"));
            self.ensure_connected()?;
            Ok(self.state.lock().inputs.contains_key(name))
        }

        async fn list_scenes(&mut self) -> Result<Vec<String>> {
            self.note("list_scenes".to_string());
            self.ensure_connected()?;
            Ok(self.state.lock().scenes.clone())
        }

        async fn create_scene(&mut self, name: &str) -> Result<()> {
            self.note(format!("create_scene:{name}"));
            self.ensure_connected()?;
            self.state.lock().scenes.push(name.to_string());
            Ok(())
        }

        async fn create_input(&mut self, input: CreateInput) -> Result<()> {
            self.note(format!("create:{}", input.input_name));
            self.ensure_connected()?;
            let mut st = self.state.lock();
            if st.fail_create.contains(&input.input_name) {
                return Err(Error::RequestFailed {
                    request_type: "CreateInput",
                    code: 702,
                    comment: Some("mock create failure".to_string()),
                });
            }
            if !st.scenes.contains(&input.scene_name) {
                return Err(Error::RequestFailed {
                    request_type: "CreateInput",
                    code: STATUS_RESOURCE_NOT_FOUND,
                    comment: Some(format!("no scene {}", input.scene_name)),
                });
            }
            st.inputs.insert(
                input.input_name,
                MockInput {
                    scene: input.scene_name,
                    kind: input.input_kind,
                    settings: input.input_settings,
                },
            );
            Ok(())
        }

        async fn set_input_settings(
            &mut self,
            name: &str,
            settings: Value,
            overlay: bool,
        ) -> Result<()> {
            self.note(format!("set:{name}"));
            self.ensure_connected()?;
            let mut st = self.state.lock();
            if st.drop_on_set.contains(name) {
                st.connected = false;
                return Err(Error::Closed);
            }
            if st.fail_set.contains(name) {
                return Err(Error::RequestFailed {
                    request_type: "SetInputSettings",
                    code: 703,
                    comment: Some("mock set failure".to_string()),
                });
            }
            let Some(input) = st.inputs.get_mut(name) else {
                return Err(Error::RequestFailed {
                    request_type: "SetInputSettings",
                    code: STATUS_RESOURCE_NOT_FOUND,
                    comment: Some(format!("no input {name}")),
                });
            };
            match (overlay, &mut input.settings, settings) {
                (true, Value::Object(current), Value::Object(patch)) => {
                    for (k, v) in patch {
                        current.insert(k, v);
                    }
                }
                (_, current, replacement) => *current = replacement,
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Error;

    #[tokio::test(flavor = "current_thread")]
    async fn mock_drops_connection_on_marked_patch() {
        let mut mock = MockSourceOps::new();
        mock.add_scene("Main");
        mock.add_input("A", "text_ft2_source_v2", json!({"text": "old", "font": 1}));
        mock.connect().await.unwrap();

        mock.set_input_settings("A", json!({"text": "new"}), true)
            .await
            .unwrap();
        assert_eq!(mock.input("A").unwrap().settings, json!({"text": "new", "font": 1}));

        mock.drop_on_set("A");
        let err = mock
            .set_input_settings("A", json!({"text": "x"}), true)
            .await
            .unwrap_err();
        assert!(err.is_connection_lost());
        assert!(!mock.is_connected());
        assert!(matches!(mock.input_exists("A").await, Err(Error::NotConnected)));
    }
}
