//! Reconciliation of remote sources against a desired state.
//!
//! The [`Reconciler`] exclusively owns the remote connection. For each source
//! in a batch it probes existence, creates the source when absent (in the
//! configured or first scene), then patches its settings. Failures are per
//! source: the rest of the batch still runs, and the batch reports overall
//! success as a boolean.

use config::{Config, Retry};
use obs_client::{ConnectOptions, Error as RemoteError, ops::SourceOps};
use obs_protocol::CreateInput;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{
    DesiredState, TypedValue,
    color::{self, InvalidColor},
    watch,
};

/// Scene created when the endpoint has none and none is configured.
pub const DEFAULT_SCENE: &str = "Scene";

/// Remote source kind, derived once from the source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Text source (kind configurable per platform).
    Text,
    /// `image_source`.
    Image,
    /// `color_source_v3`.
    Color,
    /// `browser_source`.
    Browser,
    /// `ffmpeg_source`.
    Media,
}

impl SourceKind {
    /// Classify a source by name (case-insensitive), first match wins:
    /// picture/image, color, browser, media, otherwise text.
    pub fn from_source_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("picture") || lower.contains("image") {
            Self::Image
        } else if lower.contains("color") {
            Self::Color
        } else if lower.contains("browser") {
            Self::Browser
        } else if lower.contains("media") {
            Self::Media
        } else {
            Self::Text
        }
    }

    /// Remote input kind used when creating the source.
    pub fn input_kind<'a>(&self, text_kind: &'a str) -> &'a str {
        match self {
            Self::Text => text_kind,
            Self::Image => "image_source",
            Self::Color => "color_source_v3",
            Self::Browser => "browser_source",
            Self::Media => "ffmpeg_source",
        }
    }

    /// Settings field that carries the value.
    pub fn settings_key(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "file",
            Self::Color => "color",
            Self::Browser => "url",
            Self::Media => "local_file",
        }
    }

    /// Settings object carrying `value` for this kind.
    ///
    /// Color sources need a packed integer: a classified color is used as-is,
    /// any other value is decoded as a color token and rejected if invalid.
    pub fn settings_for(&self, value: &TypedValue) -> Result<Value, InvalidColor> {
        let v = match (self, value) {
            (Self::Color, TypedValue::Color(n)) => Value::from(*n),
            (Self::Color, TypedValue::Text(s) | TypedValue::FilePath(s)) => {
                Value::from(color::decode(s)?)
            }
            (_, value) => Value::from(value.as_text()),
        };
        let mut settings = Map::new();
        settings.insert(self.settings_key().to_string(), v);
        Ok(Value::Object(settings))
    }
}

/// Why a single source failed to update.
#[derive(Debug, Error)]
enum UpdateError {
    /// The value cannot be pushed to a color source.
    #[error(transparent)]
    InvalidColor(#[from] InvalidColor),
    /// A remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result of a [`Reconciler::sync`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The desired state is empty: no mapping is configured, or no mapped
    /// column is present. Nothing was pushed.
    AwaitingMapping,
    /// The desired state equals the last applied state. Nothing was pushed.
    Unchanged,
    /// A push was attempted; `success` is false if any source failed.
    Applied {
        /// Every source in the batch updated.
        success: bool,
    },
}

/// Connection options for the endpoint named in `config`.
pub fn connect_options(config: &Config) -> ConnectOptions {
    ConnectOptions {
        host: config.obs.host.clone(),
        port: config.obs.port,
        password: config.obs.password().map(str::to_string),
        request_timeout: config.obs.request_timeout(),
    }
}

/// Pushes desired states to the remote endpoint through `O`.
pub struct Reconciler<O> {
    /// Remote operations; no other component issues remote calls.
    ops: O,
    /// Connect retry policy.
    retry: Retry,
    /// Scene new sources are created in, if configured.
    scene: Option<String>,
    /// Remote kind for text sources.
    text_input_kind: String,
    /// The most recent batch that was pushed (or attempted).
    last_applied: Option<DesiredState>,
}

impl<O: SourceOps> Reconciler<O> {
    /// Build a reconciler from the relevant parts of `config`.
    pub fn new(ops: O, config: &Config) -> Self {
        Self {
            ops,
            retry: config.retry,
            scene: config.scene.clone(),
            text_input_kind: config.text_input_kind.clone(),
            last_applied: None,
        }
    }

    /// Access the remote operations.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// True while the remote connection is up.
    pub fn is_connected(&self) -> bool {
        self.ops.is_connected()
    }

    /// The last applied (or attempted) desired state.
    pub fn last_applied(&self) -> Option<&DesiredState> {
        self.last_applied.as_ref()
    }

    /// Forget the last applied state so the next sync pushes everything.
    pub fn forget_applied(&mut self) {
        self.last_applied = None;
    }

    /// Connect with bounded retry: `retry.max_attempts` attempts separated by
    /// a fixed delay. Each attempt logs its outcome.
    pub async fn connect(&mut self) -> bool {
        let max = self.retry.max_attempts.max(1);
        let delay = self.retry.delay();
        for attempt in 1..=max {
            info!("Connecting to remote endpoint (attempt {}/{})", attempt, max);
            if self.connect_once(attempt, max).await {
                return true;
            }
            if attempt < max {
                info!("Retrying in {:?}", delay);
                sleep(delay).await;
            }
        }
        error!(
            "Failed to connect after {} attempts. Check that OBS is running, its WebSocket \
             server is enabled, and the port and password match",
            max
        );
        false
    }

    /// Single connect attempt for the reconnect path. On success the last
    /// applied state is forgotten so the next sync is a full resync.
    pub async fn reconnect(&mut self) -> bool {
        debug!("Attempting reconnect");
        let ok = self.connect_once(1, 1).await;
        if ok {
            self.forget_applied();
        }
        ok
    }

    /// One logged connect attempt.
    async fn connect_once(&mut self, attempt: u32, max: u32) -> bool {
        match self.ops.connect().await {
            Ok(version) => {
                info!(
                    obs_version = %version.obs_version,
                    websocket_version = %version.obs_web_socket_version,
                    "Connected"
                );
                true
            }
            Err(e @ RemoteError::ConnectionRefused { .. }) => {
                warn!(attempt, "Connection refused ({}/{}): {}", attempt, max, e);
                false
            }
            Err(e) => {
                error!(attempt, "Connection attempt {}/{} failed: {}", attempt, max, e);
                false
            }
        }
    }

    /// Disconnect from the remote endpoint.
    pub async fn disconnect(&mut self) {
        self.ops.disconnect().await;
    }

    /// True when `desired` differs from the last applied state.
    pub fn is_stale(&self, desired: &DesiredState) -> bool {
        watch::content_changed(desired, self.last_applied.as_ref())
    }

    /// Push `desired` if it is non-empty and differs from the last applied state.
    pub async fn sync(&mut self, desired: DesiredState) -> SyncOutcome {
        if desired.is_empty() {
            info!("Nothing mapped; awaiting configuration");
            return SyncOutcome::AwaitingMapping;
        }
        if !self.is_stale(&desired) {
            debug!("Data unchanged; skipping push");
            return SyncOutcome::Unchanged;
        }
        let success = self.apply(&desired).await;
        if success {
            info!(sources = desired.len(), "Updated sources");
        } else {
            warn!("Failed to update some sources");
        }
        SyncOutcome::Applied { success }
    }

    /// Push every source in `desired`, creating missing ones.
    ///
    /// Returns true only if every source updated. The last applied state
    /// advances to `desired` either way, so a persistent failure is not
    /// retried until the data changes.
    pub async fn apply(&mut self, desired: &DesiredState) -> bool {
        let success = self.push_all(desired).await;
        self.last_applied = Some(desired.clone());
        success
    }

    /// Body of [`Self::apply`].
    async fn push_all(&mut self, desired: &DesiredState) -> bool {
        if !self.ops.is_connected() {
            warn!(sources = desired.len(), "Not connected; skipping push");
            return false;
        }
        let mut scene = None;
        let mut success = true;
        for (name, value) in desired {
            if let Err(e) = self.update_source(name, value, &mut scene).await {
                error!(source = %name, "Failed to update source: {e}");
                success = false;
                if !self.ops.is_connected() {
                    warn!("Connection lost; abandoning remaining sources");
                    break;
                }
            }
        }
        success
    }

    /// Ensure `name` exists and carries `value`.
    async fn update_source(
        &mut self,
        name: &str,
        value: &TypedValue,
        scene: &mut Option<String>,
    ) -> Result<(), UpdateError> {
        let kind = SourceKind::from_source_name(name);
        let settings = kind.settings_for(value)?;

        if !self.ops.input_exists(name).await? {
            let scene_name = self.target_scene(scene).await?;
            let input_kind = kind.input_kind(&self.text_input_kind).to_string();
            info!(source = %name, kind = %input_kind, scene = %scene_name, "Creating source");
            self.ops
                .create_input(CreateInput {
                    scene_name,
                    input_name: name.to_string(),
                    input_kind,
                    input_settings: settings.clone(),
                    scene_item_enabled: true,
                })
                .await?;
        }

        self.ops.set_input_settings(name, settings, true).await?;
        info!(source = %name, "Updated source with {value}");
        Ok(())
    }

    /// Scene for new sources, resolved at most once per batch.
    ///
    /// A configured scene is created if missing; otherwise the first listed
    /// scene is used, or [`DEFAULT_SCENE`] is created when there are none.
    async fn target_scene(&mut self, cached: &mut Option<String>) -> Result<String, RemoteError> {
        if let Some(name) = cached {
            return Ok(name.clone());
        }
        let scenes = self.ops.list_scenes().await?;
        let name = match (self.scene.clone(), scenes.first()) {
            (Some(want), _) if scenes.contains(&want) => want,
            (Some(want), _) => self.create_scene(want).await?,
            (None, Some(first)) => first.clone(),
            (None, None) => self.create_scene(DEFAULT_SCENE.to_string()).await?,
        };
        *cached = Some(name.clone());
        Ok(name)
    }

    /// Create a scene and return its name.
    async fn create_scene(&mut self, name: String) -> Result<String, RemoteError> {
        self.ops.create_scene(&name).await?;
        info!(scene = %name, "Created scene");
        Ok(name)
    }
}
