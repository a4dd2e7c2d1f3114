use async_trait::async_trait;
use obs_protocol::{
    CreateInput, CreateScene, GetInputSettings, RequestType, SceneList, SetInputSettings,
    VersionInfo,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{ConnectOptions, Connection, Error, Result, ops::SourceOps};

/// A client for the remote control endpoint.
///
/// The client holds at most one identified [`Connection`]. A request that
/// fails at the transport level drops the connection, so `is_connected`
/// reflects whether the next call has any chance of succeeding.
pub struct Client {
    /// Where to connect.
    options: ConnectOptions,
    /// The active connection (if connected).
    connection: Option<Connection>,
}

impl Client {
    /// Create a disconnected client.
    pub fn new(options: ConnectOptions) -> Self {
        Self {
            options,
            connection: None,
        }
    }

    /// Connection options this client was built with.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Issue a request, dropping the connection if the transport failed.
    async fn call<T: DeserializeOwned>(
        &mut self,
        request_type: RequestType,
        data: Option<Value>,
    ) -> Result<T> {
        let conn = self.connection.as_mut().ok_or(Error::NotConnected)?;
        let result = conn.request(request_type, data).await;
        if let Err(e) = &result
            && e.is_connection_lost()
        {
            warn!("Lost connection to {}: {}", self.options.addr(), e);
            self.connection = None;
        }
        result
    }

    /// Issue a request whose payload is a typed struct and whose response
    /// carries no data of interest.
    async fn call_unit<P: Serialize>(&mut self, request_type: RequestType, payload: &P) -> Result<()> {
        let data = serde_json::to_value(payload).map_err(obs_protocol::Error::from)?;
        let _ignored: Value = self.call(request_type, Some(data)).await?;
        Ok(())
    }
}

#[async_trait]
impl SourceOps for Client {
    async fn connect(&mut self) -> Result<VersionInfo> {
        if self.connection.is_some() {
            debug!("Already connected; reconnecting");
            self.disconnect().await;
        }
        let conn = Connection::open(&self.options).await?;
        self.connection = Some(conn);
        match self.call::<VersionInfo>(RequestType::GetVersion, None).await {
            Ok(version) => Ok(version),
            Err(e) => {
                self.connection = None;
                Err(e)
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Some(mut conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                debug!("Close handshake failed: {}", e);
            }
            info!("Disconnected from {}", self.options.addr());
        }
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    async fn input_exists(&mut self, name: &str) -> Result<bool> {
        let payload = GetInputSettings {
            input_name: name.to_string(),
        };
        match self.call_unit(RequestType::GetInputSettings, &payload).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!("Input '{}' does not exist: {}", name, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_scenes(&mut self) -> Result<Vec<String>> {
        let list: SceneList = self.call(RequestType::GetSceneList, None).await?;
        Ok(list.scenes.into_iter().map(|s| s.scene_name).collect())
    }

    async fn create_scene(&mut self, name: &str) -> Result<()> {
        let payload = CreateScene {
            scene_name: name.to_string(),
        };
        self.call_unit(RequestType::CreateScene, &payload).await
    }

    async fn create_input(&mut self, input: CreateInput) -> Result<()> {
        self.call_unit(RequestType::CreateInput, &input).await
    }

    async fn set_input_settings(
        &mut self,
        name: &str,
        settings: Value,
        overlay: bool,
    ) -> Result<()> {
        let payload = SetInputSettings {
            input_name: name.to_string(),
            input_settings: settings,
            overlay,
        };
        self.call_unit(RequestType::SetInputSettings, &payload).await
    }
}
