//! Lavalink node client.

use crate::error::{NodeClientError, Result};
use crate::player::LavalinkPlayer;
use crate::types::{LoadResult, NodeConfig, NodeErrorBody, UpdatePlayer};
use async_trait::async_trait;
use cadence_core::{
    ChannelId, EngineError, PlaybackEngine, PlayerHandle, ResolveResult, RoomId, UserId,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Client for one Lavalink v4 node.
///
/// Cheap to clone; clones share the HTTP pool and the session id.
///
/// # Example
///
/// ```ignore
/// use cadence_node_client::{LavalinkClient, NodeConfig};
///
/// let client = LavalinkClient::new(NodeConfig::new("http://localhost:2333", "pass"))?;
/// // Session id arrives with the node's ready event
/// client.set_session_id("abc123").await;
/// ```
#[derive(Clone)]
pub struct LavalinkClient {
    inner: Arc<NodeInner>,
}

pub(crate) struct NodeInner {
    http: Client,
    base_url: String,
    password: String,
    name: String,
    search_platform: String,
    session_id: RwLock<Option<String>>,
}

impl LavalinkClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NodeConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(NodeClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(NodeClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NodeClientError::Request)?;

        Ok(Self {
            inner: Arc::new(NodeInner {
                http,
                base_url,
                password: config.password,
                name: config.name,
                search_platform: config.search_platform,
                session_id: RwLock::new(config.session_id),
            }),
        })
    }

    /// Node name used in logs.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Base URL without trailing slash.
    pub fn url(&self) -> &str {
        &self.inner.base_url
    }

    /// Current node session id, if any.
    pub async fn session_id(&self) -> Option<String> {
        self.inner.session_id.read().await.clone()
    }

    /// Record the session id from the node's ready event.
    pub async fn set_session_id(&self, session_id: impl Into<String>) {
        let session_id = session_id.into();
        info!(node = %self.inner.name, session = %session_id, "Node session established");
        *self.inner.session_id.write().await = Some(session_id);
    }

    /// Resolve a query into the node's load result.
    ///
    /// URLs are passed through; anything else is searched on the configured
    /// platform.
    pub async fn load_tracks(&self, query: &str) -> Result<ResolveResult> {
        let identifier = self.inner.identifier_for(query);
        let url = format!("{}/v4/loadtracks", self.inner.base_url);

        debug!(node = %self.inner.name, identifier = %identifier, "Loading tracks");

        let response = self
            .inner
            .send(self.inner.http.get(&url).query(&[("identifier", &identifier)]))
            .await?;

        let load: LoadResult = response.json().await.map_err(|e| {
            NodeClientError::ParseError(format!("Failed to parse load result: {e}"))
        })?;

        load.into_resolve_result().map_err(|exception| {
            let description = exception.describe();
            warn!(node = %self.inner.name, identifier = %identifier, error = %description, "Node failed to load tracks");
            NodeClientError::LoadFailed(description)
        })
    }
}

impl NodeInner {
    /// Build the loadtracks identifier for a user query.
    fn identifier_for(&self, query: &str) -> String {
        let query = query.trim();
        match Url::parse(query) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => query.to_string(),
            _ => format!("{}:{}", self.search_platform, query),
        }
    }

    async fn session_path(&self, guild_id: &RoomId) -> Result<String> {
        let session = self.session_id.read().await;
        let session = session.as_deref().ok_or(NodeClientError::NoSession)?;
        Ok(format!(
            "{}/v4/sessions/{}/players/{}",
            self.base_url,
            session,
            guild_id.as_str()
        ))
    }

    /// `PATCH` the room's player.
    pub(crate) async fn update_player(&self, guild_id: &RoomId, update: &UpdatePlayer) -> Result<()> {
        let url = self.session_path(guild_id).await?;
        debug!(node = %self.name, guild = %guild_id, ?update, "Updating player");
        self.send(self.http.patch(&url).json(update)).await?;
        Ok(())
    }

    /// `DELETE` the room's player.
    pub(crate) async fn destroy_player(&self, guild_id: &RoomId) -> Result<()> {
        let url = self.session_path(guild_id).await?;
        debug!(node = %self.name, guild = %guild_id, "Destroying player");
        self.send(self.http.delete(&url)).await?;
        Ok(())
    }

    /// Send with auth, mapping transport failures and non-2xx statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header(AUTHORIZATION, &self.password)
            .send()
            .await
            .map_err(NodeClientError::from_send)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<NodeErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(NodeClientError::NodeError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PlaybackEngine for LavalinkClient {
    async fn resolve(&self, query: &str, requester: &UserId) -> cadence_core::Result<ResolveResult> {
        debug!(requester = %requester, query = %query, "Resolving query");
        Ok(self.load_tracks(query).await?)
    }

    async fn connect(
        &self,
        room_id: &RoomId,
        voice_channel_id: &ChannelId,
        _text_channel_id: &ChannelId,
    ) -> cadence_core::Result<Box<dyn PlayerHandle>> {
        // Players are created lazily by the first PATCH; only the session is needed
        if self.inner.session_id.read().await.is_none() {
            return Err(EngineError::from(NodeClientError::NoSession));
        }
        debug!(node = %self.inner.name, guild = %room_id, voice = %voice_channel_id, "Player handle opened");
        Ok(Box::new(LavalinkPlayer::new(
            Arc::clone(&self.inner),
            room_id.clone(),
        )))
    }
}
