//! Node configuration and Lavalink v4 wire types.

use cadence_core::{PlaylistInfo, ResolveResult, TrackInfo};
use serde::{Deserialize, Serialize};

/// Connection settings for one Lavalink node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Name used in logs
    #[serde(default = "default_name")]
    pub name: String,

    /// Base URL, e.g. `http://localhost:2333`
    pub url: String,

    /// Value of the `Authorization` header
    pub password: String,

    /// Node session id, if already known
    #[serde(default)]
    pub session_id: Option<String>,

    /// Prefix for plain-text searches (`ytmsearch`, `ytsearch`, `scsearch`)
    #[serde(default = "default_search_platform")]
    pub search_platform: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_name() -> String {
    "main".to_string()
}

fn default_search_platform() -> String {
    "ytmsearch".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl NodeConfig {
    /// Create a config with default name, search platform and timeout.
    pub fn new(url: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            url: url.into(),
            password: password.into(),
            session_id: None,
            search_platform: default_search_platform(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Set a known session id.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the search platform prefix.
    #[must_use]
    pub fn with_search_platform(mut self, platform: impl Into<String>) -> Self {
        self.search_platform = platform.into();
        self
    }
}

/// `GET /v4/loadtracks` response.
#[derive(Debug, Deserialize)]
#[serde(tag = "loadType", content = "data", rename_all = "lowercase")]
pub(crate) enum LoadResult {
    Track(LavalinkTrack),
    Playlist(LavalinkPlaylist),
    Search(Vec<LavalinkTrack>),
    Empty(serde::de::IgnoredAny),
    Error(LoadException),
}

#[derive(Debug, Deserialize)]
pub(crate) struct LavalinkTrack {
    pub encoded: String,
    pub info: LavalinkTrackInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LavalinkTrackInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// Milliseconds; meaningless for streams
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub is_stream: bool,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LavalinkPlaylist {
    pub info: LavalinkPlaylistInfo,
    #[serde(default)]
    pub tracks: Vec<LavalinkTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LavalinkPlaylistInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoadException {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// Error body returned by the node on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct NodeErrorBody {
    pub message: String,
}

/// `PATCH /v4/sessions/{sessionId}/players/{guildId}` body.
///
/// Absent fields are left unchanged by the node.
#[derive(Debug, Default, Serialize)]
pub(crate) struct UpdatePlayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<UpdatePlayerTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

/// `encoded: null` stops the current track.
#[derive(Debug, Serialize)]
pub(crate) struct UpdatePlayerTrack {
    pub encoded: Option<String>,
}

impl From<LavalinkTrack> for TrackInfo {
    fn from(track: LavalinkTrack) -> Self {
        let info = track.info;
        let mut out = TrackInfo::new(track.encoded, info.title).with_author(info.author);
        if let Some(uri) = info.uri {
            out = out.with_uri(uri);
        }
        if let Some(artwork) = info.artwork_url {
            out = out.with_thumbnail(artwork);
        }
        if info.is_stream {
            out.as_stream()
        } else {
            out.with_duration_ms(info.length)
        }
    }
}

impl LoadResult {
    /// Convert into the engine-neutral result; `error` loads become `Err`.
    pub(crate) fn into_resolve_result(self) -> std::result::Result<ResolveResult, LoadException> {
        Ok(match self {
            LoadResult::Track(track) => ResolveResult::Track {
                track: track.into(),
            },
            LoadResult::Search(tracks) => ResolveResult::Search {
                tracks: tracks.into_iter().map(TrackInfo::from).collect(),
            },
            LoadResult::Playlist(playlist) => ResolveResult::Playlist {
                info: PlaylistInfo::new(playlist.info.name),
                tracks: playlist.tracks.into_iter().map(TrackInfo::from).collect(),
            },
            LoadResult::Empty(_) => ResolveResult::NoMatch,
            LoadResult::Error(exception) => return Err(exception),
        })
    }
}

impl LoadException {
    pub(crate) fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match (&self.severity, &self.cause) {
            (Some(severity), Some(cause)) => format!("{message} ({severity}: {cause})"),
            (Some(severity), None) => format!("{message} ({severity})"),
            _ => message.to_string(),
        }
    }
}
