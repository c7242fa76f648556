/// Bot configuration
use crate::error::{Result, ServerError};
use cadence_node_client::NodeConfig;
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default = "default_bot")]
    pub bot: BotSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_pagination")]
    pub pagination: PaginationSettings,

    #[serde(default = "default_node")]
    pub node: NodeSettings,

    #[serde(default = "default_server")]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotSettings {
    /// Command prefix for text commands
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Accent color for embeds, `#RRGGBB`
    #[serde(default = "default_embed_color")]
    pub embed_color: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub default_volume: u8,

    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationSettings {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// How long a queue message remembers its page
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeSettings {
    #[serde(default = "default_node_name")]
    pub name: String,

    #[serde(default = "default_node_url")]
    pub url: String,

    #[serde(default)]
    pub password: String,

    /// Known node session id; normally delivered by a node-connect event
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default = "default_search_platform")]
    pub search_platform: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl BotConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ServerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. CADENCE_NODE__PASSWORD
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.node.password.is_empty() {
            return Err(ServerError::Config(
                "Node password is required (set CADENCE_NODE__PASSWORD)".to_string(),
            ));
        }

        if self.bot.prefix.trim().is_empty() {
            return Err(ServerError::Config("Command prefix cannot be empty".to_string()));
        }

        if self.pagination.items_per_page == 0 {
            return Err(ServerError::Config(
                "pagination.items_per_page must be at least 1".to_string(),
            ));
        }

        if self.playback.max_queue_size == 0 {
            return Err(ServerError::Config(
                "playback.max_queue_size must be at least 1".to_string(),
            ));
        }

        if self.playback.default_volume > 100 {
            return Err(ServerError::Config(format!(
                "playback.default_volume must be between 0 and 100, got {}",
                self.playback.default_volume
            )));
        }

        self.embed_color()?;

        Ok(())
    }

    /// Embed color as an RGB integer
    pub fn embed_color(&self) -> Result<u32> {
        parse_color(&self.bot.embed_color)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            max_queue_size: self.playback.max_queue_size,
            default_volume: self.playback.default_volume,
        }
    }

    pub fn node_config(&self) -> NodeConfig {
        let mut node = NodeConfig::new(self.node.url.clone(), self.node.password.clone())
            .with_search_platform(self.node.search_platform.clone());
        node.name = self.node.name.clone();
        node.session_id = self.node.session_id.clone();
        node.request_timeout_secs = self.node.request_timeout_secs;
        node
    }
}

/// Parse `#RRGGBB` (leading `#` optional)
fn parse_color(value: &str) -> Result<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(ServerError::Config(format!(
            "Embed color must look like #RRGGBB, got {value:?}"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|_| ServerError::Config(format!("Invalid embed color {value:?}")))
}

// Default values
fn default_bot() -> BotSettings {
    BotSettings {
        prefix: default_prefix(),
        embed_color: default_embed_color(),
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_embed_color() -> String {
    "#5865F2".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        default_volume: default_volume(),
        max_queue_size: default_max_queue_size(),
    }
}

fn default_volume() -> u8 {
    50
}

fn default_max_queue_size() -> usize {
    100
}

fn default_pagination() -> PaginationSettings {
    PaginationSettings {
        items_per_page: default_items_per_page(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_items_per_page() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_node() -> NodeSettings {
    NodeSettings {
        name: default_node_name(),
        url: default_node_url(),
        password: String::new(),
        session_id: None,
        search_platform: default_search_platform(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

fn default_node_name() -> String {
    "main".to_string()
}

fn default_node_url() -> String {
    "http://localhost:2333".to_string()
}

fn default_search_platform() -> String {
    "ytmsearch".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot: default_bot(),
            playback: default_playback(),
            pagination: default_pagination(),
            node: default_node(),
            server: default_server(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BotConfig {
        let mut config = BotConfig::default();
        config.node.password = "youshallnotpass".to_string();
        config
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = BotConfig::default();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.embed_color().unwrap(), 0x0058_65F2);
        assert_eq!(config.playback.default_volume, 50);
        assert_eq!(config.playback.max_queue_size, 100);
        assert_eq!(config.pagination.items_per_page, 10);
        assert_eq!(config.pagination.timeout_secs, 300);
        assert_eq!(config.node.search_platform, "ytmsearch");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn missing_password_is_rejected() {
        let err = BotConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("password"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut config = valid();
        config.pagination.items_per_page = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.playback.max_queue_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loud_default_volume_is_rejected() {
        let mut config = valid();
        config.playback.default_volume = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn color_parsing() {
        assert_eq!(parse_color("#ff0000").unwrap(), 0x00FF_0000);
        assert_eq!(parse_color("00ff00").unwrap(), 0x0000_FF00);
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
            [node]
            url = "http://lavalink:2333"
            password = "secret"

            [pagination]
            items_per_page = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.node.url, "http://lavalink:2333");
        assert_eq!(config.node.name, "main");
        assert_eq!(config.pagination.items_per_page, 5);
        assert_eq!(config.pagination.timeout_secs, 300);
        assert_eq!(config.bot.prefix, "!");
    }

    #[test]
    fn node_config_carries_settings() {
        let mut config = valid();
        config.node.session_id = Some("abc".to_string());
        config.node.request_timeout_secs = 3;

        let node = config.node_config();
        assert_eq!(node.password, "youshallnotpass");
        assert_eq!(node.session_id.as_deref(), Some("abc"));
        assert_eq!(node.request_timeout_secs, 3);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = BotConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
