use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    HubConfig, LoggingConfig, RateLimitConfig, ServerConfig, ValidationConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub hub: HubConfig,
    pub websocket: WebSocketConfig,
    pub rate_limit: RateLimitConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// 1. `CHAT_CONFIG_DIR`, else `./.chat/`
    /// 2. Create the directory if missing
    /// 3. Read `config.toml` when present, else defaults
    /// 4. Apply `CHAT_*` environment overrides
    ///
    /// Does not validate; call [`Config::validate`] afterwards.
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `CHAT_CONFIG_DIR` if set, otherwise `.chat/` under the working directory
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.hub.validate()?;
        self.websocket.validate()?;
        self.rate_limit.validate()?;
        self.validation.validate()?;

        // Log output must stay inside the config directory
        let log_dir = Path::new(&self.logging.dir);
        if log_dir.is_absolute() || self.logging.dir.contains("..") {
            return Err(ConfigError::logging(
                "logging.dir must be relative and cannot contain '..'",
            ));
        }
        if let Some(file) = &self.logging.file
            && (file.is_empty() || file.contains(['/', '\\']) || file.contains(".."))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a plain file name, got '{file}'"
            )));
        }

        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(file) = &self.logging.file else {
            return Ok(None);
        };
        let config_dir = Self::config_dir()?;
        Ok(Some(config_dir.join(&self.logging.dir).join(file)))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} connections)",
            self.server.host, self.server.port, self.server.max_connections
        );
        info!(
            "  hub: replay={}, queue={}, max_subscribers={}",
            self.hub.replay_capacity, self.hub.queue_capacity, self.hub.max_subscribers
        );
        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs
        );
        info!(
            "  rate_limit: {}/{}s",
            self.rate_limit.max_messages, self.rate_limit.window_secs
        );
        info!(
            "  validation: max_message_length={}",
            self.validation.max_message_length
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("CHAT_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("CHAT_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "CHAT_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Hub
        Self::apply_env_parse("CHAT_HUB_REPLAY_CAPACITY", &mut self.hub.replay_capacity);
        Self::apply_env_parse("CHAT_HUB_QUEUE_CAPACITY", &mut self.hub.queue_capacity);
        Self::apply_env_parse("CHAT_HUB_MAX_SUBSCRIBERS", &mut self.hub.max_subscribers);

        // WebSocket
        Self::apply_env_parse(
            "CHAT_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "CHAT_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "CHAT_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );

        // Rate limit
        Self::apply_env_parse(
            "CHAT_RATE_LIMIT_MAX_MESSAGES",
            &mut self.rate_limit.max_messages,
        );
        Self::apply_env_parse(
            "CHAT_RATE_LIMIT_WINDOW_SECS",
            &mut self.rate_limit.window_secs,
        );

        // Validation
        Self::apply_env_parse(
            "CHAT_VALIDATION_MAX_MESSAGE_LENGTH",
            &mut self.validation.max_message_length,
        );

        // Logging
        Self::apply_env_parse("CHAT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("CHAT_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("CHAT_LOG_FILE", &mut self.logging.file);
        Self::apply_env_bool("CHAT_LOG_COLORED", &mut self.logging.colored);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true" or "1"; anything else is false
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the target untouched
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
