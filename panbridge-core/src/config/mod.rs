//! Appliance connection settings
//!
//! Settings are read from `config.toml` (see [`ConfigLoader`]) and may be
//! overridden by `V5000_*` environment variables. The core never reads the
//! environment on its own; [`ConfigLoader::load`] is the only entry point
//! that does.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::session::prompt::LAUNCH_COMMAND;
use crate::session::transport::DEFAULT_SSH_PORT;
use crate::session::{RetryConfig, SessionConfig, SshTarget};

/// Directory under the platform config dir
pub const CONFIG_DIR_NAME: &str = "panbridge";

/// Settings file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-category cache lifetimes in milliseconds (stored under `[cache_ttl]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// Performance summary (default: 30 s)
    #[serde(default = "default_performance_ttl_ms")]
    pub performance: u64,
    /// Volume list (default: 2 min)
    #[serde(default = "default_volumes_ttl_ms")]
    pub volumes: u64,
    /// Pool list (default: 2 min)
    #[serde(default = "default_pools_ttl_ms")]
    pub pools: u64,
    /// System info (default: 5 min)
    #[serde(default = "default_system_ttl_ms")]
    pub system: u64,
    /// Alert list (default: 1 min)
    #[serde(default = "default_alerts_ttl_ms")]
    pub alerts: u64,
}

const fn default_performance_ttl_ms() -> u64 {
    30_000
}

const fn default_volumes_ttl_ms() -> u64 {
    120_000
}

const fn default_pools_ttl_ms() -> u64 {
    120_000
}

const fn default_system_ttl_ms() -> u64 {
    300_000
}

const fn default_alerts_ttl_ms() -> u64 {
    60_000
}

const fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

const fn default_connect_timeout_ms() -> u64 {
    10_000
}

const fn default_command_timeout_ms() -> u64 {
    30_000
}

const fn default_perf_poll_ms() -> u64 {
    300_000
}

fn default_launch_command() -> String {
    LAUNCH_COMMAND.to_string()
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            performance: default_performance_ttl_ms(),
            volumes: default_volumes_ttl_ms(),
            pools: default_pools_ttl_ms(),
            system: default_system_ttl_ms(),
            alerts: default_alerts_ttl_ms(),
        }
    }
}

impl CacheTtlConfig {
    /// Performance TTL as a `Duration`
    #[must_use]
    pub const fn performance(&self) -> Duration {
        Duration::from_millis(self.performance)
    }

    /// Volumes TTL as a `Duration`
    #[must_use]
    pub const fn volumes(&self) -> Duration {
        Duration::from_millis(self.volumes)
    }

    /// Pools TTL as a `Duration`
    #[must_use]
    pub const fn pools(&self) -> Duration {
        Duration::from_millis(self.pools)
    }

    /// System TTL as a `Duration`
    #[must_use]
    pub const fn system(&self) -> Duration {
        Duration::from_millis(self.system)
    }

    /// Alerts TTL as a `Duration`
    #[must_use]
    pub const fn alerts(&self) -> Duration {
        Duration::from_millis(self.alerts)
    }
}

/// On-disk shape of the settings file; every field is optional so that
/// environment overrides can fill the gaps
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    identity_file: Option<String>,
    connect_timeout_ms: Option<u64>,
    command_timeout_ms: Option<u64>,
    perf_poll_ms: Option<u64>,
    #[serde(default)]
    cache_ttl: CacheTtlConfig,
    #[serde(default = "default_launch_command")]
    cli_launch_command: String,
}

/// Everything needed to reach one appliance
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// Management address
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password; empty means key or agent authentication
    pub password: SecretString,
    /// Private key passed to `ssh -i`
    pub identity_file: Option<PathBuf>,
    /// Budget for opening the channel and reaching the shell prompt
    pub connect_timeout_ms: u64,
    /// Budget for each PanCLI prompt wait
    pub command_timeout_ms: u64,
    /// Performance poll interval; 0 disables background polling
    pub perf_poll_ms: u64,
    /// Cache lifetimes
    pub cache_ttl: CacheTtlConfig,
    /// Command typed at the shell prompt to start PanCLI
    pub cli_launch_command: String,
}

impl ApplianceConfig {
    /// Creates a config with default timeouts and an empty password
    #[must_use]
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            user: user.into(),
            password: SecretString::from(String::new()),
            identity_file: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            perf_poll_ms: default_perf_poll_ms(),
            cache_ttl: CacheTtlConfig::default(),
            cli_launch_command: default_launch_command(),
        }
    }

    /// Sets the password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Sets the SSH port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the performance poll interval in milliseconds
    #[must_use]
    pub const fn with_perf_poll_ms(mut self, ms: u64) -> Self {
        self.perf_poll_ms = ms;
        self
    }

    /// Checks required fields and ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an empty host or user and
    /// `ConfigError::InvalidValue` for port 0 or a zero timeout.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host"));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::MissingField("user"));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                reason: "must be between 1 and 65535".into(),
            });
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "command_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.cli_launch_command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cli_launch_command",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Returns `true` when a non-empty password is set
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    /// SSH destination for the process transport
    #[must_use]
    pub fn to_ssh_target(&self) -> SshTarget {
        let mut target = SshTarget::new(self.host.clone(), self.user.clone())
            .with_port(self.port)
            .with_connect_timeout(self.connect_timeout());
        if self.has_password() {
            target = target.with_password(self.password.clone());
        }
        if let Some(identity) = &self.identity_file {
            target = target.with_identity_file(identity.clone());
        }
        target
    }

    /// Session timeouts, retry policy and launch command
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_connect_timeout(self.connect_timeout())
            .with_command_timeout(Duration::from_millis(self.command_timeout_ms))
            .with_retry(RetryConfig::default())
            .with_launch_command(self.cli_launch_command.clone())
    }

    /// Connect timeout as a `Duration`
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Poll interval, or `None` when background polling is disabled
    #[must_use]
    pub const fn perf_poll_interval(&self) -> Option<Duration> {
        if self.perf_poll_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.perf_poll_ms))
        }
    }
}

/// Builds an [`ApplianceConfig`] from a settings file and the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for the default location
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for an explicit file; a missing explicit file is an error
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `<config dir>/panbridge/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads the file, applies `V5000_*` overrides and validates
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails [`ApplianceConfig::validate`].
    pub fn load(&self) -> ConfigResult<ApplianceConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with a custom variable lookup
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with<F>(&self, lookup: F) -> ConfigResult<ApplianceConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut file = self.read_file()?;
        apply_overrides(&mut file, lookup)?;
        let config = resolve(file);
        config.validate()?;
        Ok(config)
    }

    fn read_file(&self) -> ConfigResult<ConfigFile> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No settings file, using environment only");
                    return Ok(ConfigFile::default_with_launch());
                }
            },
        };
        parse_file(&path)
    }
}

impl ConfigFile {
    fn default_with_launch() -> Self {
        Self {
            cli_launch_command: default_launch_command(),
            ..Self::default()
        }
    }
}

fn parse_file(path: &Path) -> ConfigResult<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "Loaded settings file");
    Ok(file)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: Option<String>,
) -> ConfigResult<Option<T>> {
    non_empty(value)
        .map(|v| {
            v.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                field,
                reason: format!("'{v}' is not a valid number"),
            })
        })
        .transpose()
}

fn apply_overrides<F>(file: &mut ConfigFile, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = non_empty(lookup("V5000_HOST")) {
        file.host = Some(host);
    }
    if let Some(user) = non_empty(lookup("V5000_USER")) {
        file.user = Some(user);
    }
    // An empty password is a valid override
    if let Some(password) = lookup("V5000_PASSWORD") {
        file.password = Some(password);
    }
    if let Some(identity) = non_empty(lookup("V5000_IDENTITY_FILE")) {
        file.identity_file = Some(identity);
    }
    if let Some(port) = parse_number("port", lookup("V5000_PORT"))? {
        file.port = Some(port);
    }
    if let Some(ms) = parse_number("connect_timeout_ms", lookup("V5000_CONNECT_TIMEOUT_MS"))? {
        file.connect_timeout_ms = Some(ms);
    }
    if let Some(ms) = parse_number("command_timeout_ms", lookup("V5000_COMMAND_TIMEOUT_MS"))? {
        file.command_timeout_ms = Some(ms);
    }
    if let Some(ms) = parse_number("perf_poll_ms", lookup("V5000_PERF_POLL_MS"))? {
        file.perf_poll_ms = Some(ms);
    }
    Ok(())
}

fn resolve(file: ConfigFile) -> ApplianceConfig {
    ApplianceConfig {
        host: file.host.unwrap_or_default(),
        port: file.port.unwrap_or_else(default_port),
        user: file.user.unwrap_or_default(),
        password: SecretString::from(file.password.unwrap_or_default()),
        identity_file: file
            .identity_file
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned())),
        connect_timeout_ms: file
            .connect_timeout_ms
            .unwrap_or_else(default_connect_timeout_ms),
        command_timeout_ms: file
            .command_timeout_ms
            .unwrap_or_else(default_command_timeout_ms),
        perf_poll_ms: file.perf_poll_ms.unwrap_or_else(default_perf_poll_ms),
        cache_ttl: file.cache_ttl,
        cli_launch_command: file.cli_launch_command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ApplianceConfig::new("10.0.0.1", "admin");
        assert_eq!(config.port, 22);
        assert_eq!(config.connect_timeout_ms, 10_000);
        assert_eq!(config.command_timeout_ms, 30_000);
        assert_eq!(config.perf_poll_ms, 300_000);
        assert_eq!(config.cache_ttl, CacheTtlConfig::default());
        assert_eq!(config.cache_ttl.volumes(), Duration::from_secs(120));
        assert_eq!(config.cli_launch_command, "pancli");
        assert!(!config.has_password());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ApplianceConfig::new("", "admin");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("host"))
        ));

        let config = ApplianceConfig::new("h", " ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("user"))
        ));

        let config = ApplianceConfig::new("h", "u").with_port(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "port", .. })
        ));

        let mut config = ApplianceConfig::new("h", "u");
        config.command_timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "command_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_load_file() {
        let file = write_config(
            r#"
host = "v5000.lab"
user = "admin"
password = "secret"
port = 2222
perf_poll_ms = 0

[cache_ttl]
volumes = 5000
"#,
        );
        let config = ConfigLoader::with_path(file.path())
            .load_with(env(&[]))
            .unwrap();
        assert_eq!(config.host, "v5000.lab");
        assert_eq!(config.port, 2222);
        assert_eq!(config.password.expose_secret(), "secret");
        assert_eq!(config.perf_poll_interval(), None);
        assert_eq!(config.cache_ttl.volumes, 5000);
        assert_eq!(config.cache_ttl.pools, 120_000);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("host = \"from-file\"\nuser = \"admin\"\n");
        let config = ConfigLoader::with_path(file.path())
            .load_with(env(&[
                ("V5000_HOST", "from-env"),
                ("V5000_PORT", "2200"),
                ("V5000_PASSWORD", "pw"),
                ("V5000_COMMAND_TIMEOUT_MS", "5000"),
            ]))
            .unwrap();
        assert_eq!(config.host, "from-env");
        assert_eq!(config.user, "admin");
        assert_eq!(config.port, 2200);
        assert!(config.has_password());
        assert_eq!(config.command_timeout_ms, 5000);
    }

    #[test]
    fn test_malformed_override() {
        let file = write_config("host = \"h\"\nuser = \"u\"\n");
        let err = ConfigLoader::with_path(file.path())
            .load_with(env(&[("V5000_PORT", "ssh")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "port", .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::with_path(dir.path().join("absent.toml"))
            .load_with(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("host = ");
        let err = ConfigLoader::with_path(file.path())
            .load_with(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_tilde_identity_file() {
        let file = write_config("host = \"h\"\nuser = \"u\"\nidentity_file = \"~/.ssh/id_ed25519\"\n");
        let config = ConfigLoader::with_path(file.path())
            .load_with(env(&[]))
            .unwrap();
        let identity = config.identity_file.unwrap();
        assert!(!identity.to_string_lossy().starts_with('~'));
        assert!(identity.ends_with(".ssh/id_ed25519"));
    }

    #[test]
    fn test_ssh_target_and_session_config() {
        let config = ApplianceConfig::new("h", "u").with_password("pw").with_port(2222);
        let target = config.to_ssh_target();
        assert_eq!(target.port, 2222);
        assert!(target.password.is_some());

        let session = config.session_config();
        assert_eq!(session.connect_timeout, Duration::from_secs(10));
        assert_eq!(session.launch_command, "pancli");
    }
}
