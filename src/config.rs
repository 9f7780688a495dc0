use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct McControlConfig {
    pub workload: WorkloadConfig,
    pub probe: ProbeConfig,
    pub toggle: ToggleConfig,
    pub server: ServerConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkloadConfig {
    /// Container name of the managed workload; also probed as a DNS name
    #[serde(default = "default_workload_name")]
    pub name: String,

    /// TCP port the workload serves on
    #[serde(default = "default_service_port")]
    pub service_port: u16,

    /// Docker network whose address is preferred when looking up the container IP
    #[serde(default)]
    pub preferred_network: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProbeConfig {
    /// Per-attempt connect timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,

    /// Host tried last, for services published straight to the host
    #[serde(default = "default_loopback_host")]
    pub loopback_host: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettleMode {
    /// Sleep once, then re-read the status
    Fixed,
    /// Re-read with backoff until the status settles or the deadline passes
    Poll,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToggleConfig {
    /// Delay before re-reading the status in fixed mode
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_settle_mode")]
    pub settle_mode: SettleMode,

    /// First poll interval in poll mode
    #[serde(default = "default_poll_initial_ms")]
    pub poll_initial_ms: u64,

    /// Upper bound for the doubling poll interval
    #[serde(default = "default_poll_max_interval_ms")]
    pub poll_max_interval_ms: u64,

    /// Give up polling after this long and report the last observed status
    #[serde(default = "default_poll_deadline_ms")]
    pub poll_deadline_ms: u64,

    /// Serialise concurrent toggles through a single-flight lock
    #[serde(default)]
    pub serialize: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind to
    #[serde(default = "default_server_ip")]
    pub ip: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Directory holding index.html and other dashboard assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Where the legacy toggle endpoint sends the browser afterwards
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuntimeConfig {
    /// Timeout applied to every Docker API request
    #[serde(default = "default_runtime_timeout_secs")]
    pub timeout_secs: u64,

    /// Grace period Docker gives the workload on stop before killing it
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: i64,
}

impl McControlConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("mccontrol.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("workload.name", default_workload_name())?
            .set_default("workload.service_port", default_service_port())?
            .set_default("probe.timeout_ms", default_probe_timeout_ms())?
            .set_default("probe.loopback_host", default_loopback_host())?
            .set_default("toggle.settle_delay_ms", default_settle_delay_ms())?
            .set_default("toggle.settle_mode", "fixed")?
            .set_default("toggle.poll_initial_ms", default_poll_initial_ms())?
            .set_default("toggle.poll_max_interval_ms", default_poll_max_interval_ms())?
            .set_default("toggle.poll_deadline_ms", default_poll_deadline_ms())?
            .set_default("toggle.serialize", false)?
            .set_default("server.ip", default_server_ip())?
            .set_default("server.port", default_server_port())?
            .set_default("server.static_dir", default_static_dir())?
            .set_default("server.redirect_url", default_redirect_url())?
            .set_default("runtime.timeout_secs", default_runtime_timeout_secs())?
            .set_default("runtime.stop_timeout_secs", default_stop_timeout_secs())?
            .add_source(File::with_name(&path_str).required(false))
            // MCCONTROL_SERVER__PORT=9000 style overrides
            .add_source(
                Environment::with_prefix("MCCONTROL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: McControlConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workload.name.trim().is_empty() {
            return Err(ConfigError::Message(
                "Workload name must not be empty".to_string(),
            ));
        }

        if self.workload.service_port == 0 {
            return Err(ConfigError::Message(
                "Workload service_port must be greater than 0".to_string(),
            ));
        }

        if self.probe.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Probe timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.runtime.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Runtime timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.runtime.stop_timeout_secs < 0 {
            return Err(ConfigError::Message(
                "Runtime stop_timeout_secs must not be negative".to_string(),
            ));
        }

        // Docker holds the stop request open for the whole grace period
        if self.runtime.timeout_secs <= self.runtime.stop_timeout_secs as u64 {
            return Err(ConfigError::Message(format!(
                "Runtime timeout_secs ({}) must exceed stop_timeout_secs ({})",
                self.runtime.timeout_secs, self.runtime.stop_timeout_secs
            )));
        }

        if self.toggle.settle_mode == SettleMode::Poll {
            if self.toggle.poll_initial_ms == 0 {
                return Err(ConfigError::Message(
                    "Toggle poll_initial_ms must be greater than 0 in poll mode".to_string(),
                ));
            }
            if self.toggle.poll_deadline_ms < self.toggle.poll_initial_ms {
                return Err(ConfigError::Message(
                    "Toggle poll_deadline_ms must not be shorter than poll_initial_ms".to_string(),
                ));
            }
        }

        let url = self.server.redirect_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Message(
                "Server redirect_url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "Server redirect_url must be an http(s) URL, got '{}'",
                url
            )));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.ip, self.server.port)
    }
}

impl Default for McControlConfig {
    fn default() -> Self {
        Self {
            workload: WorkloadConfig {
                name: default_workload_name(),
                service_port: default_service_port(),
                preferred_network: None,
            },
            probe: ProbeConfig {
                timeout_ms: default_probe_timeout_ms(),
                loopback_host: default_loopback_host(),
            },
            toggle: ToggleConfig {
                settle_delay_ms: default_settle_delay_ms(),
                settle_mode: default_settle_mode(),
                poll_initial_ms: default_poll_initial_ms(),
                poll_max_interval_ms: default_poll_max_interval_ms(),
                poll_deadline_ms: default_poll_deadline_ms(),
                serialize: false,
            },
            server: ServerConfig {
                ip: default_server_ip(),
                port: default_server_port(),
                static_dir: default_static_dir(),
                redirect_url: default_redirect_url(),
            },
            runtime: RuntimeConfig {
                timeout_secs: default_runtime_timeout_secs(),
                stop_timeout_secs: default_stop_timeout_secs(),
            },
        }
    }
}

// Default value functions
fn default_workload_name() -> String {
    "minecraft".to_string()
}
fn default_service_port() -> u16 {
    25565
}

fn default_probe_timeout_ms() -> u64 {
    1000
}
fn default_loopback_host() -> String {
    "127.0.0.1".to_string()
}

fn default_settle_delay_ms() -> u64 {
    600
}
fn default_settle_mode() -> SettleMode {
    SettleMode::Fixed
}
fn default_poll_initial_ms() -> u64 {
    100
}
fn default_poll_max_interval_ms() -> u64 {
    800
}
fn default_poll_deadline_ms() -> u64 {
    5000
}

fn default_server_ip() -> String {
    "0.0.0.0".to_string()
}
fn default_server_port() -> u16 {
    8000
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_redirect_url() -> String {
    "https://dash.hamishburke.dev".to_string()
}

fn default_runtime_timeout_secs() -> u64 {
    60
}
fn default_stop_timeout_secs() -> i64 {
    10
}
