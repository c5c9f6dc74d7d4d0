use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub session: SessionTimingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the product backend, e.g. "https://api.prepcall.app"
    pub base_url: String,

    /// Bearer token for backend calls, if the deployment requires one
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct TransportConfig {
    /// Realtime voice vendor endpoint the transport bridge dials
    pub ws_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AudioConfig {
    /// Directory for per-call WAV captures; disabled when unset
    pub capture_dir: Option<String>,
}

/// Session timing thresholds, all in milliseconds.
///
/// Overridable from the environment, e.g.
/// `PREPCALL_SESSION__MIN_INTERVIEW_MS=45000`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTimingConfig {
    /// Interviews shorter than this count as interrupted (default 30000)
    #[serde(default = "default_min_interview_ms")]
    pub min_interview_ms: u64,

    /// Interruptions shorter than this also get the credit back (default 15000)
    #[serde(default = "default_credit_restore_grace_ms")]
    pub credit_restore_grace_ms: u64,

    /// Pause between call end and outcome bookkeeping, letting transport
    /// teardown drain (default 4000)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            min_interview_ms: default_min_interview_ms(),
            credit_restore_grace_ms: default_credit_restore_grace_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_min_interview_ms() -> u64 {
    30_000
}

fn default_credit_restore_grace_ms() -> u64 {
    15_000
}

fn default_settle_delay_ms() -> u64 {
    4_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("PREPCALL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
