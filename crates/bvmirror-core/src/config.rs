use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Market tree of the archive (top-level path family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    Spot,
    FuturesUm,
    FuturesCm,
    Option,
}

/// Aggregation period of the archived files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggPeriod {
    Daily,
    Monthly,
}

/// Retry/backoff parameters for listing fetches (optional section in config.toml).
///
/// Daemon calls carry no retry of their own; per-job failures are bookkept
/// by the driver instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRetryConfig {
    /// Maximum number of attempts per listing request (including the first).
    pub max_attempts: u32,
    /// Linear backoff factor in seconds: sleep = factor * attempt.
    pub backoff_factor_secs: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            backoff_factor_secs: 1.0,
            timeout_secs: 5,
        }
    }
}

/// Global configuration loaded from `~/.config/bvmirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Bucket listing endpoint (queried with `?delimiter=/&prefix=`).
    pub listing_endpoint: String,
    /// Base URL prepended to object keys to form download URLs.
    pub download_base_url: String,
    /// Base URL of the download daemon's HTTP API.
    pub daemon_url: String,
    /// Directory the daemon saves into; destination dirs are joined onto it.
    pub daemon_download_root: String,
    /// Local mirror root used to compute the already-synced file set.
    pub data_dir: PathBuf,

    /// Which market tree to mirror.
    pub symbol_type: SymbolType,
    /// Daily or monthly archive files.
    pub agg_period: AggPeriod,
    /// Candle frequency for kline-style data types (extra path segment).
    pub frequency: String,
    /// Data types to mirror (e.g. "klines", "aggTrades", "trades").
    /// Empty = discover every data type present under the catalog root.
    #[serde(default)]
    pub data_types: Vec<String>,

    /// Exact trading-pair allow-list; None = all pairs.
    #[serde(default)]
    pub trading_pairs: Option<Vec<String>>,
    /// Pairs to exclude even if otherwise matched.
    #[serde(default)]
    pub skip_pairs: Vec<String>,
    /// Keep only symbols ending with one of these suffixes (e.g. "USDT").
    #[serde(default)]
    pub key_words: Option<Vec<String>>,
    /// Inclusive date bounds, "YYYY-MM" or "YYYY-MM-DD"; None = open.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Exclude leveraged-token and stablecoin-quoted pairs from spot runs.
    pub spot_filter: bool,
    /// Skip files already present under `data_dir`.
    pub skip_existed: bool,
    /// Drop `.CHECKSUM` companion files from the plan.
    pub skip_checksum: bool,

    /// Concurrency ceiling for daemon-side tasks (sole backpressure knob).
    pub max_concurrent_tasks: usize,
    /// Poll interval of the driver loop in milliseconds.
    pub poll_interval_ms: u64,
    /// Optional listing retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch_retry: Option<FetchRetryConfig>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            listing_endpoint: "https://s3-ap-northeast-1.amazonaws.com/data.binance.vision"
                .to_string(),
            download_base_url: "https://data.binance.vision/".to_string(),
            daemon_url: "http://127.0.0.1:9999/".to_string(),
            daemon_download_root: "/app/Downloads/".to_string(),
            data_dir: PathBuf::from("data"),
            symbol_type: SymbolType::Spot,
            agg_period: AggPeriod::Monthly,
            frequency: "1m".to_string(),
            data_types: vec!["aggTrades".to_string()],
            trading_pairs: None,
            skip_pairs: Vec::new(),
            key_words: None,
            start_date: None,
            end_date: None,
            spot_filter: true,
            skip_existed: true,
            skip_checksum: false,
            max_concurrent_tasks: 8,
            poll_interval_ms: 1000,
            fetch_retry: None,
        }
    }
}

impl MirrorConfig {
    /// Effective listing retry policy (configured or defaults).
    pub fn fetch_retry(&self) -> FetchRetryConfig {
        self.fetch_retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bvmirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MirrorConfig::default();
        assert_eq!(cfg.symbol_type, SymbolType::Spot);
        assert_eq!(cfg.agg_period, AggPeriod::Monthly);
        assert_eq!(cfg.max_concurrent_tasks, 8);
        assert_eq!(cfg.poll_interval_ms, 1000);
        assert!(cfg.spot_filter);
        assert!(cfg.skip_existed);
        assert!(!cfg.skip_checksum);
        assert!(cfg.fetch_retry.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MirrorConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.symbol_type, cfg.symbol_type);
        assert_eq!(parsed.data_types, cfg.data_types);
        assert_eq!(parsed.max_concurrent_tasks, cfg.max_concurrent_tasks);
        assert_eq!(parsed.daemon_url, cfg.daemon_url);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            listing_endpoint = "https://listing.example.com/bucket"
            download_base_url = "https://files.example.com/"
            daemon_url = "http://127.0.0.1:9999/"
            daemon_download_root = "/downloads/"
            data_dir = "/srv/mirror"
            symbol_type = "futures_um"
            agg_period = "daily"
            frequency = "15m"
            data_types = ["klines", "trades"]
            trading_pairs = ["BTCUSDT"]
            start_date = "2023-01"
            end_date = "2023-12"
            spot_filter = false
            skip_existed = true
            skip_checksum = true
            max_concurrent_tasks = 4
            poll_interval_ms = 250
        "#;
        let cfg: MirrorConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.symbol_type, SymbolType::FuturesUm);
        assert_eq!(cfg.agg_period, AggPeriod::Daily);
        assert_eq!(cfg.data_types, vec!["klines", "trades"]);
        assert_eq!(cfg.trading_pairs.as_deref(), Some(&["BTCUSDT".to_string()][..]));
        assert_eq!(cfg.start_date.as_deref(), Some("2023-01"));
        assert_eq!(cfg.max_concurrent_tasks, 4);
        assert!(!cfg.spot_filter);
        assert!(cfg.skip_checksum);
    }

    #[test]
    fn config_toml_fetch_retry_section() {
        let toml = r#"
            listing_endpoint = "https://listing.example.com/bucket"
            download_base_url = "https://files.example.com/"
            daemon_url = "http://127.0.0.1:9999/"
            daemon_download_root = "/downloads/"
            data_dir = "data"
            symbol_type = "spot"
            agg_period = "monthly"
            frequency = "1m"
            spot_filter = true
            skip_existed = true
            skip_checksum = false
            max_concurrent_tasks = 8
            poll_interval_ms = 1000

            [fetch_retry]
            max_attempts = 3
            backoff_factor_secs = 0.5
            timeout_secs = 10
        "#;
        let cfg: MirrorConfig = toml::from_str(toml).unwrap();
        let retry = cfg.fetch_retry();
        assert_eq!(retry.max_attempts, 3);
        assert!((retry.backoff_factor_secs - 0.5).abs() < 1e-9);
        assert_eq!(retry.timeout_secs, 10);
    }
}
