//! Telemetry configuration loaded from `data/config/telemetry.toml` with env
//! overrides.

use anyhow::Result;
use serde::Deserialize;

use crate::loader;

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryCfg {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
    /// Prometheus listener, e.g. 127.0.0.1:9100. None disables the exporter.
    pub metrics_addr: Option<String>,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            json_logs: Some(false),
            metrics_addr: None,
        }
    }
}

pub fn load_default() -> Result<TelemetryCfg> {
    let rel = std::path::Path::new("config/telemetry.toml");
    let mut cfg = if loader::data_root().join(rel).is_file() {
        loader::load_toml::<TelemetryCfg>(rel)?
    } else {
        TelemetryCfg::default()
    };
    if let Ok(lvl) = std::env::var("LOG_LEVEL") {
        cfg.log_level = Some(lvl);
    }
    if let Ok(addr) = std::env::var("METRICS_ADDR") {
        cfg.metrics_addr = Some(addr);
    }
    if let Some(json) = std::env::var("JSON_LOGS").ok().and_then(|v| v.parse().ok()) {
        cfg.json_logs = Some(json);
    }
    Ok(cfg)
}
