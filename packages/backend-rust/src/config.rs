use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use practice_algo::SelectorWeights;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Optional JSON item bank replacing the built-in sample set
    pub items_path: Option<PathBuf>,
    pub selector_weights: SelectorWeights,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let items_path = std::env::var("ITEMS_PATH").ok().map(PathBuf::from);

        Self {
            host,
            port,
            log_level,
            items_path,
            selector_weights: selector_weights_from_env(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_weight(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.parse::<f64>().ok())
}

/// Selector weights from `SELECTOR_*_WEIGHT` env vars. An incomplete or
/// invalid set falls back to the equal-weight default rather than
/// refusing to start.
fn selector_weights_from_env() -> SelectorWeights {
    let defaults = SelectorWeights::default();
    let weights = SelectorWeights {
        urgency_weight: env_weight("SELECTOR_URGENCY_WEIGHT").unwrap_or(defaults.urgency_weight),
        mastery_weight: env_weight("SELECTOR_MASTERY_WEIGHT").unwrap_or(defaults.mastery_weight),
        difficulty_weight: env_weight("SELECTOR_DIFFICULTY_WEIGHT")
            .unwrap_or(defaults.difficulty_weight),
        exploration_weight: env_weight("SELECTOR_EXPLORATION_WEIGHT")
            .unwrap_or(defaults.exploration_weight),
    };

    match weights.validate() {
        Ok(()) => weights,
        Err(err) => {
            tracing::warn!(error = %err, "invalid selector weights in env, using defaults");
            defaults
        }
    }
}
