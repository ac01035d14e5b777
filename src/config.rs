use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend
    #[serde(default = "default_recommendation_api_url")]
    pub recommendation_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Horizontal drag distance a swipe must exceed to commit
    #[serde(default = "default_commit_threshold")]
    pub commit_threshold: f64,

    /// Length of the fly-off animation before a decision is recorded
    #[serde(default = "default_animation_ms")]
    pub exit_duration_ms: u64,

    /// Length of the return-to-rest animation after a cancelled drag
    #[serde(default = "default_animation_ms")]
    pub snap_back_duration_ms: u64,
}

fn default_recommendation_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_commit_threshold() -> f64 {
    120.0
}

fn default_animation_ms() -> u64 {
    300
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.commit_threshold.is_finite() || self.commit_threshold <= 0.0 {
            anyhow::bail!(
                "COMMIT_THRESHOLD must be a positive number, got {}",
                self.commit_threshold
            );
        }
        Ok(())
    }

    /// Gesture tunables
    pub fn swipe(&self) -> SwipeConfig {
        SwipeConfig {
            commit_threshold: self.commit_threshold,
            exit_duration: Duration::from_millis(self.exit_duration_ms),
            snap_back_duration: Duration::from_millis(self.snap_back_duration_ms),
        }
    }
}

/// Timing and distance constants for swipe gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    pub commit_threshold: f64,
    pub exit_duration: Duration,
    pub snap_back_duration: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            commit_threshold: default_commit_threshold(),
            exit_duration: Duration::from_millis(default_animation_ms()),
            snap_back_duration: Duration::from_millis(default_animation_ms()),
        }
    }
}
