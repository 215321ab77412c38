//! # Relay Configuration / 中继配置
//!
//! Explicit configuration values handed to a pairing session. Every field has
//! a default, so a missing file or a partial file is never an error.
//! 每个字段都有默认值，缺失或不完整的配置文件不是错误。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.censo.co";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_LINK_SCHEME: &str = "censo-main";
pub const DEFAULT_LINK_VERSION: &str = "v1";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
const DEFAULT_POLL_DEADLINE_SECS: u64 = 10 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid relay url '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

/// Whole configuration file: `[relay]` and `[polling]` tables
/// 完整配置文件：`[relay]` 与 `[polling]` 表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyHandoffConfig {
    pub relay: RelayConfig,
    pub polling: PollingPolicy,
}

/// Where the relay lives and how deep links are labelled
/// 中继地址与深链接标识
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Relay base URL; may carry a path prefix
    pub api_url: String,
    pub api_version: String,
    pub link_scheme: String,
    pub link_version: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            link_scheme: DEFAULT_LINK_SCHEME.to_string(),
            link_version: DEFAULT_LINK_VERSION.to_string(),
        }
    }
}

impl RelayConfig {
    /// Absolute URL of `resource` under `{api_url}/{api_version}/`.
    pub fn endpoint(&self, resource: &str) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            resource.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Poll cadence and the absolute session deadline
/// 轮询间隔与会话截止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingPolicy {
    pub interval_secs: u64,
    pub deadline_secs: u64,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            deadline_secs: DEFAULT_POLL_DEADLINE_SECS,
        }
    }
}

impl PollingPolicy {
    pub fn interval(&self) -> Duration {
        // a zero period would make tokio's interval panic
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}
