//! # Configuration Loader / 配置加载器
//!
//! Reads an optional TOML file with `[relay]` and `[polling]` tables. Missing
//! tables and keys keep their defaults; unreadable files and invalid TOML are
//! errors with context.
//! 缺失的表和键保留默认值；无法读取的文件和无效的 TOML 会带上下文报错。

use std::path::Path;

use anyhow::Context;
use kh_core::config::KeyHandoffConfig;
use tracing::debug;

pub fn load_config(config_path: &Path) -> anyhow::Result<KeyHandoffConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    debug!(path = %config_path.display(), api_url = %config.relay.api_url, "config loaded");
    Ok(config)
}

pub fn parse_config(content: &str) -> anyhow::Result<KeyHandoffConfig> {
    toml::from_str(content).context("Failed to parse config as TOML")
}
