//! Tracing configuration for keyhandoff
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level for the workspace crates
//! - **Production**: info level
//! - **Environment filter**: `RUST_LOG` overrides the defaults
//! - **Output**: stderr, so stdout carries only the deep link

use std::io;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when `RUST_LOG` is unset
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "hyper_util=warn".to_string(), // connection pool chatter
        "reqwest=info".to_string(),
        "rustls=warn".to_string(),
        if is_dev { "kh_infra=debug" } else { "kh_infra=info" }.to_string(),
    ]
}

/// Register the global subscriber. Call once, before any logging.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;

    Ok(())
}
