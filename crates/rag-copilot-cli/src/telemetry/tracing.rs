//! Tracing initialization and configuration.

use anyhow::Context;
use rag_copilot_server::config::LogLevel;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for structured logging.
///
/// # Configuration
///
/// The filter comes from the `RUST_LOG` environment variable when it is set,
/// otherwise from the `LOG_LEVEL` setting. `LOG_FORMAT=json` writes JSON
/// lines, any other format writes human-readable output.
///
/// # Examples
///
/// ```bash
/// LOG_LEVEL=debug rag-copilot
/// RUST_LOG=rag_copilot_server=trace,tower_http=debug rag-copilot
/// ```
///
/// # Errors
///
/// Returns an error if `RUST_LOG` cannot be parsed or the tracing subscriber
/// fails to initialize.
pub(super) fn init_tracing(level: LogLevel, json: bool) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = create_env_filter(rust_log.as_deref(), level)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry.with(create_json_layer()).try_init()
    } else {
        registry.with(create_fmt_layer()).try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

/// Creates an environment filter for tracing.
///
/// Non-empty `directives` win over `level`.
fn create_env_filter(directives: Option<&str>, level: LogLevel) -> anyhow::Result<EnvFilter> {
    let builder = EnvFilter::builder().with_default_directive(level.as_level_filter().into());

    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => builder
            .parse(directives)
            .with_context(|| format!("Invalid {} directives '{directives}'", EnvFilter::DEFAULT_ENV)),
        None => Ok(builder.parse_lossy("")),
    }
}

/// Creates a human-readable tracing layer.
fn create_fmt_layer<S>() -> fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
}

/// Creates a JSON lines tracing layer.
fn create_json_layer<S>() -> fmt::Layer<S, fmt::format::JsonFields, fmt::format::Format<fmt::format::Json>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
}
