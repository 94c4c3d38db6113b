use crate::config::types::{
    FileConfig, RunConfig, RunConfigBuilder, DEFAULT_FETCH_TIMEOUT, DEFAULT_SINK, DEFAULT_SOURCE,
    DEFAULT_THREAD_COUNT, DEFAULT_USER_AGENT, MAX_THREADS, MIN_THREADS, WIKIPEDIA_HOST,
};
use crate::url::{ensure_scoped, normalize_url};
use crate::{ConfigError, UrlError};
use std::time::Duration;
use url::Url;

/// Resolves defaults and validates every value of a run configuration
pub(crate) fn validate_run_config(builder: RunConfigBuilder) -> Result<RunConfig, ConfigError> {
    let scoping_host = builder
        .scoping_host
        .unwrap_or_else(|| WIKIPEDIA_HOST.to_string());
    validate_host(&scoping_host)?;

    let source = validate_endpoint(
        "source",
        builder.source.as_deref().unwrap_or(DEFAULT_SOURCE),
        &scoping_host,
    )?;
    let mut sink = validate_endpoint(
        "sink",
        builder.sink.as_deref().unwrap_or(DEFAULT_SINK),
        &scoping_host,
    )?;
    // Relative links inherit the source page's scheme, so the sink has to
    // share it to ever be discovered.
    if sink.scheme() != source.scheme() && sink.set_scheme(source.scheme()).is_err() {
        return Err(ConfigError::InvalidUrl(format!(
            "sink '{}' cannot use the source's {} scheme",
            sink,
            source.scheme()
        )));
    }

    let thread_count = builder.thread_count.unwrap_or(DEFAULT_THREAD_COUNT);
    validate_thread_count(thread_count)?;

    let fetch_timeout = builder.fetch_timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT);
    validate_timeout("fetch timeout", fetch_timeout)?;

    if let Some(run_timeout) = builder.run_timeout {
        validate_timeout("run timeout", run_timeout)?;
    }

    let user_agent = builder
        .user_agent
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(RunConfig {
        source,
        sink,
        thread_count,
        scoping_host,
        fetch_timeout,
        run_timeout: builder.run_timeout,
        user_agent,
    })
}

/// Validates the value ranges of a configuration file
///
/// URLs are only checked for syntax here; scope is checked once the final
/// scoping host is known.
pub(crate) fn validate_file_config(config: &FileConfig) -> Result<(), ConfigError> {
    if let Some(count) = config.search.concurrency {
        validate_thread_count(count)?;
    }

    for (label, value) in [
        ("source", &config.search.source),
        ("sink", &config.search.sink),
    ] {
        if let Some(raw) = value {
            normalize_url(raw)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, raw, e)))?;
        }
    }

    if let Some(host) = &config.search.scoping_host {
        validate_host(host)?;
    }

    if config.search.run_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "run-timeout-secs must be > 0".to_string(),
        ));
    }

    if config.http.fetch_timeout_ms == Some(0) {
        return Err(ConfigError::Validation(
            "fetch-timeout-ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Parses a source or sink URL and checks it lives on the scoping host
fn validate_endpoint(label: &str, raw: &str, scoping_host: &str) -> Result<Url, ConfigError> {
    let url = normalize_url(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, raw, e)))?;

    // Endpoints must be nodes the extractor can produce.
    ensure_scoped(&url, scoping_host).map_err(|e| match e {
        UrlError::OutOfScope { .. } => ConfigError::HostMismatch {
            url: raw.to_string(),
            expected: scoping_host.to_string(),
        },
        other => ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, raw, other)),
    })?;

    Ok(url)
}

fn validate_thread_count(count: usize) -> Result<(), ConfigError> {
    if !(MIN_THREADS..=MAX_THREADS).contains(&count) {
        return Err(ConfigError::ThreadCount {
            got: count,
            min: MIN_THREADS,
            max: MAX_THREADS,
        });
    }
    Ok(())
}

fn validate_timeout(label: &str, timeout: Duration) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::Validation(format!("{} must be > 0", label)));
    }
    Ok(())
}

/// Validates a bare host name (no scheme, port or path)
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::Validation(
            "scoping host cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "scoping host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err(ConfigError::Validation(format!(
            "scoping host '{}' is not a valid host name",
            host
        )));
    }

    Ok(())
}
