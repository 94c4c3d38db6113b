use crate::config::types::FileConfig;
use crate::config::validation::validate_file_config;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use wikipaths::config::{load_config, RunConfig};
///
/// let file = load_config(Path::new("wikipaths.toml")).unwrap();
/// let config = RunConfig::builder().with_file_defaults(&file).build().unwrap();
/// println!("Searching with {} workers", config.thread_count);
/// ```
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration file content
pub fn parse_config(content: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig = toml::from_str(content)?;
    validate_file_config(&config)?;
    Ok(config)
}
