use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use md_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Max level: {}", config.split.max_level);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads the configuration file if one was given, otherwise returns defaults
pub fn load_config_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
max-depth = 2
user-agent = "TestHarvester/1.0"
timeout-secs = 5
skip-path-keywords = ["login"]

[extract]
noise-keywords = ["nav", "promo"]

[url]
tracking-params = ["fbclid"]

[split]
max-level = 3
recursive = true
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.max_depth, 2);
        assert_eq!(config.crawl.user_agent, "TestHarvester/1.0");
        assert_eq!(config.crawl.timeout_secs, 5);
        assert_eq!(config.crawl.skip_path_keywords, vec!["login"]);
        assert_eq!(config.extract.noise_keywords, vec!["nav", "promo"]);
        assert_eq!(config.url.tracking_params, vec!["fbclid"]);
        assert_eq!(config.split.max_level, 3);
        assert!(config.split.recursive);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = create_temp_config("[split]\nmax-level = 2\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.split.max_level, 2);
        assert_eq!(config.split.output_dir, "chunks");
        assert_eq!(config.crawl.output_dir, "web_content");
        assert_eq!(config.crawl.timeout_secs, 30);
        assert!(config.extract.noise_tags.contains(&"script".to_string()));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[split]\nmax-level = 9\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.split.max_level, 6);
        assert!(!config.crawl.allow_external);
    }
}
