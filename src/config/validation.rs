use crate::config::types::{Config, CrawlConfig, ExtractConfig, SplitConfig, UrlConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawl_config(&config.crawl)?;
    validate_extract_config(&config.extract)?;
    validate_url_config(&config.url)?;
    validate_split_config(&config.split)?;
    Ok(())
}

/// Validates a split level; anything outside 1-6 is rejected, never clamped
pub fn validate_max_level(level: u8) -> ConfigResult<()> {
    if !(1..=6).contains(&level) {
        return Err(ConfigError::Validation(format!(
            "max_level must be between 1 and 6, got {}",
            level
        )));
    }
    Ok(())
}

/// Parses the crawl start URL; only absolute http(s) URLs with a host are accepted
pub fn validate_start_url(start: &str) -> ConfigResult<Url> {
    let url = Url::parse(start)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            start
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start
        )));
    }

    Ok(url)
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> ConfigResult<()> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawl output_dir cannot be empty".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    validate_non_empty_entries("skip_path_keywords", &config.skip_path_keywords)?;

    for ext in &config.skip_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "skip_extensions entries must look like '.pdf', got '{}'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates extraction heuristics
fn validate_extract_config(config: &ExtractConfig) -> ConfigResult<()> {
    validate_non_empty_entries("noise_keywords", &config.noise_keywords)?;

    for tag in &config.noise_tags {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "noise_tags entries must be plain tag names, got '{}'",
                tag
            )));
        }
    }

    Ok(())
}

/// Validates URL normalization settings
fn validate_url_config(config: &UrlConfig) -> ConfigResult<()> {
    validate_non_empty_entries("tracking_params", &config.tracking_params)
}

/// Validates split configuration
fn validate_split_config(config: &SplitConfig) -> ConfigResult<()> {
    validate_max_level(config.max_level)?;

    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "split output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_non_empty_entries(field: &str, entries: &[String]) -> ConfigResult<()> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain empty entries",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_max_level() {
        for level in 1..=6 {
            assert!(validate_max_level(level).is_ok());
        }
        assert!(validate_max_level(0).is_err());
        assert!(validate_max_level(7).is_err());
    }

    #[test]
    fn test_validate_start_url() {
        assert!(validate_start_url("https://example.com/docs").is_ok());
        assert!(validate_start_url("http://127.0.0.1:8080/").is_ok());

        assert!(validate_start_url("").is_err());
        assert!(validate_start_url("example.com").is_err());
        assert!(validate_start_url("ftp://example.com/file").is_err());
        assert!(validate_start_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default();
        config.crawl.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_skip_extensions() {
        let mut config = Config::default();
        config.crawl.skip_extensions = vec!["pdf".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_noise_tags() {
        let mut config = Config::default();
        config.extract.noise_tags = vec!["div.ad".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_keyword() {
        let mut config = Config::default();
        config.extract.noise_keywords.push("  ".to_string());
        assert!(validate(&config).is_err());
    }
}
