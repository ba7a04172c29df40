use crate::utils::error::{LabelerError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LabelerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LabelerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sources.easylist", "https://easylist.to/easylist/easylist.txt").is_ok());
        assert!(validate_url("sources.easylist", "http://localhost:8080/list.txt").is_ok());
        assert!(validate_url("sources.easylist", "").is_err());
        assert!(validate_url("sources.easylist", "invalid-url").is_err());
        assert!(validate_url("sources.easylist", "ftp://example.com/list.txt").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("cache.dir", "data/tracker_lists").is_ok());
        assert!(validate_path("cache.dir", "  ").is_err());
        assert!(validate_path("cache.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("fetch.retry_attempts", 3, 1).is_ok());
        assert!(validate_positive_number("fetch.retry_attempts", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("fetch.timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("fetch.timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("fetch.timeout_seconds", 601u64, 1, 600).is_err());
    }
}
