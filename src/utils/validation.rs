use crate::app::http::HEALTH_ROUTE;
use crate::utils::error::{ProvisionError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ProvisionError {
    ProvisionError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// `${VAR}` 沒有被環境變數替換時會原樣留下，這裡擋掉
pub fn validate_no_placeholder(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(invalid(
            field_name,
            "<redacted>",
            "Unresolved ${...} placeholder, is the environment variable set?",
        ));
    }
    Ok(())
}

/// 路徑要能直接交給 axum：以 `/` 開頭、不含 `:`/`*` 參數、不能蓋掉 `/healthz`
pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(invalid(field_name, path, "Route path must start with '/'"));
    }
    if path.contains(':') || path.contains('*') {
        return Err(invalid(
            field_name,
            path,
            "Route path cannot contain ':' or '*' captures",
        ));
    }
    if path.trim_end_matches('/') == HEALTH_ROUTE {
        return Err(invalid(
            field_name,
            path,
            format!("{} is reserved for the health check", HEALTH_ROUTE),
        ));
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
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("pterodactyl.domain", "https://panel.example.com").is_ok());
        assert!(validate_url("pterodactyl.domain", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("pterodactyl.domain", "").is_err());
        assert!(validate_url("pterodactyl.domain", "panel.example.com").is_err());
        assert!(validate_url("pterodactyl.domain", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("server.egg_id", 15, 1).is_ok());
        assert!(validate_positive_number("server.egg_id", 0, 1).is_err());
    }

    #[test]
    fn test_validate_no_placeholder_hides_value() {
        let err = validate_no_placeholder("pterodactyl.api_key", "${PTERO_KEY}").unwrap_err();
        match err {
            ProvisionError::InvalidConfigValueError { value, .. } => {
                assert_eq!(value, "<redacted>")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(validate_no_placeholder("pterodactyl.api_key", "ptla_abc").is_ok());
    }

    #[test]
    fn test_validate_range_and_paths() {
        assert!(validate_range("pterodactyl.request_timeout_seconds", 20, 1, 300).is_ok());
        assert!(validate_range("pterodactyl.request_timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_route_path("http.path", "/api/create").is_ok());
        assert!(validate_route_path("http.path", "api/create").is_err());
    }

    #[test]
    fn test_validate_route_path_rejects_router_conflicts() {
        assert!(validate_route_path("http.path", "/healthz").is_err());
        assert!(validate_route_path("http.path", "/healthz/").is_err());
        assert!(validate_route_path("http.path", "/api/:kind").is_err());
        assert!(validate_route_path("http.path", "/api/*rest").is_err());
        assert!(validate_route_path("http.path", "/healthz-panel").is_ok());
    }
}
