use crate::utils::error::{GariError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GariError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// HTTP 路由路徑必須以 `/` 開頭
pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.starts_with('/') {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route must start with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GariError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 資料表與欄位名稱會被拼進 SQL，只接受 `name` 或 `schema.name` 形式
pub fn validate_sql_identifier(field_name: &str, value: &str) -> Result<()> {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)?$").expect("identifier pattern is valid")
    });

    if !re.is_match(value) {
        return Err(GariError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected an identifier like 'table' or 'schema.table'".to_string(),
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
        return Err(GariError::InvalidConfigValueError {
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
        assert!(validate_url("isoline.base_url", "https://api.geoapify.com/v1/isoline").is_ok());
        assert!(validate_url("isoline.base_url", "http://127.0.0.1:8080/isoline").is_ok());
        assert!(validate_url("isoline.base_url", "").is_err());
        assert!(validate_url("isoline.base_url", "invalid-url").is_err());
        assert!(validate_url("isoline.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("postgis.max_connections", 5, 1).is_ok());
        assert!(validate_positive_number("postgis.max_connections", 0, 1).is_err());
    }

    #[test]
    fn test_validate_sql_identifier() {
        assert!(validate_sql_identifier("postgis.table", "public.jp_gari").is_ok());
        assert!(validate_sql_identifier("duckdb.table", "jp_gari").is_ok());
        assert!(validate_sql_identifier("duckdb.attribute_columns", "2016_prist").is_ok());
        assert!(validate_sql_identifier("postgis.table", "jp_gari; DROP TABLE x").is_err());
        assert!(validate_sql_identifier("postgis.table", "a.b.c").is_err());
        assert!(validate_sql_identifier("postgis.table", "").is_err());
    }

    #[test]
    fn test_validate_route_path() {
        assert!(validate_route_path("server.map_data_path", "/api/jp_gari").is_ok());
        assert!(validate_route_path("server.map_data_path", "api/jp_gari").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<i32> = None;
        assert_eq!(*validate_required_field("postgis", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("postgis", &missing),
            Err(GariError::MissingConfigError { .. })
        ));
    }
}
