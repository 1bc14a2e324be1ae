use crate::utils::error::{PatternError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PatternError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PatternError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(PatternError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(PatternError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// 檢查每個值都在允許清單內
pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(PatternError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
            });
        }
    }
    Ok(())
}

/// 同一個值不能出現兩次
pub fn validate_unique(field_name: &str, values: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(PatternError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: "Duplicate value".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PatternError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PatternError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(PatternError::ValidationError {
            message: format!("{} must be non-negative, got {}", field_name, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("archive", "patterns.zip", &["zip"]).is_ok());
        assert!(validate_file_extension("archive", "patterns.tar", &["zip"]).is_err());
        assert!(validate_file_extension("archive", "patterns", &["zip"]).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        let formats = vec!["txt".to_string(), "json".to_string()];
        assert!(validate_one_of("formats", &formats, &["txt", "json", "csv"]).is_ok());

        let invalid = vec!["xml".to_string()];
        assert!(validate_one_of("formats", &invalid, &["txt", "json", "csv"]).is_err());
    }

    #[test]
    fn test_validate_unique() {
        let formats = vec!["txt".to_string(), "json".to_string()];
        assert!(validate_unique("formats", &formats).is_ok());

        let duplicated = vec!["json".to_string(), "csv".to_string(), "json".to_string()];
        let err = validate_unique("formats", &duplicated).unwrap_err();
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("amount", 0.0).is_ok());
        assert!(validate_non_negative("amount", -1.0).is_err());
        assert!(validate_non_negative("amount", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<u32> = None;
        assert_eq!(*validate_required_field("cpu", &present).unwrap(), 3);
        assert!(validate_required_field("cpu", &missing).is_err());
    }
}
