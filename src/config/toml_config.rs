use crate::core::catalog::Catalog;
use crate::core::report::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{Category, Selection, Variant};
use crate::utils::error::{PatternError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_one_of, validate_path, validate_unique,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const DEFAULT_ARCHIVE: &str = "patterns.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub catalog: CatalogSection,
    #[serde(default)]
    pub run: RunSection,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    pub description: Option<String>,
}

/// 要執行哪些範例；空清單代表全部
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSection {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| match Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(e) => unreachable!("env var pattern is a valid regex: {}", e),
    })
}

impl CatalogConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PatternError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PatternError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("catalog.name", &self.catalog.name)?;
        validate_path("output.output_path", &self.output.output_path)?;
        validate_one_of("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;
        validate_unique("output.formats", &self.output.formats)?;

        if self.compression_enabled() {
            validate_file_extension("output.compression.filename", self.archive_name(), &["zip"])?;
        }

        let catalog = Catalog::standard();
        for id in &self.run.ids {
            if !catalog.contains(id) {
                return Err(PatternError::InvalidConfigValueError {
                    field: "run.ids".to_string(),
                    value: id.clone(),
                    reason: format!("Unknown example. Valid ids: {}", catalog.ids().join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 以命令列的篩選條件取代設定檔中的 [run]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.run = RunSection {
            ids: selection.ids,
            categories: selection.categories,
            variants: selection.variants,
        };
        self
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for CatalogConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn archive_name(&self) -> &str {
        self.output
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE)
    }

    fn compression_enabled(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(true)
    }

    fn selection(&self) -> Selection {
        Selection {
            ids: self.run.ids.clone(),
            categories: self.run.categories.clone(),
            variants: self.run.variants.clone(),
        }
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[catalog]
name = "behavioral-only"

[run]
categories = ["behavioral"]
variants = ["followed"]

[output]
output_path = "./test-output"
formats = ["txt", "json"]

[output.compression]
enabled = true
filename = "behavioral.zip"

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = CatalogConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.catalog.name, "behavioral-only");
        assert_eq!(config.archive_name(), "behavioral.zip");
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));

        let selection = config.selection();
        assert_eq!(selection.categories, [Category::Behavioral]);
        assert_eq!(selection.variants, [Variant::Followed]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let toml_content = r#"
[catalog]
name = "all"

[output]
output_path = "./output"
formats = ["csv"]
"#;

        let config = CatalogConfig::from_toml_str(toml_content).unwrap();
        assert!(config.compression_enabled());
        assert_eq!(config.archive_name(), "patterns.zip");
        assert_eq!(config.selection(), Selection::all());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LLD_PATTERNS_TEST_OUTPUT", "/tmp/lld-output");

        let toml_content = r#"
[catalog]
name = "env"

[output]
output_path = "${LLD_PATTERNS_TEST_OUTPUT}"
formats = ["json"]
"#;

        let config = CatalogConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/lld-output");

        std::env::remove_var("LLD_PATTERNS_TEST_OUTPUT");
    }

    #[test]
    fn test_unset_env_var_is_left_untouched() {
        let content = "path = \"${LLD_PATTERNS_SURELY_UNSET_VAR}\"";
        assert_eq!(CatalogConfig::substitute_env_vars(content), content);
    }

    #[test]
    fn test_config_validation() {
        let unknown_id = r#"
[catalog]
name = "bad"

[run]
ids = ["visitor"]

[output]
output_path = "./output"
formats = ["txt"]
"#;
        let config = CatalogConfig::from_toml_str(unknown_id).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PatternError::InvalidConfigValueError { ref field, .. }) if field == "run.ids"
        ));

        let bad_format = unknown_id
            .replace("ids = [\"visitor\"]", "")
            .replace("[\"txt\"]", "[\"xml\"]");
        let config = CatalogConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());

        let duplicate_format = unknown_id
            .replace("ids = [\"visitor\"]", "")
            .replace("[\"txt\"]", "[\"json\", \"json\"]");
        let config = CatalogConfig::from_toml_str(&duplicate_format).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PatternError::InvalidConfigValueError { ref field, .. }) if field == "output.formats"
        ));
    }

    #[test]
    fn test_unknown_category_is_a_parse_error() {
        let toml_content = r#"
[catalog]
name = "bad"

[run]
categories = ["gof"]

[output]
output_path = "./output"
formats = ["txt"]
"#;
        assert!(matches!(
            CatalogConfig::from_toml_str(toml_content),
            Err(PatternError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file_and_cli_override() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[catalog]
name = "file-test"

[run]
ids = ["adapter"]

[output]
output_path = "./output"
formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = CatalogConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.catalog.name, "file-test");
        assert_eq!(config.selection().ids, ["adapter"]);

        let overridden = config.with_selection(Selection {
            ids: vec!["facade".to_string()],
            categories: vec![],
            variants: vec![Variant::Violated],
        });
        assert_eq!(overridden.selection().ids, ["facade"]);
        assert_eq!(overridden.selection().variants, [Variant::Violated]);
    }
}
