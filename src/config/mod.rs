pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command, VariantChoice};

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{CatalogConfig, CompressionConfig};
    use crate::core::report::SUPPORTED_FORMATS;
    use crate::core::ConfigProvider;
    use crate::domain::model::{Category, Selection, Variant};
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_file_extension, validate_non_empty_string, validate_one_of, validate_path,
        validate_unique, Validate,
    };
    use clap::{Parser, Subcommand, ValueEnum};
    use std::sync::OnceLock;

    pub const DEFAULT_OUTPUT_PATH: &str = "./output";
    pub const DEFAULT_ARCHIVE_NAME: &str = "patterns.zip";

    fn default_formats() -> &'static [String] {
        static FORMATS: OnceLock<Vec<String>> = OnceLock::new();
        FORMATS.get_or_init(|| SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect())
    }

    /// 全域參數未指定時為 None，方便與 TOML 設定合併
    #[derive(Debug, Clone, Parser)]
    #[command(name = "lld-patterns")]
    #[command(about = "Run SOLID principle and design pattern examples")]
    pub struct CliConfig {
        #[command(subcommand)]
        pub command: Command,

        #[arg(long, global = true, help = "Load settings from a TOML file")]
        pub config: Option<String>,

        #[arg(long, global = true, help = "Output directory [default: ./output]")]
        pub output_path: Option<String>,

        #[arg(
            long,
            global = true,
            value_delimiter = ',',
            help = "Report formats [default: txt,json,csv]"
        )]
        pub formats: Option<Vec<String>>,

        #[arg(long, global = true, help = "ZIP archive name [default: patterns.zip]")]
        pub archive_name: Option<String>,

        #[arg(long, global = true, help = "Write loose files instead of a ZIP archive")]
        pub no_zip: bool,

        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, global = true, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 把命令列明確指定的值蓋到設定檔上；[run] 只在子命令有縮小範圍時被取代
        pub fn apply_to(&self, mut file_config: CatalogConfig) -> CatalogConfig {
            if self.command.narrows_selection() {
                file_config = file_config.with_selection(self.command.selection());
            }

            if let Some(path) = &self.output_path {
                file_config.output.output_path = path.clone();
            }
            if let Some(formats) = &self.formats {
                file_config.output.formats = formats.clone();
            }

            if self.archive_name.is_some() || self.no_zip {
                let compression = file_config
                    .output
                    .compression
                    .get_or_insert_with(|| CompressionConfig {
                        enabled: true,
                        filename: None,
                    });
                if let Some(name) = &self.archive_name {
                    compression.filename = Some(name.clone());
                }
                if self.no_zip {
                    compression.enabled = false;
                }
            }

            file_config
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
    pub enum Command {
        /// List the available examples
        List {
            #[arg(long)]
            category: Option<Category>,
        },
        /// Run one example
        Run {
            id: String,
            #[arg(long, value_enum, default_value_t = VariantChoice::Both)]
            variant: VariantChoice,
        },
        /// Run every example
        RunAll {
            #[arg(long)]
            category: Option<Category>,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum VariantChoice {
        Violated,
        Followed,
        Both,
    }

    impl VariantChoice {
        pub fn variants(&self) -> Vec<Variant> {
            match self {
                VariantChoice::Violated => vec![Variant::Violated],
                VariantChoice::Followed => vec![Variant::Followed],
                VariantChoice::Both => vec![],
            }
        }
    }

    impl Command {
        /// `run <id>` 或 `run-all --category` 才算有篩選
        pub fn narrows_selection(&self) -> bool {
            match self {
                Command::Run { .. } => true,
                Command::List { category } | Command::RunAll { category } => category.is_some(),
            }
        }

        /// 子命令對應的篩選條件
        pub fn selection(&self) -> Selection {
            match self {
                Command::List { category } | Command::RunAll { category } => Selection {
                    categories: category.iter().copied().collect(),
                    ..Selection::all()
                },
                Command::Run { id, variant } => Selection {
                    ids: vec![id.clone()],
                    categories: vec![],
                    variants: variant.variants(),
                },
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn output_formats(&self) -> &[String] {
            self.formats.as_deref().unwrap_or(default_formats())
        }

        fn archive_name(&self) -> &str {
            self.archive_name.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME)
        }

        fn compression_enabled(&self) -> bool {
            !self.no_zip
        }

        fn selection(&self) -> Selection {
            self.command.selection()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("output_path", self.output_path())?;
            validate_one_of("formats", self.output_formats(), &SUPPORTED_FORMATS)?;
            validate_unique("formats", self.output_formats())?;
            if !self.no_zip {
                validate_file_extension("archive_name", self.archive_name(), &["zip"])?;
            }
            if let Command::Run { id, .. } = &self.command {
                validate_non_empty_string("id", id)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_run_with_variant() {
            let config = CliConfig::try_parse_from([
                "lld-patterns",
                "run",
                "state",
                "--variant",
                "followed",
                "--no-zip",
            ])
            .unwrap();

            assert_eq!(
                config.command,
                Command::Run {
                    id: "state".to_string(),
                    variant: VariantChoice::Followed
                }
            );
            assert!(!config.compression_enabled());
            let selection = config.selection();
            assert_eq!(selection.ids, ["state"]);
            assert_eq!(selection.variants, [Variant::Followed]);
        }

        #[test]
        fn test_parse_run_all_with_global_flags() {
            let config = CliConfig::try_parse_from([
                "lld-patterns",
                "--output-path",
                "/tmp/out",
                "run-all",
                "--category",
                "structural",
                "--formats",
                "json",
            ])
            .unwrap();

            assert_eq!(config.output_path(), "/tmp/out");
            assert_eq!(config.output_formats(), ["json"]);
            assert_eq!(config.selection().categories, [Category::Structural]);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validation_rejects_bad_values() {
            let bad_format =
                CliConfig::try_parse_from(["lld-patterns", "run-all", "--formats", "xml"]).unwrap();
            assert!(bad_format.validate().is_err());

            let bad_archive =
                CliConfig::try_parse_from(["lld-patterns", "run-all", "--archive-name", "out.tar"])
                    .unwrap();
            assert!(bad_archive.validate().is_err());
        }

        #[test]
        fn test_defaults_apply_when_flags_are_omitted() {
            let config = CliConfig::try_parse_from(["lld-patterns", "run-all"]).unwrap();

            assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
            assert_eq!(config.output_formats(), ["txt", "json", "csv"]);
            assert_eq!(config.archive_name(), DEFAULT_ARCHIVE_NAME);
            assert!(config.compression_enabled());
        }

        #[test]
        fn test_duplicate_formats_are_rejected() {
            let config =
                CliConfig::try_parse_from(["lld-patterns", "run", "srp", "--formats", "json,json"])
                    .unwrap();
            assert!(config.validate().is_err());
        }

        const FILE_CONFIG: &str = r#"
[catalog]
name = "from-file"

[run]
ids = ["adapter"]
variants = ["followed"]

[output]
output_path = "./file-output"
formats = ["json"]

[output.compression]
enabled = true
filename = "file.zip"
"#;

        #[test]
        fn test_run_all_keeps_file_selection_and_output() {
            let cli = CliConfig::try_parse_from(["lld-patterns", "run-all"]).unwrap();
            let merged = cli.apply_to(CatalogConfig::from_toml_str(FILE_CONFIG).unwrap());

            assert_eq!(merged.selection().ids, ["adapter"]);
            assert_eq!(merged.selection().variants, [Variant::Followed]);
            assert_eq!(merged.output_path(), "./file-output");
            assert_eq!(merged.output_formats(), ["json"]);
            assert_eq!(merged.archive_name(), "file.zip");
            assert!(merged.compression_enabled());
        }

        #[test]
        fn test_narrowing_subcommand_and_explicit_flags_override_file() {
            let cli = CliConfig::try_parse_from([
                "lld-patterns",
                "--output-path",
                "/tmp/cli-out",
                "--formats",
                "txt,csv",
                "--no-zip",
                "run-all",
                "--category",
                "solid",
            ])
            .unwrap();
            let merged = cli.apply_to(CatalogConfig::from_toml_str(FILE_CONFIG).unwrap());

            let selection = merged.selection();
            assert!(selection.ids.is_empty());
            assert_eq!(selection.categories, [Category::Solid]);
            assert_eq!(merged.output_path(), "/tmp/cli-out");
            assert_eq!(merged.output_formats(), ["txt", "csv"]);
            assert!(!merged.compression_enabled());
            assert_eq!(merged.archive_name(), "file.zip");
        }

        #[test]
        fn test_archive_name_flag_creates_compression_section() {
            let toml = FILE_CONFIG.replace(
                "[output.compression]\nenabled = true\nfilename = \"file.zip\"\n",
                "",
            );
            let file_config = CatalogConfig::from_toml_str(&toml).unwrap();
            assert!(file_config.output.compression.is_none());

            let cli =
                CliConfig::try_parse_from(["lld-patterns", "run", "isp", "--archive-name", "isp.zip"])
                    .unwrap();
            let merged = cli.apply_to(file_config);

            assert_eq!(merged.selection().ids, ["isp"]);
            assert!(merged.selection().variants.is_empty());
            assert_eq!(merged.archive_name(), "isp.zip");
            assert!(merged.compression_enabled());
        }

        #[test]
        fn test_unknown_category_fails_to_parse() {
            assert!(CliConfig::try_parse_from(["lld-patterns", "list", "--category", "gof"]).is_err());
        }
    }
}
