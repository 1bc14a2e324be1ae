pub mod config;
pub mod core;
pub mod domain;
pub mod patterns;
pub mod solid;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::CatalogConfig};

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, VariantChoice};

pub use core::{
    catalog::Catalog,
    pipeline::CatalogPipeline,
    report::RunReport,
    runner::{ExampleRunner, RunOutput},
};
pub use domain::model::{Category, Selection, Transcript, Variant};
pub use utils::error::{PatternError, Result};
