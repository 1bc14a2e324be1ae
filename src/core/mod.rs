pub mod catalog;
pub mod pipeline;
pub mod report;
pub mod runner;

pub use crate::domain::model::{ExampleKey, ExampleResult, Selection, Transcript};
pub use crate::domain::ports::{ConfigProvider, Example, RunPipeline, Storage};
pub use crate::utils::error::Result;
