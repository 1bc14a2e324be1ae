use crate::core::report::RunReport;
use crate::domain::model::{Category, ExampleKey, Selection, Transcript, Variant};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 目錄中可執行的一個範例 (某原則/模式的 violated 或 followed 版本)
pub trait Example: Send + Sync {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn category(&self) -> Category;
    fn variant(&self) -> Variant;
    fn run(&self, out: &mut Transcript) -> Result<()>;

    fn key(&self) -> ExampleKey {
        ExampleKey::new(self.id(), self.variant())
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn archive_name(&self) -> &str;
    fn compression_enabled(&self) -> bool;
    fn selection(&self) -> Selection;
}

#[async_trait]
pub trait RunPipeline: Send + Sync {
    async fn select(&self) -> Result<Vec<ExampleKey>>;
    async fn execute(&self, keys: Vec<ExampleKey>) -> Result<RunReport>;
    async fn publish(&self, report: &RunReport) -> Result<String>;
}
