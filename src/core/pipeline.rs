use crate::core::catalog::Catalog;
use crate::core::report::{zip_artifacts, RunReport};
use crate::core::{ConfigProvider, RunPipeline, Storage};
use crate::domain::model::{ExampleKey, ExampleOutcome, ExampleResult, Transcript};
use crate::utils::error::{PatternError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// 從目錄挑選範例、執行、輸出結果
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    catalog: Catalog,
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_catalog(Catalog::standard(), storage, config)
    }

    pub fn with_catalog(catalog: Catalog, storage: S, config: C) -> Self {
        Self {
            catalog,
            storage,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn run_one(&self, key: &ExampleKey) -> Result<ExampleResult> {
        let example = self.catalog.get(&key.id, key.variant)?;
        let mut transcript = Transcript::new();
        let started = Instant::now();

        // 範例 panic 也只記為失敗，不中斷整批執行
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| example.run(&mut transcript))) {
            Ok(Ok(())) => ExampleOutcome::Completed,
            Ok(Err(e)) => {
                tracing::warn!("Example {} failed: {}", key, e);
                ExampleOutcome::Failed(e.to_string())
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "example panicked".to_string());
                tracing::error!("Example {} panicked: {}", key, message);
                ExampleOutcome::Failed(format!("panic: {}", message))
            }
        };

        Ok(ExampleResult {
            id: example.id().to_string(),
            title: example.title().to_string(),
            category: example.category(),
            variant: example.variant(),
            outcome,
            transcript,
            duration: started.elapsed(),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> RunPipeline for CatalogPipeline<S, C> {
    async fn select(&self) -> Result<Vec<ExampleKey>> {
        let selection = self.config.selection();
        tracing::debug!("Selecting examples with {:?}", selection);

        let keys: Vec<ExampleKey> = self
            .catalog
            .select(&selection)?
            .into_iter()
            .map(|e| e.key())
            .collect();

        if keys.is_empty() {
            return Err(PatternError::ValidationError {
                message: "No examples match the selection".to_string(),
            });
        }
        Ok(keys)
    }

    async fn execute(&self, keys: Vec<ExampleKey>) -> Result<RunReport> {
        let mut results = Vec::with_capacity(keys.len());

        for key in &keys {
            tracing::info!("Running {}", key);
            let result = self.run_one(key)?;
            tracing::debug!(
                "{} finished in {:?} ({} lines)",
                key,
                result.duration,
                result.transcript.len()
            );
            results.push(result);
        }

        Ok(RunReport::new(results))
    }

    async fn publish(&self, report: &RunReport) -> Result<String> {
        let artifacts = report.artifacts(self.config.output_formats())?;

        if self.config.compression_enabled() {
            let archive_name = self.config.archive_name();
            let zip_data = zip_artifacts(&artifacts)?;

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive_name));
        }

        for artifact in &artifacts {
            self.storage.write_file(&artifact.name, &artifact.data).await?;
        }
        tracing::debug!("Wrote {} files to storage", artifacts.len());
        Ok(self.config.output_path().to_string())
    }
}
