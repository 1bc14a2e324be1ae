use crate::core::report::RunReport;
use crate::core::RunPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 一次執行的結果：報告與輸出位置
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: RunReport,
    pub output_path: String,
}

pub struct ExampleRunner<P: RunPipeline> {
    pipeline: P,
    monitor: Option<SystemMonitor>,
}

impl<P: RunPipeline> ExampleRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: None,
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: enabled.then(|| SystemMonitor::new(true)),
        }
    }

    fn log_stats(&self, phase: &str) {
        if let Some(monitor) = &self.monitor {
            monitor.log_stats(phase);
        }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        tracing::info!("Starting example run...");
        self.log_stats("Start");

        // Select
        let keys = self.pipeline.select().await?;
        tracing::info!("Selected {} examples", keys.len());
        self.log_stats("Select");

        // Execute
        let report = self.pipeline.execute(keys).await?;
        tracing::info!(
            "Executed {} examples ({} completed, {} failed)",
            report.total(),
            report.completed(),
            report.failures().len()
        );
        self.log_stats("Execute");

        // Publish
        let output_path = self.pipeline.publish(&report).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.log_stats("Publish");

        if let Some(monitor) = &self.monitor {
            monitor.log_final_stats();
        }

        Ok(RunOutput {
            report,
            output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Category, ExampleKey, ExampleOutcome, ExampleResult, Transcript, Variant,
    };
    use crate::utils::error::PatternError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingPipeline {
        calls: AtomicUsize,
        fail_select: bool,
    }

    #[async_trait::async_trait]
    impl RunPipeline for RecordingPipeline {
        async fn select(&self) -> Result<Vec<ExampleKey>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_select {
                return Err(PatternError::UnknownExample {
                    id: "visitor".to_string(),
                });
            }
            Ok(vec![ExampleKey::new("state", Variant::Followed)])
        }

        async fn execute(&self, keys: Vec<ExampleKey>) -> Result<RunReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let results = keys
                .into_iter()
                .map(|key| ExampleResult {
                    id: key.id,
                    title: "State".to_string(),
                    category: Category::Behavioral,
                    variant: key.variant,
                    outcome: ExampleOutcome::Completed,
                    transcript: Transcript::new(),
                    duration: Duration::ZERO,
                })
                .collect();
            Ok(RunReport::new(results))
        }

        async fn publish(&self, report: &RunReport) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("out/{}", report.total()))
        }
    }

    #[tokio::test]
    async fn test_runner_drives_all_phases() {
        let runner = ExampleRunner::new(RecordingPipeline::default());
        let output = runner.run().await.unwrap();

        assert_eq!(output.output_path, "out/1");
        assert_eq!(output.report.completed(), 1);
        assert_eq!(runner.pipeline.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_runner_stops_on_select_error() {
        let pipeline = RecordingPipeline {
            fail_select: true,
            ..Default::default()
        };
        let runner = ExampleRunner::new_with_monitoring(pipeline, false);

        assert!(runner.run().await.is_err());
        assert_eq!(runner.pipeline.calls.load(Ordering::SeqCst), 1);
    }
}
