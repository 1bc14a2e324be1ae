use crate::domain::model::{ExampleOutcome, ExampleResult};
use crate::utils::error::{PatternError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

pub const FORMAT_TXT: &str = "txt";
pub const FORMAT_JSON: &str = "json";
pub const FORMAT_CSV: &str = "csv";
pub const SUPPORTED_FORMATS: [&str; 3] = [FORMAT_TXT, FORMAT_JSON, FORMAT_CSV];

/// 一次執行的所有範例結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<ExampleResult>,
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    id: &'a str,
    variant: &'a str,
    category: &'a str,
    title: &'a str,
    status: &'a str,
    duration_ms: u64,
    lines: usize,
    error: &'a str,
}

/// 要輸出的單一檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub data: Vec<u8>,
}

impl RunReport {
    pub fn new(results: Vec<ExampleResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            results,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn completed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_completed())
            .count()
    }

    pub fn failures(&self) -> Vec<&ExampleResult> {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_completed())
            .collect()
    }

    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 每個範例一列的摘要
    pub fn summary_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for result in &self.results {
            let (status, error) = match &result.outcome {
                ExampleOutcome::Completed => ("completed", ""),
                ExampleOutcome::Failed(message) => ("failed", message.as_str()),
            };
            writer.serialize(SummaryRow {
                id: &result.id,
                variant: result.variant.as_str(),
                category: result.category.as_str(),
                title: &result.title,
                status,
                duration_ms: result.duration.as_millis() as u64,
                lines: result.transcript.len(),
                error,
            })?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| PatternError::IoError(e.into_error()))?;
        String::from_utf8(data).map_err(|e| PatternError::ValidationError {
            message: format!("Summary is not valid UTF-8: {}", e),
        })
    }

    /// 依輸出格式產生檔案清單；重複的格式只輸出一次
    pub fn artifacts(&self, formats: &[String]) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        let mut seen = HashSet::new();

        for format in formats.iter().filter(|f| seen.insert(f.as_str())) {
            match format.as_str() {
                FORMAT_TXT => {
                    for result in &self.results {
                        artifacts.push(Artifact {
                            name: format!("transcripts/{}.txt", result.file_stem()),
                            data: result.transcript.to_text().into_bytes(),
                        });
                    }
                }
                FORMAT_JSON => artifacts.push(Artifact {
                    name: "report.json".to_string(),
                    data: self.to_json()?.into_bytes(),
                }),
                FORMAT_CSV => artifacts.push(Artifact {
                    name: "summary.csv".to_string(),
                    data: self.summary_csv()?.into_bytes(),
                }),
                other => {
                    return Err(PatternError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: format!(
                            "Unsupported format. Valid formats: {}",
                            SUPPORTED_FORMATS.join(", ")
                        ),
                    })
                }
            }
        }

        Ok(artifacts)
    }
}

/// 把檔案打包成 ZIP，回傳位元組
pub fn zip_artifacts(artifacts: &[Artifact]) -> Result<Vec<u8>> {
    tracing::debug!("Creating ZIP file with {} files", artifacts.len());

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for artifact in artifacts {
        zip.start_file::<_, ()>(artifact.name.as_str(), FileOptions::default())?;
        zip.write_all(&artifact.data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
