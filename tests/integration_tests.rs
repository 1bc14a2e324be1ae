use anyhow::Result;
use lld_patterns::core::{ConfigProvider, RunPipeline};
use lld_patterns::utils::validation::Validate;
use lld_patterns::{
    Catalog, CatalogConfig, CatalogPipeline, Category, CliConfig, ExampleRunner, LocalStorage,
    Selection, Variant,
};
use clap::Parser;
use std::io::Read;
use tempfile::TempDir;

fn archive_names(path: &std::path::Path) -> Result<Vec<String>> {
    let zip_data = std::fs::read(path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

#[tokio::test]
async fn test_run_all_writes_archive_with_every_transcript() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::try_parse_from(["lld-patterns", "--output-path", output_path.as_str(), "run-all"])?;
    let storage = LocalStorage::new(output_path.clone());
    let runner = ExampleRunner::new_with_monitoring(CatalogPipeline::new(storage, config), false);

    let output = runner.run().await?;
    assert_eq!(output.report.total(), 32);
    assert_eq!(
        output.report.completed(),
        32,
        "failures: {:?}",
        output
            .report
            .failures()
            .iter()
            .map(|r| (r.file_stem(), r.outcome.clone()))
            .collect::<Vec<_>>()
    );
    assert!(output.output_path.ends_with("patterns.zip"));

    let names = archive_names(&temp_dir.path().join("patterns.zip"))?;
    assert_eq!(names.len(), 34);
    assert!(names.contains(&"report.json".to_string()));
    assert!(names.contains(&"summary.csv".to_string()));
    assert!(names.contains(&"transcripts/singleton_followed.txt".to_string()));
    assert!(names.contains(&"transcripts/srp_violated.txt".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_transcripts_capture_pattern_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::try_parse_from([
        "lld-patterns",
        "--output-path",
        output_path.as_str(),
        "run-all",
        "--category",
        "behavioral",
    ])?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config);
    let output = ExampleRunner::new(pipeline).run().await?;
    assert_eq!(output.report.total(), 10);

    let zip_data = std::fs::read(temp_dir.path().join("patterns.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;

    let mut state = String::new();
    archive
        .by_name("transcripts/state_followed.txt")?
        .read_to_string(&mut state)?;
    assert!(state.contains("IdleState"));

    let mut summary = String::new();
    archive.by_name("summary.csv")?.read_to_string(&mut summary)?;
    assert_eq!(summary.lines().count(), 11);
    assert!(summary.lines().skip(1).all(|line| line.contains(",completed,")));

    Ok(())
}

#[tokio::test]
async fn test_single_example_without_compression() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::try_parse_from([
        "lld-patterns",
        "run",
        "adapter",
        "--variant",
        "followed",
        "--no-zip",
        "--formats",
        "txt,json",
        "--output-path",
        output_path.as_str(),
    ])?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config);
    let output = ExampleRunner::new(pipeline).run().await?;

    assert_eq!(output.output_path, output_path);
    assert!(!temp_dir.path().join("patterns.zip").exists());

    let transcript =
        std::fs::read_to_string(temp_dir.path().join("transcripts/adapter_followed.txt"))?;
    assert!(transcript.contains("Charging 15000 cents (USD)"));
    assert!(transcript.contains("Square gateway added without modifying EcommerceApp"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("report.json"))?)?;
    assert_eq!(report["results"][0]["id"], "adapter");
    assert_eq!(report["results"][0]["outcome"]["status"], "completed");

    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let toml_content = format!(
        r#"
[catalog]
name = "solid-followed"

[run]
categories = ["solid"]
variants = ["followed"]

[output]
output_path = "{}"
formats = ["csv"]

[output.compression]
enabled = true
filename = "solid.zip"
"#,
        output_path
    );
    let config_path = temp_dir.path().join("patterns.toml");
    std::fs::write(&config_path, toml_content)?;

    let config = CatalogConfig::from_file(&config_path)?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config);

    let keys = pipeline.select().await?;
    assert_eq!(keys.len(), 5);
    assert!(keys.iter().all(|k| k.variant == Variant::Followed));

    let report = pipeline.execute(keys).await?;
    let path = pipeline.publish(&report).await?;
    assert!(path.ends_with("solid.zip"));
    assert_eq!(
        archive_names(&temp_dir.path().join("solid.zip"))?,
        ["summary.csv"]
    );

    Ok(())
}

#[tokio::test]
async fn test_cli_flags_merge_over_toml_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file_output = temp_dir.path().join("file-out");
    let cli_output = temp_dir.path().join("cli-out");

    let toml_content = format!(
        r#"
[catalog]
name = "adapter-only"

[run]
ids = ["adapter"]

[output]
output_path = "{}"
formats = ["txt", "csv"]

[output.compression]
enabled = true
filename = "adapter.zip"
"#,
        file_output.to_str().unwrap()
    );
    let config_path = temp_dir.path().join("patterns.toml");
    std::fs::write(&config_path, toml_content)?;

    // run-all 沒有縮小範圍，設定檔的 [run] 保留
    let cli = CliConfig::try_parse_from([
        "lld-patterns",
        "--config",
        config_path.to_str().unwrap(),
        "run-all",
        "--formats",
        "json",
    ])?;
    let merged = cli.apply_to(CatalogConfig::from_file(&config_path)?);
    merged.validate()?;

    let storage = LocalStorage::new(merged.output_path().to_string());
    let output = ExampleRunner::new(CatalogPipeline::new(storage, merged)).run().await?;
    assert_eq!(output.report.total(), 2);
    assert!(output.report.results.iter().all(|r| r.id == "adapter"));
    assert_eq!(archive_names(&file_output.join("adapter.zip"))?, ["report.json"]);

    // 明確的子命令與旗標蓋過設定檔
    let cli = CliConfig::try_parse_from([
        "lld-patterns",
        "--config",
        config_path.to_str().unwrap(),
        "--output-path",
        cli_output.to_str().unwrap(),
        "--no-zip",
        "run",
        "srp",
        "--variant",
        "violated",
    ])?;
    let merged = cli.apply_to(CatalogConfig::from_file(&config_path)?);
    merged.validate()?;

    let storage = LocalStorage::new(merged.output_path().to_string());
    let output = ExampleRunner::new(CatalogPipeline::new(storage, merged)).run().await?;
    assert_eq!(output.report.total(), 1);
    assert_eq!(output.report.results[0].file_stem(), "srp_violated");
    assert!(cli_output.join("transcripts/srp_violated.txt").exists());
    assert!(cli_output.join("summary.csv").exists());
    assert_eq!(output.output_path, cli_output.to_str().unwrap());

    Ok(())
}

#[tokio::test]
async fn test_repeated_formats_publish_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::try_parse_from([
        "lld-patterns",
        "--output-path",
        output_path.as_str(),
        "--formats",
        "json,json",
        "run",
        "srp",
    ])?;
    assert!(config.validate().is_err());

    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path), config);
    let keys = pipeline.select().await?;
    let report = pipeline.execute(keys).await?;
    pipeline.publish(&report).await?;
    assert_eq!(
        archive_names(&temp_dir.path().join("patterns.zip"))?,
        ["report.json"]
    );

    Ok(())
}

#[tokio::test]
async fn test_unknown_example_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::try_parse_from(["lld-patterns", "run", "visitor", "--output-path", output_path.as_str()])?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path), config);

    let err = ExampleRunner::new(pipeline).run().await.unwrap_err();
    assert!(err.to_string().contains("visitor"));
    assert_eq!(err.severity(), lld_patterns::utils::error::ErrorSeverity::Medium);

    Ok(())
}

#[test]
fn test_catalog_selection_by_category_and_variant() {
    let catalog = Catalog::standard();
    let selection = Selection {
        ids: vec![],
        categories: vec![Category::Structural],
        variants: vec![Variant::Violated],
    };

    let ids: Vec<&str> = catalog
        .select(&selection)
        .unwrap()
        .into_iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(ids, ["decorator", "facade", "adapter"]);
}
