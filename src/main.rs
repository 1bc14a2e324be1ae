use clap::Parser;
use lld_patterns::core::{ConfigProvider, Example};
use lld_patterns::utils::error::ErrorSeverity;
use lld_patterns::utils::{logger, validation::Validate};
use lld_patterns::{
    Catalog, CatalogConfig, CatalogPipeline, CliConfig, Command, ExampleRunner, LocalStorage,
    PatternError, Result, RunOutput,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting lld-patterns CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = dispatch(config).await {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn dispatch(config: CliConfig) -> Result<()> {
    if let Command::List { category } = &config.command {
        print_catalog(&Catalog::standard(), *category);
        return Ok(());
    }

    match &config.config {
        Some(path) => {
            let file_config = config.apply_to(CatalogConfig::from_file(path)?);
            let monitor = config.monitor || file_config.monitoring_enabled();
            execute(file_config, monitor).await
        }
        None => {
            let monitor = config.monitor;
            execute(config, monitor).await
        }
    }
}

async fn execute<C: ConfigProvider + Validate>(config: C, monitor: bool) -> Result<()> {
    // 驗證配置
    config.validate()?;

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CatalogPipeline::new(storage, config);
    let runner = ExampleRunner::new_with_monitoring(pipeline, monitor);

    let output = runner.run().await?;
    print_output(&output);

    match output.report.failures().first() {
        Some(failed) => Err(PatternError::ExampleFailed {
            id: failed.file_stem(),
            details: format!(
                "{} of {} examples failed",
                output.report.failures().len(),
                output.report.total()
            ),
        }),
        None => Ok(()),
    }
}

fn print_catalog(catalog: &Catalog, category: Option<lld_patterns::Category>) {
    println!("{:<10} {:<11} {:<10} TITLE", "ID", "CATEGORY", "VARIANT");
    for example in catalog.iter() {
        if category.is_some_and(|c| c != example.category()) {
            continue;
        }
        println!(
            "{:<10} {:<11} {:<10} {}",
            example.id(),
            example.category(),
            example.variant(),
            example.title()
        );
    }
}

fn print_output(output: &RunOutput) {
    for result in &output.report.results {
        let status = if result.outcome.is_completed() {
            "completed"
        } else {
            "failed"
        };
        println!();
        println!(
            "### {}/{} [{}] ({} ms)",
            result.id,
            result.variant,
            status,
            result.duration.as_millis()
        );
        println!("{}", result.transcript);
    }

    println!();
    println!(
        "✅ {} of {} examples completed",
        output.report.completed(),
        output.report.total()
    );
    println!("📁 Output saved to: {}", output.output_path);
}
