use clap::Parser;
use draft_export::core::ConfigProvider;
use draft_export::utils::error::ErrorSeverity;
use draft_export::utils::{logger, validation::Validate};
use draft_export::{
    CliConfig, CsvDirectorySink, DraftPipeline, ExportConfig, ExportEngine, ExportSummary,
    InputSource,
};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting draft-export");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, cli.dry_run);

    let source = InputSource::from_config(&config);
    let sink = CsvDirectorySink::from_config(&config);
    let pipeline = DraftPipeline::from_config(source, sink, &config);
    let engine = ExportEngine::new(pipeline).with_dry_run(cli.dry_run);

    match engine.run() {
        Ok(summary) => {
            if cli.print_selected {
                print_selected(&summary);
            }
            report(&summary);
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

fn display_config_summary(config: &ExportConfig, dry_run: bool) {
    let rule = config.selection_rule();

    tracing::info!("📋 Configuration Summary:");
    match config.input_file() {
        Some(file) => tracing::info!("  Input: {}", file.display()),
        None => tracing::info!("  Input: newest CSV in {}", config.input_dir().display()),
    }
    tracing::info!(
        "  Output: {}",
        config.output_dir().join(config.output_file_name()).display()
    );
    tracing::info!("  Threshold: SKU > {}", rule.threshold);
    tracing::info!("  Exclusion markers: {}", rule.exclusion_markers.join(", "));
    tracing::info!("  Listed filter: {:?}", rule.listed);
    if dry_run {
        tracing::info!("  🔍 DRY RUN MODE ENABLED");
    }
}

fn print_selected(summary: &ExportSummary) {
    match serde_json::to_string_pretty(&summary.selected) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("Could not serialize selected records: {}", e),
    }
}

fn report(summary: &ExportSummary) {
    let skipped: usize = summary.skipped.values().sum();

    match &summary.output_path {
        Some(path) => {
            println!("✅ Draft listings CSV created: {}", path);
        }
        None => println!("🔍 Dry run complete, nothing written"),
    }
    println!(
        "📊 Total items processed: {} selected, {} skipped, {} read",
        summary.selected.len(),
        skipped,
        summary.rows_read
    );
}
