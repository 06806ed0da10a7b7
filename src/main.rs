use anyhow::Context;
use clap::Parser;
use service_sheet::utils::error::ErrorSeverity;
use service_sheet::utils::{logger, validation::Validate};
use service_sheet::{
    format_amount, CliConfig, LocalStorage, ReportPipeline, SheetEngine, SheetError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting service-sheet");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        if let Some(sheet_error) = e.downcast_ref::<SheetError>() {
            exit_with(sheet_error);
        }
        return Err(e);
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let edits = cli.parsed_edits()?;
    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.load.output_path.clone().unwrap_or_default());

    let mut pipeline = ReportPipeline::new(source, sink, config).with_edits(edits);
    if let Some(input) = &cli.input {
        pipeline = pipeline.with_input(input.clone());
    }
    let engine = SheetEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        let state = engine.preview().await?;
        let totals = state.totals();
        println!("Totale imponibile € {}", format_amount(totals.taxable_total));
        println!("IVA €               {}", format_amount(totals.tax));
        println!("Tot. Documento €    {}", format_amount(totals.grand_total));
        return Ok(());
    }

    let summary = engine
        .run()
        .await
        .context("service sheet run failed")?;

    println!("✅ Service sheet written ({} file(s))", summary.files_written);
    println!("📁 Output saved to: {}", summary.output_path);
    println!("💶 Tot. Documento € {}", format_amount(summary.totals.grand_total));

    Ok(())
}

fn exit_with(e: &SheetError) -> ! {
    tracing::error!(
        "❌ service-sheet failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    std::process::exit(exit_code)
}
