use clap::Parser;
use sweepgen::cli::default_log_dir;
use sweepgen::{Args, Manifest, init_logging, load_template, plan_summary, resolve_config};
use sweepgen_core::{plan_sweep, run_sweep};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_dir = args.log_dir.clone().unwrap_or_else(default_log_dir);

    init_logging(&log_dir, &args.log_level)?;

    let config = resolve_config(&args)?;

    if args.dry_run {
        let plan = plan_sweep(&config)?;
        print!("{}", plan_summary(&plan));
        return Ok(());
    }

    let template = load_template(&args, &config)?;
    let report = run_sweep(&config, &args.out_dir, template.as_ref())?;
    let manifest =
        Manifest::from_report(&config, &report, jiff::Timestamp::now()).write(&report.out_dir)?;

    print!("{}", plan_summary(&report.plan));
    println!(
        "wrote {} batch files and {} launchers to {}",
        report.batch_files.len(),
        report.launcher_files.len(),
        report.out_dir.display()
    );
    println!("submit with: bash {}", report.queue_script.display());

    tracing::info!(manifest = %manifest.display(), "sweepgen finished");

    Ok(())
}
