use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagestat::config::{AnalyzeConfig, ConfigLoader, OutputFormat};
use pagestat::dispatcher::Dispatcher;
use pagestat::metrics::snapshot::MetricsSnapshot;
use std::num::NonZeroUsize;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pagestat")]
#[command(version = "0.1.0")]
#[command(about = "Fetch pages concurrently and report word, image and link counts", long_about = None)]
struct Cli {
    /// URLs to analyze; `http://` is prepended when no scheme is given
    #[arg(required = true)]
    urls: Vec<String>,

    /// Maximum number of requests in flight (unbounded by default)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long)]
    user_agent: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Show a progress bar (stderr)
    #[arg(short, long)]
    progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).build();
    let max_level = logger.filter();
    let multi = indicatif::MultiProgress::new();

    if cli.progress {
        indicatif_log_bridge::LogWrapper::new(multi.clone(), logger).try_init()?;
    } else {
        log::set_boxed_logger(Box::new(logger))?;
    }
    log::set_max_level(max_level);

    let config = ConfigLoader::load(AnalyzeConfig {
        urls: cli.urls,
        concurrency: cli.concurrency,
        timeout_secs: cli.timeout,
        user_agent: cli.user_agent,
        format: cli.format,
    })?;
    log::info!("Analyzing {} URLs", config.urls.len());

    let analyzer = Arc::new(ConfigLoader::create_analyzer(&config)?);
    let dispatcher = Dispatcher::new(config.concurrency.and_then(NonZeroUsize::new), None);

    let mut progress_bar: Option<ProgressBar> = None;
    let mut progress_task = None;
    if cli.progress {
        let pb = multi.add(ProgressBar::new(config.urls.len() as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );

        let mut metrics_rx = dispatcher.watch_metrics();
        let pb_clone = pb.clone();
        progress_bar = Some(pb);
        progress_task = Some(tokio::spawn(async move {
            while metrics_rx.changed().await.is_ok() {
                let snapshot: MetricsSnapshot = metrics_rx.borrow().clone();
                pb_clone.set_position(snapshot.urls_processed);
                pb_clone.set_message(format!(
                    "Active: {} | Failed: {}",
                    snapshot.active_tasks, snapshot.requests_failed
                ));
            }
        }));
    }

    let results = dispatcher.analyze(analyzer, config.urls.clone()).await;
    let summary = dispatcher.get_metrics();

    if let Some(task) = progress_task {
        task.abort();
    }
    if let Some(pb) = progress_bar {
        pb.set_position(summary.urls_processed);
        pb.finish_with_message(format!("Success: {:.1}% - Completed", summary.success_rate));
    }

    let mut report = ConfigLoader::create_report_writer(config.format, std::io::stdout())?;
    for result in &results {
        report.write(result)?;
    }
    report.close(&summary)?;

    Ok(())
}
