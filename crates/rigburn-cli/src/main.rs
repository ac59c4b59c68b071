use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rigburn_core::{
    analyze_bottleneck, full_analysis, get_rank, BottleneckAnalysis, BottleneckStrategy,
    CpuBenchmarkResult, FullAnalysis, GpuBenchmarkResult, Rank, RigBurnConfig,
};
use rigburn_services::{
    ArenaReport, BenchmarkService, CpuBenchmarkEvent, GpuBenchmarkEvent, HistoryStore, Services,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rigburn")]
#[command(about = "RigBurn - GPU load ramp and CPU benchmark arena", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Score history database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the adaptive GPU load test
    Gpu,

    /// Run the CPU workload suite
    Cpu,

    /// Run both tests, compare with the last run and save the score
    Run {
        #[arg(long, value_enum, default_value_t = Strategy::Normalized)]
        strategy: Strategy,
    },

    /// Show saved scores
    History {
        /// Delete all saved scores
        #[arg(long)]
        clear: bool,
    },

    /// Classify a GPU/CPU score pair without running anything
    Analyze {
        #[arg(long)]
        gpu: u64,

        #[arg(long)]
        cpu: u64,

        #[arg(long, value_enum, default_value_t = Strategy::Normalized)]
        strategy: Strategy,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Normalized,
    Raw,
}

impl From<Strategy> for BottleneckStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Normalized => BottleneckStrategy::normalized(),
            Strategy::Raw => BottleneckStrategy::RawRatio,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let json = cli.output == OutputFormat::Json;

    match cli.command {
        Commands::Gpu => {
            let service = BenchmarkService::new(config.gpu.clone(), config.cpu.clone());
            let result = run_gpu(&service, json)?;
            print_gpu(&result, json)?;
        }
        Commands::Cpu => {
            let service = BenchmarkService::new(config.gpu.clone(), config.cpu.clone());
            let result = run_cpu(&service, json)?;
            print_cpu(&result, json)?;
        }
        Commands::Run { strategy } => cmd_run(&config, strategy.into(), json)?,
        Commands::History { clear } => cmd_history(&config, clear, json)?,
        Commands::Analyze { gpu, cpu, strategy } => cmd_analyze(gpu, cpu, strategy.into(), json)?,
        Commands::Config => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<RigBurnConfig> {
    let mut config = match &cli.config {
        Some(path) => RigBurnConfig::load(path)?,
        None => RigBurnConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.history.db_path = Some(db.clone());
    }
    Ok(config)
}

/// Run the GPU ramp on the service thread; Ctrl-C cancels it.
fn run_gpu(service: &BenchmarkService, quiet: bool) -> Result<GpuBenchmarkResult> {
    info!("GPU load test starting");
    let (rx, cancel) = service.run_gpu_streaming();

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            BenchmarkService::cancel(&cancel);
        }
    });
    let outcome = tokio::task::block_in_place(|| collect_gpu(rx, quiet));
    interrupt.abort();

    if let Ok(result) = &outcome {
        info!(objects = result.total_objects, reason = result.finish_reason.label(), "GPU load test finished");
    }
    outcome
}

fn run_cpu(service: &BenchmarkService, quiet: bool) -> Result<CpuBenchmarkResult> {
    info!("CPU suite starting");
    let rx = service.run_cpu_streaming();

    // The suite has no cancel point, so Ctrl-C ends the process.
    let interrupt = tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
    let outcome = tokio::task::block_in_place(|| collect_cpu(rx, quiet));
    interrupt.abort();

    if let Ok(result) = &outcome {
        info!(score = result.score, duration_ms = result.duration_ms, "CPU suite finished");
    }
    outcome
}

/// Print progress and return the terminal event's result.
fn collect_gpu(rx: Receiver<GpuBenchmarkEvent>, quiet: bool) -> Result<GpuBenchmarkResult> {
    for event in rx {
        match event {
            GpuBenchmarkEvent::Started { max_instances } if !quiet => {
                eprintln!("GPU load test (up to {} objects, Ctrl-C to stop)", max_instances);
            }
            GpuBenchmarkEvent::Sample { fps, instances, elapsed_ms } if !quiet => {
                eprintln!("  {:>6.1}s  {:>4} fps  {:>8} objects", elapsed_ms / 1000.0, fps, instances);
            }
            GpuBenchmarkEvent::Done { result } => return Ok(result),
            GpuBenchmarkEvent::Cancelled => bail!("GPU test cancelled"),
            GpuBenchmarkEvent::Error { message } => return Err(anyhow!(message)),
            _ => {}
        }
    }
    bail!("GPU test ended without a result")
}

fn collect_cpu(rx: Receiver<CpuBenchmarkEvent>, quiet: bool) -> Result<CpuBenchmarkResult> {
    for event in rx {
        match event {
            CpuBenchmarkEvent::WorkloadStarted { kind, current, total } if !quiet => {
                eprintln!("CPU [{}/{}] {}...", current, total, kind.label());
            }
            CpuBenchmarkEvent::WorkloadComplete { kind, score, progress } if !quiet => {
                eprintln!("  {:<16} {:>14.0} {:<8} {:>3}%", kind.label(), score, kind.unit(), progress);
            }
            CpuBenchmarkEvent::Done { result } => return Ok(result),
            CpuBenchmarkEvent::Error { message } => return Err(anyhow!(message)),
            _ => {}
        }
    }
    bail!("CPU test ended without a result")
}

fn cmd_run(config: &RigBurnConfig, strategy: BottleneckStrategy, json: bool) -> Result<()> {
    info!(strategy = strategy.name(), "Arena run starting");
    let services = Services::new(config);

    let gpu = run_gpu(&services.benchmark, json)?;
    let cpu = run_cpu(&services.benchmark, json)?;
    let report = services.record_run(gpu, cpu, strategy, &mut rand::thread_rng());
    info!(combined = report.combined_score, rank = %report.rank.label, "Arena run finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn cmd_history(config: &RigBurnConfig, clear: bool, json: bool) -> Result<()> {
    let services = Services::new(config);

    if clear {
        services.history.clear();
        info!("Score history cleared");
        println!("Score history cleared.");
        return Ok(());
    }

    let entries = services.history.entries();
    info!(count = entries.len(), "Loaded score history");
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!();
    println!("Score History:");
    println!("{:-<72}", "");
    println!("  {:<4} {:<20} {:>10} {:>10} {:>10}  {}", "#", "Date", "GPU", "CPU", "Combined", "Host");
    println!("{:-<72}", "");
    if entries.is_empty() {
        println!("  No runs yet. Use `rigburn run`.");
    }
    for (i, e) in entries.iter().enumerate() {
        let host = e.browser_info.as_deref().unwrap_or("-");
        println!(
            "  {:<4} {:<20} {:>10} {:>10} {:>10}  {}",
            i + 1,
            e.date,
            e.gpu_score,
            e.cpu_score,
            e.combined_score,
            host
        );
    }
    println!();
    Ok(())
}

#[derive(Serialize)]
struct Analysis {
    rank: Rank,
    bottleneck: BottleneckAnalysis,
    commentary: FullAnalysis,
}

fn cmd_analyze(gpu: u64, cpu: u64, strategy: BottleneckStrategy, json: bool) -> Result<()> {
    let analysis = Analysis {
        rank: get_rank(gpu),
        bottleneck: analyze_bottleneck(strategy, gpu, cpu),
        commentary: full_analysis(gpu, cpu, None, &mut rand::thread_rng()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!();
    print_rank(&analysis.rank);
    print_bottleneck(&analysis.bottleneck);
    print_commentary(&analysis.commentary);
    println!();
    Ok(())
}

fn print_gpu(result: &GpuBenchmarkResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!();
    println!("GPU Results:");
    println!("{:-<40}", "");
    println!("  Objects:       {}", result.total_objects);
    if result.time_cap_reached() {
        println!("  Raw objects:   {}", result.raw_objects);
    }
    println!("  Avg FPS:       {:.1}", result.avg_fps);
    println!("  Min FPS:       {:.0}", result.min_fps);
    println!("  Max FPS:       {:.0}", result.max_fps);
    println!("  Duration:      {:.1} s", result.elapsed_ms / 1000.0);
    println!("  Finished:      {}", result.finish_reason.label());
    println!();
    Ok(())
}

fn print_cpu(result: &CpuBenchmarkResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!();
    println!("CPU Results:");
    println!("{:-<40}", "");
    for w in &result.workloads {
        println!("  {:<16} {:>14.0} {}", w.kind.label(), w.score, w.kind.unit());
    }
    println!("  Score:         {}", result.score);
    println!("  Total ops:     {:.0}", result.ops);
    println!("  Duration:      {} ms", result.duration_ms);
    println!();
    Ok(())
}

fn print_rank(rank: &Rank) {
    println!("  {} {} ({})", rank.emoji, rank.label, rank.score);
    println!("  {}", rank.description);
}

fn print_bottleneck(analysis: &BottleneckAnalysis) {
    println!();
    println!("Balance ({}):", analysis.strategy.name());
    println!("{:-<40}", "");
    println!("  {}", analysis.title);
    println!("  {}", analysis.description);
    if let (Some(g), Some(c)) = (analysis.gpu_percentage, analysis.cpu_percentage) {
        println!("  GPU {}%  CPU {}%", g, c);
    }
    if let Some(ratio) = analysis.ratio {
        println!("  Ratio: {:.2}", ratio);
    }
    if let Some(rec) = &analysis.recommendation {
        println!("  Tip: {}", rec);
    }
}

fn print_commentary(commentary: &FullAnalysis) {
    println!();
    println!("Commentary:");
    println!("{:-<40}", "");
    println!("  GPU {} {}: {}", commentary.gpu.emoji, commentary.gpu.tier, commentary.gpu.comment);
    println!("  CPU {} {}: {}", commentary.cpu.emoji, commentary.cpu.tier, commentary.cpu.comment);
    println!(
        "  {} {}: {}",
        commentary.bottleneck.emoji, commentary.bottleneck.status, commentary.bottleneck.comment
    );
    if let Some(trend) = &commentary.comparison {
        println!("  {} {}: {}", trend.emoji, trend.tier, trend.comment);
    }
}

fn print_report(report: &ArenaReport) {
    println!();
    println!("RigBurn Arena Report");
    println!("{:=<40}", "");
    println!("  System:        {} ({} cores)", report.system.platform(), report.system.cores_label());
    println!("  GPU score:     {}", report.gpu_score);
    println!("  CPU score:     {}", report.cpu_score);
    println!("  Combined:      {}", report.combined_score);
    if report.gpu.time_cap_reached() {
        println!("  Time cap reached: {} raw objects x1.5", report.gpu.raw_objects);
    }
    println!();
    print_rank(&report.rank);
    if let Some(comparison) = &report.comparison {
        println!();
        println!("  {}", comparison.message);
        if comparison.previous.is_some() {
            println!(
                "  GPU {:+} ({:+}%)  CPU {:+} ({:+}%)  Combined {:+} ({:+}%)",
                comparison.gpu_diff,
                comparison.gpu_diff_percent,
                comparison.cpu_diff,
                comparison.cpu_diff_percent,
                comparison.combined_diff,
                comparison.combined_diff_percent
            );
        }
    }
    print_bottleneck(&report.bottleneck);
    print_commentary(&report.commentary);
    println!();
}
