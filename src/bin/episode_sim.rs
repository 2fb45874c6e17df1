//! 单个 episode 仿真
//!
//! 读取场景 JSON（缺省为内置参考场景），按命令行给出的路由策略运行一个 episode，
//! 把最终报告以 JSON 输出到 stdout；日志写到 stderr。

use clap::Parser;
use netcontend::{RoutingPolicy, ScenarioConfig, run_episode};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "episode-sim",
    about = "多类流量竞争两条处理路径：运行一个 episode 并输出报告"
)]
struct Args {
    /// Path to scenario.json; defaults to the built-in TF1/TF2/TF3 x NR/WF scenario
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 每个流量类别分配给主路径的概率，逗号分隔（例如 0.5,1,0.9）
    #[arg(long, value_delimiter = ',', required = true)]
    policy: Vec<f64>,

    /// Override episode duration (seconds)
    #[arg(long)]
    duration_s: Option<f64>,

    /// Override report interval (seconds)
    #[arg(long)]
    report_interval_s: Option<f64>,

    /// Override processor grace period (seconds)
    #[arg(long)]
    grace_s: Option<f64>,

    /// Seed for routing RNGs
    #[arg(long)]
    seed: Option<u64>,

    /// Omit periodic snapshots from the printed report
    #[arg(long)]
    no_snapshots: bool,

    /// Pretty-print the report JSON
    #[arg(long)]
    pretty: bool,

    /// Disable logging
    #[arg(long)]
    quiet: bool,
}

fn load_scenario(args: &Args) -> Result<ScenarioConfig, String> {
    let mut scenario = match &args.scenario {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("read {}: {e}", path.display()))?;
            ScenarioConfig::from_json_str(&raw)
                .map_err(|e| format!("parse {}: {e}", path.display()))?
        }
        None => ScenarioConfig::default(),
    };
    if let Some(d) = args.duration_s {
        scenario.episode.duration_seconds = d;
    }
    if let Some(i) = args.report_interval_s {
        scenario.episode.report_interval_seconds = i;
    }
    if let Some(g) = args.grace_s {
        scenario.episode.processor_grace_seconds = g;
    }
    if args.seed.is_some() {
        scenario.episode.seed = args.seed;
    }
    Ok(scenario)
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.quiet {
            tracing_subscriber::EnvFilter::new("off")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        })
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let scenario = match load_scenario(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let policy = RoutingPolicy::new(args.policy.clone());

    let mut report = match run_episode(&policy, &scenario) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("episode failed: {e}");
            return ExitCode::from(2);
        }
    };
    if args.no_snapshots {
        report.snapshots.clear();
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match json {
        Ok(s) => {
            println!("{s}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("serialize report: {e}");
            ExitCode::FAILURE
        }
    }
}
