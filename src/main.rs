//! catzone — 信标信号强度定位命令行工具
//!
//! 读取场景配置（或命令行给出的信标），在目标点合成测量向量，
//! 用网格似然定位反推位置，并输出估计结果或字符画热力图。

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catzone::algorithms::heatmap::render_ascii;
use catzone::algorithms::Point;
use catzone::config::SceneConfig;
use catzone::scene::{Detection, Scene};
use catzone::Result;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "catzone", about = "Beacon signal-strength localization")]
struct Args {
    /// 场景配置文件（JSON），缺省使用默认场景
    #[arg(short, long, global = true)]
    scene: Option<PathBuf>,
    /// 追加信标位置，例如 --beacon 100,200（可重复）
    #[arg(short, long, global = true)]
    beacon: Vec<Point>,
    /// 覆盖标称距离（真实单位）
    #[arg(short, long, global = true)]
    range: Option<f64>,
    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 在目标点合成测量并定位
    Locate {
        /// 目标位置（位置单位），例如 400,300
        #[arg(short, long)]
        target: Point,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 打印定位似然热力图
    Heatmap {
        /// 目标位置（位置单位）
        #[arg(short, long)]
        target: Point,
    },
    /// 打印信号覆盖图
    Coverage,
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LocateReport {
    generated_at: DateTime<Utc>,
    nominal_range: f64,
    scale: f64,
    target: Point,
    strengths: Vec<f64>,
    estimate: Option<Point>,
    best_cell: Option<(usize, usize)>,
    confidence: f64,
    centroid: Option<Point>,
    error: Option<f64>,
}

impl LocateReport {
    fn new(scene: &Scene, detection: Detection) -> Self {
        let scale = scene.model().scale;
        LocateReport {
            generated_at: Utc::now(),
            nominal_range: scene.model().nominal_range,
            scale,
            error: detection.error(scale),
            target: detection.target,
            strengths: detection.strengths,
            estimate: detection.localization.estimate,
            best_cell: detection.localization.best_cell,
            confidence: detection.localization.confidence,
            centroid: detection.centroid,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(args: &Args) -> Result<Scene> {
    let mut config = match &args.scene {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    for b in &args.beacon {
        config.push_beacon(*b);
    }
    if let Some(range) = args.range {
        config.nominal_range = range;
    }
    config.into_scene()
}

fn to_real(p: &Point, scale: f64) -> String {
    format!("({:.1}, {:.1})", p.x / scale, p.y / scale)
}

fn run(args: Args) -> Result<()> {
    let scene = load_scene(&args)?;
    let scale = scene.model().scale;
    info!("{}", scene.model());

    match args.command {
        Command::Locate { target, json } => {
            let detection = scene.detect(target);
            if json {
                let report = LocateReport::new(&scene, detection);
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let strengths: Vec<String> =
                detection.strengths.iter().map(|s| format!("{:.2}", s)).collect();
            println!("信标强度: [{}]", strengths.join(", "));
            println!("实际位置: {}", to_real(&detection.target, scale));
            match detection.localization.estimate {
                Some(est) => {
                    println!("估计位置: {}", to_real(&est, scale));
                    println!("置信度:   {:.2}", detection.localization.confidence);
                    if let Some(err) = detection.error(scale) {
                        println!("误差:     {:.2}", err);
                    }
                }
                None => println!("{}", detection.localization.detailed_description()),
            }
            if let Some(c) = detection.centroid {
                println!("加权质心: {}", to_real(&c, scale));
            }
        }
        Command::Heatmap { target } => {
            let detection = scene.detect(target);
            match detection.localization.intensities() {
                Some(grid) => {
                    for line in render_ascii(&grid) {
                        println!("|{}|", line);
                    }
                    println!("{}", detection.localization);
                }
                None => println!("{}", detection.localization.detailed_description()),
            }
        }
        Command::Coverage => {
            let coverage = scene.coverage();
            for line in render_ascii(&coverage.intensities()) {
                println!("|{}|", line);
            }
            println!("最大强度总和: {:.3}", coverage.max_total);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
