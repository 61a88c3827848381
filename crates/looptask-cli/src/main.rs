//! looptask デモ
//!
//! カウンタを増やし続けるループを spawn し、`--stop-after` 回に達したら
//! 停止要求を出して join する。最後に LoopReport を JSON で出力する。
//!
//! # Usage
//!
//! ```sh
//! looptask-cli --name counter --stop-after 5 --interval-ms 20
//! looptask-cli --config loop.json --self-stop
//! RUST_LOG=looptask_core=trace looptask-cli
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

use looptask_core::domain::{LoopReport, Priority, SchedulerError};
use looptask_core::observability::init_tracing;
use looptask_core::{Disposition, LoopSupervisor, TaskSpec};

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Spawn(#[from] SchedulerError),

    #[error("join task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "looptask-cli")]
#[command(author, version, about = "Run a counter loop under the loop supervisor", long_about = None)]
struct Cli {
    /// TaskSpec を読む JSON ファイル
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// タスク名（設定ファイルより優先）
    #[arg(short, long)]
    name: Option<String>,

    /// スタックサイズ（バイト）
    #[arg(long)]
    stack_size: Option<usize>,

    #[arg(short, long)]
    priority: Option<u8>,

    /// この回数に達したら停止する
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    stop_after: u64,

    /// step 間の待ち時間（ミリ秒）
    #[arg(long, default_value_t = 20)]
    interval_ms: u64,

    /// 停止要求を出さず、step 自身が Stop を返して終了する
    #[arg(long)]
    self_stop: bool,
}

impl Cli {
    /// 設定ファイル（あれば）を読み、フラグで上書きした TaskSpec を作る
    fn task_spec(&self) -> Result<TaskSpec, CliError> {
        let mut spec = match &self.config {
            Some(path) => load_spec(path)?,
            None => TaskSpec::new("counter"),
        };

        // フラグは設定ファイルより優先
        if let Some(name) = &self.name {
            spec.name = name.clone();
        }
        if let Some(stack_size) = self.stack_size {
            spec.stack_size = stack_size;
        }
        if let Some(priority) = self.priority {
            spec.priority = Priority(priority);
        }
        Ok(spec)
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// step 関数の context
#[derive(Debug, Default)]
struct Counter {
    count: u64,
}

#[derive(Serialize)]
struct Output {
    count: u64,
    report: LoopReport,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("looptask-cli: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let spec = cli.task_spec()?;
    info!(?cli, ?spec, "starting counter loop");

    let observed = Arc::new(AtomicU64::new(0));
    let mirror = Arc::clone(&observed);
    let stop_after = cli.stop_after;
    let interval = cli.interval();
    let self_stop = cli.self_stop;

    let supervisor = LoopSupervisor::new();
    let handle = supervisor
        .spawn(
            move |counter: &mut Counter| {
                counter.count += 1;
                mirror.store(counter.count, Ordering::Release);
                if self_stop && counter.count >= stop_after {
                    return Disposition::Stop;
                }
                std::thread::sleep(interval);
                Disposition::Continue
            },
            Counter::default(),
            spec,
        )
        .map_err(|e| CliError::Spawn(e.into_parts().1))?;

    if !self_stop {
        while observed.load(Ordering::Acquire) < stop_after {
            sleep(interval).await;
        }
        handle.request_stop();
    }

    // join はブロックするので spawn_blocking に逃がす
    let (counter, report) =
        tokio::task::spawn_blocking(move || handle.join_with_report()).await?;

    info!(count = counter.count, iterations = report.iterations, "counter loop joined");
    let output = Output {
        count: counter.count,
        report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_spec(path: &Path) -> Result<TaskSpec, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}
