use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use portfolio_metrics::config::{ApplicationConfig, Environment, LogConfig};
use portfolio_metrics::data_ingestion::{ExportReader, ExportReaderConfig};
use portfolio_metrics::output::sink_for;
use portfolio_metrics::pipeline::PortfolioPipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Parser)]
#[command(name = "portfolio_metrics", about = "帳戶淨值曲線與投資組合績效指標")]
struct Cli {
    /// 匯出檔目錄（覆蓋 input.directory）
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// 報表輸出格式（覆蓋 output.format）
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// 帳戶失敗時繼續處理其餘帳戶
    #[arg(long)]
    keep_going: bool,

    /// 配置環境 (development 或 production，預設讀取 PORTFOLIO_ENV)
    #[arg(long)]
    env: Option<String>,
}

fn main() -> Result<()> {
    // 解析命令行參數
    let cli = Cli::parse();

    // 初始化配置
    let environment = cli
        .env
        .as_deref()
        .map(Environment::parse)
        .unwrap_or_else(Environment::from_env);
    let mut app_config = ApplicationConfig::load(environment).context("無法加載應用程序配置")?;
    apply_overrides(&mut app_config, &cli);

    // 初始化日誌系統
    init_logging(&app_config.log)?;
    info!(environment = ?environment, "配置加載完成");

    let delimiter = app_config
        .input
        .delimiter_byte()
        .ok_or_else(|| anyhow!("無效的分隔符: {:?}", app_config.input.delimiter))?;
    let reader = ExportReader::new(ExportReaderConfig {
        delimiter,
        header_rows: app_config.input.header_rows,
        extension: app_config.input.extension.clone(),
    });
    let pipeline = PortfolioPipeline::new(app_config.pipeline.clone(), app_config.metrics.clone());

    let outcome = pipeline
        .run_directory(&reader, &app_config.input.directory)
        .with_context(|| format!("處理目錄 '{}' 失敗", app_config.input.directory))?;

    for failure in &outcome.failures {
        warn!(account = %failure.account, "已略過: {}", failure.message);
    }

    let stdout = io::stdout();
    let mut sink = sink_for(&app_config.output.format, stdout.lock());
    for series in &outcome.reports {
        sink.write_report(&series.name, &series.report)?;
    }
    sink.finish()?;

    info!(reports = outcome.reports.len(), "報表輸出完成");
    Ok(())
}

// 命令行參數優先於配置文件
fn apply_overrides(config: &mut ApplicationConfig, cli: &Cli) {
    if let Some(dir) = &cli.dir {
        config.input.directory = dir.display().to_string();
    }
    if let Some(format) = cli.format {
        config.output.format = format.as_str().to_string();
    }
    if cli.keep_going {
        config.pipeline.fail_fast = false;
    }
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<()> {
    let level = match log_config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG 優先於配置中的級別
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    let result = if log_config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
