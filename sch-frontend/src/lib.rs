pub mod cli;
pub mod errors;
pub mod loader;

use errors::FrontendError;
use sch_config::AppConfig;
use tracing::info;

pub use cli::CliOptions;

/// 运行 CLI 前端：加载文档（或构建演示）并打印概览。
pub fn run_cli(options: &CliOptions, config: &AppConfig) -> Result<(), FrontendError> {
    info!(json = options.json, "启动 CLI 前端");
    let output = cli::run(options, config)?;
    println!("{output}");
    Ok(())
}
