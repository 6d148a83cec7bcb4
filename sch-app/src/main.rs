use std::path::PathBuf;

use sch_config::{AppConfig, ConfigError};
use sch_frontend::CliOptions;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const USAGE: &str = "用法: sch-app [--config <文件>] [--json] [--command <命令>]... [原理图文件]";

fn main() {
    let mut args = std::env::args().skip(1);
    let mut options = CliOptions::default();
    let mut config_override: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("`--config` 需要提供配置文件路径");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            "--command" => {
                let Some(command) = args.next() else {
                    eprintln!("`--command` 需要提供命令文本");
                    std::process::exit(1);
                };
                options.commands.push(command);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return;
            }
            other if other.starts_with("--") => {
                eprintln!("未知参数：{other}\n{USAGE}");
                std::process::exit(1);
            }
            path => {
                if options.path.replace(PathBuf::from(path)).is_some() {
                    eprintln!("只能指定一个原理图文件\n{USAGE}");
                    std::process::exit(1);
                }
            }
        }
    }

    let config = load_configuration(config_override);
    init_logging(&config);
    info!(policy = ?config.loader.policy, "启动原理图 CLI");

    if let Err(err) = sch_frontend::run_cli(&options, &config) {
        error!(error = %err, "执行 CLI 失败");
        std::process::exit(1);
    }
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

/// `RUST_LOG` 优先于配置中的等级。
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
