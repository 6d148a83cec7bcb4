use std::env;
use std::path::{Path, PathBuf};

use sch_config::{AppConfig, RecordErrorPolicy};
use sch_engine::document::{DemoItems, SchematicDocument, ToolStyle};
use sch_io::{GedaFacade, LoadPolicy, ParseError, SchematicLoader};
use tracing::{info, warn};

use crate::errors::FrontendError;

/// 未指定文件时尝试加载的示例原理图路径。
pub const SAMPLE_ENV_VAR: &str = "SCH_CLI_SAMPLE";

/// 文档来源，便于前端呈现加载信息。
#[derive(Debug, Clone)]
pub enum DocumentSource {
    File(PathBuf),
    Demo,
}

/// 统一封装加载后的文档与元信息。
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: SchematicDocument,
    pub source: DocumentSource,
    pub demo_items: Option<DemoItems>,
    /// 按 `skip` 策略跳过的记录。
    pub skipped: Vec<ParseError>,
}

pub fn load_policy(config: &AppConfig) -> LoadPolicy {
    match config.loader.policy {
        RecordErrorPolicy::Abort => LoadPolicy::Abort,
        RecordErrorPolicy::Skip => LoadPolicy::Skip,
    }
}

pub fn tool_style(config: &AppConfig) -> ToolStyle {
    ToolStyle {
        color: config.tools.color,
        line_width: config.tools.line_width,
    }
}

/// 加载显式指定的原理图文件，错误直接返回。
pub fn load_file(path: &Path, config: &AppConfig) -> Result<LoadedDocument, FrontendError> {
    let report = GedaFacade::new(load_policy(config)).load(path)?;
    for error in &report.skipped {
        warn!(path = %path.display(), line = error.line(), error = %error, "记录已跳过");
    }
    Ok(LoadedDocument {
        document: SchematicDocument::with_schematic(report.schematic, Some(path.to_path_buf())),
        source: DocumentSource::File(path.to_path_buf()),
        demo_items: None,
        skipped: report.skipped,
    })
}

/// 构建演示文档，工具样式取自配置。
pub fn load_demo(config: &AppConfig) -> LoadedDocument {
    let mut document = SchematicDocument::new();
    let demo_items = document.populate_demo_with_style(tool_style(config));
    // 选中圆与文字，便于展示选中集范围。
    let _ = document.select(demo_items.pad);
    let _ = document.select(demo_items.label);
    LoadedDocument {
        document,
        source: DocumentSource::Demo,
        demo_items: Some(demo_items),
        skipped: Vec::new(),
    }
}

/// 依次尝试显式路径、环境变量 `SCH_CLI_SAMPLE` 与配置中的默认文件，
/// 后两者失败时回退到内置演示。
pub fn load_document(
    path: Option<&Path>,
    config: &AppConfig,
) -> Result<LoadedDocument, FrontendError> {
    if let Some(path) = path {
        return load_file(path, config);
    }

    let fallback = env::var_os(SAMPLE_ENV_VAR)
        .map(PathBuf::from)
        .or_else(|| config.loader.default_file.clone());
    if let Some(path) = fallback {
        match load_file(&path, config) {
            Ok(loaded) => {
                info!(path = %path.display(), "从示例文件加载原理图成功");
                return Ok(loaded);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载示例文件失败，回退到内置演示");
            }
        }
    }

    Ok(load_demo(config))
}

/// 从文档的来源文件重新加载，返回被跳过的记录。
pub fn reload_document(
    document: &mut SchematicDocument,
    config: &AppConfig,
) -> Result<Vec<ParseError>, FrontendError> {
    let path = document
        .source_path()
        .map(Path::to_path_buf)
        .ok_or(FrontendError::NoSourcePath)?;
    let report = GedaFacade::new(load_policy(config)).load(&path)?;
    document.reload(report.schematic);
    info!(path = %path.display(), items = document.schematic().len(), "原理图已重新加载");
    Ok(report.skipped)
}
