use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use sch_core::schematic::{FileVersion, Schematic};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod factories;
pub mod path_data;
pub mod reader;
pub mod registry;
pub mod writer;

pub use reader::{Record, RecordReader};
pub use registry::{FactoryRegistry, ItemFactory};
pub use writer::{
    Cancellable, IoPriority, WriteCompletion, WriteItem, write_schematic, write_schematic_async,
};

/// 版本记录的类型标记。
pub const VERSION_TOKEN: &str = "v";

/// 单条记录的解析错误，均携带出错的行号（从 1 开始）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unknown record token `{token}`")]
    UnknownToken { line: usize, token: String },
    #[error("line {line}: `{token}` record is missing field `{field}`")]
    MissingField {
        line: usize,
        token: String,
        field: &'static str,
    },
    #[error("line {line}: field `{field}` has malformed value `{value}`")]
    MalformedField {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: field `{field}` has unsupported code {code}")]
    BadCode {
        line: usize,
        field: &'static str,
        code: i32,
    },
    #[error("line {line}: `{token}` record has an incomplete {block} block ({found} fields)")]
    PartialBlock {
        line: usize,
        token: String,
        block: &'static str,
        found: usize,
    },
    #[error("line {line}: `{token}` record has {extra} unexpected trailing fields")]
    TrailingFields {
        line: usize,
        token: String,
        extra: usize,
    },
    #[error("line {line}: `{token}` record expects {expected} continuation lines, found {found}")]
    Truncated {
        line: usize,
        token: String,
        expected: usize,
        found: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownToken { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::MalformedField { line, .. }
            | ParseError::BadCode { line, .. }
            | ParseError::PartialBlock { line, .. }
            | ParseError::TrailingFields { line, .. }
            | ParseError::Truncated { line, .. } => *line,
        }
    }
}

/// 单个图元写出失败的原因。取消与 I/O 失败是两种不同的结果。
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("write was cancelled")]
    Cancelled,
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// 遇到无法解析的记录时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// 在第一条错误记录处停止。
    #[default]
    Abort,
    /// 记录警告并跳过错误记录。
    Skip,
}

/// 解析结果：原理图与被跳过的记录。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub schematic: Schematic,
    pub skipped: Vec<ParseError>,
}

impl LoadReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct SchematicReader<'r> {
    registry: &'r FactoryRegistry,
    policy: LoadPolicy,
}

impl<'r> SchematicReader<'r> {
    pub fn new(registry: &'r FactoryRegistry, policy: LoadPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn read_str(&self, source: &str) -> Result<LoadReport, ParseError> {
        let mut reader = RecordReader::new(source);
        let mut report = LoadReport::default();

        while let Some(record) = reader.next_record() {
            let outcome = if record.token == VERSION_TOKEN {
                parse_version(&record).map(|version| {
                    report.schematic.set_version(Some(version));
                })
            } else {
                self.registry
                    .dispatch(&record, &mut reader)
                    .map(|item| {
                        report.schematic.add_item(item);
                    })
            };

            if let Err(err) = outcome {
                match self.policy {
                    LoadPolicy::Abort => return Err(err),
                    LoadPolicy::Skip => {
                        warn!(line = err.line(), error = %err, "跳过无法解析的记录");
                        report.skipped.push(err);
                    }
                }
            }
        }

        debug!(
            items = report.schematic.len(),
            skipped = report.skipped.len(),
            "原理图解析完成"
        );
        Ok(report)
    }
}

fn parse_version(record: &Record<'_>) -> Result<FileVersion, ParseError> {
    let mut cursor = record.cursor();
    let date = cursor.next_u32("date")?;
    let file_format = cursor.next_u32("file format")?;
    cursor.finish()?;
    Ok(FileVersion::new(date, file_format))
}

pub trait SchematicLoader {
    fn load(&self, path: &Path) -> Result<LoadReport, IoError>;
}

pub trait SchematicSaver {
    fn save(&self, schematic: &Schematic, path: &Path) -> Result<(), IoError>;
}

/// 旧式 gEDA 文本格式的读写入口。
#[derive(Debug)]
pub struct GedaFacade {
    registry: FactoryRegistry,
    policy: LoadPolicy,
}

impl GedaFacade {
    pub fn new(policy: LoadPolicy) -> Self {
        Self::with_registry(FactoryRegistry::with_defaults(), policy)
    }

    pub fn with_registry(registry: FactoryRegistry, policy: LoadPolicy) -> Self {
        Self { registry, policy }
    }

    #[inline]
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    #[inline]
    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn read_str(&self, source: &str) -> Result<LoadReport, ParseError> {
        SchematicReader::new(&self.registry, self.policy).read_str(source)
    }
}

impl Default for GedaFacade {
    fn default() -> Self {
        Self::new(LoadPolicy::default())
    }
}

impl SchematicLoader for GedaFacade {
    fn load(&self, path: &Path) -> Result<LoadReport, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.read_str(&data).map_err(|source| IoError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            items = report.schematic.len(),
            skipped = report.skipped.len(),
            "已加载原理图"
        );
        Ok(report)
    }
}

impl SchematicSaver for GedaFacade {
    fn save(&self, schematic: &Schematic, path: &Path) -> Result<(), IoError> {
        let write_error = |source| IoError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        write_schematic(schematic, &mut writer).map_err(write_error)?;
        info!(path = %path.display(), items = schematic.len(), "已保存原理图");
        Ok(())
    }
}

pub fn load_path(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<LoadReport, IoError> {
    GedaFacade::new(policy).load(path.as_ref())
}

pub fn save_path(schematic: &Schematic, path: impl AsRef<Path>) -> Result<(), IoError> {
    GedaFacade::default().save(schematic, path.as_ref())
}
