use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error(transparent)]
    Io(#[from] sch_io::IoError),
    #[error("导出 JSON 失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("文档没有关联的来源文件，无法重新加载")]
    NoSourcePath,
    #[error("命令 `{name}` 执行失败: {message}")]
    Command { name: String, message: String },
}
