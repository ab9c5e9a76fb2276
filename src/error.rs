//! 错误类型

use thiserror::Error;

/// 构建器错误
#[derive(Debug, Error)]
pub enum PuffError {
    /// JSON 值不是合法的描述符
    #[error("invalid descriptor at `{path}`: {reason}")]
    InvalidDescriptor { path: String, reason: String },

    /// 监听器名称未注册
    #[error("no event handler registered under `{0}`")]
    UnknownHandler(String),

    #[error("unsupported selector `{0}`")]
    InvalidSelector(String),

    /// 非法的树操作（环、向文本节点追加子节点等）
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("`{0}` is only supported on element nodes")]
    NotAnElement(&'static str),

    #[error("the node to be removed is not a child of this node")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PuffError>;
