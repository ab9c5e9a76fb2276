//! 轻量节点树 - 构建器写入的“文档”

pub mod node;
pub mod selector;
mod serialize;

pub use node::{Node, NodeType};
pub use selector::Selector;
