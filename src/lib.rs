//! Puff Element - 声明式元素构建器
//! 把嵌套的描述符（标签、属性、子节点、事件绑定、命名引用）编译为节点树

// 错误与配置
pub mod error;
pub mod config;

// 节点树
pub mod dom;

// 事件系统
pub mod event;

// 描述符与 JSON 解析器
pub mod descriptor;
pub mod parser;

// 编译器
pub mod compiler;

pub use compiler::{compile, materialize, CompiledNode, Compiler};
pub use config::{BuilderConfig, UnderscorePolicy, DEFAULT_TAG, PROPERTY_ATTRIBUTE};
pub use descriptor::{
    AttributeValue, Children, Descriptor, ElementDescriptor, Entry, EventBinding, EventBindings,
};
pub use dom::{Node, NodeType};
pub use error::{PuffError, Result};
pub use event::{listener, Event, EventPhase, Listener, ListenerFlag, ListenerOptions};
pub use parser::{DescriptorParser, HandlerRegistry};

// 单元测试
#[cfg(test)]
mod tests;
