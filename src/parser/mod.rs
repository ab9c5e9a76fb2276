//! 描述符解析器

pub mod json;

pub use json::{DescriptorParser, HandlerRegistry};
