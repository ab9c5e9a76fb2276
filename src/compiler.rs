//! 描述符编译器 - 深度优先地把描述符物化为节点树

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::BuilderConfig;
use crate::descriptor::{Children, Descriptor, ElementDescriptor, Entry};
use crate::dom::Node;
use crate::error::Result;

static DEFAULT_COMPILER: Lazy<Compiler> = Lazy::new(Compiler::default);

/// 编译结果：构建出的节点，以及按名称登记的后代。
///
/// `properties` 中的条目与树中的节点是同一对象的别名，
/// 通过任一方修改节点，另一方都能看到。节点通过 [`CompiledNode::node`] 显式访问。
#[derive(Debug, Clone)]
pub struct CompiledNode {
    node: Node,
    properties: HashMap<String, CompiledNode>,
}

impl CompiledNode {
    fn new(node: Node) -> Self {
        Self {
            node,
            properties: HashMap::new(),
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    /// 子树中所有声明了 `propertyName` 的后代，扁平化
    pub fn properties(&self) -> &HashMap<String, CompiledNode> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&CompiledNode> {
        self.properties.get(name)
    }

    /// 排序后的属性名
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// 描述符编译器
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: BuilderConfig,
}

impl Compiler {
    pub fn new(config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn compile(&self, descriptor: &Descriptor) -> CompiledNode {
        match descriptor {
            Descriptor::Text(text) => CompiledNode::new(Node::text(text.as_str())),
            Descriptor::Element(element) => self.compile_element(element),
        }
    }

    /// 只取节点，丢弃 `properties`
    pub fn materialize(&self, descriptor: &Descriptor) -> Node {
        self.compile(descriptor).into_node()
    }

    fn compile_element(&self, descriptor: &ElementDescriptor) -> CompiledNode {
        // 空标签与未指定相同
        let tag = descriptor
            .tag()
            .filter(|tag| !tag.is_empty())
            .unwrap_or(self.config.default_tag.as_str());
        let mut compiled = CompiledNode::new(Node::element(tag));

        for entry in descriptor.entries() {
            match entry {
                Entry::Children(children) => self.add_children(&mut compiled, children),
                Entry::EventListeners(bindings) => {
                    for binding in bindings.iter() {
                        tracing::trace!(tag, event = %binding.event_type, "add event listener");
                        compiled.node.add_event_listener(
                            &binding.event_type,
                            binding.listener.clone(),
                            binding.options,
                        );
                    }
                }
                Entry::PropertyName(name) => {
                    self.set_attribute(&compiled.node, &self.config.property_attribute, name);
                }
                Entry::Attribute { key, value } => {
                    let name = self.config.underscores.attribute_name(key);
                    self.set_attribute(&compiled.node, &name, &value.to_string());
                }
            }
        }

        tracing::debug!(tag, properties = compiled.properties.len(), "compiled element");
        compiled
    }

    fn add_children(&self, parent: &mut CompiledNode, children: &Children) {
        match children {
            Children::Text(text) => {
                tracing::trace!(text = %text, "set text content");
                parent.node.replace_children_with_text(text);
                // 被替换的子节点已脱离树，其名称一并移除
                let root = &parent.node;
                parent.properties.retain(|name, property| {
                    let live = root.contains(&property.node);
                    if !live {
                        tracing::debug!(name = %name, "drop property of replaced child");
                    }
                    live
                });
            }
            Children::Single(child) => self.add_child(parent, child),
            Children::Many(children) => {
                for child in children {
                    self.add_child(parent, child);
                }
            }
        }
    }

    fn add_child(&self, parent: &mut CompiledNode, descriptor: &Descriptor) {
        let child = self.compile(descriptor);
        parent.node.adopt(child.node.clone());
        self.register_properties(parent, child);
    }

    /// 登记子节点自身的名称，再合并其整个 `properties`；同名后写覆盖先写
    fn register_properties(&self, parent: &mut CompiledNode, child: CompiledNode) {
        let own_name = child.node.get_attribute(&self.config.property_attribute);
        let nested = child.properties.clone();

        if let Some(name) = own_name {
            insert_property(&mut parent.properties, name, child);
        }
        for (name, node) in nested {
            insert_property(&mut parent.properties, name, node);
        }
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) {
        tracing::trace!(name, value, "set attribute");
        // 节点由编译器新建，必为元素
        if let Err(err) = node.set_attribute(name, value) {
            tracing::warn!(%err, name, "failed to set attribute");
        }
    }
}

fn insert_property(properties: &mut HashMap<String, CompiledNode>, name: String, node: CompiledNode) {
    if properties.contains_key(&name) {
        tracing::debug!(name = %name, "property name registered twice, last one wins");
    }
    properties.insert(name, node);
}

/// 使用默认配置编译
pub fn compile(descriptor: &Descriptor) -> CompiledNode {
    DEFAULT_COMPILER.compile(descriptor)
}

/// 使用默认配置编译并只返回节点
pub fn materialize(descriptor: &Descriptor) -> Node {
    DEFAULT_COMPILER.materialize(descriptor)
}
