//! 节点 - 可共享、可变的元素与文本节点

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{PuffError, Result};
use crate::event::ListenerStore;

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
}

pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

pub(crate) struct ElementData {
    pub(crate) tag_name: String,
    /// 按设置顺序保存；重复设置原位替换
    pub(crate) attributes: Vec<(String, String)>,
}

pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<Weak<RefCell<NodeData>>>,
    pub(crate) children: Vec<Node>,
    pub(crate) listeners: ListenerStore,
}

/// 节点句柄。克隆句柄得到的是同一个节点的别名，而不是副本。
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: ListenerStore::default(),
        })))
    }

    /// 创建元素节点，标签名原样保留
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Element(ElementData {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
        }))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Text(value.into()))
    }

    /// 两个句柄是否指向同一个节点
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn node_type(&self) -> NodeType {
        match self.0.borrow().kind {
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// 文本节点为 `#text`，元素为标签名
    pub fn node_name(&self) -> String {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.tag_name.clone(),
            NodeKind::Text(_) => "#text".to_string(),
        }
    }

    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(el.tag_name.clone()),
            NodeKind::Text(_) => None,
        }
    }

    // ---- 属性 ----

    fn with_element<R>(&self, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(f(el)),
            NodeKind::Text(_) => None,
        }
    }

    fn with_element_mut<R>(&self, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element(el) => Some(f(el)),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.with_element_mut(|el| {
            match el.attributes.iter().position(|(k, _)| k == name) {
                Some(pos) => el.attributes[pos].1 = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
        })
        .ok_or(PuffError::NotAnElement("setAttribute"))
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.with_element(|el| {
            el.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// 返回被移除的旧值
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.with_element_mut(|el| {
            let pos = el.attributes.iter().position(|(k, _)| k == name)?;
            Some(el.attributes.remove(pos).1)
        })
        .flatten()
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.with_element(|el| el.attributes.clone()).unwrap_or_default()
    }

    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    pub fn set_class_name(&self, value: &str) -> Result<()> {
        self.set_attribute("class", value)
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_name().split_whitespace().any(|c| c == class_name)
    }

    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    /// `dataset` 读取：`puffPropertyName` → `data-puff-property-name`
    pub fn dataset(&self, key: &str) -> Option<String> {
        let mut name = String::from("data-");
        for c in key.chars() {
            if c.is_ascii_uppercase() {
                name.push('-');
                name.push(c.to_ascii_lowercase());
            } else {
                name.push(c);
            }
        }
        self.get_attribute(&name)
    }

    // ---- 树结构 ----

    pub fn parent(&self) -> Option<Node> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Node)
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// 仅元素子节点
    pub fn children(&self) -> Vec<Node> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|c| c.is_element())
            .cloned()
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.borrow().children.first().cloned()
    }

    pub fn last_child(&self) -> Option<Node> {
        self.0.borrow().children.last().cloned()
    }

    pub fn first_element_child(&self) -> Option<Node> {
        self.0.borrow().children.iter().find(|c| c.is_element()).cloned()
    }

    /// 是否为 `other` 本身或其祖先
    pub fn contains(&self, other: &Node) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(self) {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// 追加子节点；若子节点已有父节点则先从原位置移除
    pub fn append_child(&self, child: &Node) -> Result<()> {
        if !self.is_element() {
            return Err(PuffError::HierarchyRequest(
                "text nodes cannot have children".to_string(),
            ));
        }
        if child.contains(self) {
            return Err(PuffError::HierarchyRequest(
                "appendChild would create a cycle".to_string(),
            ));
        }

        child.detach();
        self.adopt(child.clone());
        Ok(())
    }

    pub fn remove_child(&self, child: &Node) -> Result<Node> {
        let pos = self
            .0
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
            .ok_or(PuffError::NotFound)?;
        let removed = self.0.borrow_mut().children.remove(pos);
        removed.0.borrow_mut().parent = None;
        Ok(removed)
    }

    /// 从父节点中移除自身
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
        self.0.borrow_mut().parent = None;
    }

    /// 追加一个新建且无父节点的子节点，跳过检查
    pub(crate) fn adopt(&self, child: Node) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child);
    }

    fn clear_children(&self) {
        let old = std::mem::take(&mut self.0.borrow_mut().children);
        for child in old {
            child.0.borrow_mut().parent = None;
        }
    }

    // ---- 文本 ----

    pub fn node_value(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Text(value) => Some(value.clone()),
            NodeKind::Element(_) => None,
        }
    }

    /// 元素上调用无效果
    pub fn set_node_value(&self, value: &str) {
        if let NodeKind::Text(text) = &mut self.0.borrow_mut().kind {
            *text = value.to_string();
        }
    }

    /// 所有后代文本按文档顺序拼接
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(value) => value.clone(),
            NodeKind::Element(_) => data.children.iter().map(Node::text_content).collect(),
        }
    }

    /// 用单个文本节点替换全部子节点；空字符串时不留子节点
    pub fn set_text_content(&self, value: &str) {
        if self.is_text() {
            self.set_node_value(value);
            return;
        }
        self.clear_children();
        if !value.is_empty() {
            self.adopt(Node::text(value));
        }
    }

    /// 即使文本为空也保留一个文本子节点
    pub(crate) fn replace_children_with_text(&self, value: &str) {
        self.clear_children();
        self.adopt(Node::text(value));
    }

    /// 先序遍历所有后代（不含自身）
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Node> = self.child_nodes().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.child_nodes().into_iter().rev());
            out.push(node);
        }
        out
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.borrow().kind {
            NodeKind::Text(value) => f.debug_tuple("Text").field(value).finish(),
            NodeKind::Element(el) => f
                .debug_struct("Element")
                .field("tag_name", &el.tag_name)
                .field("attributes", &el.attributes)
                .field("children", &self.0.borrow().children)
                .finish(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}
