//! 描述符 - 描述一个元素及其子树的纯数据

use std::fmt;

use crate::event::{listener, Event, Listener, ListenerFlag, ListenerOptions};

/// 描述符：文本，或结构化的元素描述
#[derive(Debug, Clone)]
pub enum Descriptor {
    Text(String),
    Element(ElementDescriptor),
}

impl Default for Descriptor {
    /// 等价于 `{}`：默认标签的空元素
    fn default() -> Self {
        Self::Element(ElementDescriptor::default())
    }
}

impl From<&str> for Descriptor {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ElementDescriptor> for Descriptor {
    fn from(element: ElementDescriptor) -> Self {
        Self::Element(element)
    }
}

/// 元素描述。`tag` 之外的键按声明顺序保存，编译时单遍处理。
#[derive(Debug, Clone, Default)]
pub struct ElementDescriptor {
    tag: Option<String>,
    entries: Vec<Entry>,
}

/// 元素描述中的一个键
#[derive(Debug, Clone)]
pub enum Entry {
    Children(Children),
    EventListeners(EventBindings),
    PropertyName(String),
    /// 其他键一律视为属性
    Attribute { key: String, value: AttributeValue },
}

/// `children` 的三种形态
#[derive(Debug, Clone)]
pub enum Children {
    /// 直接作为文本内容，覆盖已有子节点
    Text(String),
    Single(Box<Descriptor>),
    Many(Vec<Descriptor>),
}

/// `eventListeners` 的两种形态
#[derive(Debug, Clone)]
pub enum EventBindings {
    Single(EventBinding),
    Many(Vec<EventBinding>),
}

impl EventBindings {
    pub fn iter(&self) -> impl Iterator<Item = &EventBinding> {
        let slice: &[EventBinding] = match self {
            Self::Single(binding) => std::slice::from_ref(binding),
            Self::Many(bindings) => bindings,
        };
        slice.iter()
    }
}

/// 一个事件绑定：类型、监听器、选项
#[derive(Clone)]
pub struct EventBinding {
    pub event_type: String,
    pub listener: Listener,
    pub options: ListenerFlag,
}

impl EventBinding {
    pub fn new<F>(event_type: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        Self::from_listener(event_type, listener(callback))
    }

    pub fn from_listener(event_type: impl Into<String>, listener: Listener) -> Self {
        Self {
            event_type: event_type.into(),
            listener,
            options: ListenerFlag::default(),
        }
    }

    pub fn with_options(mut self, options: ListenerOptions) -> Self {
        self.options = ListenerFlag::Options(options);
        self
    }

    /// 旧式 `useCapture` 参数
    pub fn with_use_capture(mut self, capture: bool) -> Self {
        self.options = ListenerFlag::UseCapture(capture);
        self
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("event_type", &self.event_type)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// 属性值，设置时转为字符串
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl ElementDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定标签的空描述
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::new().with_tag(tag)
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push(Entry::Children(Children::Text(text.into())));
        self
    }

    pub fn with_child(mut self, child: impl Into<Descriptor>) -> Self {
        self.push(Entry::Children(Children::Single(Box::new(child.into()))));
        self
    }

    pub fn with_children<I, D>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Descriptor>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(Entry::Children(Children::Many(children)));
        self
    }

    pub fn with_listener(mut self, binding: EventBinding) -> Self {
        self.push(Entry::EventListeners(EventBindings::Single(binding)));
        self
    }

    pub fn with_listeners(mut self, bindings: impl IntoIterator<Item = EventBinding>) -> Self {
        self.push(Entry::EventListeners(EventBindings::Many(bindings.into_iter().collect())));
        self
    }

    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        self.push(Entry::PropertyName(name.into()));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.push(Entry::Attribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}
