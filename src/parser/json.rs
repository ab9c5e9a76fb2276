//! JSON 描述符解析器
//!
//! 读取 `{ tag, children, eventListeners, propertyName, ... }` 形式的 JSON。
//! 函数无法写进 JSON，`listener` 字段是处理函数的名称，由 [`HandlerRegistry`] 解析。

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::descriptor::{
    AttributeValue, Children, Descriptor, ElementDescriptor, Entry, EventBinding, EventBindings,
};
use crate::error::{PuffError, Result};
use crate::event::{listener, Event, Listener, ListenerFlag, ListenerOptions};

/// 处理函数注册表：名称 → 监听器
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Listener>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, callback: F) -> &mut Self
    where
        F: Fn(&mut Event) + 'static,
    {
        self.insert(name, listener(callback))
    }

    /// 同名时覆盖
    pub fn insert(&mut self, name: &str, listener: Listener) -> &mut Self {
        self.handlers.insert(name.to_string(), listener);
        self
    }

    pub fn get(&self, name: &str) -> Option<Listener> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}

/// JSON → [`Descriptor`]
pub struct DescriptorParser<'a> {
    handlers: &'a HandlerRegistry,
}

impl<'a> DescriptorParser<'a> {
    pub fn new(handlers: &'a HandlerRegistry) -> Self {
        Self { handlers }
    }

    pub fn parse(&self, value: &JsonValue) -> Result<Descriptor> {
        self.parse_descriptor(value, "$")
    }

    pub fn parse_str(&self, input: &str) -> Result<Descriptor> {
        let value: JsonValue = serde_json::from_str(input)?;
        self.parse(&value)
    }

    fn parse_descriptor(&self, value: &JsonValue, path: &str) -> Result<Descriptor> {
        match value {
            JsonValue::String(text) => Ok(Descriptor::Text(text.clone())),
            // 缺省参数：等价于 {}
            JsonValue::Null => Ok(Descriptor::default()),
            JsonValue::Object(map) => Ok(Descriptor::Element(self.parse_element(map, path)?)),
            other => Err(invalid(path, format!("expected a string or an object, got {}", kind_of(other)))),
        }
    }

    fn parse_element(&self, map: &Map<String, JsonValue>, path: &str) -> Result<ElementDescriptor> {
        let mut element = ElementDescriptor::new();

        for (key, value) in map {
            let key_path = format!("{}.{}", path, key);
            match key.as_str() {
                "tag" => match value {
                    // null 视为未指定
                    JsonValue::Null => {}
                    JsonValue::String(tag) => element = element.with_tag(tag.as_str()),
                    _ => return Err(invalid(&key_path, "tag must be a string")),
                },
                "children" => {
                    let children = self.parse_children(value, &key_path)?;
                    element.push(Entry::Children(children));
                }
                "eventListeners" => {
                    let bindings = self.parse_bindings(value, &key_path)?;
                    element.push(Entry::EventListeners(bindings));
                }
                "propertyName" => {
                    let name = scalar_to_string(value)
                        .ok_or_else(|| invalid(&key_path, "propertyName must be a string"))?;
                    element.push(Entry::PropertyName(name));
                }
                _ => {
                    let value = attribute_value(value).ok_or_else(|| {
                        invalid(&key_path, format!("attribute value cannot be {}", kind_of(value)))
                    })?;
                    element.push(Entry::Attribute { key: key.clone(), value });
                }
            }
        }

        Ok(element)
    }

    fn parse_children(&self, value: &JsonValue, path: &str) -> Result<Children> {
        match value {
            JsonValue::String(text) => Ok(Children::Text(text.clone())),
            JsonValue::Object(_) => Ok(Children::Single(Box::new(self.parse_descriptor(value, path)?))),
            JsonValue::Array(items) => {
                let mut children = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    match item {
                        JsonValue::String(_) | JsonValue::Object(_) => {
                            children.push(self.parse_descriptor(item, &item_path)?);
                        }
                        other => {
                            return Err(invalid(
                                &item_path,
                                format!("child must be a string or an object, got {}", kind_of(other)),
                            ));
                        }
                    }
                }
                Ok(Children::Many(children))
            }
            other => Err(invalid(path, format!("children cannot be {}", kind_of(other)))),
        }
    }

    fn parse_bindings(&self, value: &JsonValue, path: &str) -> Result<EventBindings> {
        match value {
            JsonValue::Object(map) => Ok(EventBindings::Single(self.parse_binding(map, path)?)),
            JsonValue::Array(items) => {
                let mut bindings = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    let map = item
                        .as_object()
                        .ok_or_else(|| invalid(&item_path, "event listener must be an object"))?;
                    bindings.push(self.parse_binding(map, &item_path)?);
                }
                Ok(EventBindings::Many(bindings))
            }
            other => Err(invalid(path, format!("eventListeners cannot be {}", kind_of(other)))),
        }
    }

    fn parse_binding(&self, map: &Map<String, JsonValue>, path: &str) -> Result<EventBinding> {
        let event_type = map
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| invalid(&format!("{}.type", path), "event type must be a string"))?;

        let name = map
            .get("listener")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| invalid(&format!("{}.listener", path), "listener must be a handler name"))?;
        let callback = self
            .handlers
            .get(name)
            .ok_or_else(|| PuffError::UnknownHandler(name.to_string()))?;

        // `options || useCapture`：选项对象优先
        let flag = match map.get("options") {
            Some(options @ JsonValue::Object(_)) => {
                let options: ListenerOptions = serde_json::from_value(options.clone())
                    .map_err(|err| invalid(&format!("{}.options", path), err.to_string()))?;
                ListenerFlag::Options(options)
            }
            Some(JsonValue::Bool(true)) => ListenerFlag::UseCapture(true),
            _ => match map.get("useCapture") {
                Some(JsonValue::Bool(capture)) => ListenerFlag::UseCapture(*capture),
                _ => ListenerFlag::default(),
            },
        };

        Ok(EventBinding {
            event_type: event_type.to_string(),
            listener: callback,
            options: flag,
        })
    }
}

impl Descriptor {
    /// 不含事件监听器的 JSON 描述符
    pub fn from_json_str(input: &str) -> Result<Self> {
        DescriptorParser::new(&HandlerRegistry::default()).parse_str(input)
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> PuffError {
    PuffError::InvalidDescriptor {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn attribute_value(value: &JsonValue) -> Option<AttributeValue> {
    match value {
        JsonValue::String(s) => Some(AttributeValue::Text(s.clone())),
        JsonValue::Bool(b) => Some(AttributeValue::Bool(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(AttributeValue::Integer(i)),
            None => n.as_f64().map(AttributeValue::Float),
        },
        _ => None,
    }
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple() {
        let desc = Descriptor::from_json_str(r#"{"tag": "h1", "class": "title", "children": "Hello"}"#).unwrap();

        let Descriptor::Element(el) = desc else {
            panic!("expected an element descriptor");
        };
        assert_eq!(el.tag(), Some("h1"));
        assert_eq!(el.entries().len(), 2);
        assert!(matches!(&el.entries()[0], Entry::Attribute { key, .. } if key == "class"));
        assert!(matches!(&el.entries()[1], Entry::Children(Children::Text(t)) if t == "Hello"));
    }

    #[test]
    fn test_unknown_handler() {
        let value = json!({ "eventListeners": { "type": "click", "listener": "missing" } });
        let err = DescriptorParser::new(&HandlerRegistry::new()).parse(&value).unwrap_err();
        assert!(matches!(err, PuffError::UnknownHandler(name) if name == "missing"));
    }
}
