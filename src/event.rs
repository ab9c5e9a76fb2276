//! 事件系统 - 监听器注册与派发

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::dom::Node;

/// 事件监听器。以 `Rc` 的指针身份区分同一个监听器。
pub type Listener = Rc<dyn Fn(&mut Event)>;

/// 把闭包包装为 [`Listener`]
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&mut Event) + 'static,
{
    Rc::new(callback)
}

/// 监听器选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenerOptions {
    /// 在捕获阶段触发
    pub capture: bool,
    /// 触发一次后自动移除
    pub once: bool,
    /// 监听器内的 `prevent_default` 无效
    pub passive: bool,
}

/// 选项对象，或旧式的 `useCapture` 布尔值，两者可互换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFlag {
    Options(ListenerOptions),
    UseCapture(bool),
}

impl ListenerFlag {
    pub fn normalize(self) -> ListenerOptions {
        match self {
            Self::Options(options) => options,
            Self::UseCapture(capture) => ListenerOptions {
                capture,
                ..ListenerOptions::default()
            },
        }
    }
}

impl Default for ListenerFlag {
    fn default() -> Self {
        Self::Options(ListenerOptions::default())
    }
}

impl From<ListenerOptions> for ListenerFlag {
    fn from(options: ListenerOptions) -> Self {
        Self::Options(options)
    }
}

impl From<bool> for ListenerFlag {
    fn from(capture: bool) -> Self {
        Self::UseCapture(capture)
    }
}

/// 事件阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// 派发中的事件
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Option<Node>,
    current_target: Option<Node>,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    in_passive_listener: bool,
}

impl Event {
    /// 默认不冒泡、不可取消
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: false,
            cancelable: false,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            in_passive_listener: false,
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn target(&self) -> Option<&Node> {
        self.target.as_ref()
    }

    pub fn current_target(&self) -> Option<&Node> {
        self.current_target.as_ref()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn prevent_default(&mut self) {
        if self.in_passive_listener {
            tracing::warn!(
                event = %self.event_type,
                "prevent_default ignored inside a passive listener"
            );
            return;
        }
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

#[derive(Clone)]
pub(crate) struct RegisteredListener {
    event_type: String,
    callback: Listener,
    options: ListenerOptions,
    /// 派发途中被移除的监听器不再触发
    removed: Rc<Cell<bool>>,
}

/// 单个节点上的监听器，按注册顺序保存
#[derive(Default)]
pub(crate) struct ListenerStore {
    listeners: Vec<RegisteredListener>,
}

impl ListenerStore {
    fn position(&self, event_type: &str, callback: &Listener, capture: bool) -> Option<usize> {
        self.listeners.iter().position(|l| {
            l.event_type == event_type
                && l.options.capture == capture
                && Rc::ptr_eq(&l.callback, callback)
        })
    }

    /// 相同类型、相同监听器、相同 capture 的重复注册被忽略
    fn add(&mut self, event_type: &str, callback: Listener, options: ListenerOptions) -> bool {
        if self.position(event_type, &callback, options.capture).is_some() {
            return false;
        }
        self.listeners.push(RegisteredListener {
            event_type: event_type.to_string(),
            callback,
            options,
            removed: Rc::new(Cell::new(false)),
        });
        true
    }

    fn remove(&mut self, event_type: &str, callback: &Listener, capture: bool) -> bool {
        match self.position(event_type, callback, capture) {
            Some(pos) => {
                let removed = self.listeners.remove(pos);
                removed.removed.set(true);
                true
            }
            None => false,
        }
    }

    fn matching(&self, event_type: &str, capture: bool) -> Vec<RegisteredListener> {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type && l.options.capture == capture)
            .cloned()
            .collect()
    }

    fn count(&self, event_type: &str) -> usize {
        self.listeners.iter().filter(|l| l.event_type == event_type).count()
    }
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.listeners.iter().map(|l| (&l.event_type, l.options)))
            .finish()
    }
}

impl Node {
    /// 注册监听器；返回是否新增
    pub fn add_event_listener(
        &self,
        event_type: &str,
        callback: Listener,
        flag: impl Into<ListenerFlag>,
    ) -> bool {
        let options = flag.into().normalize();
        self.0.borrow_mut().listeners.add(event_type, callback, options)
    }

    pub fn remove_event_listener(&self, event_type: &str, callback: &Listener, capture: bool) -> bool {
        self.0.borrow_mut().listeners.remove(event_type, callback, capture)
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0.borrow().listeners.count(event_type)
    }

    /// 派发事件：捕获 → 目标 → 冒泡。返回值为 `!default_prevented`。
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        event.target = Some(self.clone());
        event.default_prevented = false;
        event.propagation_stopped = false;
        event.immediate_propagation_stopped = false;

        let mut path = Vec::new();
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            cursor = node.parent();
            path.push(node);
        }
        path.reverse();

        self.run_phases(&path, event);

        event.phase = EventPhase::None;
        event.current_target = None;
        !event.default_prevented
    }

    fn run_phases(&self, ancestors: &[Node], event: &mut Event) {
        event.phase = EventPhase::Capturing;
        for node in ancestors {
            node.invoke_listeners(event, true);
            if event.propagation_stopped {
                return;
            }
        }

        // 目标阶段：先捕获监听器，再非捕获监听器
        event.phase = EventPhase::AtTarget;
        self.invoke_listeners(event, true);
        if event.propagation_stopped {
            return;
        }
        self.invoke_listeners(event, false);
        if event.propagation_stopped || !event.bubbles {
            return;
        }

        event.phase = EventPhase::Bubbling;
        for node in ancestors.iter().rev() {
            node.invoke_listeners(event, false);
            if event.propagation_stopped {
                return;
            }
        }
    }

    fn invoke_listeners(&self, event: &mut Event, capture: bool) {
        event.current_target = Some(self.clone());
        // 快照：监听器可能修改树或监听器列表
        let snapshot = self.0.borrow().listeners.matching(&event.event_type, capture);

        for registered in snapshot {
            if registered.removed.get() {
                continue;
            }
            if registered.options.once {
                self.remove_event_listener(&registered.event_type, &registered.callback, capture);
            }

            tracing::trace!(event = %event.event_type, node = %self.node_name(), capture, "invoke listener");
            event.in_passive_listener = registered.options.passive;
            (registered.callback)(event);
            event.in_passive_listener = false;

            if event.immediate_propagation_stopped {
                break;
            }
        }
    }
}
