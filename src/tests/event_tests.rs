//! 事件派发单元测试

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Node;
use crate::event::{listener, Event, EventPhase, ListenerOptions};

type Log = Rc<RefCell<Vec<String>>>;

/// 辅助函数：记录 “标签:阶段” 的监听器
fn recorder(log: &Log, label: &'static str) -> crate::event::Listener {
    let log = log.clone();
    listener(move |event: &mut Event| {
        log.borrow_mut().push(format!("{}:{:?}", label, event.phase()));
    })
}

/// 辅助函数：outer > inner > target
fn create_chain() -> (Node, Node, Node) {
    let outer = Node::element("section");
    let inner = Node::element("div");
    let target = Node::element("button");
    outer.append_child(&inner).unwrap();
    inner.append_child(&target).unwrap();
    (outer, inner, target)
}

#[test]
fn test_capture_target_bubble_order() {
    let log: Log = Rc::default();
    let (outer, inner, target) = create_chain();

    outer.add_event_listener("click", recorder(&log, "outer-bubble"), false);
    outer.add_event_listener("click", recorder(&log, "outer-capture"), true);
    inner.add_event_listener("click", recorder(&log, "inner-capture"), true);
    target.add_event_listener("click", recorder(&log, "target-bubble"), false);
    target.add_event_listener("click", recorder(&log, "target-capture"), true);

    target.dispatch_event(&mut Event::new("click").with_bubbles(true));

    assert_eq!(
        *log.borrow(),
        vec![
            "outer-capture:Capturing",
            "inner-capture:Capturing",
            "target-capture:AtTarget",
            "target-bubble:AtTarget",
            "outer-bubble:Bubbling",
        ]
    );
}

#[test]
fn test_non_bubbling_event_stays_at_target() {
    let log: Log = Rc::default();
    let (outer, _inner, target) = create_chain();

    outer.add_event_listener("click", recorder(&log, "outer"), false);
    target.add_event_listener("click", recorder(&log, "target"), false);

    target.dispatch_event(&mut Event::new("click"));
    assert_eq!(*log.borrow(), vec!["target:AtTarget"]);
}

#[test]
fn test_stop_propagation() {
    let log: Log = Rc::default();
    let (outer, inner, target) = create_chain();

    inner.add_event_listener(
        "click",
        listener(|event: &mut Event| event.stop_propagation()),
        true,
    );
    outer.add_event_listener("click", recorder(&log, "outer"), true);
    target.add_event_listener("click", recorder(&log, "target"), false);

    target.dispatch_event(&mut Event::new("click").with_bubbles(true));
    assert_eq!(*log.borrow(), vec!["outer:Capturing"]);
}

#[test]
fn test_stop_immediate_propagation() {
    let log: Log = Rc::default();
    let node = Node::element("div");

    node.add_event_listener("click", recorder(&log, "first"), false);
    node.add_event_listener(
        "click",
        listener(|event: &mut Event| event.stop_immediate_propagation()),
        false,
    );
    node.add_event_listener("click", recorder(&log, "third"), false);

    node.dispatch_event(&mut Event::new("click"));
    assert_eq!(*log.borrow(), vec!["first:AtTarget"]);
}

#[test]
fn test_once_listener_removed() {
    let log: Log = Rc::default();
    let node = Node::element("div");
    let options = ListenerOptions {
        once: true,
        ..ListenerOptions::default()
    };

    node.add_event_listener("click", recorder(&log, "once"), options);
    assert_eq!(node.listener_count("click"), 1);

    node.dispatch_event(&mut Event::new("click"));
    node.dispatch_event(&mut Event::new("click"));

    assert_eq!(log.borrow().len(), 1);
    assert_eq!(node.listener_count("click"), 0);
}

#[test]
fn test_duplicate_registration_ignored() {
    let log: Log = Rc::default();
    let node = Node::element("div");
    let callback = recorder(&log, "dup");

    assert!(node.add_event_listener("click", callback.clone(), false));
    assert!(!node.add_event_listener("click", callback.clone(), false));
    // capture 不同视为不同注册
    assert!(node.add_event_listener("click", callback.clone(), true));

    node.dispatch_event(&mut Event::new("click"));
    assert_eq!(log.borrow().len(), 2);

    assert!(node.remove_event_listener("click", &callback, true));
    assert!(!node.remove_event_listener("click", &callback, true));
    assert_eq!(node.listener_count("click"), 1);
}

#[test]
fn test_listener_removed_during_dispatch_does_not_fire() {
    let log: Log = Rc::default();
    let node = Node::element("div");
    let second = recorder(&log, "second");

    let handle = node.clone();
    let victim = second.clone();
    node.add_event_listener(
        "click",
        listener(move |_: &mut Event| {
            handle.remove_event_listener("click", &victim, false);
        }),
        false,
    );
    node.add_event_listener("click", second, false);

    node.dispatch_event(&mut Event::new("click"));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_prevent_default() {
    let node = Node::element("a");
    node.add_event_listener("click", listener(|event: &mut Event| event.prevent_default()), false);

    let mut cancelable = Event::new("click").with_cancelable(true);
    assert!(!node.dispatch_event(&mut cancelable));
    assert!(cancelable.default_prevented());

    // 不可取消的事件忽略 prevent_default
    let mut plain = Event::new("click");
    assert!(node.dispatch_event(&mut plain));
}

#[test]
fn test_passive_listener_cannot_prevent_default() {
    let node = Node::element("div");
    let options = ListenerOptions {
        passive: true,
        ..ListenerOptions::default()
    };
    node.add_event_listener("wheel", listener(|event: &mut Event| event.prevent_default()), options);

    let mut event = Event::new("wheel").with_cancelable(true);
    assert!(node.dispatch_event(&mut event));
    assert!(!event.default_prevented());
}

#[test]
fn test_target_and_current_target() {
    let (outer, _inner, target) = create_chain();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let record = seen.clone();
    outer.add_event_listener(
        "click",
        listener(move |event: &mut Event| {
            let target = event.target().unwrap().node_name();
            let current = event.current_target().unwrap().node_name();
            record.borrow_mut().push((target, current));
        }),
        false,
    );

    let mut event = Event::new("click").with_bubbles(true);
    target.dispatch_event(&mut event);

    assert_eq!(*seen.borrow(), vec![("button".to_string(), "section".to_string())]);
    assert_eq!(event.phase(), EventPhase::None);
    assert!(event.current_target().is_none());
    assert!(event.target().unwrap().ptr_eq(&target));
}
