//! 示例 - 一个输入框加一个按钮，点击按钮读取输入框的值

use std::cell::RefCell;
use std::rc::Rc;

use puff_element::{compile, Event, HandlerRegistry, DescriptorParser, Node};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> puff_element::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 监听器在编译前注册，编译后再把输入框节点放进来
    let input_slot: Rc<RefCell<Option<Node>>> = Rc::default();
    let messages = Rc::new(RefCell::new(Vec::new()));

    let mut handlers = HandlerRegistry::new();
    let slot = input_slot.clone();
    let sink = messages.clone();
    handlers.register("showMessage", move |_: &mut Event| {
        if let Some(input) = slot.borrow().as_ref() {
            let message = input.get_attribute("value").unwrap_or_default();
            println!("alert: {}", message);
            sink.borrow_mut().push(message);
        }
    });

    let clicker = DescriptorParser::new(&handlers).parse_str(
        r#"{
            "children": [
                { "tag": "input", "propertyName": "input", "value": "Hello World!" },
                { "tag": "button", "children": "Click",
                  "eventListeners": { "type": "click", "listener": "showMessage" } }
            ]
        }"#,
    )?;

    let clicker = compile(&clicker);
    if let Some(input) = clicker.property("input") {
        *input_slot.borrow_mut() = Some(input.node().clone());
    }

    println!("{}", clicker.node().outer_html());

    // 模拟点击按钮
    if let Some(button) = clicker.node().query_selector("button")? {
        button.dispatch_event(&mut Event::new("click"));
    }

    // 通过 properties 修改输入框，再点一次
    if let Some(input) = clicker.property("input") {
        input.node().set_attribute("value", "Changed via properties")?;
    }
    if let Some(button) = clicker.node().query_selector("button")? {
        button.dispatch_event(&mut Event::new("click"));
    }

    println!("{} message(s) shown", messages.borrow().len());
    Ok(())
}
