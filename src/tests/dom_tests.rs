//! 节点树单元测试

use crate::dom::{Node, NodeType};
use crate::error::PuffError;

/// 辅助函数：<ul class="list"><li id="a" class="item">A</li><li class="item on">B</li></ul>
fn create_list() -> Node {
    let ul = Node::element("ul");
    ul.set_class_name("list").unwrap();

    let a = Node::element("li");
    a.set_attribute("id", "a").unwrap();
    a.set_class_name("item").unwrap();
    a.set_text_content("A");

    let b = Node::element("li");
    b.set_class_name("item on").unwrap();
    b.set_text_content("B");

    ul.append_child(&a).unwrap();
    ul.append_child(&b).unwrap();
    ul
}

#[test]
fn test_attributes_keep_order_and_replace_in_place() {
    let node = Node::element("div");
    node.set_attribute("class", "a").unwrap();
    node.set_attribute("id", "x").unwrap();
    node.set_attribute("class", "b").unwrap();

    assert_eq!(
        node.attributes(),
        vec![("class".to_string(), "b".to_string()), ("id".to_string(), "x".to_string())]
    );
    assert_eq!(node.remove_attribute("class").as_deref(), Some("b"));
    assert!(!node.has_attribute("class"));
    assert_eq!(node.remove_attribute("class"), None);
}

#[test]
fn test_text_node_rejects_attributes() {
    let text = Node::text("hi");
    assert!(matches!(text.set_attribute("class", "a"), Err(PuffError::NotAnElement(_))));
    assert_eq!(text.get_attribute("class"), None);
    assert_eq!(text.node_name(), "#text");
    assert_eq!(text.node_type(), NodeType::Text);
}

#[test]
fn test_append_moves_node() {
    let first = Node::element("div");
    let second = Node::element("div");
    let child = Node::element("span");

    first.append_child(&child).unwrap();
    second.append_child(&child).unwrap();

    assert_eq!(first.child_count(), 0);
    assert_eq!(second.child_count(), 1);
    assert!(child.parent().unwrap().ptr_eq(&second));
}

#[test]
fn test_append_rejects_cycles_and_text_parents() {
    let outer = Node::element("div");
    let inner = Node::element("div");
    outer.append_child(&inner).unwrap();

    assert!(matches!(inner.append_child(&outer), Err(PuffError::HierarchyRequest(_))));
    assert!(matches!(outer.append_child(&outer), Err(PuffError::HierarchyRequest(_))));

    let text = Node::text("t");
    assert!(matches!(text.append_child(&Node::element("b")), Err(PuffError::HierarchyRequest(_))));
}

#[test]
fn test_remove_child() {
    let list = create_list();
    let first = list.first_child().unwrap();

    let removed = list.remove_child(&first).unwrap();
    assert!(removed.ptr_eq(&first));
    assert!(first.parent().is_none());
    assert_eq!(list.child_count(), 1);

    assert!(matches!(list.remove_child(&first), Err(PuffError::NotFound)));
}

#[test]
fn test_text_content() {
    let list = create_list();
    assert_eq!(list.text_content(), "AB");

    list.set_text_content("replaced");
    assert_eq!(list.child_count(), 1);
    assert_eq!(list.inner_html(), "replaced");

    list.set_text_content("");
    assert_eq!(list.child_count(), 0);
}

#[test]
fn test_query_selector() {
    let list = create_list();

    let a = list.query_selector("#a").unwrap().unwrap();
    assert_eq!(a.text_content(), "A");

    let on = list.query_selector("li.item.on").unwrap().unwrap();
    assert_eq!(on.text_content(), "B");

    assert_eq!(list.query_selector_all(".item").unwrap().len(), 2);
    assert_eq!(list.query_selector_all("LI").unwrap().len(), 2);
    assert!(list.query_selector(".missing").unwrap().is_none());
    // 不包含自身
    assert!(list.query_selector(".list").unwrap().is_none());
    assert!(list.matches("ul.list").unwrap());

    assert!(matches!(list.query_selector("ul > li"), Err(PuffError::InvalidSelector(_))));
}

#[test]
fn test_attribute_selector() {
    let div = Node::element("div");
    let input = Node::element("input");
    input.set_attribute("data-puff-property-name", "field").unwrap();
    div.append_child(&input).unwrap();

    assert!(div.query_selector("[data-puff-property-name]").unwrap().is_some());
    assert!(div.query_selector("[data-puff-property-name=field]").unwrap().is_some());
    assert!(div.query_selector("[data-puff-property-name='other']").unwrap().is_none());
}

#[test]
fn test_outer_html() {
    let list = create_list();
    assert_eq!(
        list.outer_html(),
        r#"<ul class="list"><li id="a" class="item">A</li><li class="item on">B</li></ul>"#
    );

    let input = Node::element("input");
    input.set_attribute("value", "say \"hi\" & go").unwrap();
    assert_eq!(input.outer_html(), r#"<input value="say &quot;hi&quot; &amp; go">"#);

    let p = Node::element("p");
    p.set_text_content("1 < 2");
    assert_eq!(p.outer_html(), "<p>1 &lt; 2</p>");
}

#[test]
fn test_handles_alias_same_node() {
    let node = Node::element("div");
    let alias = node.clone();
    alias.set_class_name("changed").unwrap();

    assert_eq!(node.class_name(), "changed");
    assert_eq!(node, alias);
    assert_ne!(node, Node::element("div"));
}
