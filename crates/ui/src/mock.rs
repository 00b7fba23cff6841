//! In-memory page for deterministic testing without a browser.
//!
//! Selector support covers what chat markup uses: a tag name, an `#id` and
//! any number of `.class` parts combined into one compound selector.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::{Clickable, KeyEvent, PageElement, TextField};

#[derive(Debug, Default)]
struct MockNode {
    tag: String,
    id: String,
    classes: Vec<String>,
    text: String,
    children: Vec<MockElement>,
}

/// Element handle; clones point at the same node like DOM references do
#[derive(Debug, Clone)]
pub struct MockElement {
    node: Rc<RefCell<MockNode>>,
}

impl MockElement {
    pub fn new(tag: &str) -> Self {
        let node = MockNode { tag: tag.to_ascii_lowercase(), ..MockNode::default() };
        Self { node: Rc::new(RefCell::new(node)) }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn with_id(self, id: &str) -> Self {
        self.node.borrow_mut().id = id.to_string();
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.node.borrow_mut().classes.push(class.to_string());
        self
    }

    /// Own text, rendered before any children
    pub fn with_text(self, text: &str) -> Self {
        self.node.borrow_mut().text = text.to_string();
        self
    }

    pub fn append_child(&self, child: MockElement) {
        self.node.borrow_mut().children.push(child);
    }

    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    fn matches(&self, selector: &SimpleSelector) -> bool {
        let node = self.node.borrow();
        selector.tag.as_deref().is_none_or(|tag| tag == node.tag)
            && selector.id.as_deref().is_none_or(|id| id == node.id)
            && selector.classes.iter().all(|class| node.classes.contains(class))
    }

    fn find_descendant(&self, selector: &SimpleSelector) -> Option<MockElement> {
        let children = self.node.borrow().children.clone();
        for child in children {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(selector) {
                return Some(found);
            }
        }
        None
    }
}

impl PageElement for MockElement {
    fn id(&self) -> String {
        self.node.borrow().id.clone()
    }

    fn last_element_child(&self) -> Option<Self> {
        self.node.borrow().children.last().cloned()
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        let selector = SimpleSelector::parse(selector)?;
        self.find_descendant(&selector)
    }

    fn inner_text(&self) -> String {
        let node = self.node.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.inner_text());
        }
        text
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl SimpleSelector {
    /// Parse `tag#id.class.class`; any part may be omitted. Returns `None` for unsupported syntax.
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty() || selector.contains(|c: char| c.is_whitespace() || "[]>:+~*,".contains(c)) {
            return None;
        }

        let mut parsed = SimpleSelector::default();
        let mut rest = selector;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            parsed.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                '#' => parsed.id = Some(name.to_string()),
                _ => parsed.classes.push(name.to_string()),
            }
            rest = &body[end..];
        }

        Some(parsed)
    }
}

/// Composer whose content height is set by the test
///
/// Mirrors browser geometry: the scroll height never reports less than an
/// explicit inline height, so stale heights stick unless cleared first.
#[derive(Debug, Default)]
pub struct MockTextField {
    content_height: Cell<u32>,
    height: RefCell<String>,
    writes: RefCell<Vec<String>>,
}

impl MockTextField {
    pub fn with_content_height(content_height: u32) -> Self {
        Self { content_height: Cell::new(content_height), ..Self::default() }
    }

    pub fn set_content_height(&self, content_height: u32) {
        self.content_height.set(content_height);
    }

    /// Current inline height style
    pub fn height(&self) -> String {
        self.height.borrow().clone()
    }

    /// Every value written to the inline height, oldest first
    pub fn height_writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    fn explicit_height(&self) -> Option<u32> {
        self.height.borrow().strip_suffix("px").and_then(|px| px.parse().ok())
    }
}

impl TextField for MockTextField {
    fn scroll_height(&self) -> u32 {
        let content = self.content_height.get();
        self.explicit_height().map_or(content, |explicit| explicit.max(content))
    }

    fn set_style_height(&self, value: &str) {
        *self.height.borrow_mut() = value.to_string();
        self.writes.borrow_mut().push(value.to_string());
    }
}

/// Submit control that counts activations
#[derive(Debug, Default)]
pub struct MockButton {
    clicks: Cell<usize>,
}

impl MockButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> usize {
        self.clicks.get()
    }
}

impl Clickable for MockButton {
    fn click(&self) {
        self.clicks.set(self.clicks.get() + 1);
    }
}

/// Key-down event that records whether its default was suppressed
#[derive(Debug)]
pub struct MockKeyEvent {
    key: String,
    shift: bool,
    prevented: Cell<bool>,
}

impl MockKeyEvent {
    pub fn new(key: &str, shift: bool) -> Self {
        Self { key: key.to_string(), shift, prevented: Cell::new(false) }
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

impl KeyEvent for MockKeyEvent {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn shift_key(&self) -> bool {
        self.shift
    }

    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

/// The chat page as the server renders it: a messages container, the composer and the send button
#[derive(Debug)]
pub struct MockPage {
    pub messages: MockElement,
    pub input: MockTextField,
    pub submit: MockButton,
}

impl MockPage {
    pub fn new(messages_id: &str) -> Self {
        Self {
            messages: MockElement::div().with_id(messages_id),
            input: MockTextField::default(),
            submit: MockButton::new(),
        }
    }

    /// Swap in one exchange the way the messages template does: a user bubble,
    /// then an assistant bubble carrying a hidden raw copy of the reply.
    pub fn render_exchange(&self, user_text: &str, reply_text: &str) {
        self.messages.append_child(Self::message("user", user_text, false));
        self.messages.append_child(Self::message("assistant", reply_text, true));
    }

    fn message(role: &str, text: &str, with_raw_copy: bool) -> MockElement {
        let message = MockElement::div().with_class("message").with_class(role);
        message.append_child(MockElement::div().with_class("bubble").with_text(text.trim()));
        if with_raw_copy {
            message.append_child(MockElement::div().with_class("hidden").with_text(text));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parse() {
        assert_eq!(
            SimpleSelector::parse("div.hidden"),
            Some(SimpleSelector { tag: Some("div".to_string()), id: None, classes: vec!["hidden".to_string()] })
        );
        assert_eq!(
            SimpleSelector::parse("#messages"),
            Some(SimpleSelector { tag: None, id: Some("messages".to_string()), classes: vec![] })
        );
        assert_eq!(
            SimpleSelector::parse("SPAN.a.b"),
            Some(SimpleSelector {
                tag: Some("span".to_string()),
                id: None,
                classes: vec!["a".to_string(), "b".to_string()]
            })
        );
    }

    #[test]
    fn test_selector_parse_unsupported() {
        assert_eq!(SimpleSelector::parse(""), None);
        assert_eq!(SimpleSelector::parse("div > p"), None);
        assert_eq!(SimpleSelector::parse("div."), None);
        assert_eq!(SimpleSelector::parse("[hidden]"), None);
    }

    #[test]
    fn test_query_selector_searches_descendants_in_order() {
        let root = MockElement::div();
        let outer = MockElement::div().with_class("wrap");
        outer.append_child(MockElement::div().with_class("hidden").with_text("deep"));
        root.append_child(outer);
        root.append_child(MockElement::div().with_class("hidden").with_text("shallow"));

        let found = root.query_selector("div.hidden").unwrap();
        assert_eq!(found.inner_text(), "deep");
    }

    #[test]
    fn test_query_selector_excludes_self() {
        let root = MockElement::div().with_class("hidden");
        assert!(root.query_selector("div.hidden").is_none());
    }

    #[test]
    fn test_tag_must_match() {
        let root = MockElement::div();
        root.append_child(MockElement::new("span").with_class("hidden"));
        assert!(root.query_selector("div.hidden").is_none());
        assert!(root.query_selector(".hidden").is_some());
    }

    #[test]
    fn test_inner_text_concatenates() {
        let root = MockElement::div().with_text("a");
        root.append_child(MockElement::div().with_text("b"));
        assert_eq!(root.inner_text(), "ab");
    }

    #[test]
    fn test_last_element_child() {
        let root = MockElement::div();
        assert!(root.last_element_child().is_none());
        root.append_child(MockElement::div().with_id("one"));
        root.append_child(MockElement::div().with_id("two"));
        assert_eq!(root.last_element_child().unwrap().id(), "two");
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_text_field_scroll_height_respects_explicit_height() {
        let field = MockTextField::with_content_height(30);
        field.set_style_height("120px");
        assert_eq!(field.scroll_height(), 120);
        field.set_style_height("");
        assert_eq!(field.scroll_height(), 30);
    }

    #[test]
    fn test_render_exchange_shape() {
        let page = MockPage::new("messages");
        page.render_exchange("Hello", "  Hi there  ");

        assert_eq!(page.messages.child_count(), 2);
        let reply = page.messages.last_element_child().unwrap();
        assert_eq!(reply.query_selector("div.hidden").unwrap().inner_text(), "  Hi there  ");
        assert_eq!(reply.query_selector("div.bubble").unwrap().inner_text(), "Hi there");
    }
}
