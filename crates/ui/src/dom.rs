//! Narrow views of the page that the handlers need.
//!
//! The browser binding implements these over `web-sys`; [`crate::mock`]
//! implements them in memory for tests.

/// A node in the chat page tree
pub trait PageElement: Sized {
    /// Value of the `id` attribute, empty when unset
    fn id(&self) -> String;

    /// Last child that is an element (text nodes are skipped)
    fn last_element_child(&self) -> Option<Self>;

    /// First descendant matching `selector`, in document order
    fn query_selector(&self, selector: &str) -> Option<Self>;

    /// Rendered text of the element and its descendants
    fn inner_text(&self) -> String;
}

/// The multi-line composer
pub trait TextField {
    /// Height the content needs, ignoring any overflow clipping
    fn scroll_height(&self) -> u32;

    /// Write the inline `height` style. An empty string removes the override.
    fn set_style_height(&self, value: &str);
}

/// A control that can be activated programmatically
pub trait Clickable {
    fn click(&self);
}

/// A key-down notification on the composer
pub trait KeyEvent {
    /// `KeyboardEvent.key` value, e.g. `"Enter"` or `"a"`
    fn key(&self) -> String;

    fn shift_key(&self) -> bool;

    /// Stop the browser from inserting the default character
    fn prevent_default(&self);
}

/// Text a node renders: `innerText` where the node has one, else `textContent`
pub fn rendered_text(inner_text: Option<String>, text_content: Option<String>) -> String {
    inner_text.or(text_content).unwrap_or_default()
}
