//! Composer behaviors: height tracking and Enter-to-send.

use crate::dom::{Clickable, KeyEvent, TextField};

/// Grows the composer with its content, up to a fixed limit
///
/// Past the limit the field keeps its height and scrolls internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoResize {
    max_height_px: u32,
}

impl AutoResize {
    pub fn new(max_height_px: u32) -> Self {
        Self { max_height_px }
    }

    pub fn max_height_px(&self) -> u32 {
        self.max_height_px
    }

    /// Recompute the field height after an input event and return the applied height.
    ///
    /// The inline height is cleared first so the field can shrink when text is deleted.
    pub fn on_input<F: TextField>(&self, field: &F) -> u32 {
        field.set_style_height("");
        let height = field.scroll_height().min(self.max_height_px);
        field.set_style_height(&format!("{}px", height));
        tracing::trace!(height, limit = self.max_height_px, "composer resized");
        height
    }
}

/// What a key-down did to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Default action suppressed and the submit control clicked
    Submitted,
    /// Left to the browser (Shift+Enter newline, ordinary typing)
    Passthrough,
}

/// Enter sends the message, Shift+Enter inserts a newline
///
/// There is no repeat guard: every qualifying key-down clicks the submit control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOnEnter;

impl SubmitOnEnter {
    pub fn new() -> Self {
        Self
    }

    pub fn on_key_down<K: KeyEvent, C: Clickable>(&self, event: &K, submit: &C) -> KeyDisposition {
        if event.key() != "Enter" || event.shift_key() {
            return KeyDisposition::Passthrough;
        }

        event.prevent_default();
        submit.click();
        tracing::debug!("enter pressed, submitting message");
        KeyDisposition::Submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockButton, MockKeyEvent, MockTextField};

    #[test]
    fn test_height_follows_short_content() {
        let field = MockTextField::with_content_height(40);
        let applied = AutoResize::new(200).on_input(&field);

        assert_eq!(applied, 40);
        assert_eq!(field.height(), "40px");
    }

    #[test]
    fn test_height_capped_at_limit() {
        let field = MockTextField::with_content_height(500);
        let applied = AutoResize::new(200).on_input(&field);

        assert_eq!(applied, 200);
        assert_eq!(field.height(), "200px");
    }

    #[test]
    fn test_height_at_exact_limit() {
        let field = MockTextField::with_content_height(200);
        AutoResize::new(200).on_input(&field);
        assert_eq!(field.height(), "200px");
    }

    #[test]
    fn test_empty_content() {
        let field = MockTextField::with_content_height(0);
        AutoResize::new(200).on_input(&field);
        assert_eq!(field.height(), "0px");
    }

    #[test]
    fn test_height_reset_before_measuring() {
        let resize = AutoResize::new(200);
        let field = MockTextField::with_content_height(500);
        resize.on_input(&field);

        field.set_content_height(60);
        resize.on_input(&field);

        assert_eq!(field.height(), "60px");
        assert_eq!(field.height_writes(), vec!["", "200px", "", "60px"]);
    }

    #[test]
    fn test_height_bound_holds_for_range() {
        let resize = AutoResize::new(200);
        for content in [0, 1, 17, 199, 200, 201, 480, 10_000] {
            let field = MockTextField::with_content_height(content);
            resize.on_input(&field);
            assert_eq!(field.height(), format!("{}px", content.min(200)));
        }
    }

    #[test]
    fn test_enter_submits() {
        let button = MockButton::new();
        let event = MockKeyEvent::new("Enter", false);

        let disposition = SubmitOnEnter::new().on_key_down(&event, &button);

        assert_eq!(disposition, KeyDisposition::Submitted);
        assert_eq!(button.clicks(), 1);
        assert!(event.default_prevented());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let button = MockButton::new();
        let event = MockKeyEvent::new("Enter", true);

        let disposition = SubmitOnEnter::new().on_key_down(&event, &button);

        assert_eq!(disposition, KeyDisposition::Passthrough);
        assert_eq!(button.clicks(), 0);
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_other_keys_pass_through() {
        let button = MockButton::new();
        for key in ["a", "Shift", "Tab", "NumpadEnter", "enter"] {
            let event = MockKeyEvent::new(key, false);
            assert_eq!(SubmitOnEnter::new().on_key_down(&event, &button), KeyDisposition::Passthrough);
            assert!(!event.default_prevented());
        }
        assert_eq!(button.clicks(), 0);
    }

    #[test]
    fn test_repeated_enter_submits_each_time() {
        let button = MockButton::new();
        let submit = SubmitOnEnter::new();
        for _ in 0..3 {
            submit.on_key_down(&MockKeyEvent::new("Enter", false), &button);
        }
        assert_eq!(button.clicks(), 3);
    }
}
