use chatline_core::{ChatRequest, ChatTurn, PageConfig, Role, TranscriptStore};

use crate::completion::{CompletionDetail, CompletionEvent, CompletionListener, CompletionOutcome, FailureReporter};
use crate::dom::{Clickable, KeyEvent, PageElement, TextField};
use crate::input::{AutoResize, KeyDisposition, SubmitOnEnter};

/// Page events chatline listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// Request library finished a request (dispatched on the document)
    AfterRequest,
    /// Composer content changed
    Input,
    /// Key pressed in the composer
    KeyDown,
}

impl PageEvent {
    pub const ALL: &[PageEvent] = &[PageEvent::AfterRequest, PageEvent::Input, PageEvent::KeyDown];

    /// DOM event type to register for
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::AfterRequest => "htmx:afterRequest",
            PageEvent::Input => "input",
            PageEvent::KeyDown => "keydown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PageEvent::ALL.iter().copied().find(|event| event.name() == name)
    }
}

impl std::fmt::Display for PageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// All chat page behavior for one page session
///
/// Owns the transcript and the handlers. The browser binding forwards DOM
/// events here; tests drive it directly with [`crate::mock`] types.
#[derive(Debug)]
pub struct ChatPage<R = ()> {
    config: PageConfig,
    listener: CompletionListener<R>,
    auto_resize: AutoResize,
    submit_on_enter: SubmitOnEnter,
}

impl ChatPage {
    pub fn new(config: PageConfig) -> Self {
        Self::with_store(config, TranscriptStore::new())
    }

    /// Build the page around an existing transcript handle
    pub fn with_store(config: PageConfig, store: TranscriptStore) -> Self {
        let listener = CompletionListener::new(store, &config);
        let auto_resize = AutoResize::new(config.max_input_height_px);
        Self { config, listener, auto_resize, submit_on_enter: SubmitOnEnter::new() }
    }
}

impl Default for ChatPage {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl<R: FailureReporter> ChatPage<R> {
    /// Route request failures to `reporter` in addition to the log
    pub fn with_failure_reporter<R2: FailureReporter>(self, reporter: R2) -> ChatPage<R2> {
        ChatPage {
            config: self.config,
            listener: self.listener.with_reporter(reporter),
            auto_resize: self.auto_resize,
            submit_on_enter: self.submit_on_enter,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn store(&self) -> &TranscriptStore {
        self.listener.store()
    }

    pub fn add_message(&self, role: impl Into<Role>, content: impl Into<String>) {
        self.store().append(role, content);
    }

    pub fn history(&self) -> Vec<ChatTurn> {
        self.store().snapshot()
    }

    /// Payload for the next chat request, carrying the transcript so far
    pub fn request(&self, message: &str, model: Option<&str>, provider: Option<&str>) -> ChatRequest {
        let mut request = ChatRequest::new(message).with_history(self.store());
        if let Some(model) = model {
            request = request.with_model(model);
        }
        if let Some(provider) = provider {
            request = request.with_provider(provider);
        }
        request
    }

    pub fn after_request<E: PageElement>(&self, event: &CompletionEvent<'_, E>) -> CompletionOutcome {
        self.listener.handle(event)
    }

    /// Like [`ChatPage::after_request`], for notifications that may lack a status, flag or target
    pub fn after_request_detail<E: PageElement>(&self, detail: &CompletionDetail<E>) -> CompletionOutcome {
        self.listener.handle_detail(detail)
    }

    pub fn input<F: TextField>(&self, field: &F) -> u32 {
        self.auto_resize.on_input(field)
    }

    pub fn key_down<K: KeyEvent, C: Clickable>(&self, event: &K, submit: &C) -> KeyDisposition {
        self.submit_on_enter.on_key_down(event, submit)
    }
}
