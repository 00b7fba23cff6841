//! Reaction to finished page requests.
//!
//! The request library fires a notification after it has swapped the
//! response into the page. Successful responses aimed at the messages
//! container carry a freshly rendered assistant reply; its hidden raw-text
//! copy is read back into the transcript.

use chatline_core::logging::truncate_for_log;
use chatline_core::{PageConfig, Role, TranscriptStore};

use crate::dom::PageElement;

/// Status code of a usable response
pub const SUCCESS_STATUS: u16 = 200;

/// What the request library reports once a request has completed
#[derive(Debug)]
pub struct CompletionEvent<'a, E> {
    /// HTTP status of the response
    pub status: u16,
    /// Library-level success flag
    pub successful: bool,
    /// Element the response was swapped into
    pub target: &'a E,
}

impl<'a, E> CompletionEvent<'a, E> {
    pub fn new(status: u16, successful: bool, target: &'a E) -> Self {
        Self { status, successful, target }
    }
}

/// Completion notification as read from an untyped event payload
///
/// Any part may be missing. A missing status reads as `0` and a missing
/// success flag as `false`, so such events take the failure path even
/// when no target came along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDetail<E> {
    pub status: Option<u16>,
    pub successful: Option<bool>,
    pub target: Option<E>,
}

impl<E> Default for CompletionDetail<E> {
    fn default() -> Self {
        Self { status: None, successful: None, target: None }
    }
}

impl<E> CompletionDetail<E> {
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(0)
    }

    pub fn successful(&self) -> bool {
        self.successful.unwrap_or(false)
    }
}

/// A request that did not complete with a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub status: u16,
    pub successful: bool,
    pub target_id: String,
}

/// Hook for surfacing request failures beyond the developer log
///
/// The listener always logs failures; a reporter receives them in addition.
/// `()` is the default and does nothing, so failures stay invisible to the
/// end user unless a page opts in.
pub trait FailureReporter {
    fn report(&self, failure: &RequestFailure);
}

impl FailureReporter for () {
    fn report(&self, _failure: &RequestFailure) {}
}

impl<F> FailureReporter for F
where
    F: Fn(&RequestFailure),
{
    fn report(&self, failure: &RequestFailure) {
        self(failure)
    }
}

/// Result of handling one completion notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// An assistant turn with this trimmed content was appended
    Appended { content: String },
    /// The request failed; nothing was appended
    Failed(RequestFailure),
    /// The request targeted some other part of the page
    Unrelated { target_id: String },
    /// The messages container had no element children
    EmptyContainer,
    /// The newest message had no hidden raw-text element
    MissingHiddenElement,
    /// A successful notification arrived without a target element
    MissingTarget,
}

impl CompletionOutcome {
    pub fn appended(&self) -> bool {
        matches!(self, CompletionOutcome::Appended { .. })
    }
}

/// Appends assistant replies to the transcript as requests complete
#[derive(Debug)]
pub struct CompletionListener<R = ()> {
    store: TranscriptStore,
    messages_id: String,
    hidden_selector: String,
    reporter: R,
}

impl CompletionListener {
    pub fn new(store: TranscriptStore, page: &PageConfig) -> Self {
        Self {
            store,
            messages_id: page.messages_id.clone(),
            hidden_selector: page.hidden_selector.clone(),
            reporter: (),
        }
    }
}

impl<R: FailureReporter> CompletionListener<R> {
    /// Swap in a different failure reporter
    pub fn with_reporter<R2: FailureReporter>(self, reporter: R2) -> CompletionListener<R2> {
        CompletionListener {
            store: self.store,
            messages_id: self.messages_id,
            hidden_selector: self.hidden_selector,
            reporter,
        }
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Handle one completion notification.
    ///
    /// Never panics and never returns an error; every path is reported
    /// through the returned outcome and the log.
    pub fn handle<E: PageElement>(&self, event: &CompletionEvent<'_, E>) -> CompletionOutcome {
        self.dispatch(event.status, event.successful, Some(event.target))
    }

    /// Handle a notification whose parts may be missing.
    ///
    /// Status and success are checked before the target is looked at, so a
    /// failed request is reported whether or not it names a target.
    pub fn handle_detail<E: PageElement>(&self, detail: &CompletionDetail<E>) -> CompletionOutcome {
        self.dispatch(detail.status(), detail.successful(), detail.target.as_ref())
    }

    fn dispatch<E: PageElement>(&self, status: u16, successful: bool, target: Option<&E>) -> CompletionOutcome {
        if status != SUCCESS_STATUS || !successful {
            return self.fail(status, successful, target.map(|t| t.id()).unwrap_or_default());
        }

        let Some(target) = target else {
            tracing::warn!("successful request completion without a target element");
            return CompletionOutcome::MissingTarget;
        };

        let target_id = target.id();
        if target_id != self.messages_id {
            tracing::trace!(target_id = %target_id, "completed request is not a chat reply");
            return CompletionOutcome::Unrelated { target_id };
        }

        let Some(message) = target.last_element_child() else {
            tracing::warn!(container = %self.messages_id, "messages container has no children after reply");
            return CompletionOutcome::EmptyContainer;
        };

        let Some(hidden) = message.query_selector(&self.hidden_selector) else {
            tracing::warn!(
                container = %self.messages_id,
                selector = %self.hidden_selector,
                "newest message has no hidden raw-text element"
            );
            return CompletionOutcome::MissingHiddenElement;
        };

        let content = trim_reply(&hidden.inner_text()).to_string();
        tracing::debug!(content = %truncate_for_log(&content), "captured assistant reply");
        self.store.append(Role::Assistant, content.clone());

        CompletionOutcome::Appended { content }
    }

    fn fail(&self, status: u16, successful: bool, target_id: String) -> CompletionOutcome {
        let failure = RequestFailure { status, successful, target_id };

        // TODO: show an inline error bubble once the page markup has a slot for it
        tracing::error!(
            status = failure.status,
            successful = failure.successful,
            target_id = %failure.target_id,
            "page request failed"
        );
        self.reporter.report(&failure);

        CompletionOutcome::Failed(failure)
    }
}

/// Strip surrounding whitespace the way browsers trim strings, byte-order marks included
fn trim_reply(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}
