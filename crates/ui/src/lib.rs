pub mod completion;
pub mod dom;
pub mod input;
pub mod mock;
pub mod page;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use completion::{CompletionDetail, CompletionEvent, CompletionListener, CompletionOutcome, FailureReporter, RequestFailure};
pub use dom::{Clickable, KeyEvent, PageElement, TextField, rendered_text};
pub use input::{AutoResize, KeyDisposition, SubmitOnEnter};
pub use page::{ChatPage, PageEvent};
