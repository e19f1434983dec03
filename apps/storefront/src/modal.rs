//! # Modal & Page Lock
//!
//! The single modal container and the page behind it.
//!
//! ```text
//!   open(content)                        close()
//!   ─────────────                        ───────
//!   render content                       hidden? → nothing
//!   was hidden? → emit modal:open        emit modal:close
//!                     │                        │
//!                     ▼                        ▼
//!              page locked              page unlocked, preview cleared
//!                                       (presenter subscriptions)
//! ```
//!
//! Re-rendering an already visible modal swaps its content without a second
//! `modal:open`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use larek_core::{AppEvent, EventBus};
use tracing::debug;

use crate::view::{ModalContent, PageArgs, Render};

pub struct Modal {
    events: Rc<EventBus<AppEvent>>,
    view: Rc<dyn Render<ModalContent>>,
    content: RefCell<Option<ModalContent>>,
}

impl Modal {
    pub fn new(events: Rc<EventBus<AppEvent>>, view: Rc<dyn Render<ModalContent>>) -> Self {
        Modal {
            events,
            view,
            content: RefCell::new(None),
        }
    }

    /// Shows `content`, replacing whatever was shown.
    pub fn open(&self, content: ModalContent) {
        debug!(kind = content.kind(), "Modal content");
        let was_hidden = self.content.replace(Some(content.clone())).is_none();

        self.view.render(content);
        if was_hidden {
            self.events.emit(&AppEvent::ModalOpened);
        }
    }

    /// Hides the modal. Closing a hidden modal does nothing.
    pub fn close(&self) {
        if self.content.take().is_none() {
            return;
        }
        debug!("Modal closed");
        self.events.emit(&AppEvent::ModalClosed);
    }

    pub fn is_open(&self) -> bool {
        self.content.borrow().is_some()
    }

    pub fn content(&self) -> Option<ModalContent> {
        self.content.borrow().clone()
    }
}

impl std::fmt::Debug for Modal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modal")
            .field("content", &self.content.borrow())
            .finish_non_exhaustive()
    }
}

/// Scroll lock of the page behind the modal.
pub struct Page {
    view: Rc<dyn Render<PageArgs>>,
    locked: Cell<bool>,
}

impl Page {
    pub fn new(view: Rc<dyn Render<PageArgs>>) -> Self {
        Page {
            view,
            locked: Cell::new(false),
        }
    }

    pub fn set_locked(&self, locked: bool) {
        if self.locked.replace(locked) != locked {
            self.view.render(PageArgs { is_locked: locked });
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}
