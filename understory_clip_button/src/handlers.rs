// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button event handlers: named events, handler bundles and the per-button registry.
//!
//! A *bundle* is anything implementing [`ButtonHandler`]: it advertises the
//! events it cares about and handles them synchronously. A button keeps an
//! ordered [`HandlerRegistry`] of bundles. Some come from the host when the
//! button is constructed, others are attached later with
//! [`Button::add_handlers`](crate::Button::add_handlers).
//!
//! Dispatch rules:
//!
//! - Every bundle whose [`ButtonHandler::events`] contains the event's kind is
//!   invoked, in attachment order. There is no cancelation.
//! - Attaching the same bundle twice invokes it twice.
//! - Buttons check [`HandlerRegistry::is_empty`] before building an event, so
//!   a button nobody listens to pays nothing on the per-frame path.
//!
//! ```
//! use understory_clip_button::{ButtonEvent, ButtonEvents, ButtonHandler, ButtonHandlers};
//!
//! let bundle = ButtonHandlers::new()
//!     .on(ButtonEvents::PRESS | ButtonEvents::RELEASE, |event, button, _host| {
//!         assert!(matches!(event, ButtonEvent::Press | ButtonEvent::Release));
//!         let _ = button.id();
//!     })
//!     .on_key_press(|code, _button, _host| {
//!         let _ = code;
//!     })
//!     .into_rc();
//! assert!(bundle.events().contains(ButtonEvents::PRESS | ButtonEvents::KEY_PRESS));
//! assert!(!bundle.events().contains(ButtonEvents::LOAD));
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::button::Button;
use crate::host::ButtonHost;

bitflags::bitflags! {
    /// Set of button event kinds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ButtonEvents: u16 {
        /// The button was constructed.
        const LOAD        = 1 << 0;
        /// The button is being destroyed.
        const UNLOAD      = 1 << 1;
        /// The owning clip executed a frame.
        const ENTER_FRAME = 1 << 2;
        /// The button's transforms were updated.
        const UPDATE      = 1 << 3;
        /// The button is about to be rendered.
        const RENDER      = 1 << 4;
        /// The pointer was pressed on the button.
        const PRESS       = 1 << 5;
        /// The pointer was released on the button.
        const RELEASE     = 1 << 6;
        /// The pointer entered the button.
        const ROLL_OVER   = 1 << 7;
        /// The pointer left the button.
        const ROLL_OUT    = 1 << 8;
        /// A key was pressed.
        const KEY_PRESS   = 1 << 9;
    }
}

impl Default for ButtonEvents {
    fn default() -> Self {
        Self::empty()
    }
}

/// A single button event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    /// The button was constructed.
    Load,
    /// The button is being destroyed.
    Unload,
    /// The owning clip executed a frame.
    EnterFrame,
    /// The button's transforms were updated.
    Update,
    /// The button is about to be rendered.
    Render,
    /// The pointer was pressed on the button.
    Press,
    /// The pointer was released on the button.
    Release,
    /// The pointer entered the button.
    RollOver,
    /// The pointer left the button.
    RollOut,
    /// A key was pressed.
    KeyPress {
        /// Host-defined key code.
        code: i32,
    },
}

impl ButtonEvent {
    /// The kind bit for this event.
    pub const fn kind(self) -> ButtonEvents {
        match self {
            Self::Load => ButtonEvents::LOAD,
            Self::Unload => ButtonEvents::UNLOAD,
            Self::EnterFrame => ButtonEvents::ENTER_FRAME,
            Self::Update => ButtonEvents::UPDATE,
            Self::Render => ButtonEvents::RENDER,
            Self::Press => ButtonEvents::PRESS,
            Self::Release => ButtonEvents::RELEASE,
            Self::RollOver => ButtonEvents::ROLL_OVER,
            Self::RollOut => ButtonEvents::ROLL_OUT,
            Self::KeyPress { .. } => ButtonEvents::KEY_PRESS,
        }
    }
}

/// A bundle of callbacks for button events.
pub trait ButtonHandler {
    /// Event kinds this bundle handles.
    fn events(&self) -> ButtonEvents;

    /// Handle `event` for `button`.
    ///
    /// Only called for events whose kind is in [`ButtonHandler::events`].
    fn handle(&self, event: ButtonEvent, button: &Button, host: &mut dyn ButtonHost);
}

/// Bundles as handed out by a host's handler provider.
pub type HandlerBundles = SmallVec<[Rc<dyn ButtonHandler>; 2]>;

type Callback = Box<dyn Fn(ButtonEvent, &Button, &mut dyn ButtonHost)>;

/// Closure-backed [`ButtonHandler`].
///
/// Callbacks registered for overlapping kinds all run, in registration order.
#[derive(Default)]
pub struct ButtonHandlers {
    callbacks: Vec<(ButtonEvents, Callback)>,
    events: ButtonEvents,
}

impl core::fmt::Debug for ButtonHandlers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ButtonHandlers")
            .field("callbacks", &self.callbacks.len())
            .field("events", &self.events)
            .finish()
    }
}

impl ButtonHandlers {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` for every event whose kind is in `events`.
    #[must_use]
    pub fn on(
        mut self,
        events: ButtonEvents,
        f: impl Fn(ButtonEvent, &Button, &mut dyn ButtonHost) + 'static,
    ) -> Self {
        self.events |= events;
        self.callbacks.push((events, Box::new(f)));
        self
    }

    /// Run `f` with the key code of every key press.
    #[must_use]
    pub fn on_key_press(self, f: impl Fn(i32, &Button, &mut dyn ButtonHost) + 'static) -> Self {
        self.on(ButtonEvents::KEY_PRESS, move |event, button, host| {
            if let ButtonEvent::KeyPress { code } = event {
                f(code, button, host);
            }
        })
    }

    /// Wrap into a shareable bundle.
    pub fn into_rc(self) -> Rc<dyn ButtonHandler> {
        Rc::new(self)
    }
}

impl ButtonHandler for ButtonHandlers {
    fn events(&self) -> ButtonEvents {
        self.events
    }

    fn handle(&self, event: ButtonEvent, button: &Button, host: &mut dyn ButtonHost) {
        let kind = event.kind();
        for (events, callback) in &self.callbacks {
            if events.contains(kind) {
                callback(event, button, host);
            }
        }
    }
}

/// Ordered set of handler bundles attached to one button.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    bundles: HandlerBundles,
    events: ButtonEvents,
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("bundles", &self.bundles.len())
            .field("events", &self.events)
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bundle. No deduplication is performed.
    pub fn attach(&mut self, bundle: Rc<dyn ButtonHandler>) {
        self.events |= bundle.events();
        self.bundles.push(bundle);
    }

    /// Append several bundles, keeping their order.
    pub fn extend(&mut self, bundles: impl IntoIterator<Item = Rc<dyn ButtonHandler>>) {
        for bundle in bundles {
            self.attach(bundle);
        }
    }

    /// Remove every attachment of `bundle` (by identity).
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, bundle: &Rc<dyn ButtonHandler>) -> bool {
        let before = self.bundles.len();
        self.bundles.retain(|b| !Rc::ptr_eq(b, bundle));
        if self.bundles.len() == before {
            return false;
        }
        self.events = self
            .bundles
            .iter()
            .fold(ButtonEvents::empty(), |acc, b| acc | b.events());
        true
    }

    /// Remove all bundles.
    pub fn clear(&mut self) {
        self.bundles.clear();
        self.events = ButtonEvents::empty();
    }

    /// `true` when no bundle is attached.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Number of attached bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Union of the events every attached bundle handles.
    pub fn events(&self) -> ButtonEvents {
        self.events
    }

    /// Invoke every bundle that handles `event`, in attachment order.
    ///
    /// Returns the number of bundles invoked.
    pub fn dispatch(&self, event: ButtonEvent, button: &Button, host: &mut dyn ButtonHost) -> usize {
        let kind = event.kind();
        if !self.events.contains(kind) {
            return 0;
        }
        let mut invoked = 0;
        for bundle in &self.bundles {
            if bundle.events().contains(kind) {
                bundle.handle(event, button, host);
                invoked += 1;
            }
        }
        invoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonDesc;
    use crate::testing::RecordingHost;
    use crate::types::ButtonId;
    use alloc::vec;
    use core::cell::RefCell;
    use understory_clip_data::AssetData;

    type Log = Rc<RefCell<Vec<(&'static str, ButtonEvent)>>>;

    fn logging(name: &'static str, events: ButtonEvents, log: &Log) -> Rc<dyn ButtonHandler> {
        let log = log.clone();
        ButtonHandlers::new()
            .on(events, move |event, _, _| log.borrow_mut().push((name, event)))
            .into_rc()
    }

    fn button(host: &mut RecordingHost) -> Button {
        Button::new(
            ButtonId::new(0, 1),
            ButtonDesc::default(),
            Rc::new(AssetData::new()),
            host,
        )
    }

    #[test]
    fn dispatch_runs_capable_bundles_in_attachment_order() {
        let log = Log::default();
        let mut host = RecordingHost::default();
        let b = button(&mut host);

        let mut reg = HandlerRegistry::new();
        reg.attach(logging("a", ButtonEvents::PRESS, &log));
        reg.attach(logging("b", ButtonEvents::RELEASE, &log));
        reg.attach(logging("c", ButtonEvents::PRESS | ButtonEvents::RELEASE, &log));

        assert_eq!(reg.dispatch(ButtonEvent::Press, &b, &mut host), 2);
        assert_eq!(reg.dispatch(ButtonEvent::Load, &b, &mut host), 0);
        assert_eq!(
            *log.borrow(),
            vec![("a", ButtonEvent::Press), ("c", ButtonEvent::Press)]
        );
    }

    #[test]
    fn duplicate_attachments_run_twice_and_remove_together() {
        let log = Log::default();
        let mut host = RecordingHost::default();
        let b = button(&mut host);

        let bundle = logging("dup", ButtonEvents::UPDATE, &log);
        let mut reg = HandlerRegistry::new();
        reg.attach(bundle.clone());
        reg.attach(bundle.clone());
        reg.dispatch(ButtonEvent::Update, &b, &mut host);
        assert_eq!(log.borrow().len(), 2, "no deduplication on attach");

        assert!(reg.remove(&bundle));
        assert!(reg.is_empty());
        assert_eq!(reg.events(), ButtonEvents::empty());
        assert!(!reg.remove(&bundle), "already removed");
    }

    #[test]
    fn key_press_callbacks_receive_the_code() {
        let codes = Rc::new(RefCell::new(Vec::new()));
        let mut host = RecordingHost::default();
        let b = button(&mut host);

        let sink = codes.clone();
        let mut reg = HandlerRegistry::new();
        reg.attach(
            ButtonHandlers::new()
                .on_key_press(move |code, _, _| sink.borrow_mut().push(code))
                .into_rc(),
        );
        reg.dispatch(ButtonEvent::KeyPress { code: 65 }, &b, &mut host);
        reg.dispatch(ButtonEvent::Press, &b, &mut host);
        assert_eq!(*codes.borrow(), vec![65]);
    }

    #[test]
    fn handlers_can_reach_the_host() {
        let mut host = RecordingHost::default();
        let b = button(&mut host);
        let mut reg = HandlerRegistry::new();
        reg.attach(
            ButtonHandlers::new()
                .on(ButtonEvents::RENDER, |_, button, host| host.link_button(button.id()))
                .into_rc(),
        );
        reg.dispatch(ButtonEvent::Render, &b, &mut host);
        assert_eq!(host.linked, vec![b.id()]);
    }

    #[test]
    fn clear_empties_the_registry() {
        let log = Log::default();
        let mut reg = HandlerRegistry::new();
        reg.extend([
            logging("a", ButtonEvents::LOAD, &log),
            logging("b", ButtonEvents::UNLOAD, &log),
        ]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.events(), ButtonEvents::LOAD | ButtonEvents::UNLOAD);
        reg.clear();
        assert!(reg.is_empty());
    }
}
