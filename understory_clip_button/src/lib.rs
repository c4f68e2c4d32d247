// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Clip Button: interactive button nodes for clip playback.
//!
//! A [`Button`] is a rectangular hit area placed in a clip (a sub-animation
//! container). Each frame the clip executes, updates and renders it like any
//! other display object. Between frames the host routes pointer and key input
//! to it, and the button answers in two ways:
//!
//! - It notifies attached **handler bundles** ([`ButtonHandler`]) of the
//!   event, in attachment order.
//! - It walks its **condition table** and asks the host to play every
//!   animation whose condition matches the interaction (see
//!   [`matching_animations`]).
//!
//! Buttons never own their host. Every operation that needs one takes
//! `&mut dyn ButtonHost`, which provides the ordered button list, the focused
//! and pressed slots, animation playback and the handlers given to new
//! buttons.
//!
//! ## API overview
//!
//! - [`Button`] / [`ButtonDesc`]: the node and how it is placed.
//! - [`ButtonHost`] / [`AnimationRequest`]: what a button needs from its owner.
//! - [`ButtonHandler`], [`ButtonHandlers`], [`HandlerRegistry`],
//!   [`ButtonEvent`], [`ButtonEvents`]: handler bundles and dispatch.
//! - [`ButtonList`]: the host's front-to-back button order.
//! - [`Stage`] / [`StageHost`]: a complete host with generational
//!   [`ButtonId`]s and input routing.
//! - [`transform`]: inversion and bounding helpers used by hit testing.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Affine, Vec2};
//! use understory_clip_button::{ButtonDesc, ButtonEvents, ButtonHandlers, Stage};
//! use understory_clip_data::{
//!     AnimationId, AssetData, ButtonShape, ColorTransform, ConditionKind, ConditionRecord,
//! };
//!
//! let mut data = AssetData::new();
//! let ok = data.add_button(
//!     ButtonShape { width: 80.0, height: 24.0, ..ButtonShape::default() },
//!     [
//!         ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(1)),
//!         ConditionRecord::new(ConditionKind::RELEASE, AnimationId(2)),
//!     ],
//! );
//!
//! let mut stage = Stage::new(Rc::new(data));
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! stage.add_instance_handlers(
//!     7,
//!     ButtonHandlers::new()
//!         .on(ButtonEvents::RELEASE, move |_, _, _| counter.set(counter.get() + 1))
//!         .into_rc(),
//! );
//!
//! let id = stage.spawn(ButtonDesc {
//!     object: Some(ok),
//!     instance_id: 7,
//!     ..ButtonDesc::default()
//! });
//! stage.link(id);
//! stage.advance(&Affine::translate(Vec2::new(100.0, 100.0)), &ColorTransform::IDENTITY);
//!
//! assert_eq!(stage.input_point(110.0, 110.0), Some(id));
//! stage.input_press();
//! stage.input_release();
//!
//! assert_eq!(clicks.get(), 1);
//! let played: Vec<_> = stage
//!     .take_animation_requests()
//!     .iter()
//!     .map(|r| r.animation)
//!     .collect();
//! assert_eq!(played, [AnimationId(1), AnimationId(2)]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo`.
//! - `libm`: `no_std` float math for `kurbo`.
//!
//! Diagnostics go through `tracing`: lifecycle and animation requests at
//! `trace`, singular hit-test transforms at `debug`, unresolvable records at
//! `warn`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animation;
mod button;
mod handlers;
mod host;
mod list;
mod object;
mod stage;
#[cfg(test)]
mod testing;
pub mod transform;
mod types;

pub use animation::matching_animations;
pub use button::{Button, ButtonDesc};
pub use handlers::{
    ButtonEvent, ButtonEvents, ButtonHandler, ButtonHandlers, HandlerBundles, HandlerRegistry,
};
pub use host::{AnimationRequest, ButtonHost};
pub use list::ButtonList;
pub use object::ObjectState;
pub use stage::{HandlerTable, Stage, StageHost};
pub use types::{ButtonId, ClipId};
