// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Clip Data: read-only tables behind interactive clip buttons.
//!
//! Authored vector animations ship static records for every button: a hit
//! area, the matrix and color transform applied on top of the placement, and
//! a range into a shared table of *conditions*. A condition says "when one of
//! these interaction kinds happens (and, for key presses, this key), request
//! that animation".
//!
//! This crate only holds and validates those tables. Hit testing, handler
//! dispatch and animation requests live in `understory_clip_button`.
//!
//! ## API overview
//!
//! - [`AssetData`]: append-only tables shared by every node instantiated from
//!   the same assets. Build it with [`AssetData::add_button`] or from raw
//!   [`AssetParts`] via [`AssetData::from_parts`], which validates ranges.
//! - [`ButtonRecord`]: immutable static record of one authored button.
//! - [`ConditionRecord`] / [`ConditionKind`]: one condition row and its
//!   interaction bitmask.
//! - [`ObjectId`], [`AnimationId`]: table handles.
//! - [`DataError`]: validation failures.
//!
//! ## Example
//!
//! ```rust
//! use understory_clip_data::{
//!     AnimationId, AssetData, ButtonShape, ConditionKind, ConditionRecord,
//! };
//!
//! let mut data = AssetData::new();
//! let button = data.add_button(
//!     ButtonShape { width: 80.0, height: 24.0, ..ButtonShape::default() },
//!     [
//!         ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(1)),
//!         ConditionRecord::key_press(13, AnimationId(2)),
//!     ],
//! );
//!
//! let record = data.button(button).unwrap();
//! let fired: Vec<_> = data
//!     .conditions_of(record)
//!     .iter()
//!     .filter(|c| c.matches(ConditionKind::KEY_PRESS, 13))
//!     .map(|c| c.animation)
//!     .collect();
//! assert_eq!(fired, [AnimationId(2)]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo`.
//! - `libm`: `no_std` float math for `kurbo`.
//! - `serde`: `Serialize`/`Deserialize` for the records. Deserializing an
//!   [`AssetData`] validates it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod condition;
mod record;
mod table;

pub use condition::{AnimationId, ConditionKind, ConditionRecord};
pub use record::{ButtonRecord, ButtonShape, ColorTransform, ObjectId};
pub use table::{AssetData, AssetParts, DataError};
