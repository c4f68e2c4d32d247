// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button conditions: which interaction kinds start which animation.

/// Identifier of an authored animation (an action list played by the host).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationId(pub u32);

bitflags::bitflags! {
    /// Interaction kinds a [`ConditionRecord`] qualifies for.
    ///
    /// The bit layout is fixed by the authored data. Bits this crate does not
    /// name are retained as-is and only ever compared by intersection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConditionKind: u32 {
        /// Pointer entered the button's hit area.
        const ROLL_OVER       = 1 << 0;
        /// Pointer left the button's hit area.
        const ROLL_OUT        = 1 << 1;
        /// Pointer pressed while over the button.
        const PRESS           = 1 << 2;
        /// Pointer released while over the pressed button.
        const RELEASE         = 1 << 3;
        /// Pointer dragged out while pressed.
        const DRAG_OUT        = 1 << 4;
        /// Pointer dragged back over while pressed.
        const DRAG_OVER       = 1 << 5;
        /// Pointer released outside after pressing.
        const RELEASE_OUTSIDE = 1 << 6;
        /// A key was pressed; records also carry the key code to match.
        const KEY_PRESS       = 1 << 7;

        const _ = !0;
    }
}

/// One row of a button's condition table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionRecord {
    /// Interaction kinds that qualify this row.
    pub condition: ConditionKind,
    /// Key code to match. Only consulted for [`ConditionKind::KEY_PRESS`] requests.
    pub key_code: i32,
    /// Animation to request when the row matches.
    pub animation: AnimationId,
}

impl ConditionRecord {
    /// A row that fires `animation` for any of the kinds in `condition`.
    pub const fn new(condition: ConditionKind, animation: AnimationId) -> Self {
        Self {
            condition,
            key_code: 0,
            animation,
        }
    }

    /// A key-press row that only fires for `key_code`.
    pub const fn key_press(key_code: i32, animation: AnimationId) -> Self {
        Self {
            condition: ConditionKind::KEY_PRESS,
            key_code,
            animation,
        }
    }

    /// Whether this row fires for a request of `kind` carrying `code`.
    ///
    /// The row's mask must intersect `kind`. When the request is exactly a
    /// key press, the key code must also match; for every other request the
    /// code is ignored.
    pub fn matches(&self, kind: ConditionKind, code: i32) -> bool {
        self.condition.intersects(kind)
            && (kind != ConditionKind::KEY_PRESS || self.key_code == code)
    }
}
