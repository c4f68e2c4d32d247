// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles shared between buttons and their host.

/// Identifier of a button within its host (generational).
///
/// Hosts hand these out when they create a button. A slot that is reused
/// after a button is destroyed gets a higher generation, so stale handles held
/// in lists or focus slots never alias the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ButtonId(pub(crate) u32, pub(crate) u32);

impl ButtonId {
    /// Create a handle from a slot index and its generation.
    pub const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    /// Slot index.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of the slot when this handle was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of the clip (sub-animation container) a button is placed in.
///
/// Animation requests are scoped to this clip.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClipId(pub u32);
