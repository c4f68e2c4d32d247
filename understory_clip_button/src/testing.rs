// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host used by unit tests: records every call it receives.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::handlers::HandlerBundles;
use crate::host::{AnimationRequest, ButtonHost};
use crate::types::ButtonId;

#[derive(Default)]
pub(crate) struct RecordingHost {
    pub(crate) linked: Vec<ButtonId>,
    pub(crate) focus: Option<ButtonId>,
    pub(crate) pressed: Option<ButtonId>,
    pub(crate) requests: Vec<AnimationRequest>,
    pub(crate) provided: HashMap<u32, HandlerBundles>,
}

impl RecordingHost {
    pub(crate) fn animations(&self) -> Vec<u32> {
        self.requests.iter().map(|r| r.animation.0).collect()
    }
}

impl ButtonHost for RecordingHost {
    fn handlers_for(&self, _button: ButtonId, instance_id: u32) -> HandlerBundles {
        self.provided.get(&instance_id).cloned().unwrap_or_default()
    }

    fn link_button(&mut self, button: ButtonId) {
        self.linked.push(button);
    }

    fn focus(&self) -> Option<ButtonId> {
        self.focus
    }

    fn pressed(&self) -> Option<ButtonId> {
        self.pressed
    }

    fn clear_focus(&mut self, button: ButtonId) {
        if self.focus == Some(button) {
            self.focus = None;
        }
    }

    fn clear_pressed(&mut self, button: ButtonId) {
        if self.pressed == Some(button) {
            self.pressed = None;
        }
    }

    fn play_animation(&mut self, request: AnimationRequest) {
        self.requests.push(request);
    }
}
