// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface a button expects from whoever owns it.

use understory_clip_data::AnimationId;

use crate::handlers::HandlerBundles;
use crate::types::{ButtonId, ClipId};

/// A request to start playing an authored animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    /// Animation to play.
    pub animation: AnimationId,
    /// Clip the animation runs in (the requesting button's parent).
    pub parent: Option<ClipId>,
    /// Button whose condition fired.
    pub button: ButtonId,
}

/// Owner-side services a [`Button`](crate::Button) calls into.
///
/// The host owns the ordered button list, the focused and pressed slots and
/// animation playback. Buttons never hold on to the host; every operation
/// that needs it takes `&mut dyn ButtonHost`, and handlers receive the same
/// reference so they can observe or change host state while they run.
pub trait ButtonHost {
    /// Handler bundles to attach to a newly constructed button.
    ///
    /// The default provides none.
    fn handlers_for(&self, button: ButtonId, instance_id: u32) -> HandlerBundles {
        let _ = (button, instance_id);
        HandlerBundles::new()
    }

    /// Put `button` at the front of the ordered button list.
    fn link_button(&mut self, button: ButtonId);

    /// Currently focused button.
    fn focus(&self) -> Option<ButtonId>;

    /// Currently pressed button.
    fn pressed(&self) -> Option<ButtonId>;

    /// Clear the focused slot if it holds `button`.
    fn clear_focus(&mut self, button: ButtonId);

    /// Clear the pressed slot if it holds `button`.
    fn clear_pressed(&mut self, button: ButtonId);

    /// Start playing an animation.
    fn play_animation(&mut self, request: AnimationRequest);
}
