// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning satisfied conditions into animation requests.

use understory_clip_data::{AnimationId, ConditionKind, ConditionRecord};

use crate::host::{AnimationRequest, ButtonHost};
use crate::types::{ButtonId, ClipId};

/// Animations whose condition rows match a request of `kind` carrying `code`,
/// in table order.
///
/// Every matching row contributes, including repeats of the same animation.
///
/// ```
/// use understory_clip_button::matching_animations;
/// use understory_clip_data::{AnimationId, ConditionKind, ConditionRecord};
///
/// let rows = [
///     ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(3)),
///     ConditionRecord::new(ConditionKind::PRESS, AnimationId(5)),
///     ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(7)),
/// ];
/// let fired: Vec<_> = matching_animations(&rows, ConditionKind::ROLL_OVER, 0).collect();
/// assert_eq!(fired, [AnimationId(3), AnimationId(7)]);
/// ```
pub fn matching_animations(
    conditions: &[ConditionRecord],
    kind: ConditionKind,
    code: i32,
) -> impl Iterator<Item = AnimationId> + '_ {
    conditions
        .iter()
        .filter(move |c| c.matches(kind, code))
        .map(|c| c.animation)
}

/// Ask `host` to play every matching animation, scoped to `parent`.
///
/// Returns the number of requests made.
pub(crate) fn request_animations(
    conditions: &[ConditionRecord],
    kind: ConditionKind,
    code: i32,
    parent: Option<ClipId>,
    button: ButtonId,
    host: &mut dyn ButtonHost,
) -> usize {
    let mut requested = 0;
    for animation in matching_animations(conditions, kind, code) {
        tracing::trace!(?button, ?animation, ?kind, "requesting button animation");
        host.play_animation(AnimationRequest {
            animation,
            parent,
            button,
        });
        requested += 1;
    }
    requested
}
