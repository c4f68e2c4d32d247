// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactive button node.

use alloc::rc::Rc;

use kurbo::{Affine, Point, Rect, Size};
use understory_clip_data::{AssetData, ButtonRecord, ColorTransform, ConditionKind, ObjectId};

use crate::animation::request_animations;
use crate::handlers::{ButtonEvent, ButtonHandler, HandlerRegistry};
use crate::host::ButtonHost;
use crate::object::ObjectState;
use crate::transform::{DEGENERATE_INVERSE, apply, invert, transform_rect_bbox};
use crate::types::{ButtonId, ClipId};

/// Placement of a button, as read from the owning clip's display list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonDesc {
    /// Clip the button is placed in. Animation requests are scoped to it.
    pub parent: Option<ClipId>,
    /// Static record to bind, or `None` for a placeholder without one.
    pub object: Option<ObjectId>,
    /// Authored instance id, used by the host to look up handlers.
    pub instance_id: u32,
    /// Placement matrix id.
    pub matrix_id: u32,
    /// Placement color transform id.
    pub color_transform_id: u32,
}

/// An interactive button placed in a clip.
///
/// A button answers two questions for its host: "is this point inside me"
/// ([`Button::check_hit`]) and "react to this interaction" ([`Button::press`],
/// [`Button::roll_over`], ...). Reacting means notifying the attached
/// handlers and then requesting every animation whose condition row matches.
///
/// Buttons do not decide which button the pointer is over, and they never
/// add or remove themselves from the host's button list other than through
/// the one-shot [`Button::link_button`].
///
/// Once [`Button::destroy`] has run, frame and interaction operations do
/// nothing: no handler runs and no animation is requested.
pub struct Button {
    id: ButtonId,
    parent: Option<ClipId>,
    data: Rc<AssetData>,
    record: Option<ObjectId>,
    width: f64,
    height: f64,
    state: ObjectState,
    hit: Option<Point>,
    handlers: HandlerRegistry,
}

impl core::fmt::Debug for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Button")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("record", &self.record)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("state", &self.state)
            .field("hit", &self.hit)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

impl Button {
    /// Construct a button and fire [`ButtonEvent::Load`] if the host supplies
    /// handlers for it.
    ///
    /// When `desc.object` names a record in `data`, the record's size and
    /// matrix are bound. A missing or unresolvable record yields a zero-size
    /// button that never hits and never requests animations.
    pub fn new(
        id: ButtonId,
        desc: ButtonDesc,
        data: Rc<AssetData>,
        host: &mut dyn ButtonHost,
    ) -> Self {
        let record = desc.object.filter(|&object| {
            let found = data.button(object).is_some();
            if !found {
                tracing::warn!(?id, ?object, "button record not found; using an empty hit area");
            }
            found
        });
        let (width, height, data_matrix) = match record.and_then(|object| data.button(object)) {
            Some(rec) => (rec.width, rec.height, data.matrix(rec.matrix_id)),
            None => (0.0, 0.0, Affine::IDENTITY),
        };
        let state = ObjectState::new(
            record,
            desc.instance_id,
            desc.matrix_id,
            desc.color_transform_id,
            data_matrix,
        );

        let mut handlers = HandlerRegistry::new();
        handlers.extend(host.handlers_for(id, desc.instance_id));

        let button = Self {
            id,
            parent: desc.parent,
            data,
            record,
            width,
            height,
            state,
            hit: None,
            handlers,
        };
        button.notify(ButtonEvent::Load, host);
        button
    }

    /// Host handle of this button.
    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Clip this button is placed in.
    pub fn parent(&self) -> Option<ClipId> {
        self.parent
    }

    /// Static record bound at construction.
    pub fn record(&self) -> Option<&ButtonRecord> {
        self.record.and_then(|object| self.data.button(object))
    }

    /// Hit area width (zero without a record).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Hit area height (zero without a record).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Hit area in local coordinates.
    pub fn local_bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, Size::new(self.width, self.height))
    }

    /// Conservative world-space bounding box of the hit area.
    pub fn world_bounds(&self) -> Rect {
        transform_rect_bbox(&self.state.matrix(), self.local_bounds())
    }

    /// Ids and composed transforms.
    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    /// Composed world matrix.
    pub fn matrix(&self) -> Affine {
        self.state.matrix()
    }

    /// Composed color transform.
    pub fn color_transform(&self) -> ColorTransform {
        self.state.color_transform()
    }

    /// Whether [`Button::destroy`] has not run yet.
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Attached handler bundles.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Attach another handler bundle after those already present.
    pub fn add_handlers(&mut self, bundle: Rc<dyn ButtonHandler>) {
        self.handlers.attach(bundle);
    }

    /// Detach every attachment of `bundle`.
    pub fn remove_handlers(&mut self, bundle: &Rc<dyn ButtonHandler>) -> bool {
        self.handlers.remove(bundle)
    }

    /// Push this button onto the front of the host's button list.
    ///
    /// Call at most once per active lifetime; linking twice makes the button
    /// appear twice in the host's traversal.
    pub fn link_button(&self, host: &mut dyn ButtonHost) {
        tracing::trace!(id = ?self.id, "linking button");
        host.link_button(self.id);
    }

    /// Per-frame execution: record placement ids, then fire
    /// [`ButtonEvent::EnterFrame`].
    pub fn exec(&mut self, matrix_id: u32, color_transform_id: u32, host: &mut dyn ButtonHost) {
        if !self.state.is_alive() {
            return;
        }
        self.state.exec(matrix_id, color_transform_id);
        self.notify(ButtonEvent::EnterFrame, host);
    }

    /// Compose transforms from the parent's, then fire [`ButtonEvent::Update`].
    ///
    /// A changed world matrix invalidates the last hit.
    pub fn update(
        &mut self,
        matrix: Option<&Affine>,
        color: Option<&ColorTransform>,
        host: &mut dyn ButtonHost,
    ) {
        if !self.state.is_alive() {
            return;
        }
        if self.state.update(matrix, color) {
            self.hit = None;
        }
        self.notify(ButtonEvent::Update, host);
    }

    /// Fire [`ButtonEvent::Render`] when `visible`.
    ///
    /// Drawing is the renderer's business; buttons have nothing of their own
    /// to draw.
    pub fn render(&self, visible: bool, _render_offset: i32, host: &mut dyn ButtonHost) {
        if visible {
            self.notify(ButtonEvent::Render, host);
        }
    }

    /// Tear the button down.
    ///
    /// The host's focused and pressed slots are cleared first if they hold
    /// this button, so [`ButtonEvent::Unload`] handlers never observe a
    /// reference to a button that is going away. Calling this again is a
    /// no-op.
    pub fn destroy(&mut self, host: &mut dyn ButtonHost) {
        if !self.state.is_alive() {
            return;
        }
        tracing::trace!(id = ?self.id, "destroying button");
        host.clear_focus(self.id);
        host.clear_pressed(self.id);
        self.notify(ButtonEvent::Unload, host);
        self.state.destroy();
        self.hit = None;
    }

    /// Test whether the screen-space point `(x, y)` is inside the hit area.
    ///
    /// The point is mapped into local space through the inverse of the
    /// current world matrix and tested against `[0, width) × [0, height)`.
    /// On a hit the local point is kept as [`Button::hit`]; on a miss that is
    /// reset. No handler runs.
    pub fn check_hit(&mut self, x: f64, y: f64) -> bool {
        let matrix = self.state.matrix();
        let inverse = invert(&matrix);
        if inverse == DEGENERATE_INVERSE {
            tracing::debug!(id = ?self.id, ?matrix, "hit test against a singular transform");
        }
        let local = apply(Point::new(x, y), &inverse);
        if self.local_bounds().contains(local) {
            self.hit = Some(local);
            true
        } else {
            self.hit = None;
            false
        }
    }

    /// Local coordinates of the last successful hit test.
    ///
    /// `None` when the last test missed, or none ran since the world matrix
    /// last changed.
    pub fn hit(&self) -> Option<Point> {
        self.hit
    }

    /// The pointer entered the button.
    pub fn roll_over(&self, host: &mut dyn ButtonHost) {
        self.notify(ButtonEvent::RollOver, host);
        self.play_animation(ConditionKind::ROLL_OVER, 0, host);
    }

    /// The pointer left the button.
    pub fn roll_out(&self, host: &mut dyn ButtonHost) {
        self.notify(ButtonEvent::RollOut, host);
        self.play_animation(ConditionKind::ROLL_OUT, 0, host);
    }

    /// The pointer was pressed on the button.
    pub fn press(&self, host: &mut dyn ButtonHost) {
        self.notify(ButtonEvent::Press, host);
        self.play_animation(ConditionKind::PRESS, 0, host);
    }

    /// The pointer was released on the button.
    pub fn release(&self, host: &mut dyn ButtonHost) {
        self.notify(ButtonEvent::Release, host);
        self.play_animation(ConditionKind::RELEASE, 0, host);
    }

    /// A key was pressed. Only key-press rows with a matching `code` fire.
    pub fn key_press(&self, code: i32, host: &mut dyn ButtonHost) {
        self.notify(ButtonEvent::KeyPress { code }, host);
        self.play_animation(ConditionKind::KEY_PRESS, code, host);
    }

    /// Request every animation whose condition row matches `kind` (and
    /// `code`, for key presses), in table order.
    ///
    /// Returns the number of requests made. Without a static record, or after
    /// [`Button::destroy`], this does nothing.
    pub fn play_animation(&self, kind: ConditionKind, code: i32, host: &mut dyn ButtonHost) -> usize {
        if !self.state.is_alive() {
            return 0;
        }
        let Some(record) = self.record() else {
            return 0;
        };
        request_animations(
            self.data.conditions_of(record),
            kind,
            code,
            self.parent,
            self.id,
            host,
        )
    }

    fn notify(&self, event: ButtonEvent, host: &mut dyn ButtonHost) {
        if self.state.is_alive() && !self.handlers.is_empty() {
            self.handlers.dispatch(event, self, host);
        }
    }
}
