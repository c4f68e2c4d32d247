// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reference host: owns buttons in generational slots and routes input.

use alloc::rc::Rc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Affine;
use understory_clip_data::{AssetData, ColorTransform};

use crate::button::{Button, ButtonDesc};
use crate::handlers::{ButtonHandler, HandlerBundles};
use crate::host::{AnimationRequest, ButtonHost};
use crate::list::ButtonList;
use crate::types::ButtonId;

/// Handler bundles provided to new buttons, keyed by authored instance id.
#[derive(Clone, Default)]
pub struct HandlerTable {
    by_instance: HashMap<u32, HandlerBundles>,
}

impl HandlerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide `bundle` to every button later created with `instance_id`.
    pub fn insert(&mut self, instance_id: u32, bundle: Rc<dyn ButtonHandler>) {
        self.by_instance.entry(instance_id).or_default().push(bundle);
    }

    /// Stop providing bundles for `instance_id`.
    ///
    /// Buttons that already received them keep them.
    pub fn remove(&mut self, instance_id: u32) -> bool {
        self.by_instance.remove(&instance_id).is_some()
    }

    /// Bundles for `instance_id`, in insertion order.
    pub fn get(&self, instance_id: u32) -> HandlerBundles {
        self.by_instance
            .get(&instance_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl core::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("instances", &self.by_instance.len())
            .finish_non_exhaustive()
    }
}

/// Host-side state of a [`Stage`]: the button list, the focused and pressed
/// slots, pending animation requests and the handler table.
#[derive(Debug, Default)]
pub struct StageHost {
    list: ButtonList,
    focus: Option<ButtonId>,
    pressed: Option<ButtonId>,
    requests: Vec<AnimationRequest>,
    handlers: HandlerTable,
}

impl StageHost {
    /// The ordered button list.
    pub fn list(&self) -> &ButtonList {
        &self.list
    }

    /// Animation requests not yet taken.
    pub fn requests(&self) -> &[AnimationRequest] {
        &self.requests
    }

    /// Handlers provided to new buttons.
    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }
}

impl ButtonHost for StageHost {
    fn handlers_for(&self, _button: ButtonId, instance_id: u32) -> HandlerBundles {
        self.handlers.get(instance_id)
    }

    fn link_button(&mut self, button: ButtonId) {
        self.list.link(button);
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

/// Owner of a set of buttons sharing one [`AssetData`].
///
/// `Stage` hands out generational [`ButtonId`]s, keeps the button list and
/// the focused/pressed slots, and turns raw pointer and key input into button
/// interactions:
///
/// - [`Stage::input_point`] moves focus to the first linked button (front to
///   back) whose hit area contains the point, rolling the old focus out and
///   the new one over.
/// - [`Stage::input_press`] presses the focused button.
/// - [`Stage::input_release`] releases it if it is still the pressed one.
/// - [`Stage::input_key_press`] forwards a key to every linked button.
///
/// Animation requests accumulate until [`Stage::take_animation_requests`].
///
/// ```
/// use std::rc::Rc;
/// use understory_clip_button::{ButtonDesc, Stage};
/// use understory_clip_data::{
///     AnimationId, AssetData, ButtonShape, ConditionKind, ConditionRecord,
/// };
///
/// let mut data = AssetData::new();
/// let object = data.add_button(
///     ButtonShape { width: 50.0, height: 20.0, ..ButtonShape::default() },
///     [ConditionRecord::new(ConditionKind::PRESS, AnimationId(9))],
/// );
/// let mut stage = Stage::new(Rc::new(data));
/// let id = stage.spawn(ButtonDesc { object: Some(object), ..ButtonDesc::default() });
/// stage.link(id);
///
/// stage.input_point(10.0, 10.0);
/// stage.input_press();
/// let played: Vec<_> = stage
///     .take_animation_requests()
///     .into_iter()
///     .map(|r| r.animation)
///     .collect();
/// assert_eq!(played, [AnimationId(9)]);
/// ```
pub struct Stage {
    data: Rc<AssetData>,
    /// slots
    buttons: Vec<Option<Button>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    host: StageHost,
}

impl core::fmt::Debug for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stage")
            .field("buttons_total", &self.buttons.len())
            .field("buttons_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Create an empty stage over `data`.
    pub fn new(data: Rc<AssetData>) -> Self {
        Self {
            data,
            buttons: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            host: StageHost::default(),
        }
    }

    /// Shared asset tables.
    pub fn data(&self) -> &Rc<AssetData> {
        &self.data
    }

    /// Host-side state.
    pub fn host(&self) -> &StageHost {
        &self.host
    }

    /// Provide `bundle` to buttons created later with `instance_id`.
    pub fn add_instance_handlers(&mut self, instance_id: u32, bundle: Rc<dyn ButtonHandler>) {
        self.host.handlers.insert(instance_id, bundle);
    }

    /// Create a button. It is not linked until [`Stage::link`].
    pub fn spawn(&mut self, desc: ButtonDesc) -> ButtonId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.buttons.push(None);
            self.generations.push(1);
            (self.buttons.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ButtonId uses 32-bit indices."
        )]
        let id = ButtonId::new(idx as u32, generation);
        tracing::trace!(?id, ?desc, "spawning button");
        let button = Button::new(id, desc, self.data.clone(), &mut self.host);
        self.buttons[idx] = Some(button);
        id
    }

    /// Whether `id` refers to a live button.
    pub fn is_alive(&self, id: ButtonId) -> bool {
        self.button(id).is_some()
    }

    /// The button behind `id`, if it is live.
    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|b| b.id() == id)
    }

    /// Mutable access to the button behind `id`, if it is live.
    pub fn button_mut(&mut self, id: ButtonId) -> Option<&mut Button> {
        self.buttons
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|b| b.id() == id)
    }

    /// Number of live buttons.
    pub fn len(&self) -> usize {
        self.buttons.iter().filter(|b| b.is_some()).count()
    }

    /// Whether no button is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Link `id` at the front of the button list.
    ///
    /// Returns `false` for stale ids and ids that are already linked.
    pub fn link(&mut self, id: ButtonId) -> bool {
        if self.host.list.contains(id) {
            return false;
        }
        let Some(button) = self.buttons.get(id.idx()).and_then(Option::as_ref) else {
            return false;
        };
        if button.id() != id {
            return false;
        }
        button.link_button(&mut self.host);
        true
    }

    /// Empty the button list. Buttons stay alive.
    pub fn unlink_all(&mut self) {
        self.host.list.clear();
    }

    /// Destroy `id` and free its slot.
    ///
    /// Focus and pressed are released before the button's `UNLOAD` handlers
    /// run, and the id is dropped from the button list.
    pub fn remove(&mut self, id: ButtonId) -> bool {
        let Some(slot) = self.buttons.get_mut(id.idx()) else {
            return false;
        };
        if !slot.as_ref().is_some_and(|b| b.id() == id) {
            return false;
        }
        let Some(mut button) = slot.take() else {
            return false;
        };
        button.destroy(&mut self.host);
        self.host.list.retain(|linked| linked != id);
        self.free_list.push(id.idx());
        true
    }

    /// Run [`Button::exec`] on `id`.
    pub fn exec(&mut self, id: ButtonId, matrix_id: u32, color_transform_id: u32) -> bool {
        let Self { buttons, host, .. } = self;
        match live_mut(buttons, id) {
            Some(button) => {
                button.exec(matrix_id, color_transform_id, host);
                true
            }
            None => false,
        }
    }

    /// Run [`Button::update`] on `id`.
    pub fn update(
        &mut self,
        id: ButtonId,
        matrix: Option<&Affine>,
        color: Option<&ColorTransform>,
    ) -> bool {
        let Self { buttons, host, .. } = self;
        match live_mut(buttons, id) {
            Some(button) => {
                button.update(matrix, color, host);
                true
            }
            None => false,
        }
    }

    /// Run [`Button::render`] on `id`.
    pub fn render(&mut self, id: ButtonId, visible: bool, render_offset: i32) -> bool {
        let Self { buttons, host, .. } = self;
        match live_mut(buttons, id) {
            Some(button) => {
                button.render(visible, render_offset, host);
                true
            }
            None => false,
        }
    }

    /// Run one frame on every live button in slot order: execute with the
    /// button's current placement ids, update from `matrix` and `color`, then
    /// render.
    pub fn advance(&mut self, matrix: &Affine, color: &ColorTransform) {
        let Self { buttons, host, .. } = self;
        for button in buttons.iter_mut().flatten() {
            let (mid, cid) = (
                button.state().matrix_id(),
                button.state().color_transform_id(),
            );
            button.exec(mid, cid, host);
            button.update(Some(matrix), Some(color), host);
            button.render(true, 0, host);
        }
    }

    /// Move the pointer to `(x, y)` in screen space.
    ///
    /// Returns the newly focused button.
    pub fn input_point(&mut self, x: f64, y: f64) -> Option<ButtonId> {
        let Self { buttons, host, .. } = self;
        let mut hit = None;
        for id in host.list.iter() {
            let Some(button) = live_mut(buttons, id) else {
                continue;
            };
            if button.check_hit(x, y) {
                hit = Some(id);
                break;
            }
        }

        let previous = host.focus;
        if previous != hit {
            host.focus = hit;
            tracing::trace!(?previous, focus = ?hit, "button focus changed");
            if let Some(button) = previous.and_then(|id| live_mut(buttons, id)) {
                button.roll_out(host);
            }
            if let Some(button) = hit.and_then(|id| live_mut(buttons, id)) {
                button.roll_over(host);
            }
        }
        hit
    }

    /// Press the pointer: the focused button becomes the pressed one.
    pub fn input_press(&mut self) -> Option<ButtonId> {
        let Self { buttons, host, .. } = self;
        host.pressed = host.focus;
        let pressed = host.pressed?;
        if let Some(button) = live_mut(buttons, pressed) {
            button.press(host);
        }
        Some(pressed)
    }

    /// Release the pointer.
    ///
    /// The pressed button is released only if it is still focused; either way
    /// nothing is pressed afterwards.
    pub fn input_release(&mut self) -> Option<ButtonId> {
        let Self { buttons, host, .. } = self;
        let released = host.pressed.filter(|&id| host.focus == Some(id));
        if let Some(button) = released.and_then(|id| live_mut(buttons, id)) {
            button.release(host);
        }
        host.pressed = None;
        released
    }

    /// Forward a key press to every linked button, front to back.
    pub fn input_key_press(&mut self, code: i32) {
        let Self { buttons, host, .. } = self;
        let targets: Vec<ButtonId> = host.list.iter().collect();
        for id in targets {
            if let Some(button) = live_mut(buttons, id) {
                button.key_press(code, host);
            }
        }
    }

    /// Drain pending animation requests in the order they were made.
    pub fn take_animation_requests(&mut self) -> Vec<AnimationRequest> {
        core::mem::take(&mut self.host.requests)
    }

    /// Destroy every button and empty the list.
    pub fn clear(&mut self) {
        let Self {
            buttons,
            free_list,
            host,
            ..
        } = self;
        for (idx, slot) in buttons.iter_mut().enumerate() {
            if let Some(mut button) = slot.take() {
                button.destroy(host);
                free_list.push(idx);
            }
        }
        host.list.clear();
    }
}

fn live_mut(buttons: &mut [Option<Button>], id: ButtonId) -> Option<&mut Button> {
    buttons
        .get_mut(id.idx())
        .and_then(Option::as_mut)
        .filter(|b| b.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{ButtonEvent, ButtonEvents, ButtonHandlers};
    use crate::types::ClipId;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Vec2;
    use understory_clip_data::{
        AnimationId, ButtonShape, ConditionKind, ConditionRecord, ObjectId,
    };

    /// Two 20x20 buttons: `over` fires 1/2/3/4 on roll over/out/press/release,
    /// `under` fires 11/12/13/14.
    fn assets() -> (Rc<AssetData>, ObjectId, ObjectId) {
        let mut data = AssetData::new();
        let rows = |base: u32| {
            [
                ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(base + 1)),
                ConditionRecord::new(ConditionKind::ROLL_OUT, AnimationId(base + 2)),
                ConditionRecord::new(ConditionKind::PRESS, AnimationId(base + 3)),
                ConditionRecord::new(ConditionKind::RELEASE, AnimationId(base + 4)),
                ConditionRecord::key_press(32, AnimationId(base + 5)),
            ]
        };
        let shape = ButtonShape {
            width: 20.0,
            height: 20.0,
            ..ButtonShape::default()
        };
        let over = data.add_button(shape, rows(0));
        let under = data.add_button(shape, rows(10));
        (Rc::new(data), over, under)
    }

    fn desc(object: ObjectId) -> ButtonDesc {
        ButtonDesc {
            parent: Some(ClipId(1)),
            object: Some(object),
            ..ButtonDesc::default()
        }
    }

    fn played(stage: &mut Stage) -> Vec<u32> {
        stage
            .take_animation_requests()
            .into_iter()
            .map(|r| r.animation.0)
            .collect()
    }

    /// `under` at the origin, `over` at (10, 0), linked so that `over` is in
    /// front.
    fn overlapping() -> (Stage, ButtonId, ButtonId) {
        let (data, over_obj, under_obj) = assets();
        let mut stage = Stage::new(data);
        let under = stage.spawn(desc(under_obj));
        let over = stage.spawn(desc(over_obj));
        stage.update(under, Some(&Affine::IDENTITY), None);
        stage.update(over, Some(&Affine::translate(Vec2::new(10.0, 0.0))), None);
        assert!(stage.link(under));
        assert!(stage.link(over));
        (stage, over, under)
    }

    #[test]
    fn focus_goes_to_the_frontmost_hit() {
        let (mut stage, over, under) = overlapping();
        assert_eq!(stage.input_point(15.0, 5.0), Some(over));
        assert_eq!(played(&mut stage), vec![1]);
        assert_eq!(stage.input_point(5.0, 5.0), Some(under));
        assert_eq!(played(&mut stage), vec![2, 11], "roll out before roll over");
        assert_eq!(stage.input_point(6.0, 5.0), Some(under));
        assert!(played(&mut stage).is_empty(), "no change, no events");
        assert_eq!(stage.input_point(100.0, 100.0), None);
        assert_eq!(played(&mut stage), vec![12]);
        assert_eq!(stage.host().focus(), None);
    }

    #[test]
    fn press_and_release_on_the_same_button() {
        let (mut stage, over, _) = overlapping();
        stage.input_point(15.0, 5.0);
        stage.take_animation_requests();
        assert_eq!(stage.input_press(), Some(over));
        assert_eq!(stage.host().pressed(), Some(over));
        assert_eq!(stage.input_release(), Some(over));
        assert_eq!(played(&mut stage), vec![3, 4]);
        assert_eq!(stage.host().pressed(), None);
    }

    #[test]
    fn release_elsewhere_does_not_release() {
        let (mut stage, over, _) = overlapping();
        stage.input_point(15.0, 5.0);
        stage.input_press();
        stage.input_point(5.0, 5.0);
        stage.take_animation_requests();
        assert_eq!(stage.input_release(), None);
        assert!(played(&mut stage).is_empty());
        assert_eq!(stage.host().pressed(), None);
        assert!(stage.is_alive(over));
    }

    #[test]
    fn press_without_focus_presses_nothing() {
        let (mut stage, ..) = overlapping();
        assert_eq!(stage.input_press(), None);
        assert!(played(&mut stage).is_empty());
    }

    #[test]
    fn key_press_reaches_every_linked_button() {
        let (mut stage, ..) = overlapping();
        stage.input_key_press(31);
        assert!(played(&mut stage).is_empty());
        stage.input_key_press(32);
        assert_eq!(played(&mut stage), vec![5, 15], "front to back");
    }

    #[test]
    fn unlinked_buttons_do_not_receive_input() {
        let (data, over_obj, _) = assets();
        let mut stage = Stage::new(data);
        let id = stage.spawn(desc(over_obj));
        assert_eq!(stage.input_point(5.0, 5.0), None);
        stage.input_key_press(32);
        assert!(played(&mut stage).is_empty());
        assert!(stage.link(id));
        assert!(!stage.link(id), "already linked");
        assert_eq!(stage.host().list().len(), 1);
        assert_eq!(stage.input_point(5.0, 5.0), Some(id));
    }

    #[test]
    fn remove_clears_focus_and_pressed_and_unlinks() {
        let (mut stage, over, under) = overlapping();
        stage.input_point(15.0, 5.0);
        stage.input_press();
        assert!(stage.remove(over));
        assert_eq!(stage.host().focus(), None);
        assert_eq!(stage.host().pressed(), None);
        assert!(!stage.host().list().contains(over));
        assert!(stage.host().list().contains(under));
        assert!(!stage.remove(over), "second remove is a no-op");

        // Release after the pressed button is gone: nothing happens.
        stage.take_animation_requests();
        assert_eq!(stage.input_release(), None);
        assert!(played(&mut stage).is_empty());
    }

    #[test]
    fn slots_are_reused_with_a_new_generation() {
        let (data, over_obj, _) = assets();
        let mut stage = Stage::new(data);
        let a = stage.spawn(desc(over_obj));
        stage.remove(a);
        let b = stage.spawn(desc(over_obj));
        assert_eq!(a.index(), b.index());
        assert!(b.generation() > a.generation(), "generation bumps on reuse");
        assert!(!stage.is_alive(a));
        assert!(stage.button(a).is_none());
        assert!(!stage.exec(a, 0, 0));
        assert!(!stage.link(a));
        assert!(stage.is_alive(b));
        assert_eq!(stage.len(), 1);
    }

    #[test]
    fn instance_handlers_see_the_whole_lifecycle() {
        let (data, over_obj, _) = assets();
        let mut stage = Stage::new(data);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        stage.add_instance_handlers(
            3,
            ButtonHandlers::new()
                .on(ButtonEvents::all(), move |event, _, _| sink.borrow_mut().push(event))
                .into_rc(),
        );
        let id = stage.spawn(ButtonDesc {
            instance_id: 3,
            ..desc(over_obj)
        });
        stage.link(id);
        stage.advance(&Affine::IDENTITY, &ColorTransform::IDENTITY);
        stage.input_point(1.0, 1.0);
        stage.input_press();
        stage.input_release();
        stage.input_key_press(32);
        stage.remove(id);
        assert_eq!(
            *log.borrow(),
            vec![
                ButtonEvent::Load,
                ButtonEvent::EnterFrame,
                ButtonEvent::Update,
                ButtonEvent::Render,
                ButtonEvent::RollOver,
                ButtonEvent::Press,
                ButtonEvent::Release,
                ButtonEvent::KeyPress { code: 32 },
                ButtonEvent::Unload,
            ]
        );
        assert!(stage.is_empty());
    }

    #[test]
    fn handlers_can_drive_the_host() {
        let (data, over_obj, _) = assets();
        let mut stage = Stage::new(data);
        stage.add_instance_handlers(
            0,
            ButtonHandlers::new()
                .on(ButtonEvents::PRESS, |_, button, host| {
                    host.play_animation(AnimationRequest {
                        animation: AnimationId(99),
                        parent: button.parent(),
                        button: button.id(),
                    });
                })
                .into_rc(),
        );
        let id = stage.spawn(desc(over_obj));
        stage.link(id);
        stage.input_point(1.0, 1.0);
        stage.take_animation_requests();
        stage.input_press();
        assert_eq!(played(&mut stage), vec![99, 3], "handlers run before conditions");
    }

    #[test]
    fn clear_destroys_everything() {
        let (mut stage, over, under) = overlapping();
        stage.input_point(15.0, 5.0);
        stage.clear();
        assert!(stage.is_empty());
        assert!(!stage.is_alive(over));
        assert!(!stage.is_alive(under));
        assert!(stage.host().list().is_empty());
        assert_eq!(stage.host().focus(), None);
    }

    #[test]
    fn advance_moves_hit_areas() {
        let (data, over_obj, _) = assets();
        let mut stage = Stage::new(data);
        let id = stage.spawn(desc(over_obj));
        stage.link(id);
        stage.advance(&Affine::translate(Vec2::new(100.0, 0.0)), &ColorTransform::IDENTITY);
        assert_eq!(stage.input_point(5.0, 5.0), None);
        assert_eq!(stage.input_point(105.0, 5.0), Some(id));
    }
}
