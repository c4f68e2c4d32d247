// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two overlapping buttons driven by simulated pointer and key input.
//!
//! This example shows how to:
//! - author button records and their condition tables with `understory_clip_data`,
//! - place buttons on a `Stage` and attach handler bundles per instance,
//! - route pointer moves, presses and key presses and collect animation requests.
//!
//! Run:
//! - `cargo run -p understory_clip_demos --example button_scene`

use std::rc::Rc;

use kurbo::{Affine, Vec2};
use understory_clip_button::{ButtonDesc, ButtonEvent, ButtonEvents, ButtonHandlers, ClipId, Stage};
use understory_clip_data::{
    AnimationId, AssetData, ButtonShape, ColorTransform, ConditionKind, ConditionRecord,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .init();

    // Authoring: a wide "play" button and a small "close" button.
    let mut data = AssetData::new();
    let play = data.add_button(
        ButtonShape {
            width: 120.0,
            height: 40.0,
            ..ButtonShape::default()
        },
        [
            ConditionRecord::new(ConditionKind::ROLL_OVER, AnimationId(1)),
            ConditionRecord::new(ConditionKind::ROLL_OUT, AnimationId(2)),
            ConditionRecord::new(ConditionKind::PRESS, AnimationId(3)),
            ConditionRecord::new(ConditionKind::RELEASE, AnimationId(4)),
            ConditionRecord::key_press(13, AnimationId(4)),
        ],
    );
    let close = data.add_button(
        ButtonShape {
            width: 24.0,
            height: 24.0,
            ..ButtonShape::default()
        },
        [
            ConditionRecord::new(
                ConditionKind::ROLL_OVER | ConditionKind::PRESS,
                AnimationId(10),
            ),
            ConditionRecord::key_press(27, AnimationId(11)),
        ],
    );
    if let Err(err) = data.validate() {
        eprintln!("invalid assets: {err}");
        return;
    }

    let mut stage = Stage::new(Rc::new(data));
    stage.add_instance_handlers(
        1,
        ButtonHandlers::new()
            .on(
                ButtonEvents::LOAD | ButtonEvents::PRESS | ButtonEvents::RELEASE,
                |event, button, _| println!("  play handler: {event:?} on {:?}", button.id()),
            )
            .into_rc(),
    );
    stage.add_instance_handlers(
        2,
        ButtonHandlers::new()
            .on_key_press(|code, button, host| {
                println!(
                    "  close handler: key {code} (focus = {:?}, self = {:?})",
                    host.focus(),
                    button.id()
                );
            })
            .on(ButtonEvents::UNLOAD, |event, _, _| {
                assert_eq!(event, ButtonEvent::Unload);
                println!("  close handler: unloading");
            })
            .into_rc(),
    );

    let clip = Some(ClipId(0));
    let play_id = stage.spawn(ButtonDesc {
        parent: clip,
        object: Some(play),
        instance_id: 1,
        ..ButtonDesc::default()
    });
    let close_id = stage.spawn(ButtonDesc {
        parent: clip,
        object: Some(close),
        instance_id: 2,
        ..ButtonDesc::default()
    });
    // Linked last means visited first: "close" sits on top of "play".
    stage.link(play_id);
    stage.link(close_id);

    stage.advance(
        &Affine::translate(Vec2::new(20.0, 20.0)),
        &ColorTransform::IDENTITY,
    );
    // Place "close" at the top-right corner of "play".
    stage.update(
        close_id,
        Some(&Affine::translate(Vec2::new(120.0, 20.0))),
        None,
    );
    if let Some(b) = stage.button(close_id) {
        println!("close button world bounds: {:?}", b.world_bounds());
    }

    let script: [(&str, Input); 8] = [
        ("hover play", Input::Point(40.0, 40.0)),
        ("press", Input::Press),
        ("release", Input::Release),
        ("hover close", Input::Point(130.0, 30.0)),
        ("press", Input::Press),
        ("leave while pressed", Input::Point(400.0, 400.0)),
        ("release outside", Input::Release),
        ("escape key", Input::Key(27)),
    ];
    for (label, input) in script {
        println!("\n== {label} ==");
        match input {
            Input::Point(x, y) => {
                let focus = stage.input_point(x, y);
                println!("focus: {focus:?}");
            }
            Input::Press => {
                stage.input_press();
            }
            Input::Release => {
                stage.input_release();
            }
            Input::Key(code) => stage.input_key_press(code),
        }
        for request in stage.take_animation_requests() {
            println!(
                "  play {:?} in {:?} (from {:?})",
                request.animation, request.parent, request.button
            );
        }
    }

    println!("\n== teardown ==");
    stage.remove(close_id);
    println!("remaining buttons: {}", stage.len());
}

#[derive(Clone, Copy, Debug)]
enum Input {
    Point(f64, f64),
    Press,
    Release,
    Key(i32),
}
