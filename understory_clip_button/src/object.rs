// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-object state shared by every placed object.

use kurbo::Affine;
use understory_clip_data::{ColorTransform, ObjectId};

/// Ids, composed transforms and change tracking of a placed object.
///
/// The owning clip drives this every frame: [`ObjectState::exec`] records the
/// placement ids the current frame asks for, and [`ObjectState::update`]
/// receives the parent-composed matrix and color transform.
#[derive(Clone, Debug)]
pub struct ObjectState {
    object: Option<ObjectId>,
    instance_id: u32,
    matrix_id: u32,
    color_transform_id: u32,
    data_matrix: Affine,
    matrix: Affine,
    color_transform: ColorTransform,
    matrix_id_changed: bool,
    color_transform_id_changed: bool,
    updated: bool,
    alive: bool,
}

impl ObjectState {
    /// Create state for a freshly placed object.
    ///
    /// `data_matrix` is the authored matrix applied on top of every placement
    /// matrix passed to [`ObjectState::update`].
    pub fn new(
        object: Option<ObjectId>,
        instance_id: u32,
        matrix_id: u32,
        color_transform_id: u32,
        data_matrix: Affine,
    ) -> Self {
        Self {
            object,
            instance_id,
            matrix_id,
            color_transform_id,
            data_matrix,
            matrix: data_matrix,
            color_transform: ColorTransform::IDENTITY,
            matrix_id_changed: true,
            color_transform_id_changed: true,
            updated: false,
            alive: true,
        }
    }

    /// Record the placement ids for the current frame.
    pub fn exec(&mut self, matrix_id: u32, color_transform_id: u32) {
        if self.matrix_id != matrix_id {
            self.matrix_id = matrix_id;
            self.matrix_id_changed = true;
        }
        if self.color_transform_id != color_transform_id {
            self.color_transform_id = color_transform_id;
            self.color_transform_id_changed = true;
        }
    }

    /// Compose the world matrix and copy the color transform.
    ///
    /// Returns `true` when the world matrix changed.
    pub fn update(&mut self, matrix: Option<&Affine>, color: Option<&ColorTransform>) -> bool {
        self.updated = true;
        let mut moved = false;
        if let Some(m) = matrix {
            let world = *m * self.data_matrix;
            moved = world != self.matrix;
            self.matrix = world;
            self.matrix_id_changed = false;
        }
        if let Some(c) = color {
            self.color_transform = *c;
            self.color_transform_id_changed = false;
        }
        moved
    }

    /// Release the object. Further calls are no-ops.
    ///
    /// Returns `false` if the object was already destroyed.
    pub fn destroy(&mut self) -> bool {
        core::mem::replace(&mut self.alive, false)
    }

    /// Static record this object was instantiated from, if any.
    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    /// Authored instance id.
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Placement matrix id of the current frame.
    pub fn matrix_id(&self) -> u32 {
        self.matrix_id
    }

    /// Placement color transform id of the current frame.
    pub fn color_transform_id(&self) -> u32 {
        self.color_transform_id
    }

    /// Composed world matrix.
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// Composed color transform.
    pub fn color_transform(&self) -> ColorTransform {
        self.color_transform
    }

    /// Whether the placement matrix id changed since the last update.
    pub fn matrix_id_changed(&self) -> bool {
        self.matrix_id_changed
    }

    /// Whether the placement color transform id changed since the last update.
    pub fn color_transform_id_changed(&self) -> bool {
        self.color_transform_id_changed
    }

    /// Whether [`ObjectState::update`] has run at least once.
    pub fn updated(&self) -> bool {
        self.updated
    }

    /// Whether the object has not been destroyed.
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
