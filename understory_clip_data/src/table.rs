// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared, append-only asset tables.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::condition::ConditionRecord;
use crate::record::{ButtonRecord, ButtonShape, ColorTransform, ObjectId};

/// Problems found while validating asset tables.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DataError {
    /// A button's condition range does not fit in the condition array.
    #[error(
        "button {object:?} references conditions {offset}+{count}, but the table holds {len}"
    )]
    ConditionRange {
        /// Offending button.
        object: ObjectId,
        /// First referenced condition.
        offset: u32,
        /// Number of referenced conditions.
        count: u32,
        /// Length of the shared condition array.
        len: usize,
    },
    /// A button's hit area is negative or not finite.
    #[error("button {object:?} has an invalid hit area of {width} x {height}")]
    InvalidSize {
        /// Offending button.
        object: ObjectId,
        /// Authored width.
        width: f64,
        /// Authored height.
        height: f64,
    },
}

/// Raw tables, as authored or deserialized, before validation.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetParts {
    /// Static button records.
    pub buttons: Vec<ButtonRecord>,
    /// Shared condition array addressed by the button records.
    pub conditions: Vec<ConditionRecord>,
    /// Matrix table.
    pub matrices: Vec<Affine>,
    /// Color transform table.
    pub color_transforms: Vec<ColorTransform>,
}

/// Read-only tables consumed by button nodes.
///
/// Tables only ever grow; nothing hands out mutable access to an existing
/// row. Share one instance between every node that instantiates the same
/// assets (the button crate holds it behind an `Rc`).
///
/// ```
/// use understory_clip_data::{
///     AnimationId, AssetData, ButtonShape, ConditionKind, ConditionRecord,
/// };
///
/// let mut data = AssetData::new();
/// let ok = data.add_button(
///     ButtonShape { width: 50.0, height: 20.0, ..ButtonShape::default() },
///     [ConditionRecord::new(ConditionKind::PRESS, AnimationId(9))],
/// );
/// let record = data.button(ok).unwrap();
/// assert_eq!(data.conditions_of(record).len(), 1);
/// assert!(data.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "AssetParts", into = "AssetParts")
)]
pub struct AssetData {
    buttons: Vec<ButtonRecord>,
    conditions: Vec<ConditionRecord>,
    matrices: Vec<Affine>,
    color_transforms: Vec<ColorTransform>,
}

impl AssetData {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tables from raw parts, rejecting records that address rows
    /// outside the condition array or carry an invalid hit area.
    pub fn from_parts(parts: AssetParts) -> Result<Self, DataError> {
        let data = Self {
            buttons: parts.buttons,
            conditions: parts.conditions,
            matrices: parts.matrices,
            color_transforms: parts.color_transforms,
        };
        data.validate()?;
        Ok(data)
    }

    /// Give the raw tables back.
    pub fn into_parts(self) -> AssetParts {
        AssetParts {
            buttons: self.buttons,
            conditions: self.conditions,
            matrices: self.matrices,
            color_transforms: self.color_transforms,
        }
    }

    /// Append a matrix and return its id.
    pub fn add_matrix(&mut self, matrix: Affine) -> u32 {
        self.matrices.push(matrix);
        last_index(self.matrices.len())
    }

    /// Append a color transform and return its id.
    pub fn add_color_transform(&mut self, color: ColorTransform) -> u32 {
        self.color_transforms.push(color);
        last_index(self.color_transforms.len())
    }

    /// Append a button and its conditions.
    ///
    /// The conditions are appended to the shared array in iteration order;
    /// that order is the order in which matching rows request animations.
    pub fn add_button(
        &mut self,
        shape: ButtonShape,
        conditions: impl IntoIterator<Item = ConditionRecord>,
    ) -> ObjectId {
        let offset = self.conditions.len();
        self.conditions.extend(conditions);
        let condition_offset = table_id(offset);
        let condition_count = table_id(self.conditions.len() - offset);
        self.buttons.push(ButtonRecord {
            matrix_id: shape.matrix_id,
            color_transform_id: shape.color_transform_id,
            width: shape.width,
            height: shape.height,
            condition_offset,
            condition_count,
        });
        ObjectId(last_index(self.buttons.len()))
    }

    /// Static record for `object`, if it exists.
    pub fn button(&self, object: ObjectId) -> Option<&ButtonRecord> {
        self.buttons.get(object.idx())
    }

    /// All button records.
    pub fn buttons(&self) -> &[ButtonRecord] {
        &self.buttons
    }

    /// The shared condition array.
    pub fn conditions(&self) -> &[ConditionRecord] {
        &self.conditions
    }

    /// Conditions belonging to `record`, in table order.
    ///
    /// Returns an empty slice when the range does not fit; use
    /// [`AssetData::validate`] to surface that as an error up front.
    pub fn conditions_of(&self, record: &ButtonRecord) -> &[ConditionRecord] {
        self.conditions
            .get(record.condition_range())
            .unwrap_or_default()
    }

    /// Matrix `id`, or the identity for unknown ids.
    pub fn matrix(&self, id: u32) -> Affine {
        self.matrices
            .get(id as usize)
            .copied()
            .unwrap_or(Affine::IDENTITY)
    }

    /// Color transform `id`, or the identity for unknown ids.
    pub fn color_transform(&self, id: u32) -> ColorTransform {
        self.color_transforms
            .get(id as usize)
            .copied()
            .unwrap_or(ColorTransform::IDENTITY)
    }

    /// Check every button record against the tables.
    pub fn validate(&self) -> Result<(), DataError> {
        for (idx, record) in self.buttons.iter().enumerate() {
            let object = ObjectId(table_id(idx));
            let range = record.condition_range();
            if range.end > self.conditions.len() {
                return Err(DataError::ConditionRange {
                    object,
                    offset: record.condition_offset,
                    count: record.condition_count,
                    len: self.conditions.len(),
                });
            }
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(record.width) || !valid(record.height) {
                return Err(DataError::InvalidSize {
                    object,
                    width: record.width,
                    height: record.height,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<AssetParts> for AssetData {
    type Error = DataError;

    fn try_from(parts: AssetParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}

impl From<AssetData> for AssetParts {
    fn from(data: AssetData) -> Self {
        data.into_parts()
    }
}

fn table_id(idx: usize) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Asset tables are addressed with 32-bit ids."
    )]
    let id = idx as u32;
    id
}

fn last_index(len: usize) -> u32 {
    table_id(len - 1)
}
