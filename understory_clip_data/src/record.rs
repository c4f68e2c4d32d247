// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static per-button records and the color transform they reference.

/// Index of a button's static record in [`AssetData`](crate::AssetData).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Convert a raw authored id.
    ///
    /// Authored data uses negative ids for objects that carry no static record
    /// (placeholders); those map to `None`.
    ///
    /// ```
    /// use understory_clip_data::ObjectId;
    ///
    /// assert_eq!(ObjectId::from_raw(3), Some(ObjectId(3)));
    /// assert_eq!(ObjectId::from_raw(-1), None);
    /// ```
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Geometry and ids of a button, without its condition range.
///
/// This is what callers provide to [`AssetData::add_button`](crate::AssetData::add_button);
/// the table fills in where the conditions live.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonShape {
    /// Matrix applied on top of the placement matrix (index into the matrix table).
    pub matrix_id: u32,
    /// Authored color transform (index into the color transform table).
    pub color_transform_id: u32,
    /// Hit area width in local units.
    pub width: f64,
    /// Hit area height in local units.
    pub height: f64,
}

/// Immutable static record for an authored button.
///
/// `condition_offset..condition_offset + condition_count` addresses the
/// shared condition array of the owning [`AssetData`](crate::AssetData).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonRecord {
    /// Matrix applied on top of the placement matrix.
    pub matrix_id: u32,
    /// Authored color transform.
    pub color_transform_id: u32,
    /// Hit area width in local units.
    pub width: f64,
    /// Hit area height in local units.
    pub height: f64,
    /// First condition of this button in the shared condition array.
    pub condition_offset: u32,
    /// Number of conditions belonging to this button.
    pub condition_count: u32,
}

impl ButtonRecord {
    /// Shape part of the record.
    pub fn shape(&self) -> ButtonShape {
        ButtonShape {
            matrix_id: self.matrix_id,
            color_transform_id: self.color_transform_id,
            width: self.width,
            height: self.height,
        }
    }

    /// Index range of this record's conditions in the shared array.
    pub fn condition_range(&self) -> core::ops::Range<usize> {
        let start = self.condition_offset as usize;
        start..start.saturating_add(self.condition_count as usize)
    }
}

/// Multiplicative and additive color terms, RGBA order.
///
/// A color `c` is transformed as `c * multi + add` per channel.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorTransform {
    /// Per-channel multipliers.
    pub multi: [f32; 4],
    /// Per-channel offsets.
    pub add: [f32; 4],
}

impl ColorTransform {
    /// The transform that leaves colors unchanged.
    pub const IDENTITY: Self = Self {
        multi: [1.0; 4],
        add: [0.0; 4],
    };

    /// Compose `self` after `inner`: applying the result equals applying
    /// `inner` and then `self`.
    #[must_use]
    pub fn then(&self, inner: &Self) -> Self {
        Self {
            multi: core::array::from_fn(|i| inner.multi[i] * self.multi[i]),
            add: core::array::from_fn(|i| inner.add[i] * self.multi[i] + self.add[i]),
        }
    }

    /// Apply to an RGBA color.
    pub fn apply(&self, rgba: [f32; 4]) -> [f32; 4] {
        core::array::from_fn(|i| rgba[i] * self.multi[i] + self.add[i])
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_raw_ids_have_no_record() {
        assert_eq!(ObjectId::from_raw(0), Some(ObjectId(0)));
        assert_eq!(ObjectId::from_raw(-1), None);
        assert_eq!(ObjectId::from_raw(i32::MIN), None);
    }

    #[test]
    fn condition_range_spans_count() {
        let rec = ButtonRecord {
            matrix_id: 0,
            color_transform_id: 0,
            width: 1.0,
            height: 1.0,
            condition_offset: 3,
            condition_count: 2,
        };
        assert_eq!(rec.condition_range(), 3..5);
    }

    #[test]
    fn color_then_matches_sequential_apply() {
        let inner = ColorTransform {
            multi: [0.5, 1.0, 1.0, 1.0],
            add: [0.25, 0.0, 0.0, 0.0],
        };
        let outer = ColorTransform {
            multi: [0.5, 0.5, 1.0, 1.0],
            add: [0.0, 0.5, 0.0, 0.0],
        };
        let c = [1.0, 0.5, 0.25, 1.0];
        assert_eq!(outer.then(&inner).apply(c), outer.apply(inner.apply(c)));
        assert_eq!(ColorTransform::IDENTITY.apply(c), c);
    }
}
