// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement constants.

use annograph_geometry::HORIZONTAL_TOLERANCE;
use annograph_model::MM_PER_FOOT;

/// Offsets and multipliers used by the placement planners.
///
/// Lengths are in the native model unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Maximum endpoint elevation difference of a horizontal edge.
    /// Default: 0.01
    pub horizontal_tolerance: f64,

    /// Millimetres per native unit, for text values. Default: 304.8
    pub mm_per_unit: f64,

    /// Wall dimension offset along view-right is
    /// `max(wall_min_offset, diagonal * wall_offset_factor)`.
    pub wall_min_offset: f64,
    pub wall_offset_factor: f64,
    /// Half-span of the wall dimension as a fraction of the wall height.
    /// Default: 0.6
    pub wall_span_factor: f64,

    /// Floor dimension offset, same rule as walls.
    pub floor_min_offset: f64,
    pub floor_offset_factor: f64,
    /// Half-span of the floor dimension as a multiple of the thickness.
    /// Default: 1.5
    pub floor_span_factor: f64,

    /// (right, up) offset of the framing dimension line. Default: (3.0, 2.0)
    pub framing_offset: (f64, f64),
    /// (right, up) offset of the generic model dimension line. Default: (2.0, 3.0)
    pub generic_offset: (f64, f64),
    /// Half-length of framing/generic dimension lines is
    /// `max(line_min_half, diagonal * line_half_factor)`.
    pub line_min_half: f64,
    pub line_half_factor: f64,

    /// (right, up) offset of level text from the elevation point. Default: (3.0, 1.0)
    pub level_text_offset: (f64, f64),
    /// Leader end distance along view-right from the elevation point.
    pub level_leader: f64,

    /// (right, up) offset of room text from the boundary anchor. Default: (2.0, 2.5)
    pub room_text_offset: (f64, f64),

    /// View-up offset of element text above its anchor. Default: 1.0
    pub text_up: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            horizontal_tolerance: HORIZONTAL_TOLERANCE,
            mm_per_unit: MM_PER_FOOT,
            wall_min_offset: 5.0,
            wall_offset_factor: 0.5,
            wall_span_factor: 0.6,
            floor_min_offset: 5.0,
            floor_offset_factor: 0.3,
            floor_span_factor: 1.5,
            framing_offset: (3.0, 2.0),
            generic_offset: (2.0, 3.0),
            line_min_half: 1.0,
            line_half_factor: 0.5,
            level_text_offset: (3.0, 1.0),
            level_leader: 0.5,
            room_text_offset: (2.0, 2.5),
            text_up: 1.0,
        }
    }
}

impl PlacementConfig {
    /// Length in whole millimetres.
    pub fn to_mm(&self, length: f64) -> i64 {
        (length * self.mm_per_unit).round() as i64
    }

    /// Area in whole square millimetres.
    pub fn to_mm2(&self, area: f64) -> i64 {
        (area * self.mm_per_unit * self.mm_per_unit).round() as i64
    }
}
