// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility, opacity and tint.
//!
//! Opacity and color are stored per node as "real" values. The displayed
//! value additionally folds in the displayed value of the parent when the
//! parent has cascading enabled, and stops at the first ancestor that does
//! not cascade. Displayed values are derived on each query.

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;

/// An 8-bit RGB tint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color3 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color3 {
    /// Opaque white, the neutral tint.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiplies each channel by the other color's, treating 255 as 1.
    #[must_use]
    pub const fn modulate(self, other: Self) -> Self {
        Self {
            r: modulate(self.r, other.r),
            g: modulate(self.g, other.g),
            b: modulate(self.b, other.b),
        }
    }
}

impl Default for Color3 {
    fn default() -> Self {
        Self::WHITE
    }
}

const fn modulate(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16) / 255) as u8
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplayState {
    pub(crate) visible: bool,
    pub(crate) opacity: u8,
    pub(crate) color: Color3,
    pub(crate) cascade_opacity: bool,
    pub(crate) cascade_color: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 255,
            color: Color3::WHITE,
            cascade_opacity: false,
            cascade_color: false,
        }
    }
}

impl SceneGraph {
    /// Returns whether the node (and therefore its subtree) is drawn.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.display[id.idx as usize].visible
    }

    /// Shows or hides the node together with its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.validate(id);
        self.display[id.idx as usize].visible = visible;
    }

    /// Returns the node's own opacity.
    #[must_use]
    pub fn opacity(&self, id: NodeId) -> u8 {
        self.validate(id);
        self.display[id.idx as usize].opacity
    }

    /// Sets the node's own opacity.
    pub fn set_opacity(&mut self, id: NodeId, opacity: u8) {
        self.validate(id);
        self.display[id.idx as usize].opacity = opacity;
    }

    /// Returns the opacity after cascading from ancestors.
    #[must_use]
    pub fn displayed_opacity(&self, id: NodeId) -> u8 {
        self.validate(id);
        let mut value = self.display[id.idx as usize].opacity;
        let mut p = self.parent[id.idx as usize];
        while p != INVALID && self.display[p as usize].cascade_opacity {
            value = modulate(value, self.display[p as usize].opacity);
            p = self.parent[p as usize];
        }
        value
    }

    /// Returns whether the node passes its opacity on to its children.
    #[must_use]
    pub fn is_cascade_opacity_enabled(&self, id: NodeId) -> bool {
        self.validate(id);
        self.display[id.idx as usize].cascade_opacity
    }

    /// Chooses whether the node passes its opacity on to its children.
    pub fn set_cascade_opacity_enabled(&mut self, id: NodeId, enabled: bool) {
        self.validate(id);
        self.display[id.idx as usize].cascade_opacity = enabled;
    }

    /// Returns the node's own tint.
    #[must_use]
    pub fn color(&self, id: NodeId) -> Color3 {
        self.validate(id);
        self.display[id.idx as usize].color
    }

    /// Sets the node's own tint.
    pub fn set_color(&mut self, id: NodeId, color: Color3) {
        self.validate(id);
        self.display[id.idx as usize].color = color;
    }

    /// Returns the tint after cascading from ancestors.
    #[must_use]
    pub fn displayed_color(&self, id: NodeId) -> Color3 {
        self.validate(id);
        let mut value = self.display[id.idx as usize].color;
        let mut p = self.parent[id.idx as usize];
        while p != INVALID && self.display[p as usize].cascade_color {
            value = value.modulate(self.display[p as usize].color);
            p = self.parent[p as usize];
        }
        value
    }

    /// Returns whether the node passes its tint on to its children.
    #[must_use]
    pub fn is_cascade_color_enabled(&self, id: NodeId) -> bool {
        self.validate(id);
        self.display[id.idx as usize].cascade_color
    }

    /// Chooses whether the node passes its tint on to its children.
    pub fn set_cascade_color_enabled(&mut self, id: NodeId, enabled: bool) {
        self.validate(id);
        self.display[id.idx as usize].cascade_color = enabled;
    }
}
