//! Board geometry collaborator
//!
//! The engine only asks two things of the table: how far apart two points
//! are, and whether a point is on it. Positions are in board units; ranges
//! and moves are authored in inches and converted with [`Board::from_inches`].

use serde::{Deserialize, Serialize};

use crate::units::Position;

pub trait Board: std::fmt::Debug {
    /// Distance in board units
    fn distance(&self, a: &Position, b: &Position) -> f32 {
        a.distance_to(b)
    }

    fn is_valid_position(&self, p: &Position) -> bool;

    /// How many inches one board unit covers
    fn inches_per_unit(&self) -> f32;

    fn to_inches(&self, units: f32) -> f32 {
        units * self.inches_per_unit()
    }

    fn from_inches(&self, inches: f32) -> f32 {
        inches / self.inches_per_unit()
    }

    /// Distance expressed in inches, for display and error messages
    fn distance_inches(&self, a: &Position, b: &Position) -> f32 {
        self.to_inches(self.distance(a, b))
    }

    /// Whether `b` is within `range_inches` of `a`
    fn within(&self, a: &Position, b: &Position, range_inches: f32) -> bool {
        self.distance(a, b) <= self.from_inches(range_inches)
    }
}

/// Rectangular table centred on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBoard {
    pub width_inches: f32,
    pub height_inches: f32,
    pub inches_per_unit: f32,
}

impl Default for TableBoard {
    fn default() -> Self {
        Self {
            width_inches: 44.0,
            height_inches: 60.0,
            inches_per_unit: 1.0,
        }
    }
}

impl TableBoard {
    pub fn new(width_inches: f32, height_inches: f32, inches_per_unit: f32) -> Self {
        Self {
            width_inches,
            height_inches,
            inches_per_unit: if inches_per_unit > 0.0 { inches_per_unit } else { 1.0 },
        }
    }
}

impl Board for TableBoard {
    fn is_valid_position(&self, p: &Position) -> bool {
        let half_w = self.from_inches(self.width_inches) / 2.0;
        let half_h = self.from_inches(self.height_inches) / 2.0;
        p.x.is_finite() && p.y.is_finite() && p.x.abs() <= half_w && p.y.abs() <= half_h
    }

    fn inches_per_unit(&self) -> f32 {
        self.inches_per_unit
    }
}
