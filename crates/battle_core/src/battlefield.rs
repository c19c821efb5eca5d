//! Battlefield geometry.
//!
//! The world is a fixed-size rectangle. The left half is the player's
//! deployment zone; the enemy roster spawns in a column on the right.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Fixed-size rectangular battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    /// World width.
    #[serde(with = "fixed_serde")]
    pub width: Fixed,
    /// World height.
    #[serde(with = "fixed_serde")]
    pub height: Fixed,
}

impl Battlefield {
    /// Create a battlefield with the given dimensions.
    #[must_use]
    pub const fn new(width: Fixed, height: Fixed) -> Self {
        Self { width, height }
    }

    /// Standard battlefield dimensions (1200x700 world units).
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Fixed::from_num(1200), Fixed::from_num(700))
    }

    /// Clamp a point into the battlefield, inset by `padding` on every edge.
    #[must_use]
    pub fn clamp(&self, point: Vec2Fixed, padding: Fixed) -> Vec2Fixed {
        Vec2Fixed::new(
            point.x.clamp(padding, self.width - padding),
            point.y.clamp(padding, self.height - padding),
        )
    }

    /// Check whether a point lies within the battlefield.
    #[must_use]
    pub fn contains(&self, point: Vec2Fixed) -> bool {
        point.x >= Fixed::ZERO
            && point.x <= self.width
            && point.y >= Fixed::ZERO
            && point.y <= self.height
    }

    /// X coordinate of the center line dividing the two halves.
    #[must_use]
    pub fn center_x(&self) -> Fixed {
        self.width / Fixed::from_num(2)
    }

    /// Check whether a point lies in the player's (left) half.
    #[must_use]
    pub fn friendly_zone_contains(&self, point: Vec2Fixed) -> bool {
        point.x >= Fixed::ZERO
            && point.x <= self.center_x()
            && point.y >= Fixed::ZERO
            && point.y <= self.height
    }

    /// X coordinate of the enemy spawn column (3/4 across the field).
    #[must_use]
    pub fn enemy_spawn_x(&self) -> Fixed {
        self.width * Fixed::from_num(3) / Fixed::from_num(4)
    }
}

impl Default for Battlefield {
    fn default() -> Self {
        Self::standard()
    }
}
