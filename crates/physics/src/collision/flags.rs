//! Content flags for collision filtering.
//!
//! Every brush in the world carries a [`ContentFlags`] value; queries pass a
//! mask and only brushes whose contents intersect the mask are considered.

use serde::{Deserialize, Serialize};

/// Content flags describe what kind of volume a brush is.
///
/// The ground probe and the body sweep use different masks, so a trigger
/// never counts as ground and a clip brush that only blocks NPCs does not
/// stop a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, ramps.
    pub const SOLID: Self = Self(1 << 0);

    /// Terrain surface (heightfield or mesh).
    pub const TERRAIN: Self = Self(1 << 1);

    /// Foliage colliders generated for trees.
    pub const FOLIAGE: Self = Self(1 << 2);

    /// Blocks player bodies only.
    pub const BODY_CLIP: Self = Self(1 << 3);

    /// Blocks NPC bodies only.
    pub const NPC_CLIP: Self = Self(1 << 4);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 5);

    /// Everything a ground probe may stand on.
    pub const MASK_GROUND: Self = Self(Self::SOLID.0 | Self::TERRAIN.0 | Self::FOLIAGE.0);

    /// Standard mask for player body sweeps.
    pub const MASK_BODY_SOLID: Self = Self(Self::MASK_GROUND.0 | Self::BODY_CLIP.0);

    /// Standard mask for NPC body sweeps.
    pub const MASK_NPC_SOLID: Self = Self(Self::MASK_GROUND.0 | Self::NPC_CLIP.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
