//! Collision layer system for filtering collision detection
//!
//! Every collider sits on exactly one layer and carries a mask of the layers
//! it interacts with. A pair is considered only when each side's mask
//! includes the other's layer.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;

        /// Non-player characters
        const NPC = 1 << 1;

        /// Projectiles (bullets, thrown objects)
        const PROJECTILE = 1 << 2;

        /// Static environment geometry (floors, walls, ramps)
        const ENVIRONMENT = 1 << 3;

        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 4;

        /// Props and platforms that behave like level geometry
        const PROP = 1 << 5;

        /// Pickups and collectibles
        const PICKUP = 1 << 7;

        /// Layers the ground probe and wall resolver treat as solid world
        const WORLD = Self::ENVIRONMENT.bits() | Self::PROP.bits();

        /// Every character layer
        const CHARACTERS = Self::PLAYER.bits() | Self::NPC.bits();
    }
}

impl CollisionLayers {
    /// No collision layer
    pub const NONE: Self = Self::empty();

    /// Check if two colliders should interact based on their layers and masks
    ///
    /// # Example
    /// ```
    /// use stride_engine::physics::CollisionLayers;
    ///
    /// // Player interacts with NPCs and level geometry
    /// let player_mask = CollisionLayers::NPC | CollisionLayers::ENVIRONMENT;
    /// // NPC interacts with the player only
    /// let npc_mask = CollisionLayers::PLAYER;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::NPC, npc_mask,
    /// ));
    /// ```
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        // A's layer must be in B's mask AND B's layer must be in A's mask
        mask_b.intersects(layer_a) && mask_a.intersects(layer_b)
    }

    /// True when exactly one layer bit is set
    pub fn is_single_layer(self) -> bool {
        self.bits().count_ones() == 1
    }
}
