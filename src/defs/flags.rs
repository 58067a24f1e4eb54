use bitflags::bitflags;

bitflags! {
    /// Per-room flags as stored in the level.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RoomFlags: u16 {
        const WATER          = 0x0001;
    }
}

bitflags! {
    /// How the height probe treats unusual floors in front of Lara.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CollisionPolicy: u8 {
        // Steep floor rising in front counts as a wall.
        const SLOPES_ARE_WALLS   = 0x01;
        // Steep floor dropping in front counts as a pit.
        const SLOPES_ARE_PITS    = 0x02;
        // Death floor in front counts as a pit.
        const LAVA_IS_PIT        = 0x04;

        // Baddies may push Lara around.
        const ENABLE_BADDIE_PUSH = 0x08;
        // Hit reactions may interrupt the current animation.
        const ENABLE_SPAZ        = 0x10;

        const SLOPE_BLOCKING     = Self::SLOPES_ARE_WALLS.bits()
                                 | Self::SLOPES_ARE_PITS.bits();
        const SPAZ_PUSH          = Self::ENABLE_BADDIE_PUSH.bits()
                                 | Self::ENABLE_SPAZ.bits();
    }
}
