/// Sound effect id as stored in the level's sound map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u16);

impl SoundId {
    pub const FOOTSTEP: SoundId = SoundId(0);
    pub const LARA_LAND: SoundId = SoundId(4);
    pub const LARA_GRAB: SoundId = SoundId(9);
    pub const TREX_FOOTSTEP: SoundId = SoundId(16);
    pub const LARA_FALL: SoundId = SoundId(30);
    pub const SPLASH: SoundId = SoundId(33);
    pub const LARA_SWIM: SoundId = SoundId(34);
    pub const LARA_BREATHE: SoundId = SoundId(36);
    pub const PUSHABLE_SCRAPE: SoundId = SoundId(72);
}
