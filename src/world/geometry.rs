use glam::IVec3;

use crate::defs::RoomFlags;
use crate::defs::constants::{NO_FLOOR, SECTOR_SIZE};

pub type RoomId = u16;
pub type BoxId = u16;
/// Index into `Level::floor_data`.
pub type FloorDataIndex = u32;

/// Runtime snapshot of one level. Geometry is fixed after load; only sector
/// heights and box flags change when blocks move.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub name: String,
    pub rooms: Vec<Room>,
    pub boxes: Vec<SectorBox>,
    pub floor_data: Vec<u16>,
}

/*------------------------------ rooms -------------------------------*/

#[derive(Debug, Clone)]
pub struct Room {
    /// World x/z of the room's sector grid origin.
    pub x: i32,
    pub z: i32,
    pub sector_count_x: u16,
    pub sector_count_z: u16,
    /// Column-major: index is `sector_count_z * dx + dz`.
    pub sectors: Vec<Sector>,
    pub flags: RoomFlags,
    pub alternate: Option<RoomId>,
}

impl Room {
    #[inline]
    pub fn is_water(&self) -> bool {
        self.flags.contains(RoomFlags::WATER)
    }

    #[inline]
    pub fn sector(&self, dx: i32, dz: i32) -> Option<&Sector> {
        if dx < 0 || dz < 0 || dx >= self.sector_count_x as i32 || dz >= self.sector_count_z as i32 {
            return None;
        }
        self.sectors
            .get((self.sector_count_z as i32 * dx + dz) as usize)
    }

    /// Grid cell of a world position, possibly outside the grid.
    #[inline]
    pub fn cell_of(&self, pos: IVec3) -> (i32, i32) {
        (
            (pos.x - self.x).div_euclid(SECTOR_SIZE),
            (pos.z - self.z).div_euclid(SECTOR_SIZE),
        )
    }
}

/*----------------------------- sectors ------------------------------*/

/// One 1024×1024 column of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub floor_height: i32,
    pub ceiling_height: i32,
    pub box_index: Option<BoxId>,
    pub floor_data: Option<FloorDataIndex>,
    pub room_below: Option<RoomId>,
    pub room_above: Option<RoomId>,
}

impl Default for Sector {
    /// Solid wall sector.
    fn default() -> Self {
        Self {
            floor_height: NO_FLOOR,
            ceiling_height: NO_FLOOR,
            box_index: None,
            floor_data: None,
            room_below: None,
            room_above: None,
        }
    }
}

impl Sector {
    pub fn open(floor_height: i32, ceiling_height: i32) -> Self {
        Self {
            floor_height,
            ceiling_height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.floor_height == NO_FLOOR
    }
}

/*------------------------------ boxes -------------------------------*/

/// Pathing box; only the flags block patching touches are modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectorBox {
    pub x_min: i32,
    pub x_max: i32,
    pub z_min: i32,
    pub z_max: i32,
    pub floor: i32,
    pub blocked: bool,
    pub blockable: bool,
}

/*----------------------------- position -----------------------------*/

/// World position plus the room it was last resolved in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomPos {
    pub pos: IVec3,
    pub room: RoomId,
}

impl RoomPos {
    pub fn new(pos: IVec3, room: RoomId) -> Self {
        Self { pos, room }
    }
}
