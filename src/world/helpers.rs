use glam::IVec3;

use super::floordata::{self, ChunkType, CommandSequence, FloorDataError};
use super::geometry::{FloorDataIndex, Level, Room, RoomId, Sector};
use crate::defs::constants::NO_FLOOR;

/// Answer for lookups that miss every room.
const SOLID: Sector = Sector {
    floor_height: NO_FLOOR,
    ceiling_height: NO_FLOOR,
    box_index: None,
    floor_data: None,
    room_below: None,
    room_above: None,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("room {0} does not exist")]
    NoSuchRoom(RoomId),

    #[error("room {room} has {actual} sectors, expected {expected}")]
    SectorCount {
        room: RoomId,
        expected: usize,
        actual: usize,
    },

    #[error("sector {index} of room {room} references missing box {box_index}")]
    NoSuchBox {
        room: RoomId,
        index: usize,
        box_index: u16,
    },

    #[error("sector {index} of room {room} links to missing room {target}")]
    DanglingRoomLink {
        room: RoomId,
        index: usize,
        target: RoomId,
    },

    #[error("no sector under {pos} in room {room}")]
    NoSector { room: RoomId, pos: IVec3 },

    #[error("sector under {pos} in room {room} has no box to patch")]
    MissingBox { room: RoomId, pos: IVec3 },

    #[error("malformed floor data: {0}")]
    FloorData(#[from] FloorDataError),
}

// ──────────────────────────────────────────────────────────────────────────
//                       Room – grid lookups
// ──────────────────────────────────────────────────────────────────────────
impl Room {
    #[inline]
    fn index_of(&self, dx: i32, dz: i32) -> Option<usize> {
        let inside = (0..self.sector_count_x as i32).contains(&dx)
            && (0..self.sector_count_z as i32).contains(&dz);
        let idx = (self.sector_count_z as i32 * dx + dz) as usize;
        (inside && idx < self.sectors.len()).then_some(idx)
    }

    /// Sector index under `pos`, `None` outside the grid.
    #[inline]
    pub fn absolute_index(&self, pos: IVec3) -> Option<usize> {
        let (dx, dz) = self.cell_of(pos);
        self.index_of(dx, dz)
    }

    /// Sector index under `pos` with the cell pulled back into the grid.
    /// Along the z border the x index stays off the corner columns.
    pub fn clamped_index(&self, pos: IVec3) -> Option<usize> {
        let (mut dx, mut dz) = self.cell_of(pos);
        let (cx, cz) = (self.sector_count_x as i32, self.sector_count_z as i32);
        if dz <= 0 {
            dz = 0;
            dx = dx.clamp(1, (cx - 2).max(1));
        } else if dz >= cz - 1 {
            dz = cz - 1;
            dx = dx.clamp(1, (cx - 2).max(1));
        } else {
            dx = dx.clamp(0, cx - 1);
        }
        self.index_of(dx, dz)
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – public helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    pub fn room(&self, id: RoomId) -> Result<&Room, WorldError> {
        self.rooms.get(id as usize).ok_or(WorldError::NoSuchRoom(id))
    }

    #[inline]
    fn sector_ref(&self, room: RoomId, index: usize) -> &Sector {
        self.rooms
            .get(room as usize)
            .and_then(|r| r.sectors.get(index))
            .unwrap_or(&SOLID)
    }

    /// Sector under `pos` in `room`, `None` outside the grid.
    pub fn sector_at(&self, pos: IVec3, room: RoomId) -> Option<&Sector> {
        let r = self.rooms.get(room as usize)?;
        r.sectors.get(r.absolute_index(pos)?)
    }

    /// Target room of the sector's portal chunk.
    pub fn portal_of(&self, sector: &Sector) -> Option<RoomId> {
        let chunks = floordata::scan(&self.floor_data, sector.floor_data?).ok()?;
        chunks
            .iter()
            .find(|c| c.header.kind == ChunkType::PortalSector)
            .and_then(|c| floordata::portal_target(&self.floor_data, c))
    }

    fn floor_sector_index(&self, pos: IVec3, room: &mut RoomId) -> Option<usize> {
        let mut hops = self.rooms.len();
        loop {
            let r = self.rooms.get(*room as usize)?;
            let idx = r.clamped_index(pos)?;
            match self.portal_of(&r.sectors[idx]) {
                Some(next) if hops > 0 => {
                    *room = next;
                    hops -= 1;
                }
                Some(_) => {
                    log::warn!("portal loop around room {room}");
                    return Some(idx);
                }
                None => return Some(idx),
            }
        }
    }

    /// Sector under `pos`, clamped into the room grid, following portals.
    /// `room` is updated to the room the sector belongs to.
    pub fn find_floor_sector(&self, pos: IVec3, room: &mut RoomId) -> &Sector {
        match self.floor_sector_index(pos, room) {
            Some(idx) => self.sector_ref(*room, idx),
            None => {
                log::warn!("no sector under {pos} in room {room}");
                &SOLID
            }
        }
    }

    fn real_floor_sector_index(&self, pos: IVec3, room: &mut RoomId) -> Option<usize> {
        let mut idx = self.floor_sector_index(pos, room)?;
        let mut sector = *self.sector_ref(*room, idx);
        if pos.y < sector.floor_height {
            while pos.y < sector.ceiling_height {
                let Some(above) = sector.room_above else { break };
                let Some(i) = self.room(above).ok().and_then(|r| r.absolute_index(pos)) else {
                    break;
                };
                *room = above;
                idx = i;
                sector = *self.sector_ref(above, i);
            }
        } else {
            while pos.y >= sector.floor_height {
                let Some(below) = sector.room_below else { break };
                let Some(i) = self.room(below).ok().and_then(|r| r.absolute_index(pos)) else {
                    break;
                };
                *room = below;
                idx = i;
                sector = *self.sector_ref(below, i);
            }
        }
        Some(idx)
    }

    /// Like [`Level::find_floor_sector`], then moves through the rooms above
    /// or below until the sector vertically contains `pos`.
    pub fn find_real_floor_sector(&self, pos: IVec3, room: &mut RoomId) -> &Sector {
        match self.real_floor_sector_index(pos, room) {
            Some(idx) => self.sector_ref(*room, idx),
            None => {
                log::warn!("no sector under {pos} in room {room}");
                &SOLID
            }
        }
    }

    /// Bottom-most sector below `sector`, the one carrying the floor.
    pub fn lowest_sector<'a>(&'a self, sector: &'a Sector, pos: IVec3) -> &'a Sector {
        let mut sector = sector;
        let mut hops = self.rooms.len();
        while let Some(below) = sector.room_below {
            match self.sector_at(pos, below) {
                Some(s) if hops > 0 => sector = s,
                _ => break,
            }
            hops -= 1;
        }
        sector
    }

    /// Top-most sector above `sector`, the one carrying the ceiling.
    pub fn highest_sector<'a>(&'a self, sector: &'a Sector, pos: IVec3) -> &'a Sector {
        let mut sector = sector;
        let mut hops = self.rooms.len();
        while let Some(above) = sector.room_above {
            match self.sector_at(pos, above) {
                Some(s) if hops > 0 => sector = s,
                _ => break,
            }
            hops -= 1;
        }
        sector
    }

    /// Signed slant bytes of the floor under `pos`, `(0, 0)` when flat.
    pub fn floor_slant(&self, sector: &Sector, pos: IVec3) -> (i8, i8) {
        let sector = self.lowest_sector(sector, pos);
        let Some(start) = sector.floor_data else {
            return (0, 0);
        };
        floordata::scan(&self.floor_data, start)
            .ok()
            .and_then(|chunks| {
                chunks
                    .iter()
                    .find(|c| c.header.kind == ChunkType::FloorSlant)
                    .map(|c| floordata::slant(&self.floor_data, c))
            })
            .unwrap_or((0, 0))
    }

    /// Height of the water surface above (inside water) or below (outside
    /// water) `pos`, if any.
    pub fn water_surface_height(&self, pos: IVec3, room: RoomId) -> Option<i32> {
        let r = self.rooms.get(room as usize)?;
        let mut sector = self.sector_at(pos, room)?;

        if r.is_water() {
            while let Some(above) = sector.room_above {
                if !self.room(above).ok()?.is_water() {
                    break;
                }
                sector = self.sector_at(pos, above)?;
            }
            return Some(sector.ceiling_height);
        }

        while let Some(below) = sector.room_below {
            if self.room(below).ok()?.is_water() {
                return Some(sector.floor_height);
            }
            sector = self.sector_at(pos, below)?;
        }
        None
    }

    /// `true` if `index` is the header of a death chunk.
    pub fn is_death_chunk(&self, index: Option<FloorDataIndex>) -> bool {
        index
            .and_then(|i| self.floor_data.get(i as usize))
            .is_some_and(|&w| {
                floordata::ChunkHeader::parse(0, w).is_ok_and(|h| h.kind == ChunkType::Death)
            })
    }

    /// Decode the command sequence whose header sits at `index`.
    pub fn command_sequence(&self, index: FloorDataIndex) -> Result<CommandSequence, WorldError> {
        Ok(CommandSequence::parse(&self.floor_data, index)?)
    }

    /// Raise (`height < 0`) or lower the floor where a block sits, and mark
    /// the sector's box as blocked while a block occupies it.
    pub fn patch_heights_for_block(
        &mut self,
        pos: IVec3,
        room: RoomId,
        height: i32,
    ) -> Result<(), WorldError> {
        let mut ground_room = room;
        let ground_idx = self
            .real_floor_sector_index(pos, &mut ground_room)
            .ok_or(WorldError::NoSector { room, pos })?;
        let mut top_room = ground_room;
        let top_pos = pos + IVec3::new(0, height - crate::defs::constants::SECTOR_SIZE, 0);
        let top_idx = self
            .real_floor_sector_index(top_pos, &mut top_room)
            .ok_or(WorldError::NoSector { room, pos: top_pos })?;
        let top = *self.sector_ref(top_room, top_idx);

        let ground = self.rooms[ground_room as usize]
            .sectors
            .get_mut(ground_idx)
            .ok_or(WorldError::NoSector { room, pos })?;
        if ground.floor_height == NO_FLOOR {
            ground.floor_height = top.ceiling_height + height;
        } else {
            ground.floor_height = top.floor_height + height;
            if ground.floor_height == top.ceiling_height {
                ground.floor_height = NO_FLOOR;
            }
        }
        log::debug!(
            "patched floor under {pos} in room {ground_room} to {}",
            ground.floor_height
        );

        let Some(box_index) = ground.box_index else {
            log::error!("block at {pos} stands on a sector without a box");
            return Err(WorldError::MissingBox { room, pos });
        };
        let b = self
            .boxes
            .get_mut(box_index as usize)
            .ok_or(WorldError::MissingBox { room, pos })?;
        if b.blockable {
            b.blocked = height < 0;
        }
        Ok(())
    }

    /// Replace the floor data with a little-endian word stream and check it.
    pub fn load_floor_data(&mut self, bytes: &[u8]) -> Result<(), WorldError> {
        self.floor_data = floordata::read_words(bytes)?;
        self.validate()
    }

    /// Check every cross reference and walk all floor data once.
    pub fn validate(&self) -> Result<(), WorldError> {
        for (id, room) in self.rooms.iter().enumerate() {
            let id = id as RoomId;
            let expected = room.sector_count_x as usize * room.sector_count_z as usize;
            if room.sectors.len() != expected {
                return Err(WorldError::SectorCount {
                    room: id,
                    expected,
                    actual: room.sectors.len(),
                });
            }
            if let Some(alt) = room.alternate {
                self.room(alt)?;
            }

            for (index, sector) in room.sectors.iter().enumerate() {
                if let Some(box_index) = sector.box_index {
                    if box_index as usize >= self.boxes.len() {
                        return Err(WorldError::NoSuchBox {
                            room: id,
                            index,
                            box_index,
                        });
                    }
                }
                let links = [sector.room_above, sector.room_below];
                let portal = match sector.floor_data {
                    Some(start) => {
                        let chunks = floordata::scan(&self.floor_data, start)?;
                        for c in chunks.iter() {
                            if c.header.kind == ChunkType::CommandSequence {
                                CommandSequence::parse(&self.floor_data, c.payload - 1)?;
                            }
                        }
                        self.portal_of(sector)
                    }
                    None => None,
                };
                for target in links.into_iter().chain([portal]).flatten() {
                    if target as usize >= self.rooms.len() {
                        return Err(WorldError::DanglingRoomLink {
                            room: id,
                            index,
                            target,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::builder::LevelBuilder;

    fn two_rooms() -> Level {
        // room 1 sits east of room 0; each border column overlaps the
        // other room's last open column
        LevelBuilder::new()
            .room(0, 0, 4, 3, 0, -2048)
            .room(2048, 0, 4, 3, -256, -2048)
            .portal(0, 3, 1, 1)
            .portal(1, 0, 1, 0)
            .build()
    }

    #[test]
    fn clamping_keeps_lookups_inside_the_grid() {
        let level = two_rooms();
        let r = level.room(0).unwrap();
        assert_eq!(r.clamped_index(IVec3::new(-5000, 0, 1500)), r.absolute_index(IVec3::new(0, 0, 1500)));
        // corner columns are skipped along the z border
        assert_eq!(
            r.clamped_index(IVec3::new(10, 0, -10)),
            r.absolute_index(IVec3::new(1024, 0, 0))
        );
    }

    #[test]
    fn portals_are_followed() {
        let level = two_rooms();
        let mut room = 0;
        let s = level.find_floor_sector(IVec3::new(3 * 1024 + 500, 0, 1500), &mut room);
        assert_eq!(room, 1);
        assert_eq!(s.floor_height, -256);
    }

    #[test]
    fn real_floor_sector_descends_into_the_room_below() {
        let level = LevelBuilder::new()
            .room(0, 0, 3, 3, 1024, 0)
            .water()
            .room(0, 0, 3, 3, 0, -2048)
            .stack(0, 1)
            .build();

        let mut room = 1;
        let s = level.find_real_floor_sector(IVec3::new(1500, 512, 1500), &mut room);
        assert_eq!(room, 0);
        assert_eq!(s.floor_height, 1024);

        let mut room = 1;
        level.find_real_floor_sector(IVec3::new(1500, -512, 1500), &mut room);
        assert_eq!(room, 1);
    }

    #[test]
    fn water_surface_from_both_sides() {
        let level = LevelBuilder::new()
            .room(0, 0, 3, 3, 1024, 0)
            .water()
            .room(0, 0, 3, 3, 0, -2048)
            .stack(0, 1)
            .build();
        let pos = IVec3::new(1500, 500, 1500);
        assert_eq!(level.water_surface_height(pos, 0), Some(0));
        assert_eq!(level.water_surface_height(pos - IVec3::Y * 1000, 1), Some(0));
    }

    #[test]
    fn block_patching_round_trips_and_blocks_the_box() {
        let mut level = LevelBuilder::new().room(0, 0, 3, 3, 0, -2048).build();
        let pos = IVec3::new(1536, 0, 1536);

        level.patch_heights_for_block(pos, 0, -1024).unwrap();
        let mut room = 0;
        let s = *level.find_floor_sector(pos, &mut room);
        assert_eq!(s.floor_height, -1024);
        assert!(level.boxes[s.box_index.unwrap() as usize].blocked);

        level.patch_heights_for_block(pos, 0, 1024).unwrap();
        let s = *level.find_floor_sector(pos, &mut room);
        assert_eq!(s.floor_height, 0);
        assert!(!level.boxes[s.box_index.unwrap() as usize].blocked);
    }

    #[test]
    fn block_reaching_the_ceiling_leaves_no_floor() {
        let mut level = LevelBuilder::new().room(0, 0, 3, 3, 0, -1024).build();
        let pos = IVec3::new(1536, 0, 1536);
        level.patch_heights_for_block(pos, 0, -1024).unwrap();
        let mut room = 0;
        assert!(level.find_floor_sector(pos, &mut room).is_wall());

        level.patch_heights_for_block(pos, 0, 1024).unwrap();
        assert_eq!(level.find_floor_sector(pos, &mut room).floor_height, 0);
    }

    #[test]
    fn patching_without_a_box_is_fatal() {
        let mut level = LevelBuilder::new().room(0, 0, 3, 3, 0, -2048).build();
        level.rooms[0].sectors[4].box_index = None;
        assert_eq!(
            level.patch_heights_for_block(IVec3::new(1536, 0, 1536), 0, -1024),
            Err(WorldError::MissingBox {
                room: 0,
                pos: IVec3::new(1536, 0, 1536)
            })
        );
    }

    #[test]
    fn validation_catches_dangling_links() {
        let mut level = two_rooms();
        assert_eq!(level.validate(), Ok(()));
        level.rooms[0].sectors[4].room_below = Some(9);
        assert!(matches!(
            level.validate(),
            Err(WorldError::DanglingRoomLink { target: 9, .. })
        ));
    }

    #[test]
    fn floor_data_loads_from_bytes() {
        let mut level = two_rooms();
        let bytes: Vec<u8> = level
            .floor_data
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        level.floor_data.clear();
        level.load_floor_data(&bytes).unwrap();
        let mut room = 0;
        level.find_floor_sector(IVec3::new(3 * 1024 + 500, 0, 1500), &mut room);
        assert_eq!(room, 1);

        assert_eq!(
            level.load_floor_data(&[0, 0, 1]),
            Err(WorldError::FloorData(FloorDataError::OddLength(3)))
        );
    }
}
