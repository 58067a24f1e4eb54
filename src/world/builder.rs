//! Hand-built levels for scenarios and tests.
//!
//! Rooms come out walled on their border with one open box per inner sector.
//! Floor data chunks are collected per sector and packed on `build`.

use std::collections::BTreeMap;

use super::floordata::{
    ActivationState, ChunkHeader, ChunkType, Command, SequenceCondition, encode_slant,
};
use super::geometry::{Level, Room, RoomId, Sector, SectorBox};
use crate::defs::RoomFlags;
use crate::defs::constants::SECTOR_SIZE;

type Cell = (RoomId, i32, i32);

/// Chunk payload waiting to be packed: header kind, sub function, words.
struct PendingChunk {
    kind: ChunkType,
    sub_function: u8,
    payload: Vec<u16>,
}

#[derive(Default)]
pub struct LevelBuilder {
    level: Level,
    chunks: BTreeMap<Cell, Vec<PendingChunk>>,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.level.name = name.to_owned();
        self
    }

    /// Room with its grid origin at world `(x, z)`.
    pub fn room(mut self, x: i32, z: i32, count_x: u16, count_z: u16, floor: i32, ceiling: i32) -> Self {
        let mut sectors = Vec::with_capacity(count_x as usize * count_z as usize);
        for dx in 0..count_x {
            for dz in 0..count_z {
                let border = dx == 0 || dz == 0 || dx + 1 == count_x || dz + 1 == count_z;
                sectors.push(if border {
                    Sector::default()
                } else {
                    Sector::open(floor, ceiling)
                });
            }
        }
        self.level.rooms.push(Room {
            x,
            z,
            sector_count_x: count_x,
            sector_count_z: count_z,
            sectors,
            flags: RoomFlags::empty(),
            alternate: None,
        });
        self
    }

    /// Flag the most recently added room as water.
    pub fn water(mut self) -> Self {
        if let Some(room) = self.level.rooms.last_mut() {
            room.flags |= RoomFlags::WATER;
        }
        self
    }

    fn sector_mut(&mut self, room: RoomId, dx: i32, dz: i32) -> Option<&mut Sector> {
        let r = self.level.rooms.get_mut(room as usize)?;
        let idx = (r.sector_count_z as i32 * dx + dz) as usize;
        r.sectors.get_mut(idx)
    }

    pub fn open(mut self, room: RoomId, dx: i32, dz: i32, floor: i32, ceiling: i32) -> Self {
        if let Some(s) = self.sector_mut(room, dx, dz) {
            s.floor_height = floor;
            s.ceiling_height = ceiling;
        }
        self
    }

    pub fn floor(mut self, room: RoomId, dx: i32, dz: i32, floor: i32) -> Self {
        if let Some(s) = self.sector_mut(room, dx, dz) {
            s.floor_height = floor;
        }
        self
    }

    pub fn ceiling(mut self, room: RoomId, dx: i32, dz: i32, ceiling: i32) -> Self {
        if let Some(s) = self.sector_mut(room, dx, dz) {
            s.ceiling_height = ceiling;
        }
        self
    }

    pub fn wall(mut self, room: RoomId, dx: i32, dz: i32) -> Self {
        if let Some(s) = self.sector_mut(room, dx, dz) {
            *s = Sector::default();
        }
        self
    }

    fn chunk(mut self, cell: Cell, kind: ChunkType, sub_function: u8, payload: Vec<u16>) -> Self {
        self.chunks.entry(cell).or_default().push(PendingChunk {
            kind,
            sub_function,
            payload,
        });
        self
    }

    pub fn portal(self, room: RoomId, dx: i32, dz: i32, target: RoomId) -> Self {
        self.chunk((room, dx, dz), ChunkType::PortalSector, 0, vec![target])
    }

    pub fn floor_slant(self, room: RoomId, dx: i32, dz: i32, x: i8, z: i8) -> Self {
        self.chunk((room, dx, dz), ChunkType::FloorSlant, 0, vec![encode_slant(x, z)])
    }

    pub fn ceiling_slant(self, room: RoomId, dx: i32, dz: i32, x: i8, z: i8) -> Self {
        self.chunk((room, dx, dz), ChunkType::CeilingSlant, 0, vec![encode_slant(x, z)])
    }

    pub fn death_floor(self, room: RoomId, dx: i32, dz: i32) -> Self {
        self.chunk((room, dx, dz), ChunkType::Death, 0, Vec::new())
    }

    pub fn command_sequence(
        self,
        room: RoomId,
        dx: i32,
        dz: i32,
        condition: SequenceCondition,
        commands: &[Command],
    ) -> Self {
        let setup = ActivationState {
            timeout: 0,
            oneshot: false,
            mask: 0x1F,
        };
        let mut payload = vec![setup.encode()];
        for (i, cmd) in commands.iter().enumerate() {
            payload.extend(cmd.encode(i + 1 == commands.len()));
        }
        let sub = condition as u8;
        self.chunk((room, dx, dz), ChunkType::CommandSequence, sub, payload)
    }

    /// Link `lower` and `upper` through every sector open in both.
    pub fn stack(mut self, lower: RoomId, upper: RoomId) -> Self {
        let (Some(lo), Some(up)) = (
            self.level.rooms.get(lower as usize).cloned(),
            self.level.rooms.get(upper as usize).cloned(),
        ) else {
            return self;
        };
        for dx in 0..lo.sector_count_x as i32 {
            for dz in 0..lo.sector_count_z as i32 {
                let wx = lo.x + dx * SECTOR_SIZE;
                let wz = lo.z + dz * SECTOR_SIZE;
                let (ux, uz) = ((wx - up.x) / SECTOR_SIZE, (wz - up.z) / SECTOR_SIZE);
                let open_lo = lo.sector(dx, dz).is_some_and(|s| !s.is_wall());
                let open_up = up.sector(ux, uz).is_some_and(|s| !s.is_wall());
                if !(open_lo && open_up && wx >= up.x && wz >= up.z) {
                    continue;
                }
                if let Some(s) = self.sector_mut(lower, dx, dz) {
                    s.room_above = Some(upper);
                }
                if let Some(s) = self.sector_mut(upper, ux, uz) {
                    s.room_below = Some(lower);
                }
            }
        }
        self
    }

    pub fn build(mut self) -> Level {
        // index 0 stays unused so no sector points at it by accident
        self.level.floor_data = vec![0];
        for ((room, dx, dz), chunks) in std::mem::take(&mut self.chunks) {
            let start = self.level.floor_data.len() as u32;
            let last = chunks.len() - 1;
            for (i, chunk) in chunks.into_iter().enumerate() {
                let header = ChunkHeader {
                    kind: chunk.kind,
                    sub_function: chunk.sub_function,
                    is_last: i == last,
                };
                self.level.floor_data.push(header.encode());
                self.level.floor_data.extend(chunk.payload);
            }
            if let Some(s) = self.sector_mut(room, dx, dz) {
                s.floor_data = Some(start);
            }
        }

        let mut boxes = Vec::new();
        for room in self.level.rooms.iter_mut() {
            let (rx, rz, cz) = (room.x, room.z, room.sector_count_z as i32);
            for (i, s) in room.sectors.iter_mut().enumerate() {
                if s.is_wall() || s.box_index.is_some() {
                    continue;
                }
                let (dx, dz) = (i as i32 / cz, i as i32 % cz);
                s.box_index = Some(boxes.len() as u16);
                boxes.push(SectorBox {
                    x_min: rx + dx * SECTOR_SIZE,
                    x_max: rx + (dx + 1) * SECTOR_SIZE,
                    z_min: rz + dz * SECTOR_SIZE,
                    z_max: rz + (dz + 1) * SECTOR_SIZE,
                    floor: s.floor_height,
                    blocked: false,
                    blockable: true,
                });
            }
        }
        self.level.boxes = boxes;
        self.level
    }
}
