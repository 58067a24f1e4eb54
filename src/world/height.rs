//! Floor and ceiling heights at an exact position, slants included.

use glam::IVec3;

use super::floordata::{self, ChunkType};
use super::geometry::{FloorDataIndex, Level, Sector};
use crate::defs::constants::SECTOR_SIZE;

/// A slant of 1 spans a quarter sector over the full sector width.
const SLANT_SCALE: i32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlantClass {
    #[default]
    None,
    /// At most 512 units over the sector.
    Max512,
    Steep,
}

impl SlantClass {
    fn of(x: i8, z: i8) -> Self {
        if x.unsigned_abs() > 2 || z.unsigned_abs() > 2 {
            SlantClass::Steep
        } else {
            SlantClass::Max512
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightInfo {
    pub y: i32,
    pub slant_class: SlantClass,
    /// Header index of the last command sequence or death chunk seen.
    pub last_command_sequence_or_death: Option<FloorDataIndex>,
}

#[inline]
fn local(pos: IVec3) -> (i32, i32) {
    (pos.x.rem_euclid(SECTOR_SIZE), pos.z.rem_euclid(SECTOR_SIZE))
}

impl HeightInfo {
    /// Floor below `pos`, descending through rooms below `sector` first.
    pub fn from_floor(level: &Level, sector: &Sector, pos: IVec3) -> Self {
        let sector = level.lowest_sector(sector, pos);
        let mut hi = HeightInfo {
            y: sector.floor_height,
            slant_class: SlantClass::None,
            last_command_sequence_or_death: None,
        };
        let Some(start) = sector.floor_data else {
            return hi;
        };
        let data = &level.floor_data;
        let Ok(chunks) = floordata::scan(data, start) else {
            log::warn!("malformed floor data at {start}");
            return hi;
        };

        for chunk in &chunks {
            match chunk.header.kind {
                ChunkType::FloorSlant => {
                    let (sx, sz) = floordata::slant(data, chunk);
                    let (lx, lz) = local(pos);
                    hi.slant_class = SlantClass::of(sx, sz);
                    let (sx, sz) = (sx as i32, sz as i32);
                    if sx < 0 {
                        hi.y -= sx * lx / SLANT_SCALE;
                    } else {
                        hi.y += sx * (SECTOR_SIZE - 1 - lx) / SLANT_SCALE;
                    }
                    if sz < 0 {
                        hi.y -= sz * lz / SLANT_SCALE;
                    } else {
                        hi.y += sz * (SECTOR_SIZE - 1 - lz) / SLANT_SCALE;
                    }
                }
                ChunkType::Death => {
                    hi.last_command_sequence_or_death = Some(chunk.payload - 1);
                }
                ChunkType::CommandSequence => {
                    if hi.last_command_sequence_or_death.is_none() {
                        hi.last_command_sequence_or_death = Some(chunk.payload - 1);
                    }
                }
                ChunkType::CeilingSlant | ChunkType::PortalSector => {}
            }
        }
        hi
    }

    /// Ceiling above `pos`, ascending through rooms above `sector` first.
    pub fn from_ceiling(level: &Level, sector: &Sector, pos: IVec3) -> Self {
        let sector = level.highest_sector(sector, pos);
        let mut hi = HeightInfo {
            y: sector.ceiling_height,
            slant_class: SlantClass::None,
            last_command_sequence_or_death: None,
        };
        let Some(start) = sector.floor_data else {
            return hi;
        };
        let data = &level.floor_data;
        let Ok(chunks) = floordata::scan(data, start) else {
            log::warn!("malformed floor data at {start}");
            return hi;
        };

        if let Some(chunk) = chunks
            .iter()
            .find(|c| c.header.kind == ChunkType::CeilingSlant)
        {
            let (sx, sz) = floordata::slant(data, chunk);
            let (lx, lz) = local(pos);
            hi.slant_class = SlantClass::of(sx, sz);
            let (sx, sz) = (sx as i32, sz as i32);
            // ceiling slants point the other way round
            if sx < 0 {
                hi.y += sx * (SECTOR_SIZE - 1 - lx) / SLANT_SCALE;
            } else {
                hi.y -= sx * lx / SLANT_SCALE;
            }
            if sz < 0 {
                hi.y += sz * (SECTOR_SIZE - 1 - lz) / SLANT_SCALE;
            } else {
                hi.y -= sz * lz / SLANT_SCALE;
            }
        }
        hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::builder::LevelBuilder;

    #[test]
    fn flat_floor_and_ceiling() {
        let level = LevelBuilder::new().room(0, 0, 3, 3, 0, -2048).build();
        let pos = IVec3::new(1500, -100, 1500);
        let sector = level.find_floor_sector(pos, &mut 0);
        let floor = HeightInfo::from_floor(&level, sector, pos);
        assert_eq!(floor.y, 0);
        assert_eq!(floor.slant_class, SlantClass::None);
        assert_eq!(HeightInfo::from_ceiling(&level, sector, pos).y, -2048);
    }

    #[test]
    fn slant_interpolates_across_the_sector() {
        // x slant of -4 means the floor drops 1024 units towards +x
        let level = LevelBuilder::new()
            .room(0, 0, 3, 3, 0, -4096)
            .floor_slant(0, 1, 1, -4, 0)
            .build();
        let at = |x| {
            let pos = IVec3::new(x, -100, 1500);
            let sector = level.find_floor_sector(pos, &mut 0);
            HeightInfo::from_floor(&level, sector, pos)
        };
        assert_eq!(at(1024).y, 0);
        assert_eq!(at(1024 + 512).y, 512);
        assert_eq!(at(1024 + 512).slant_class, SlantClass::Steep);
    }

    #[test]
    fn death_chunk_is_reported() {
        let level = LevelBuilder::new()
            .room(0, 0, 3, 3, 0, -2048)
            .death_floor(0, 1, 1)
            .build();
        let pos = IVec3::new(1500, 0, 1500);
        let sector = level.find_floor_sector(pos, &mut 0);
        let hi = HeightInfo::from_floor(&level, sector, pos);
        assert!(level.is_death_chunk(hi.last_command_sequence_or_death));
    }
}
