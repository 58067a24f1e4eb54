//! Per-tic height probe around Lara.
//!
//! Four probes are taken: `mid` right above Lara, `front` one radius ahead and
//! `front_left` / `front_right` at the front corners of her collision square.
//! Heights are reported relative to Lara so callers compare against small
//! numbers; a probe inside solid rock keeps the `NO_FLOOR` sentinel.

use glam::IVec3;

use crate::defs::CollisionPolicy;
use crate::defs::constants::{
    DEFAULT_COLLISION_RADIUS, HEIGHT_LIMIT, MAX_GRABBABLE_GRADIENT, NO_FLOOR, PROBE_AXIS_MARGIN,
    SCALP_TO_HANDS_HEIGHT, SECTOR_SIZE,
};
use crate::units::{Angle, Axis, axis_from_angle};
use crate::world::{HeightInfo, Level, RoomId, RoomPos, SlantClass};

/// Floor height in front used for "slopes are pits" and "lava is pit".
const PIT_DEPTH: i32 = 512;
/// Floor height in front used for "slopes are walls".
const WALL_HEIGHT: i32 = -32767;

/// Which side of Lara's collision square ran into something.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisColl {
    #[default]
    None,
    Front,
    Left,
    Right,
    Top,
    TopBottom,
    TopFront,
}

/// Floor and ceiling at one probe point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalSpaceInfo {
    pub floor: HeightInfo,
    pub ceiling: HeightInfo,
}

impl Default for VerticalSpaceInfo {
    fn default() -> Self {
        let solid = HeightInfo {
            y: NO_FLOOR,
            slant_class: SlantClass::None,
            last_command_sequence_or_death: None,
        };
        Self {
            floor: solid,
            ceiling: solid,
        }
    }
}

impl VerticalSpaceInfo {
    /// Probe at `pos`. The floor is made relative to `lara_y`, the ceiling to
    /// the top of a body `height` units tall standing at `lara_y`.
    pub fn init(level: &Level, pos: IVec3, room: RoomId, lara_y: i32, height: i32) -> Self {
        let mut room = room;
        let sector = level.find_real_floor_sector(pos, &mut room);

        let mut floor = HeightInfo::from_floor(level, sector, pos);
        if floor.y != NO_FLOOR {
            floor.y -= lara_y;
        }
        let mut ceiling = HeightInfo::from_ceiling(level, sector, pos);
        if ceiling.y != NO_FLOOR {
            ceiling.y -= lara_y - height;
        }
        Self { floor, ceiling }
    }

    /// Any of the three limits broken.
    #[inline]
    fn violates(&self, bad_positive: i32, bad_negative: i32, bad_ceiling: i32) -> bool {
        self.floor.y > bad_positive || self.floor.y < bad_negative || self.ceiling.y > bad_ceiling
    }
}

/// Everything a state handler learns about Lara's surroundings in one tic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionInfo {
    pub collision_type: AxisColl,
    /// Correction to apply to Lara's position.
    pub shift: IVec3,
    pub facing_axis: Axis,
    pub facing_angle: Angle,
    pub collision_radius: i32,
    pub policy: CollisionPolicy,
    pub old_position: IVec3,

    /// Floors further down than this are a wall (or a pit) to walk into.
    pub bad_positive_distance: i32,
    /// Floors further up than this block the way.
    pub bad_negative_distance: i32,
    /// Ceilings lower than this block the way.
    pub bad_ceiling_distance: i32,

    pub mid: VerticalSpaceInfo,
    pub front: VerticalSpaceInfo,
    pub front_left: VerticalSpaceInfo,
    pub front_right: VerticalSpaceInfo,

    pub floor_slant_x: i8,
    pub floor_slant_z: i8,
}

impl Default for CollisionInfo {
    fn default() -> Self {
        Self {
            collision_type: AxisColl::None,
            shift: IVec3::ZERO,
            facing_axis: Axis::PosZ,
            facing_angle: Angle::ZERO,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            policy: CollisionPolicy::empty(),
            old_position: IVec3::ZERO,
            bad_positive_distance: HEIGHT_LIMIT,
            bad_negative_distance: -HEIGHT_LIMIT,
            bad_ceiling_distance: 0,
            mid: VerticalSpaceInfo::default(),
            front: VerticalSpaceInfo::default(),
            front_left: VerticalSpaceInfo::default(),
            front_right: VerticalSpaceInfo::default(),
            floor_slant_x: 0,
            floor_slant_z: 0,
        }
    }
}

/// Push needed to move `target` back into the sector of `current` along one
/// axis, 0 when both share the sector.
fn reflect_at_sector_boundary(target: i32, current: i32) -> i32 {
    let target_sector = target.div_euclid(SECTOR_SIZE);
    let current_sector = current.div_euclid(SECTOR_SIZE);
    if target_sector == current_sector {
        return 0;
    }
    let local = target.rem_euclid(SECTOR_SIZE);
    if current_sector > target_sector {
        SECTOR_SIZE + 1 - local
    } else {
        -(local + 1)
    }
}

impl CollisionInfo {
    /// Floor height difference between the two front corners.
    #[inline]
    pub fn floor_gradient(&self) -> i32 {
        (self.front_left.floor.y - self.front_right.floor.y).abs()
    }

    /// Floor too uneven to hang from or climb onto.
    #[inline]
    pub fn too_steep_to_grab(&self) -> bool {
        self.floor_gradient() >= MAX_GRABBABLE_GRADIENT
    }

    /// Steep slant under Lara's feet (`|slant| > 2` on any axis).
    #[inline]
    pub fn on_steep_slant(&self) -> bool {
        self.floor_slant_x.unsigned_abs() > 2 || self.floor_slant_z.unsigned_abs() > 2
    }

    /// Set the three tolerances at once.
    #[inline]
    pub fn set_bad_distances(&mut self, positive: i32, negative: i32, ceiling: i32) {
        self.bad_positive_distance = positive;
        self.bad_negative_distance = negative;
        self.bad_ceiling_distance = ceiling;
    }

    fn apply_front_policy(&self, level: &Level, space: &mut VerticalSpaceInfo) {
        let floor = &mut space.floor;
        if self.policy.contains(CollisionPolicy::SLOPES_ARE_WALLS)
            && floor.slant_class == SlantClass::Steep
            && floor.y < 0
        {
            floor.y = WALL_HEIGHT;
        } else if self.policy.contains(CollisionPolicy::SLOPES_ARE_PITS)
            && floor.slant_class == SlantClass::Steep
            && floor.y > 0
        {
            floor.y = PIT_DEPTH;
        } else if self.policy.contains(CollisionPolicy::LAVA_IS_PIT)
            && floor.y > 0
            && level.is_death_chunk(floor.last_command_sequence_or_death)
        {
            floor.y = PIT_DEPTH;
        }
    }

    /// Probe around `lara` for a body `height` units tall, then classify what
    /// she ran into and how far she must be pushed back.
    pub fn init_height_info(&mut self, level: &Level, lara: RoomPos, height: i32) {
        self.collision_type = AxisColl::None;
        self.shift = IVec3::ZERO;
        self.facing_axis = axis_from_angle(self.facing_angle, PROBE_AXIS_MARGIN).unwrap_or(Axis::PosZ);

        let pos = lara.pos;
        let reference = pos - IVec3::new(0, height + SCALP_TO_HANDS_HEIGHT, 0);
        let probe = |offset: IVec3| {
            VerticalSpaceInfo::init(level, reference + offset, lara.room, pos.y, height)
        };

        self.mid = probe(IVec3::ZERO);
        {
            let mut room = lara.room;
            let sector = level.find_real_floor_sector(reference, &mut room);
            (self.floor_slant_x, self.floor_slant_z) = level.floor_slant(sector, reference);
        }

        let r = self.collision_radius;
        let front_x = (self.facing_angle.sin() * r as f64) as i32;
        let front_z = (self.facing_angle.cos() * r as f64) as i32;
        let (front, left, right) = match self.facing_axis {
            Axis::PosZ => ((front_x, r), (-r, r), (r, r)),
            Axis::PosX => ((r, front_z), (r, r), (r, -r)),
            Axis::NegZ => ((front_x, -r), (r, -r), (-r, -r)),
            Axis::NegX => ((-r, front_z), (-r, -r), (-r, r)),
        };
        let front = IVec3::new(front.0, 0, front.1);
        let left = IVec3::new(left.0, 0, left.1);
        let right = IVec3::new(right.0, 0, right.1);

        let mut space = probe(front);
        self.apply_front_policy(level, &mut space);
        self.front = space;
        let mut space = probe(left);
        self.apply_front_policy(level, &mut space);
        self.front_left = space;
        let mut space = probe(right);
        self.apply_front_policy(level, &mut space);
        self.front_right = space;

        self.classify(pos, front, left, right);
    }

    fn classify(&mut self, pos: IVec3, front: IVec3, left: IVec3, right: IVec3) {
        let (bp, bn, bc) = (
            self.bad_positive_distance,
            self.bad_negative_distance,
            self.bad_ceiling_distance,
        );
        let z_axis = matches!(self.facing_axis, Axis::PosZ | Axis::NegZ);

        if self.mid.floor.y == NO_FLOOR {
            self.shift = self.old_position - pos;
            self.collision_type = AxisColl::Front;
            return;
        }

        if self.mid.floor.y <= self.mid.ceiling.y {
            self.shift = self.old_position - pos;
            self.collision_type = AxisColl::TopBottom;
            return;
        }

        if self.mid.ceiling.y >= 0 {
            self.shift.y = self.mid.ceiling.y;
            self.collision_type = AxisColl::Top;
        }

        if self.front.violates(bp, bn, bc) {
            if z_axis {
                self.shift.x = self.old_position.x - pos.x;
                self.shift.z = reflect_at_sector_boundary(pos.z + front.z, pos.z);
            } else {
                self.shift.x = reflect_at_sector_boundary(pos.x + front.x, pos.x);
                self.shift.z = self.old_position.z - pos.z;
            }
            self.collision_type = AxisColl::Front;
            return;
        }

        if self.front.ceiling.y >= bc {
            self.shift = self.old_position - pos;
            self.collision_type = AxisColl::TopFront;
            return;
        }

        for (space, side, kind) in [
            (self.front_left, left, AxisColl::Left),
            (self.front_right, right, AxisColl::Right),
        ] {
            if !space.violates(bp, bn, bc) {
                continue;
            }
            if z_axis {
                self.shift.x = reflect_at_sector_boundary(pos.x + side.x, pos.x + front.x);
            } else {
                self.shift.z = reflect_at_sector_boundary(pos.z + side.z, pos.z + front.z);
            }
            self.collision_type = kind;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::constants::LARA_WALK_HEIGHT;
    use crate::world::LevelBuilder;

    fn probe_at(level: &Level, pos: IVec3, facing: Angle) -> CollisionInfo {
        let mut coll = CollisionInfo {
            facing_angle: facing,
            old_position: pos,
            bad_positive_distance: 384,
            bad_negative_distance: -384,
            ..Default::default()
        };
        coll.init_height_info(level, RoomPos::new(pos, 0), LARA_WALK_HEIGHT);
        coll
    }

    #[test]
    fn reflection_pushes_back_into_the_current_sector() {
        assert_eq!(reflect_at_sector_boundary(1100, 1000), -77);
        assert_eq!(reflect_at_sector_boundary(1000, 1100), 25);
        assert_eq!(reflect_at_sector_boundary(1100, 1050), 0);
    }

    #[test]
    fn open_floor_reports_nothing() {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).build();
        let coll = probe_at(&level, IVec3::new(2560, 0, 2560), Angle::ZERO);
        assert_eq!(coll.collision_type, AxisColl::None);
        assert_eq!(coll.mid.floor.y, 0);
        assert_eq!(coll.mid.ceiling.y, -2048 + LARA_WALK_HEIGHT);
        assert_eq!(coll.shift, IVec3::ZERO);
    }

    #[test]
    fn wall_ahead_is_a_front_hit_pushed_to_the_boundary() {
        // the room border at z >= 4096 is solid
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).build();
        let coll = probe_at(&level, IVec3::new(2560, 0, 4050), Angle::ZERO);
        assert_eq!(coll.collision_type, AxisColl::Front);
        assert_eq!(coll.front.floor.y, NO_FLOOR);
        assert_eq!(coll.shift.z, -(4150 % 1024 + 1));
    }

    #[test]
    fn step_up_within_limits_is_not_a_collision() {
        let level = LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .floor(0, 2, 3, -256)
            .build();
        let coll = probe_at(&level, IVec3::new(2560, 0, 3000), Angle::ZERO);
        assert_eq!(coll.front.floor.y, -256);
        assert_eq!(coll.collision_type, AxisColl::None);
    }

    #[test]
    fn corner_probe_hits_side_walls() {
        let level = LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .wall(0, 1, 3)
            .build();
        // front probe stays in (2, 3), the left corner pokes into (1, 3)
        let coll = probe_at(&level, IVec3::new(2070, 0, 3000), Angle::ZERO);
        assert_eq!(coll.collision_type, AxisColl::Left);
        assert_eq!(coll.shift.x, SECTOR_SIZE + 1 - 1970 % 1024);
    }

    #[test]
    fn low_ceiling_over_lara_is_top_bottom() {
        let level = LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .ceiling(0, 2, 2, -500)
            .build();
        let coll = probe_at(&level, IVec3::new(2560, 0, 2560), Angle::ZERO);
        assert_eq!(coll.collision_type, AxisColl::TopBottom);
    }

    #[test]
    fn gradient_limit_is_exclusive_below_sixty() {
        let mut coll = CollisionInfo::default();
        coll.front_left.floor.y = -400;
        coll.front_right.floor.y = -341;
        assert_eq!(coll.floor_gradient(), 59);
        assert!(!coll.too_steep_to_grab());
        coll.front_right.floor.y = -340;
        assert_eq!(coll.floor_gradient(), 60);
        assert!(coll.too_steep_to_grab());
    }

    #[test]
    fn steep_slope_ahead_counts_as_wall_when_asked() {
        let level = LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -4096)
            .floor(0, 2, 3, -300)
            .floor_slant(0, 2, 3, 0, -8)
            .build();
        let pos = IVec3::new(2560, 0, 3000);
        let mut coll = CollisionInfo {
            old_position: pos,
            bad_positive_distance: 384,
            bad_negative_distance: -384,
            policy: CollisionPolicy::SLOPES_ARE_WALLS,
            ..Default::default()
        };
        let mut plain = coll;
        plain.policy = CollisionPolicy::empty();
        plain.init_height_info(&level, RoomPos::new(pos, 0), LARA_WALK_HEIGHT);
        assert_eq!(plain.collision_type, AxisColl::None);

        coll.init_height_info(&level, RoomPos::new(pos, 0), LARA_WALK_HEIGHT);
        assert_eq!(coll.front.floor.y, WALL_HEIGHT);
        assert_eq!(coll.collision_type, AxisColl::Front);
    }
}
