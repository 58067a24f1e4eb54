pub mod builder;
pub mod floordata;
mod geometry;
mod height;
mod helpers;

pub use builder::LevelBuilder;
pub use floordata::{
    ActivationState, Command, CommandOp, CommandSequence, FloorDataError, SequenceCondition,
};
pub use geometry::{BoxId, FloorDataIndex, Level, Room, RoomId, RoomPos, Sector, SectorBox};
pub use height::{HeightInfo, SlantClass};
pub use helpers::WorldError;
