//! Floor data: the per-sector word stream describing portals, slants,
//! command sequences and deadly floors.
//!
//! A sector points at its first chunk header. Each header word is
//!
//! ```text
//!  15      14..8         7..5   4..0
//! [end] [sub function]   ---  [function]
//! ```
//!
//! followed by the chunk's payload words.

use byteorder::{LittleEndian as LE, ReadBytesExt};
use smallvec::SmallVec;
use std::io::Cursor;

use super::geometry::{FloorDataIndex, RoomId};

const FUNCTION_MASK: u16 = 0x001F;
const SUB_FUNCTION_MASK: u16 = 0x7F00;
const END_BIT: u16 = 0x8000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FloorDataError {
    #[error("floor data stream has an odd byte length {0}")]
    OddLength(usize),

    #[error("floor data chunk at {0} is truncated")]
    Truncated(FloorDataIndex),

    #[error("unknown floor data function {function} at {index}")]
    UnknownFunction { index: FloorDataIndex, function: u16 },

    #[error("floor data chunk list starting at {0} has no end bit")]
    MissingEnd(FloorDataIndex),
}

/// Decode a little-endian word stream as stored in level files.
pub fn read_words(bytes: &[u8]) -> Result<Vec<u16>, FloorDataError> {
    if bytes.len() % 2 != 0 {
        return Err(FloorDataError::OddLength(bytes.len()));
    }
    let mut rdr = Cursor::new(bytes);
    let mut words = Vec::with_capacity(bytes.len() / 2);
    while let Ok(w) = rdr.read_u16::<LE>() {
        words.push(w);
    }
    Ok(words)
}

/*------------------------------ headers -----------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    PortalSector,
    FloorSlant,
    CeilingSlant,
    CommandSequence,
    Death,
}

impl ChunkType {
    fn code(self) -> u16 {
        match self {
            ChunkType::PortalSector => 1,
            ChunkType::FloorSlant => 2,
            ChunkType::CeilingSlant => 3,
            ChunkType::CommandSequence => 4,
            ChunkType::Death => 5,
        }
    }

    /// Payload words following the header (command sequences are variable).
    fn fixed_payload(self) -> Option<usize> {
        match self {
            ChunkType::PortalSector | ChunkType::FloorSlant | ChunkType::CeilingSlant => Some(1),
            ChunkType::Death => Some(0),
            ChunkType::CommandSequence => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub kind: ChunkType,
    pub sub_function: u8,
    pub is_last: bool,
}

impl ChunkHeader {
    pub fn parse(index: FloorDataIndex, word: u16) -> Result<Self, FloorDataError> {
        let kind = match word & FUNCTION_MASK {
            1 => ChunkType::PortalSector,
            2 => ChunkType::FloorSlant,
            3 => ChunkType::CeilingSlant,
            4 => ChunkType::CommandSequence,
            5 => ChunkType::Death,
            function => return Err(FloorDataError::UnknownFunction { index, function }),
        };
        Ok(Self {
            kind,
            sub_function: ((word & SUB_FUNCTION_MASK) >> 8) as u8,
            is_last: word & END_BIT != 0,
        })
    }

    pub fn encode(self) -> u16 {
        let mut w = self.kind.code() | ((self.sub_function as u16) << 8) & SUB_FUNCTION_MASK;
        if self.is_last {
            w |= END_BIT;
        }
        w
    }
}

/// A chunk located in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub header: ChunkHeader,
    /// Index of the first payload word.
    pub payload: FloorDataIndex,
}

/// Every chunk of one sector, in stream order.
pub fn scan(
    data: &[u16],
    start: FloorDataIndex,
) -> Result<SmallVec<[Chunk; 4]>, FloorDataError> {
    let mut chunks = SmallVec::new();
    let mut idx = start as usize;
    loop {
        let word = *data.get(idx).ok_or(FloorDataError::MissingEnd(start))?;
        let header = ChunkHeader::parse(idx as FloorDataIndex, word)?;
        let payload = idx + 1;
        chunks.push(Chunk {
            header,
            payload: payload as FloorDataIndex,
        });
        idx = match header.kind.fixed_payload() {
            Some(n) => payload + n,
            None => payload + sequence_len(data, payload as FloorDataIndex)?,
        };
        if idx > data.len() {
            return Err(FloorDataError::Truncated(payload as FloorDataIndex));
        }
        if header.is_last {
            return Ok(chunks);
        }
    }
}

/// Words covered by a command sequence's payload.
fn sequence_len(data: &[u16], payload: FloorDataIndex) -> Result<usize, FloorDataError> {
    let mut idx = payload as usize + 1; // setup word
    loop {
        let w = *data.get(idx).ok_or(FloorDataError::Truncated(payload))?;
        idx += 1;
        if CommandOp::from_word(w) == Some(CommandOp::SwitchCamera) {
            data.get(idx).ok_or(FloorDataError::Truncated(payload))?;
            idx += 1;
        }
        if w & END_BIT != 0 {
            return Ok(idx - payload as usize);
        }
    }
}

/* ---- portal & slants ------------------------------------------------- */

#[inline]
pub fn portal_target(data: &[u16], chunk: &Chunk) -> Option<RoomId> {
    data.get(chunk.payload as usize).map(|w| w & 0x00FF)
}

/// Signed (x, z) slant of a slant chunk. +1 is 256 units over a full sector.
#[inline]
pub fn slant(data: &[u16], chunk: &Chunk) -> (i8, i8) {
    let w = data.get(chunk.payload as usize).copied().unwrap_or(0);
    ((w & 0xFF) as u8 as i8, (w >> 8) as u8 as i8)
}

#[inline]
pub fn encode_slant(x: i8, z: i8) -> u16 {
    (x as u8 as u16) | ((z as u8 as u16) << 8)
}

/* ---- command sequences ----------------------------------------------- */

/// When a command sequence fires, from the header's sub function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCondition {
    LaraIsHere,
    LaraOnGround,
    ItemActivated,
    KeyUsed,
    ItemPickedUp,
    ItemIsHere,
    LaraOnGroundInverted,
    LaraInCombatMode,
    Dummy,
}

impl SequenceCondition {
    pub fn from_sub_function(sub: u8) -> Option<Self> {
        Some(match sub {
            0 => Self::LaraIsHere,
            1 => Self::LaraOnGround,
            2 => Self::ItemActivated,
            3 => Self::KeyUsed,
            4 => Self::ItemPickedUp,
            5 => Self::ItemIsHere,
            6 => Self::LaraOnGroundInverted,
            7 => Self::LaraInCombatMode,
            8 => Self::Dummy,
            _ => return None,
        })
    }
}

/// Setup word of a command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationState {
    pub timeout: u8,
    pub oneshot: bool,
    /// Five activation bits, 0x1F means fully set.
    pub mask: u8,
}

impl ActivationState {
    const TIMEOUT_MASK: u16 = 0x00FF;
    const ONESHOT: u16 = 0x0100;
    const MASK_BITS: u16 = 0x3E00;

    pub fn from_word(w: u16) -> Self {
        Self {
            timeout: (w & Self::TIMEOUT_MASK) as u8,
            oneshot: w & Self::ONESHOT != 0,
            mask: ((w & Self::MASK_BITS) >> 9) as u8,
        }
    }

    pub fn encode(self) -> u16 {
        let mut w = self.timeout as u16 | (((self.mask as u16) << 9) & Self::MASK_BITS);
        if self.oneshot {
            w |= Self::ONESHOT;
        }
        w
    }

    #[inline]
    pub fn is_fully_activated(&self) -> bool {
        self.mask == 0x1F
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOp {
    Activate,
    SwitchCamera,
    UnderwaterCurrent,
    FlipMap,
    FlipOn,
    FlipOff,
    LookAt,
    EndLevel,
    PlayTrack,
    FlipEffect,
    Secret,
    ClearBodies,
    FlyBy,
    CutScene,
}

impl CommandOp {
    const ALL: [CommandOp; 14] = [
        CommandOp::Activate,
        CommandOp::SwitchCamera,
        CommandOp::UnderwaterCurrent,
        CommandOp::FlipMap,
        CommandOp::FlipOn,
        CommandOp::FlipOff,
        CommandOp::LookAt,
        CommandOp::EndLevel,
        CommandOp::PlayTrack,
        CommandOp::FlipEffect,
        CommandOp::Secret,
        CommandOp::ClearBodies,
        CommandOp::FlyBy,
        CommandOp::CutScene,
    ];

    fn from_word(w: u16) -> Option<Self> {
        Self::ALL.get(((w >> 10) & 0x1F) as usize).copied()
    }

    fn code(self) -> u16 {
        Self::ALL.iter().position(|&op| op == self).unwrap_or(0) as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub op: CommandOp,
    pub parameter: u16,
    /// Extra word of `SwitchCamera`.
    pub camera: Option<u16>,
}

impl Command {
    pub fn encode(self, is_last: bool) -> SmallVec<[u16; 2]> {
        let mut w = (self.op.code() << 10) | (self.parameter & 0x03FF);
        if is_last && self.camera.is_none() {
            w |= END_BIT;
        }
        let mut out = smallvec::smallvec![w];
        if let Some(extra) = self.camera {
            out.push(if is_last { extra | END_BIT } else { extra });
        }
        out
    }
}

/// Fully decoded command sequence chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSequence {
    /// Header word index, as reported by height queries.
    pub index: FloorDataIndex,
    pub condition: SequenceCondition,
    pub activation: ActivationState,
    pub commands: SmallVec<[Command; 4]>,
}

impl CommandSequence {
    /// Decode the chunk whose header sits at `index`.
    pub fn parse(data: &[u16], index: FloorDataIndex) -> Result<Self, FloorDataError> {
        let word = *data.get(index as usize).ok_or(FloorDataError::Truncated(index))?;
        let header = ChunkHeader::parse(index, word)?;
        let condition = SequenceCondition::from_sub_function(header.sub_function).ok_or(
            FloorDataError::UnknownFunction {
                index,
                function: header.sub_function as u16,
            },
        )?;
        let mut idx = index as usize + 1;
        let setup = *data.get(idx).ok_or(FloorDataError::Truncated(index))?;
        idx += 1;

        let mut commands = SmallVec::new();
        loop {
            let w = *data.get(idx).ok_or(FloorDataError::Truncated(index))?;
            idx += 1;
            let op = CommandOp::from_word(w).ok_or(FloorDataError::UnknownFunction {
                index,
                function: (w >> 10) & 0x1F,
            })?;
            let mut last = w & END_BIT != 0;
            let camera = if op == CommandOp::SwitchCamera {
                let extra = *data.get(idx).ok_or(FloorDataError::Truncated(index))?;
                idx += 1;
                last = extra & END_BIT != 0;
                Some(extra & !END_BIT)
            } else {
                None
            };
            commands.push(Command {
                op,
                parameter: w & 0x03FF,
                camera,
            });
            if last {
                break;
            }
        }

        Ok(Self {
            index,
            condition,
            activation: ActivationState::from_word(setup),
            commands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bits() {
        let h = ChunkHeader::parse(0, 0x8304).unwrap();
        assert_eq!(h.kind, ChunkType::CommandSequence);
        assert_eq!(h.sub_function, 3);
        assert!(h.is_last);
        assert_eq!(
            ChunkHeader::parse(7, 0x0009),
            Err(FloorDataError::UnknownFunction { index: 7, function: 9 })
        );
    }

    #[test]
    fn slant_bytes_are_signed() {
        let chunk = Chunk {
            header: ChunkHeader::parse(0, 0x0002).unwrap(),
            payload: 0,
        };
        assert_eq!(slant(&[encode_slant(-3, 2)], &chunk), (-3, 2));
    }

    #[test]
    fn scan_walks_chunks_until_end_bit() {
        // slant, command sequence with a camera command, death
        let data = [
            0x0002,
            encode_slant(1, 0),
            0x0004,
            0x3E00,
            (1 << 10) | 4,
            0x8000 | 2,
            0x8005,
        ];
        let chunks = scan(&data, 0).unwrap();
        let kinds: Vec<_> = chunks.iter().map(|c| c.header.kind).collect();
        assert_eq!(
            kinds,
            [ChunkType::FloorSlant, ChunkType::CommandSequence, ChunkType::Death]
        );

        let seq = CommandSequence::parse(&data, 2).unwrap();
        assert_eq!(seq.condition, SequenceCondition::LaraIsHere);
        assert!(seq.activation.is_fully_activated());
        assert_eq!(seq.commands.len(), 1);
        assert_eq!(seq.commands[0].op, CommandOp::SwitchCamera);
        assert_eq!(seq.commands[0].camera, Some(2));
    }

    #[test]
    fn missing_end_bit_is_reported() {
        assert_eq!(scan(&[0x0005], 0), Err(FloorDataError::MissingEnd(0)));
    }

    #[test]
    fn little_endian_words() {
        assert_eq!(read_words(&[0x05, 0x80, 0x02, 0x00]), Ok(vec![0x8005, 0x0002]));
        assert_eq!(read_words(&[1, 2, 3]), Err(FloorDataError::OddLength(3)));
    }
}
