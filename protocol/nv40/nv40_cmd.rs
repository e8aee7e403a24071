//! NV40 FIFO command words.
//!
//! Every packet starts with a header word:
//!
//! ```text
//!  31 30 29 28          18 17 16 15 13 12          2 1 0
//! +--+--+--+--------------+-----+-----+-------------+---+
//! | 0|NI| 0|    count     |  0  | sub |   method    | 0 |
//! +--+--+--+--------------+-----+-----+-------------+---+
//! ```
//!
//! followed by `count` argument words. `NI` selects non-increasing mode (all
//! arguments target the same method); otherwise argument `i` targets
//! `method + 4 * i`.
//!
//! Control words share the same space: `0x2000_0000 | offset` is a jump,
//! `offset | 2` is a call and `0x0002_0000` returns from a call.

use core::fmt;

pub const NV40_METHOD_ADDR_MASK: u32 = 0x0000_1ffc;
pub const NV40_METHOD_SUBCHANNEL_SHIFT: u32 = 13;
pub const NV40_METHOD_SUBCHANNEL_MASK: u32 = 0x7;
pub const NV40_METHOD_COUNT_SHIFT: u32 = 18;
pub const NV40_METHOD_COUNT_MASK: u32 = 0x7ff;
pub const NV40_METHOD_NON_INCREMENT: u32 = 0x4000_0000;

pub const NV40_JUMP_FLAG: u32 = 0x2000_0000;
pub const NV40_JUMP_OFFSET_MASK: u32 = 0x1fff_fffc;
pub const NV40_CALL_FLAG: u32 = 0x0000_0002;
pub const NV40_RETURN: u32 = 0x0002_0000;

/// Subchannel the 3D object is bound to.
pub const NV40_SUBCHANNEL_3D: u32 = 0;

/// Largest argument count the header's count field can hold.
pub const NV40_METHOD_COUNT_MAX: u32 = NV40_METHOD_COUNT_MASK;

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nv40MethodMode {
    Increasing = 0,
    NonIncreasing = NV40_METHOD_NON_INCREMENT,
}

/// Decoded method header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nv40MethodHeader {
    pub method: u32,
    pub subchannel: u32,
    pub count: u32,
    pub mode: Nv40MethodMode,
}

impl Nv40MethodHeader {
    pub const fn encode(self) -> u32 {
        nv40_method_header(self.subchannel, self.method, self.count, self.mode)
    }
}

/// Packs a method header word.
///
/// Bits outside each field are masked off; callers are expected to pass
/// in-range values (method addresses are word aligned and below `0x2000`).
pub const fn nv40_method_header(subchannel: u32, method: u32, count: u32, mode: Nv40MethodMode) -> u32 {
    (method & NV40_METHOD_ADDR_MASK)
        | ((subchannel & NV40_METHOD_SUBCHANNEL_MASK) << NV40_METHOD_SUBCHANNEL_SHIFT)
        | ((count & NV40_METHOD_COUNT_MASK) << NV40_METHOD_COUNT_SHIFT)
        | mode as u32
}

pub const fn nv40_jump(offset: u32) -> u32 {
    NV40_JUMP_FLAG | (offset & NV40_JUMP_OFFSET_MASK)
}

pub const fn nv40_call(offset: u32) -> u32 {
    (offset & NV40_JUMP_OFFSET_MASK) | NV40_CALL_FLAG
}

/// One decoded FIFO word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nv40CmdWord {
    Method(Nv40MethodHeader),
    Jump { offset: u32 },
    Call { offset: u32 },
    Return,
}

pub const fn decode_cmd_word(word: u32) -> Result<Nv40CmdWord, Nv40CmdDecodeError> {
    if word == NV40_RETURN {
        return Ok(Nv40CmdWord::Return);
    }
    if word & 0xe000_0003 == NV40_JUMP_FLAG {
        return Ok(Nv40CmdWord::Jump {
            offset: word & NV40_JUMP_OFFSET_MASK,
        });
    }
    if word & 0x3 == NV40_CALL_FLAG {
        return Ok(Nv40CmdWord::Call {
            offset: word & NV40_JUMP_OFFSET_MASK,
        });
    }
    // Bits 0..1, 16..17, 29 and 31 are never set in a method header.
    if word & 0xa003_0003 != 0 {
        return Err(Nv40CmdDecodeError::BadHeader { word });
    }

    let mode = if word & NV40_METHOD_NON_INCREMENT != 0 {
        Nv40MethodMode::NonIncreasing
    } else {
        Nv40MethodMode::Increasing
    };
    Ok(Nv40CmdWord::Method(Nv40MethodHeader {
        method: word & NV40_METHOD_ADDR_MASK,
        subchannel: (word >> NV40_METHOD_SUBCHANNEL_SHIFT) & NV40_METHOD_SUBCHANNEL_MASK,
        count: (word >> NV40_METHOD_COUNT_SHIFT) & NV40_METHOD_COUNT_MASK,
        mode,
    }))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nv40CmdDecodeError {
    BadHeader { word: u32 },
    PacketOverrunsStream { offset: usize, count: u32, stream_len: usize },
}

impl fmt::Display for Nv40CmdDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nv40CmdDecodeError::BadHeader { word } => {
                write!(f, "invalid command header word 0x{word:08x}")
            }
            Nv40CmdDecodeError::PacketOverrunsStream {
                offset,
                count,
                stream_len,
            } => write!(
                f,
                "packet at word {offset} carries {count} arguments but the stream ends at word {stream_len}"
            ),
        }
    }
}

impl std::error::Error for Nv40CmdDecodeError {}

/// A decoded packet borrowed from a word stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nv40CmdPacket<'a> {
    Method {
        header: Nv40MethodHeader,
        args: &'a [u32],
    },
    Jump { offset: u32 },
    Call { offset: u32 },
    Return,
}

impl<'a> Nv40CmdPacket<'a> {
    /// Method address and arguments, if this is a method packet.
    pub fn method(&self) -> Option<(u32, &'a [u32])> {
        match *self {
            Nv40CmdPacket::Method { header, args } => Some((header.method, args)),
            _ => None,
        }
    }

    /// Number of stream words this packet occupies.
    pub fn len_words(&self) -> usize {
        match self {
            Nv40CmdPacket::Method { args, .. } => 1 + args.len(),
            _ => 1,
        }
    }
}

/// Linear walk over a command word slice.
///
/// Control words are reported but not followed; the iterator never leaves the
/// slice it was given.
pub struct Nv40CmdIter<'a> {
    words: &'a [u32],
    offset: usize,
    done: bool,
}

impl<'a> Nv40CmdIter<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self {
            words,
            offset: 0,
            done: false,
        }
    }

    /// Word offset of the next packet.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Nv40CmdIter<'a> {
    type Item = Result<Nv40CmdPacket<'a>, Nv40CmdDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.words.len() {
            return None;
        }

        let word = self.words[self.offset];
        let decoded = match decode_cmd_word(word) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        let packet = match decoded {
            Nv40CmdWord::Method(header) => {
                let start = self.offset + 1;
                let end = start + header.count as usize;
                if end > self.words.len() {
                    self.done = true;
                    return Some(Err(Nv40CmdDecodeError::PacketOverrunsStream {
                        offset: self.offset,
                        count: header.count,
                        stream_len: self.words.len(),
                    }));
                }
                Nv40CmdPacket::Method {
                    header,
                    args: &self.words[start..end],
                }
            }
            Nv40CmdWord::Jump { offset } => Nv40CmdPacket::Jump { offset },
            Nv40CmdWord::Call { offset } => Nv40CmdPacket::Call { offset },
            Nv40CmdWord::Return => Nv40CmdPacket::Return,
        };

        self.offset += packet.len_words();
        Some(Ok(packet))
    }
}
