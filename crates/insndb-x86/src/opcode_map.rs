//! Opcode maps: the table the main opcode byte is looked up in.

/// Opcode map selected by escape bytes or by the map field of an
/// extended prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpcodeMap {
    /// One-byte opcodes.
    #[default]
    Default,
    /// 0F two-byte opcodes.
    Escape0F,
    /// 0F 38 three-byte opcodes.
    Escape0F38,
    /// 0F 3A three-byte opcodes.
    Escape0F3A,
    /// XOP map 8.
    Xop8,
    /// XOP map 9.
    Xop9,
    /// XOP map 10.
    Xop10,
}

impl OpcodeMap {
    /// The legacy escape byte sequence selecting this map, if one exists.
    /// XOP maps are reachable only through an XOP prefix.
    pub fn escape_bytes(self) -> Option<&'static [u8]> {
        match self {
            Self::Default => Some(&[]),
            Self::Escape0F => Some(&[0x0F]),
            Self::Escape0F38 => Some(&[0x0F, 0x38]),
            Self::Escape0F3A => Some(&[0x0F, 0x3A]),
            Self::Xop8 | Self::Xop9 | Self::Xop10 => None,
        }
    }

    /// Decode the `mmmmm` field of a VEX3/EVEX prefix.
    pub fn from_vex_mmmmm(mmmmm: u8) -> Option<Self> {
        match mmmmm & 0x1F {
            0b00001 => Some(Self::Escape0F),
            0b00010 => Some(Self::Escape0F38),
            0b00011 => Some(Self::Escape0F3A),
            _ => None,
        }
    }

    /// Decode the map field of an XOP prefix.
    pub fn from_xop_map(map: u8) -> Option<Self> {
        match map & 0x1F {
            0x08 => Some(Self::Xop8),
            0x09 => Some(Self::Xop9),
            0x0A => Some(Self::Xop10),
            _ => None,
        }
    }
}
