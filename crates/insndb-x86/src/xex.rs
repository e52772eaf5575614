//! Extended prefixes: REX, VEX, XOP, EVEX.
//!
//! `Xex` is the tagged value carrying which family applied to an
//! instruction and the decoded bits the recogniser needs. Family
//! payloads keep the inverted wire bits already normalised (a set `r`
//! here means the extension IS applied).

use crate::opcode_map::OpcodeMap;
use crate::prefix::SimdPrefix;
use crate::size::VectorLength;

/// REX prefix fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rex {
    /// REX.W - 64-bit operand size
    pub w: bool,
    /// REX.R - extends ModR/M reg field
    pub r: bool,
    /// REX.X - extends SIB index field
    pub x: bool,
    /// REX.B - extends ModR/M r/m, SIB base, or opcode reg
    pub b: bool,
}

impl Rex {
    /// Parse a REX byte (0x40-0x4F).
    pub fn from_byte(byte: u8) -> Self {
        Self {
            w: byte & 0x08 != 0,
            r: byte & 0x04 != 0,
            x: byte & 0x02 != 0,
            b: byte & 0x01 != 0,
        }
    }

    /// Returns true if this REX prefix is "empty" (0x40).
    pub fn is_empty(&self) -> bool {
        !self.w && !self.r && !self.x && !self.b
    }
}

/// Two-byte VEX prefix (C5 xx) payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vex2 {
    /// Inverted wire R bit, normalised: true = reg extension applied.
    pub r: bool,
    /// Inverted vvvv field, normalised to the selected register number.
    pub vvvv: u8,
    /// Vector length bit.
    pub l: bool,
    /// Implied SIMD prefix bits.
    pub pp: u8,
}

impl Vex2 {
    /// Decode the payload byte following C5.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            r: byte & 0x80 == 0,
            vvvv: (!byte >> 3) & 0x0F,
            l: byte & 0x04 != 0,
            pp: byte & 0x03,
        }
    }
}

/// Three-byte VEX prefix (C4 xx xx) payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vex3 {
    pub r: bool,
    pub x: bool,
    /// Base register extension (inverted wire bit, normalised).
    pub b: bool,
    /// Opcode map selector.
    pub mmmmm: u8,
    /// 64-bit operand size.
    pub w: bool,
    pub vvvv: u8,
    pub l: bool,
    pub pp: u8,
}

impl Vex3 {
    /// Decode the two payload bytes following C4.
    pub fn from_bytes(b1: u8, b2: u8) -> Self {
        Self {
            r: b1 & 0x80 == 0,
            x: b1 & 0x40 == 0,
            b: b1 & 0x20 == 0,
            mmmmm: b1 & 0x1F,
            w: b2 & 0x80 != 0,
            vvvv: (!b2 >> 3) & 0x0F,
            l: b2 & 0x04 != 0,
            pp: b2 & 0x03,
        }
    }
}

/// XOP prefix (8F xx xx) payload. Same wire layout as three-byte VEX,
/// with the map field selecting the XOP opcode maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Xop {
    pub r: bool,
    pub x: bool,
    pub b: bool,
    pub map: u8,
    pub w: bool,
    pub vvvv: u8,
    pub l: bool,
    pub pp: u8,
}

impl Xop {
    /// Decode the two payload bytes following 8F.
    pub fn from_bytes(b1: u8, b2: u8) -> Self {
        Self {
            r: b1 & 0x80 == 0,
            x: b1 & 0x40 == 0,
            b: b1 & 0x20 == 0,
            map: b1 & 0x1F,
            w: b2 & 0x80 != 0,
            vvvv: (!b2 >> 3) & 0x0F,
            l: b2 & 0x04 != 0,
            pp: b2 & 0x03,
        }
    }
}

/// EVEX prefix (62 xx xx xx) payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EVex {
    pub r: bool,
    pub x: bool,
    pub b: bool,
    /// High-16 reg extension (R').
    pub r2: bool,
    /// Opcode map selector.
    pub mmm: u8,
    pub w: bool,
    pub vvvv: u8,
    pub pp: u8,
    /// Zeroing-masking bit.
    pub z: bool,
    /// Vector length / rounding control bits.
    pub ll: u8,
    /// Broadcast / rounding-control enable.
    pub bcast: bool,
    /// High-16 vvvv extension (V').
    pub v2: bool,
    /// Opmask register selector.
    pub aaa: u8,
}

impl EVex {
    /// Decode the three payload bytes following 62.
    pub fn from_bytes(p0: u8, p1: u8, p2: u8) -> Self {
        Self {
            r: p0 & 0x80 == 0,
            x: p0 & 0x40 == 0,
            b: p0 & 0x20 == 0,
            r2: p0 & 0x10 == 0,
            mmm: p0 & 0x07,
            w: p1 & 0x80 != 0,
            vvvv: (!p1 >> 3) & 0x0F,
            pp: p1 & 0x03,
            z: p2 & 0x80 != 0,
            ll: (p2 >> 5) & 0x03,
            bcast: p2 & 0x10 != 0,
            v2: p2 & 0x08 == 0,
            aaa: p2 & 0x07,
        }
    }
}

/// The extended-prefix family groupings the instruction database speaks
/// in: two-byte and three-byte VEX are one family there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexKind {
    Vex,
    Xop,
    EVex,
}

/// Which extended prefix an instruction carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XexType {
    /// No extended prefix; legacy escape bytes select the map.
    Escapes,
    Rex,
    Vex2,
    Vex3,
    Xop,
    EVex,
}

impl XexType {
    /// Returns true if legacy 0F escape bytes may follow (no prefix, or
    /// plain REX).
    pub fn allows_escapes(self) -> bool {
        matches!(self, Self::Escapes | Self::Rex)
    }

    /// Collapse to the database's family grouping, if this is one of the
    /// VEX-like families.
    pub fn vex_kind(self) -> Option<VexKind> {
        match self {
            Self::Vex2 | Self::Vex3 => Some(VexKind::Vex),
            Self::Xop => Some(VexKind::Xop),
            Self::EVex => Some(VexKind::EVex),
            Self::Escapes | Self::Rex => None,
        }
    }
}

/// The decoded extended prefix of one instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Xex {
    /// No extended prefix.
    #[default]
    Escapes,
    Rex(Rex),
    Vex2(Vex2),
    Vex3(Vex3),
    Xop(Xop),
    EVex(EVex),
}

impl Xex {
    /// The family tag.
    pub fn xex_type(&self) -> XexType {
        match self {
            Self::Escapes => XexType::Escapes,
            Self::Rex(_) => XexType::Rex,
            Self::Vex2(_) => XexType::Vex2,
            Self::Vex3(_) => XexType::Vex3,
            Self::Xop(_) => XexType::Xop,
            Self::EVex(_) => XexType::EVex,
        }
    }

    /// The W bit: 64-bit operand size requested.
    pub fn operand_size_64(&self) -> bool {
        match self {
            Self::Escapes | Self::Vex2(_) => false,
            Self::Rex(r) => r.w,
            Self::Vex3(v) => v.w,
            Self::Xop(x) => x.w,
            Self::EVex(e) => e.w,
        }
    }

    /// The B bit: base register extension.
    pub fn base_reg_extension(&self) -> bool {
        match self {
            Self::Escapes | Self::Vex2(_) => false,
            Self::Rex(r) => r.b,
            Self::Vex3(v) => v.b,
            Self::Xop(x) => x.b,
            Self::EVex(e) => e.b,
        }
    }

    /// The register number selected by the vvvv field, for families
    /// that carry one. Already un-inverted from the wire: an unused
    /// field (wire `1111`) decodes to 0.
    pub fn vvvv(&self) -> Option<u8> {
        match self {
            Self::Escapes | Self::Rex(_) => None,
            Self::Vex2(v) => Some(v.vvvv),
            Self::Vex3(v) => Some(v.vvvv),
            Self::Xop(x) => Some(x.vvvv),
            Self::EVex(e) => Some(e.vvvv),
        }
    }

    /// Vector length, for families that carry one.
    pub fn vector_length(&self) -> Option<VectorLength> {
        match self {
            Self::Escapes | Self::Rex(_) => None,
            Self::Vex2(v) => VectorLength::from_bits(v.l as u8),
            Self::Vex3(v) => VectorLength::from_bits(v.l as u8),
            Self::Xop(x) => VectorLength::from_bits(x.l as u8),
            Self::EVex(e) => VectorLength::from_bits(e.ll),
        }
    }

    /// SIMD prefix implied by the `pp` field, for families that carry one.
    pub fn simd_prefix(&self) -> Option<SimdPrefix> {
        match self {
            Self::Escapes | Self::Rex(_) => None,
            Self::Vex2(v) => Some(SimdPrefix::from_pp(v.pp)),
            Self::Vex3(v) => Some(SimdPrefix::from_pp(v.pp)),
            Self::Xop(x) => Some(SimdPrefix::from_pp(x.pp)),
            Self::EVex(e) => Some(SimdPrefix::from_pp(e.pp)),
        }
    }

    /// Opcode map selected by the prefix itself, for families that
    /// encode one. Two-byte VEX always implies the 0F map.
    pub fn opcode_map(&self) -> Option<OpcodeMap> {
        match self {
            Self::Escapes | Self::Rex(_) => None,
            Self::Vex2(_) => Some(OpcodeMap::Escape0F),
            Self::Vex3(v) => OpcodeMap::from_vex_mmmmm(v.mmmmm),
            Self::Xop(x) => OpcodeMap::from_xop_map(x.map),
            Self::EVex(e) => OpcodeMap::from_vex_mmmmm(e.mmm),
        }
    }
}
