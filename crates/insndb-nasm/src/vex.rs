//! The packed VEX/XOP/EVEX encoding descriptor.
//!
//! An entry whose code string carries a dotted descriptor such as
//! `vex.nds.128.0f.wig` stores its decoded form as a `VexEncoding`: six
//! orthogonal sub-fields packed into a `u16`. Consumers go through the
//! accessors; the bit layout is private to this module.

use std::fmt;

use insndb_x86::{OpcodeMap, SimdPrefix, VectorLength, VexKind};

/// Opcode map named by a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexMap {
    M0F,
    M0F38,
    M0F3A,
    Xop8,
    Xop9,
    Xop10,
}

impl VexMap {
    /// The opcode map this selects.
    pub fn opcode_map(self) -> OpcodeMap {
        match self {
            Self::M0F => OpcodeMap::Escape0F,
            Self::M0F38 => OpcodeMap::Escape0F38,
            Self::M0F3A => OpcodeMap::Escape0F3A,
            Self::Xop8 => OpcodeMap::Xop8,
            Self::Xop9 => OpcodeMap::Xop9,
            Self::Xop10 => OpcodeMap::Xop10,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::M0F => "0f",
            Self::M0F38 => "0f38",
            Self::M0F3A => "0f3a",
            Self::Xop8 => "m8",
            Self::Xop9 => "m9",
            Self::Xop10 => "m10",
        }
    }
}

/// REX.W requirement of a descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexRexW {
    W0,
    W1,
    #[default]
    Ignored,
}

/// Vector length requirement of a descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexVectorLength {
    L128,
    L256,
    L512,
    #[default]
    Ignored,
}

impl VexVectorLength {
    /// The concrete vector length, unless ignored.
    pub fn vector_length(self) -> Option<VectorLength> {
        match self {
            Self::L128 => Some(VectorLength::L128),
            Self::L256 => Some(VectorLength::L256),
            Self::L512 => Some(VectorLength::L512),
            Self::Ignored => None,
        }
    }
}

/// SIMD prefix implied by a descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexSimdPrefix {
    #[default]
    None,
    P66,
    PF2,
    PF3,
}

impl VexSimdPrefix {
    /// The equivalent instruction-level SIMD prefix.
    pub fn simd_prefix(self) -> SimdPrefix {
        match self {
            Self::None => SimdPrefix::None,
            Self::P66 => SimdPrefix::P66,
            Self::PF2 => SimdPrefix::PF2,
            Self::PF3 => SimdPrefix::PF3,
        }
    }
}

/// Role of the vvvv-selected register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VexNdRegister {
    /// vvvv must be 1111 (no operand).
    #[default]
    Invalid,
    /// vvvv selects a source operand (`nds`).
    Source,
    /// vvvv selects the destination (`ndd`).
    Dest,
    /// vvvv selects the second source (`dds`).
    SecondSource,
}

// Packed layout, low to high:
//   kind    2 bits
//   map     3 bits
//   rexw    2 bits
//   length  2 bits
//   simd    2 bits
//   ndreg   2 bits
const MAP_SHIFT: u16 = 2;
const REXW_SHIFT: u16 = 5;
const LENGTH_SHIFT: u16 = 7;
const SIMD_SHIFT: u16 = 9;
const NDREG_SHIFT: u16 = 11;

/// A packed extended-prefix descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VexEncoding(u16);

impl VexEncoding {
    pub fn new(
        kind: VexKind,
        map: VexMap,
        rexw: VexRexW,
        length: VexVectorLength,
        simd: VexSimdPrefix,
        ndreg: VexNdRegister,
    ) -> Self {
        let kind = match kind {
            VexKind::Vex => 0u16,
            VexKind::Xop => 1,
            VexKind::EVex => 2,
        };
        let map = match map {
            VexMap::M0F => 0u16,
            VexMap::M0F38 => 1,
            VexMap::M0F3A => 2,
            VexMap::Xop8 => 3,
            VexMap::Xop9 => 4,
            VexMap::Xop10 => 5,
        };
        let rexw = match rexw {
            VexRexW::W0 => 0u16,
            VexRexW::W1 => 1,
            VexRexW::Ignored => 2,
        };
        let length = match length {
            VexVectorLength::L128 => 0u16,
            VexVectorLength::L256 => 1,
            VexVectorLength::L512 => 2,
            VexVectorLength::Ignored => 3,
        };
        let simd = match simd {
            VexSimdPrefix::None => 0u16,
            VexSimdPrefix::P66 => 1,
            VexSimdPrefix::PF2 => 2,
            VexSimdPrefix::PF3 => 3,
        };
        let ndreg = match ndreg {
            VexNdRegister::Invalid => 0u16,
            VexNdRegister::Source => 1,
            VexNdRegister::Dest => 2,
            VexNdRegister::SecondSource => 3,
        };
        Self(
            kind | (map << MAP_SHIFT)
                | (rexw << REXW_SHIFT)
                | (length << LENGTH_SHIFT)
                | (simd << SIMD_SHIFT)
                | (ndreg << NDREG_SHIFT),
        )
    }

    /// The extended-prefix family.
    pub fn kind(self) -> VexKind {
        match self.0 & 0x3 {
            0 => VexKind::Vex,
            1 => VexKind::Xop,
            _ => VexKind::EVex,
        }
    }

    /// The opcode map.
    pub fn map(self) -> VexMap {
        match (self.0 >> MAP_SHIFT) & 0x7 {
            0 => VexMap::M0F,
            1 => VexMap::M0F38,
            2 => VexMap::M0F3A,
            3 => VexMap::Xop8,
            4 => VexMap::Xop9,
            _ => VexMap::Xop10,
        }
    }

    /// The REX.W requirement.
    pub fn rexw(self) -> VexRexW {
        match (self.0 >> REXW_SHIFT) & 0x3 {
            0 => VexRexW::W0,
            1 => VexRexW::W1,
            _ => VexRexW::Ignored,
        }
    }

    /// The vector length requirement.
    pub fn vector_length(self) -> VexVectorLength {
        match (self.0 >> LENGTH_SHIFT) & 0x3 {
            0 => VexVectorLength::L128,
            1 => VexVectorLength::L256,
            2 => VexVectorLength::L512,
            _ => VexVectorLength::Ignored,
        }
    }

    /// The implied SIMD prefix.
    pub fn simd_prefix(self) -> VexSimdPrefix {
        match (self.0 >> SIMD_SHIFT) & 0x3 {
            0 => VexSimdPrefix::None,
            1 => VexSimdPrefix::P66,
            2 => VexSimdPrefix::PF2,
            _ => VexSimdPrefix::PF3,
        }
    }

    /// The vvvv register role.
    pub fn nd_register(self) -> VexNdRegister {
        match (self.0 >> NDREG_SHIFT) & 0x3 {
            0 => VexNdRegister::Invalid,
            1 => VexNdRegister::Source,
            2 => VexNdRegister::Dest,
            _ => VexNdRegister::SecondSource,
        }
    }
}

impl fmt::Debug for VexEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VexEncoding")
            .field("kind", &self.kind())
            .field("map", &self.map())
            .field("rexw", &self.rexw())
            .field("vector_length", &self.vector_length())
            .field("simd_prefix", &self.simd_prefix())
            .field("nd_register", &self.nd_register())
            .finish()
    }
}

impl fmt::Display for VexEncoding {
    /// Canonical dotted spelling, always in the Intel component order.
    /// Re-parsing the output yields an equal descriptor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            VexKind::Vex => write!(f, "vex")?,
            VexKind::Xop => write!(f, "xop")?,
            VexKind::EVex => write!(f, "evex")?,
        }
        match self.nd_register() {
            VexNdRegister::Invalid => {}
            VexNdRegister::Source => write!(f, ".nds")?,
            VexNdRegister::Dest => write!(f, ".ndd")?,
            VexNdRegister::SecondSource => write!(f, ".dds")?,
        }
        match self.vector_length() {
            VexVectorLength::L128 => write!(f, ".128")?,
            VexVectorLength::L256 => write!(f, ".256")?,
            VexVectorLength::L512 => write!(f, ".512")?,
            VexVectorLength::Ignored => write!(f, ".lig")?,
        }
        match self.simd_prefix() {
            VexSimdPrefix::None => {}
            VexSimdPrefix::P66 => write!(f, ".66")?,
            VexSimdPrefix::PF2 => write!(f, ".f2")?,
            VexSimdPrefix::PF3 => write!(f, ".f3")?,
        }
        write!(f, ".{}", self.map().code())?;
        match self.rexw() {
            VexRexW::W0 => write!(f, ".w0"),
            VexRexW::W1 => write!(f, ".w1"),
            VexRexW::Ignored => write!(f, ".wig"),
        }
    }
}

/// EVEX memory tuple types, as named in `insns.dat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EVexTupleType {
    Fv,
    Hv,
    Fvm,
    T1s8,
    T1s16,
    T1s,
    T1f32,
    T1f64,
    T2,
    T4,
    T8,
    Hvm,
    Qvm,
    Ovm,
    M128,
    Dup,
}

impl EVexTupleType {
    /// Case-insensitive name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "fv" => Self::Fv,
            "hv" => Self::Hv,
            "fvm" => Self::Fvm,
            "t1s8" => Self::T1s8,
            "t1s16" => Self::T1s16,
            "t1s" => Self::T1s,
            "t1f32" => Self::T1f32,
            "t1f64" => Self::T1f64,
            "t2" => Self::T2,
            "t4" => Self::T4,
            "t8" => Self::T8,
            "hvm" => Self::Hvm,
            "qvm" => Self::Qvm,
            "ovm" => Self::Ovm,
            "m128" => Self::M128,
            "dup" => Self::Dup,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_all_fields() {
        let enc = VexEncoding::new(
            VexKind::EVex,
            VexMap::M0F3A,
            VexRexW::W1,
            VexVectorLength::L512,
            VexSimdPrefix::PF2,
            VexNdRegister::SecondSource,
        );
        assert_eq!(enc.kind(), VexKind::EVex);
        assert_eq!(enc.map(), VexMap::M0F3A);
        assert_eq!(enc.rexw(), VexRexW::W1);
        assert_eq!(enc.vector_length(), VexVectorLength::L512);
        assert_eq!(enc.simd_prefix(), VexSimdPrefix::PF2);
        assert_eq!(enc.nd_register(), VexNdRegister::SecondSource);
    }

    #[test]
    fn test_defaults_pack_to_distinct_values() {
        let a = VexEncoding::new(
            VexKind::Vex,
            VexMap::M0F,
            VexRexW::Ignored,
            VexVectorLength::L128,
            VexSimdPrefix::None,
            VexNdRegister::Source,
        );
        let b = VexEncoding::new(
            VexKind::Vex,
            VexMap::M0F,
            VexRexW::Ignored,
            VexVectorLength::L128,
            VexSimdPrefix::None,
            VexNdRegister::Invalid,
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_canonical_form() {
        let enc = VexEncoding::new(
            VexKind::Vex,
            VexMap::M0F,
            VexRexW::Ignored,
            VexVectorLength::L128,
            VexSimdPrefix::None,
            VexNdRegister::Source,
        );
        assert_eq!(enc.to_string(), "vex.nds.128.0f.wig");

        let enc = VexEncoding::new(
            VexKind::Xop,
            VexMap::Xop9,
            VexRexW::W0,
            VexVectorLength::L128,
            VexSimdPrefix::None,
            VexNdRegister::Invalid,
        );
        assert_eq!(enc.to_string(), "xop.128.m9.w0");
    }

    #[test]
    fn test_map_to_opcode_map() {
        assert_eq!(VexMap::M0F38.opcode_map(), OpcodeMap::Escape0F38);
        assert_eq!(VexMap::Xop10.opcode_map(), OpcodeMap::Xop10);
    }

    #[test]
    fn test_tuple_type_names() {
        assert_eq!(EVexTupleType::from_name("fv"), Some(EVexTupleType::Fv));
        assert_eq!(EVexTupleType::from_name("T1S"), Some(EVexTupleType::T1s));
        assert_eq!(EVexTupleType::from_name("m128"), Some(EVexTupleType::M128));
        assert_eq!(EVexTupleType::from_name("bogus"), None);
    }
}
