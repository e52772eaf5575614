//! Encoding tokens: the parsed form of one `insns.dat` code-string item.

use insndb_x86::AddressSize;

/// One token of an entry's encoding description.
///
/// The byte-carrying variants are the opcode emitters (`Byte`,
/// `BytePlusRegister`, `BytePlusConditionCode`) and the fixed ModR/M reg
/// digit; every other token is a pure constraint or width marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NasmEncodingToken {
    // Address size constraints
    AddressSizeFixed16,
    AddressSizeFixed32,
    AddressSizeFixed64,
    AddressSizeNoOverride,

    // Operand size constraints
    OperandSize16,
    OperandSize32,
    OperandSize64,
    OperandSizeNoOverride,
    OperandSize64WithoutW,

    // Legacy prefix constraints
    LegacyPrefixF2,
    LegacyPrefixF3,
    LegacyPrefixNoF3,
    LegacyPrefixNoSimd,
    LegacyPrefixMustRep,
    LegacyPrefixNoRep,
    LegacyPrefixDisassembleRepAsRepE,
    LegacyPrefixHleAlways,
    LegacyPrefixHleWithLock,
    LegacyPrefixXReleaseAlways,

    // Extended prefix
    Vex,
    RexNoB,
    RexNoW,
    RexLockAsRexR,

    // Opcode bytes
    Byte(u8),
    BytePlusRegister(u8),
    BytePlusConditionCode(u8),

    // ModR/M
    ModRm,
    ModRmFixedReg(u8),

    // Vector SIB
    VectorSib32X,
    VectorSib64X,
    VectorSib32Y,
    VectorSib64Y,
    VectorSib32Z,
    VectorSib64Z,

    // Immediates
    ImmediateByte,
    ImmediateByteSigned,
    ImmediateByteUnsigned,
    ImmediateIs4,
    ImmediateRelativeOffset8,
    ImmediateWord,
    ImmediateDword,
    ImmediateDwordSigned,
    ImmediateQword,
    ImmediateRelativeOffset,

    // Misc
    MiscAssembleWaitPrefix,
    MiscNoHigh8Register,
}

impl NasmEncodingToken {
    /// Look a literal (non-byte, non-dotted) token name up.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "a16" => Self::AddressSizeFixed16,
            "a32" => Self::AddressSizeFixed32,
            "a64" => Self::AddressSizeFixed64,
            "adf" => Self::AddressSizeNoOverride,
            "o16" => Self::OperandSize16,
            "o32" => Self::OperandSize32,
            "o64" => Self::OperandSize64,
            "odf" => Self::OperandSizeNoOverride,
            "o64nw" => Self::OperandSize64WithoutW,
            "f2i" => Self::LegacyPrefixF2,
            "f3i" => Self::LegacyPrefixF3,
            "nof3" => Self::LegacyPrefixNoF3,
            "np" => Self::LegacyPrefixNoSimd,
            "mustrep" => Self::LegacyPrefixMustRep,
            "norep" => Self::LegacyPrefixNoRep,
            "repe" => Self::LegacyPrefixDisassembleRepAsRepE,
            "hlenl" => Self::LegacyPrefixHleAlways,
            "hle" => Self::LegacyPrefixHleWithLock,
            "hlexr" => Self::LegacyPrefixXReleaseAlways,
            "norexb" => Self::RexNoB,
            "norexw" => Self::RexNoW,
            "lockrexr" => Self::RexLockAsRexR,
            "/r" => Self::ModRm,
            "vm32x" => Self::VectorSib32X,
            "vm64x" => Self::VectorSib64X,
            "vm32y" => Self::VectorSib32Y,
            "vm64y" => Self::VectorSib64Y,
            "vm32z" => Self::VectorSib32Z,
            "vm64z" => Self::VectorSib64Z,
            "ib" => Self::ImmediateByte,
            "ib,s" => Self::ImmediateByteSigned,
            "ib,u" => Self::ImmediateByteUnsigned,
            "is4" => Self::ImmediateIs4,
            "rb" | "rel8" => Self::ImmediateRelativeOffset8,
            "iw" => Self::ImmediateWord,
            "id" => Self::ImmediateDword,
            "id,s" => Self::ImmediateDwordSigned,
            "iq" => Self::ImmediateQword,
            "rel" => Self::ImmediateRelativeOffset,
            "wait" => Self::MiscAssembleWaitPrefix,
            "nohi" => Self::MiscNoHigh8Register,
            _ => return None,
        })
    }

    /// The canonical `insns.dat` spelling of this token. The `Vex`
    /// token has no spelling of its own; its dotted descriptor lives on
    /// the entry.
    pub fn code(&self) -> String {
        match self {
            Self::AddressSizeFixed16 => "a16".into(),
            Self::AddressSizeFixed32 => "a32".into(),
            Self::AddressSizeFixed64 => "a64".into(),
            Self::AddressSizeNoOverride => "adf".into(),
            Self::OperandSize16 => "o16".into(),
            Self::OperandSize32 => "o32".into(),
            Self::OperandSize64 => "o64".into(),
            Self::OperandSizeNoOverride => "odf".into(),
            Self::OperandSize64WithoutW => "o64nw".into(),
            Self::LegacyPrefixF2 => "f2i".into(),
            Self::LegacyPrefixF3 => "f3i".into(),
            Self::LegacyPrefixNoF3 => "nof3".into(),
            Self::LegacyPrefixNoSimd => "np".into(),
            Self::LegacyPrefixMustRep => "mustrep".into(),
            Self::LegacyPrefixNoRep => "norep".into(),
            Self::LegacyPrefixDisassembleRepAsRepE => "repe".into(),
            Self::LegacyPrefixHleAlways => "hlenl".into(),
            Self::LegacyPrefixHleWithLock => "hle".into(),
            Self::LegacyPrefixXReleaseAlways => "hlexr".into(),
            Self::Vex => String::new(),
            Self::RexNoB => "norexb".into(),
            Self::RexNoW => "norexw".into(),
            Self::RexLockAsRexR => "lockrexr".into(),
            Self::Byte(b) => format!("{b:02x}"),
            Self::BytePlusRegister(b) => format!("{b:02x}+r"),
            Self::BytePlusConditionCode(b) => format!("{b:02x}+c"),
            Self::ModRm => "/r".into(),
            Self::ModRmFixedReg(d) => format!("/{d}"),
            Self::VectorSib32X => "vm32x".into(),
            Self::VectorSib64X => "vm64x".into(),
            Self::VectorSib32Y => "vm32y".into(),
            Self::VectorSib64Y => "vm64y".into(),
            Self::VectorSib32Z => "vm32z".into(),
            Self::VectorSib64Z => "vm64z".into(),
            Self::ImmediateByte => "ib".into(),
            Self::ImmediateByteSigned => "ib,s".into(),
            Self::ImmediateByteUnsigned => "ib,u".into(),
            Self::ImmediateIs4 => "is4".into(),
            Self::ImmediateRelativeOffset8 => "rel8".into(),
            Self::ImmediateWord => "iw".into(),
            Self::ImmediateDword => "id".into(),
            Self::ImmediateDwordSigned => "id,s".into(),
            Self::ImmediateQword => "iq".into(),
            Self::ImmediateRelativeOffset => "rel".into(),
            Self::MiscAssembleWaitPrefix => "wait".into(),
            Self::MiscNoHigh8Register => "nohi".into(),
        }
    }

    /// The immediate width in bytes this token contributes, given the
    /// mode's default address size. Zero for non-immediate tokens.
    pub fn immediate_width(&self, default: AddressSize) -> u8 {
        match self {
            Self::ImmediateByte
            | Self::ImmediateByteSigned
            | Self::ImmediateByteUnsigned
            | Self::ImmediateIs4
            | Self::ImmediateRelativeOffset8 => 1,
            Self::ImmediateWord => 2,
            Self::ImmediateDword | Self::ImmediateDwordSigned => 4,
            Self::ImmediateQword => 8,
            Self::ImmediateRelativeOffset => default.relative_offset_width(),
            _ => 0,
        }
    }

    /// Returns true for the tokens that emit an opcode byte.
    pub fn is_opcode_emitter(&self) -> bool {
        matches!(
            self,
            Self::Byte(_) | Self::BytePlusRegister(_) | Self::BytePlusConditionCode(_)
        )
    }
}
