//! Operand fields and operand types.

/// Where an operand's value is encoded, from the field-character string
/// of the code column (`-rmxijvs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NasmOperandField {
    /// `-`: not encoded (implicit operand).
    None,
    /// `r`: ModR/M reg field.
    ModReg,
    /// `m`: ModR/M r/m field (register or memory base).
    BaseReg,
    /// `x`: SIB index field.
    IndexReg,
    /// `i`: immediate.
    Immediate,
    /// `j`: second immediate.
    Immediate2,
    /// `v`: the vvvv register of a VEX-style prefix.
    NonDestructiveReg,
    /// `s`: the register selector inside an is4 immediate.
    Is4,
}

impl NasmOperandField {
    /// Decode one field character.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '-' => Self::None,
            'r' => Self::ModReg,
            'm' => Self::BaseReg,
            'x' => Self::IndexReg,
            'i' => Self::Immediate,
            'j' => Self::Immediate2,
            'v' => Self::NonDestructiveReg,
            's' => Self::Is4,
            _ => return None,
        })
    }
}

/// Coarse classification of an operand type, as the matcher consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandKind {
    Register,
    Memory,
    RegisterOrMemory,
    Immediate,
}

/// An operand type from the second `insns.dat` column.
///
/// Accepts both the NASM vocabulary (`rm32`, `xmmrm128`, `reg_eax`) and
/// the Intel-manual spellings some tables use (`r32`, `xmm3/m128`);
/// spellings that denote the same operand shape collapse to one
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NasmOperandType {
    // Plain registers
    Reg8,
    Reg16,
    Reg32,
    Reg64,
    RegAl,
    RegAx,
    RegEax,
    RegRax,
    RegCl,
    RegCx,
    RegEcx,
    RegRcx,
    RegDx,
    RegEs,
    RegCs,
    RegSs,
    RegDs,
    RegFs,
    RegGs,
    RegSreg,
    RegCreg,
    RegDreg,
    RegTreg,
    FpuReg,
    Fpu0,
    MmxReg,
    XmmReg,
    Xmm0,
    YmmReg,
    ZmmReg,
    KReg,
    BndReg,

    // Memory
    Mem,
    Mem8,
    Mem16,
    Mem32,
    Mem64,
    Mem80,
    Mem128,
    Mem256,
    Mem512,
    MemOffs,
    Xmem32,
    Xmem64,
    Ymem32,
    Ymem64,
    Zmem32,
    Zmem64,

    // Register or memory
    Rm8,
    Rm16,
    Rm32,
    Rm64,
    MmxRm,
    MmxRm64,
    XmmRm,
    XmmRm8,
    XmmRm16,
    XmmRm32,
    XmmRm64,
    XmmRm128,
    YmmRm,
    YmmRm256,
    ZmmRm,
    ZmmRm512,
    KRm8,
    KRm16,
    KRm32,
    KRm64,

    // Immediates and code offsets
    Imm,
    Imm8,
    Imm16,
    Imm32,
    Imm64,
    SbyteWord,
    SbyteDword,
    Udword,
    Sdword,
    Unity,
    Rel,
    Rel8,
    Rel16,
    Rel32,
}

impl NasmOperandType {
    /// Case-insensitive lookup. `/` separators are stripped first, so
    /// `xmm3/m128` and `xmmrm128` resolve to the same variant.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut key = name.to_ascii_lowercase();
        key.retain(|c| c != '/');
        Some(match key.as_str() {
            "reg8" | "r8" => Self::Reg8,
            "reg16" | "r16" => Self::Reg16,
            "reg32" | "r32" => Self::Reg32,
            "reg64" | "r64" => Self::Reg64,
            "reg_al" | "al" => Self::RegAl,
            "reg_ax" | "ax" => Self::RegAx,
            "reg_eax" | "eax" => Self::RegEax,
            "reg_rax" | "rax" => Self::RegRax,
            "reg_cl" | "cl" => Self::RegCl,
            "reg_cx" => Self::RegCx,
            "reg_ecx" => Self::RegEcx,
            "reg_rcx" => Self::RegRcx,
            "reg_dx" | "dx" => Self::RegDx,
            "reg_es" | "es" => Self::RegEs,
            "reg_cs" | "cs" => Self::RegCs,
            "reg_ss" | "ss" => Self::RegSs,
            "reg_ds" | "ds" => Self::RegDs,
            "reg_fs" | "fs" => Self::RegFs,
            "reg_gs" | "gs" => Self::RegGs,
            "reg_sreg" | "sreg" => Self::RegSreg,
            "reg_creg" | "creg" => Self::RegCreg,
            "reg_dreg" | "dreg" => Self::RegDreg,
            "reg_treg" | "treg" => Self::RegTreg,
            "fpureg" | "st" => Self::FpuReg,
            "fpu0" | "st0" => Self::Fpu0,
            "mmxreg" | "mm" => Self::MmxReg,
            "xmmreg" | "xmm" | "xmm1" | "xmm2" | "xmm3" | "xmm4" => Self::XmmReg,
            "xmm0" => Self::Xmm0,
            "ymmreg" | "ymm" | "ymm1" | "ymm2" | "ymm3" | "ymm4" => Self::YmmReg,
            "zmmreg" | "zmm" | "zmm1" | "zmm2" | "zmm3" | "zmm4" => Self::ZmmReg,
            "kreg" | "k" => Self::KReg,
            "bndreg" => Self::BndReg,

            "mem" | "m" => Self::Mem,
            "mem8" | "m8" => Self::Mem8,
            "mem16" | "m16" => Self::Mem16,
            "mem32" | "m32" => Self::Mem32,
            "mem64" | "m64" => Self::Mem64,
            "mem80" | "m80" => Self::Mem80,
            "mem128" | "m128" => Self::Mem128,
            "mem256" | "m256" => Self::Mem256,
            "mem512" | "m512" => Self::Mem512,
            "mem_offs" | "moffs8" | "moffs16" | "moffs32" | "moffs64" => Self::MemOffs,
            "xmem32" => Self::Xmem32,
            "xmem64" => Self::Xmem64,
            "ymem32" => Self::Ymem32,
            "ymem64" => Self::Ymem64,
            "zmem32" => Self::Zmem32,
            "zmem64" => Self::Zmem64,

            "rm8" | "r8m8" => Self::Rm8,
            "rm16" | "r16m16" => Self::Rm16,
            "rm32" | "r32m32" => Self::Rm32,
            "rm64" | "r64m64" => Self::Rm64,
            "mmxrm" => Self::MmxRm,
            "mmxrm64" | "mmm64" => Self::MmxRm64,
            "xmmrm" => Self::XmmRm,
            "xmmrm8" | "xmm1m8" | "xmm2m8" | "xmm3m8" => Self::XmmRm8,
            "xmmrm16" | "xmm1m16" | "xmm2m16" | "xmm3m16" => Self::XmmRm16,
            "xmmrm32" | "xmm1m32" | "xmm2m32" | "xmm3m32" => Self::XmmRm32,
            "xmmrm64" | "xmm1m64" | "xmm2m64" | "xmm3m64" => Self::XmmRm64,
            "xmmrm128" | "xmm1m128" | "xmm2m128" | "xmm3m128" => Self::XmmRm128,
            "ymmrm" => Self::YmmRm,
            "ymmrm256" | "ymm1m256" | "ymm2m256" | "ymm3m256" => Self::YmmRm256,
            "zmmrm" => Self::ZmmRm,
            "zmmrm512" | "zmm1m512" | "zmm2m512" | "zmm3m512" => Self::ZmmRm512,
            "krm8" => Self::KRm8,
            "krm16" => Self::KRm16,
            "krm32" => Self::KRm32,
            "krm64" => Self::KRm64,

            "imm" => Self::Imm,
            "imm8" => Self::Imm8,
            "imm16" => Self::Imm16,
            "imm32" => Self::Imm32,
            "imm64" => Self::Imm64,
            "sbyteword" | "sbyteword16" => Self::SbyteWord,
            "sbytedword" | "sbytedword32" => Self::SbyteDword,
            "udword" => Self::Udword,
            "sdword" => Self::Sdword,
            "unity" => Self::Unity,
            "rel" => Self::Rel,
            "rel8" => Self::Rel8,
            "rel16" => Self::Rel16,
            "rel32" => Self::Rel32,
            _ => return None,
        })
    }

    /// The coarse classification the matcher keys on.
    pub fn kind(self) -> OperandKind {
        use NasmOperandType::*;
        match self {
            Reg8 | Reg16 | Reg32 | Reg64 | RegAl | RegAx | RegEax | RegRax | RegCl | RegCx
            | RegEcx | RegRcx | RegDx | RegEs | RegCs | RegSs | RegDs | RegFs | RegGs
            | RegSreg | RegCreg | RegDreg | RegTreg | FpuReg | Fpu0 | MmxReg | XmmReg | Xmm0
            | YmmReg | ZmmReg | KReg | BndReg => OperandKind::Register,

            Mem | Mem8 | Mem16 | Mem32 | Mem64 | Mem80 | Mem128 | Mem256 | Mem512 | MemOffs
            | Xmem32 | Xmem64 | Ymem32 | Ymem64 | Zmem32 | Zmem64 => OperandKind::Memory,

            Rm8 | Rm16 | Rm32 | Rm64 | MmxRm | MmxRm64 | XmmRm | XmmRm8 | XmmRm16 | XmmRm32
            | XmmRm64 | XmmRm128 | YmmRm | YmmRm256 | ZmmRm | ZmmRm512 | KRm8 | KRm16 | KRm32
            | KRm64 => OperandKind::RegisterOrMemory,

            Imm | Imm8 | Imm16 | Imm32 | Imm64 | SbyteWord | SbyteDword | Udword | Sdword
            | Unity | Rel | Rel8 | Rel16 | Rel32 => OperandKind::Immediate,
        }
    }
}

/// One operand of a database entry: where it is encoded and what it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NasmOperand {
    pub field: NasmOperandField,
    pub optype: NasmOperandType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_chars() {
        assert_eq!(NasmOperandField::from_char('-'), Some(NasmOperandField::None));
        assert_eq!(NasmOperandField::from_char('r'), Some(NasmOperandField::ModReg));
        assert_eq!(NasmOperandField::from_char('m'), Some(NasmOperandField::BaseReg));
        assert_eq!(NasmOperandField::from_char('x'), Some(NasmOperandField::IndexReg));
        assert_eq!(NasmOperandField::from_char('i'), Some(NasmOperandField::Immediate));
        assert_eq!(NasmOperandField::from_char('j'), Some(NasmOperandField::Immediate2));
        assert_eq!(NasmOperandField::from_char('v'), Some(NasmOperandField::NonDestructiveReg));
        assert_eq!(NasmOperandField::from_char('s'), Some(NasmOperandField::Is4));
        assert_eq!(NasmOperandField::from_char('q'), None);
    }

    #[test]
    fn test_both_vocabularies() {
        assert_eq!(NasmOperandType::from_name("rm32"), Some(NasmOperandType::Rm32));
        assert_eq!(NasmOperandType::from_name("reg32"), Some(NasmOperandType::Reg32));
        assert_eq!(
            NasmOperandType::from_name("xmm3/m128"),
            Some(NasmOperandType::XmmRm128)
        );
        assert_eq!(
            NasmOperandType::from_name("xmmrm128"),
            Some(NasmOperandType::XmmRm128)
        );
        assert_eq!(NasmOperandType::from_name("XMM1"), Some(NasmOperandType::XmmReg));
        assert_eq!(NasmOperandType::from_name("nonsense"), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(NasmOperandType::Reg32.kind(), OperandKind::Register);
        assert_eq!(NasmOperandType::Mem128.kind(), OperandKind::Memory);
        assert_eq!(NasmOperandType::Rm32.kind(), OperandKind::RegisterOrMemory);
        assert_eq!(NasmOperandType::Imm8.kind(), OperandKind::Immediate);
        assert_eq!(NasmOperandType::Rel.kind(), OperandKind::Immediate);
        assert_eq!(NasmOperandType::Xmem32.kind(), OperandKind::Memory);
    }
}
