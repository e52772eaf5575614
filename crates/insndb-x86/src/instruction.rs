//! The partially decoded instruction handed to the recogniser.

use crate::modrm::{ModRm, Sib};
use crate::opcode_map::OpcodeMap;
use crate::prefix::{LegacyPrefixList, SimdPrefix};
use crate::size::{AddressSize, OperandSize};
use crate::xex::Xex;

/// A partially decoded instruction.
///
/// A byte-level decoder fills this in front-to-back: prefixes, extended
/// prefix, opcode map, main opcode byte, then (once known) ModR/M, SIB,
/// and the immediate width. Recognition against a database entry can run
/// as soon as the main byte is known (`up_to_opcode` mode), at which
/// point only the fields up to and including `main_byte` are
/// authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Address size of the execution mode.
    pub default_address_size: AddressSize,
    /// Address size after any 0x67 override.
    pub effective_address_size: AddressSize,
    /// Legacy prefixes in arrival order.
    pub legacy_prefixes: LegacyPrefixList,
    /// Extended prefix, if any.
    pub xex: Xex,
    /// The opcode map the main byte lives in.
    pub opcode_map: OpcodeMap,
    /// The main opcode byte.
    pub main_byte: u8,
    /// ModR/M byte, once decoded.
    pub modrm: Option<ModRm>,
    /// SIB byte, once decoded.
    pub sib: Option<Sib>,
    /// Total immediate width in bytes, once decoded.
    pub immediate_size_in_bytes: u8,
}

impl Instruction {
    /// Creates an empty instruction for the given execution mode.
    pub fn new(default_address_size: AddressSize) -> Self {
        Self {
            default_address_size,
            effective_address_size: default_address_size,
            legacy_prefixes: LegacyPrefixList::new(),
            xex: Xex::Escapes,
            opcode_map: OpcodeMap::Default,
            main_byte: 0,
            modrm: None,
            sib: None,
            immediate_size_in_bytes: 0,
        }
    }

    /// Sets the legacy prefixes and recomputes the effective address
    /// size from the default and the 0x67 override.
    pub fn with_legacy_prefixes(mut self, prefixes: LegacyPrefixList) -> Self {
        self.effective_address_size = if prefixes.has_address_size_override() {
            self.default_address_size.with_override()
        } else {
            self.default_address_size
        };
        self.legacy_prefixes = prefixes;
        self
    }

    /// Overrides the effective address size directly.
    pub fn with_effective_address_size(mut self, size: AddressSize) -> Self {
        self.effective_address_size = size;
        self
    }

    /// Sets the extended prefix; a prefix that encodes an opcode map
    /// also selects it.
    pub fn with_xex(mut self, xex: Xex) -> Self {
        if let Some(map) = xex.opcode_map() {
            self.opcode_map = map;
        }
        self.xex = xex;
        self
    }

    /// Sets the opcode map.
    pub fn with_opcode_map(mut self, map: OpcodeMap) -> Self {
        self.opcode_map = map;
        self
    }

    /// Sets the main opcode byte.
    pub fn with_main_byte(mut self, byte: u8) -> Self {
        self.main_byte = byte;
        self
    }

    /// Sets the ModR/M byte.
    pub fn with_modrm(mut self, modrm: ModRm) -> Self {
        self.modrm = Some(modrm);
        self
    }

    /// Sets the SIB byte.
    pub fn with_sib(mut self, sib: Sib) -> Self {
        self.sib = Some(sib);
        self
    }

    /// Sets the decoded immediate width.
    pub fn with_immediate_size(mut self, bytes: u8) -> Self {
        self.immediate_size_in_bytes = bytes;
        self
    }

    /// The SIMD prefix of this instruction: the `pp` field when an
    /// extended prefix encodes one, otherwise the last 66/F2/F3 legacy
    /// prefix.
    pub fn simd_prefix(&self) -> SimdPrefix {
        if let Some(pp) = self.xex.simd_prefix() {
            return pp;
        }
        self.legacy_prefixes
            .iter()
            .rev()
            .find_map(|p| SimdPrefix::from_byte(p.byte()))
            .unwrap_or(SimdPrefix::None)
    }

    /// The integer operand size: REX.W promotes to 64 bits in 64-bit
    /// mode; otherwise the mode's default, toggled 16<->32 by a 0x66
    /// override.
    pub fn integer_operand_size(&self) -> OperandSize {
        if self.default_address_size == AddressSize::Addr64 && self.xex.operand_size_64() {
            return OperandSize::Qword;
        }
        let base = if self.default_address_size == AddressSize::Addr16 {
            OperandSize::Word
        } else {
            OperandSize::Dword
        };
        if self.legacy_prefixes.has_operand_size_override() {
            match base {
                OperandSize::Word => OperandSize::Dword,
                OperandSize::Dword => OperandSize::Word,
                OperandSize::Qword => OperandSize::Qword,
            }
        } else {
            base
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::LegacyPrefix;
    use crate::xex::Rex;

    #[test]
    fn test_effective_address_follows_override() {
        let insn = Instruction::new(AddressSize::Addr64).with_legacy_prefixes(
            [LegacyPrefix::AddressSize].into_iter().collect(),
        );
        assert_eq!(insn.effective_address_size, AddressSize::Addr32);

        let insn = Instruction::new(AddressSize::Addr16)
            .with_legacy_prefixes([LegacyPrefix::AddressSize].into_iter().collect());
        assert_eq!(insn.effective_address_size, AddressSize::Addr32);
    }

    #[test]
    fn test_simd_prefix_from_legacy() {
        let insn = Instruction::new(AddressSize::Addr32).with_legacy_prefixes(
            [LegacyPrefix::OperandSize, LegacyPrefix::RepneF2]
                .into_iter()
                .collect(),
        );
        assert_eq!(insn.simd_prefix(), SimdPrefix::PF2);
    }

    #[test]
    fn test_simd_prefix_from_xex_wins() {
        use crate::xex::Vex3;
        // pp = 01 -> 66
        let insn = Instruction::new(AddressSize::Addr64)
            .with_legacy_prefixes([LegacyPrefix::RepF3].into_iter().collect())
            .with_xex(Xex::Vex3(Vex3::from_bytes(0xE1, 0x79)));
        assert_eq!(insn.simd_prefix(), SimdPrefix::P66);
    }

    #[test]
    fn test_xex_selects_opcode_map() {
        use crate::xex::Vex2;
        let insn = Instruction::new(AddressSize::Addr64).with_xex(Xex::Vex2(Vex2::from_byte(0xF8)));
        assert_eq!(insn.opcode_map, OpcodeMap::Escape0F);
    }

    #[test]
    fn test_integer_operand_size() {
        let insn = Instruction::new(AddressSize::Addr32);
        assert_eq!(insn.integer_operand_size(), OperandSize::Dword);

        let insn = Instruction::new(AddressSize::Addr16);
        assert_eq!(insn.integer_operand_size(), OperandSize::Word);

        let insn = Instruction::new(AddressSize::Addr32)
            .with_legacy_prefixes([LegacyPrefix::OperandSize].into_iter().collect());
        assert_eq!(insn.integer_operand_size(), OperandSize::Word);

        let insn = Instruction::new(AddressSize::Addr16)
            .with_legacy_prefixes([LegacyPrefix::OperandSize].into_iter().collect());
        assert_eq!(insn.integer_operand_size(), OperandSize::Dword);

        let insn =
            Instruction::new(AddressSize::Addr64).with_xex(Xex::Rex(Rex::from_byte(0x48)));
        assert_eq!(insn.integer_operand_size(), OperandSize::Qword);

        // REX.W outside 64-bit mode does not promote.
        let insn =
            Instruction::new(AddressSize::Addr32).with_xex(Xex::Rex(Rex::from_byte(0x48)));
        assert_eq!(insn.integer_operand_size(), OperandSize::Dword);
    }
}
