//! Instruction database entries.

use insndb_x86::AddressSize;

use crate::flags::{NasmFlagSet, NasmInstructionFlag};
use crate::operand::NasmOperand;
use crate::token::NasmEncodingToken;
use crate::vex::{EVexTupleType, VexEncoding};

/// Assembler pseudo-instructions: directives with no machine encoding.
pub const PSEUDO_MNEMONICS: &[&str] = &[
    "DB", "DW", "DD", "DQ", "DT", "DO", "DY", "DZ", "RESB", "RESW", "RESD", "RESQ", "REST",
    "RESO", "RESY", "RESZ",
];

/// One parsed `insns.dat` entry. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NasmInsnsEntry {
    pub(crate) mnemonic: String,
    pub(crate) encoding_tokens: Vec<NasmEncodingToken>,
    pub(crate) operands: Vec<NasmOperand>,
    pub(crate) vex_encoding: Option<VexEncoding>,
    pub(crate) evex_tuple_type: Option<EVexTupleType>,
    pub(crate) flags: NasmFlagSet,
}

impl NasmInsnsEntry {
    /// The uppercase mnemonic. A condition-code family keeps its
    /// literal `cc` suffix (`Jcc`, `SETcc`).
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The encoding tokens in code-string order.
    pub fn encoding_tokens(&self) -> &[NasmEncodingToken] {
        &self.encoding_tokens
    }

    /// The operands in declaration order.
    pub fn operands(&self) -> &[NasmOperand] {
        &self.operands
    }

    /// The extended-prefix descriptor, present iff the encoding carries
    /// a `Vex` token.
    pub fn vex_encoding(&self) -> Option<VexEncoding> {
        self.vex_encoding
    }

    /// The EVEX memory tuple type, if the code string named one.
    pub fn evex_tuple_type(&self) -> Option<EVexTupleType> {
        self.evex_tuple_type
    }

    /// The flag set from the fourth column.
    pub fn flags(&self) -> NasmFlagSet {
        self.flags
    }

    /// Returns true for entries the assembler accepts but a
    /// disassembler must never produce (`ND` flag).
    pub fn is_assemble_only(&self) -> bool {
        self.flags.contains(NasmInstructionFlag::Nd)
    }

    /// Returns true for pseudo-instructions (`DB`, `RESW`, ...).
    pub fn is_pseudo(&self) -> bool {
        PSEUDO_MNEMONICS.contains(&self.mnemonic.as_str())
    }

    /// Returns true for condition-code families, whose one opcode byte
    /// carries the condition in its low nibble.
    pub fn has_condition_suffix(&self) -> bool {
        self.mnemonic.ends_with("cc")
    }

    /// The total immediate width in bytes this encoding demands. Only
    /// the `rel` token depends on the mode; everything else is fixed.
    pub fn immediate_width(&self, default: AddressSize) -> u8 {
        self.encoding_tokens
            .iter()
            .map(|t| t.immediate_width(default))
            .sum()
    }

    /// The canonical code-string spelling of the encoding tokens. The
    /// `Vex` token prints as the entry's dotted descriptor. Re-parsing
    /// the result yields an equal token stream and descriptor.
    pub fn encoding_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.encoding_tokens.len());
        for token in &self.encoding_tokens {
            match token {
                NasmEncodingToken::Vex => {
                    if let Some(venc) = self.vex_encoding {
                        parts.push(venc.to_string());
                    }
                }
                t => parts.push(t.code()),
            }
        }
        parts.join(" ")
    }
}
