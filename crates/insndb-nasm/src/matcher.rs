//! The encoding matcher.
//!
//! A database entry's token stream doubles as a declarative matcher:
//! running it against a partially decoded instruction decides whether
//! the entry describes that instruction and, as a side product, whether
//! a ModR/M byte is present and how many immediate bytes follow.

use insndb_x86::{
    AddressSize, Instruction, LegacyPrefix, OpcodeMap, OperandSize, SimdPrefix, VexKind,
};

use crate::entry::NasmInsnsEntry;
use crate::error::MatchError;
use crate::operand::{NasmOperandField, OperandKind};
use crate::token::NasmEncodingToken;
use crate::vex::{VexNdRegister, VexRexW};

/// Where the matcher is within the byte layout of an instruction. The
/// state only advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchState {
    Prefixes,
    PostSimdPrefix,
    Escape0F,
    PostEscape,
    PostOpcode,
    PostModRm,
    Immediates,
}

/// The side products of a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// The encoding carries a ModR/M byte.
    pub has_modrm: bool,
    /// Total immediate width in bytes.
    pub immediate_size: u8,
}

/// Match one database entry against a partial instruction.
///
/// With `up_to_opcode` set, only the fields up to and including
/// `main_byte` are treated as authoritative: ModR/M, SIB, and
/// immediate-size agreement are not checked, but the derived
/// `has_modrm`/`immediate_size` are still reported so the caller can
/// continue decoding.
///
/// `Ok(None)` is the ordinary negative. `Err` is reserved for encodings
/// the matcher explicitly does not handle.
pub fn match_entry(
    entry: &NasmInsnsEntry,
    insn: &Instruction,
    up_to_opcode: bool,
) -> Result<Option<MatchOutcome>, MatchError> {
    if entry.is_assemble_only() || entry.is_pseudo() {
        return Ok(None);
    }

    let mut state = MatchState::Prefixes;
    let mut expected_map = OpcodeMap::Default;
    let mut expected_vex: Option<VexKind> = None;
    let mut has_modrm = false;
    let mut immediate_size = 0u8;

    for token in entry.encoding_tokens() {
        match *token {
            NasmEncodingToken::AddressSizeFixed16 => {
                if insn.effective_address_size != AddressSize::Addr16 {
                    return Ok(None);
                }
            }
            NasmEncodingToken::AddressSizeFixed32 => {
                if insn.effective_address_size != AddressSize::Addr32 {
                    return Ok(None);
                }
            }
            NasmEncodingToken::AddressSizeFixed64 => {
                if insn.effective_address_size != AddressSize::Addr64 {
                    return Ok(None);
                }
            }
            NasmEncodingToken::AddressSizeNoOverride => {
                if insn.effective_address_size != insn.default_address_size {
                    return Ok(None);
                }
            }

            NasmEncodingToken::OperandSize16 => {
                if insn.integer_operand_size() != OperandSize::Word {
                    return Ok(None);
                }
            }
            NasmEncodingToken::OperandSize32 => {
                if insn.integer_operand_size() != OperandSize::Dword {
                    return Ok(None);
                }
            }
            NasmEncodingToken::OperandSize64 => {
                if insn.integer_operand_size() != OperandSize::Qword {
                    return Ok(None);
                }
            }
            NasmEncodingToken::OperandSizeNoOverride => {
                if insn.legacy_prefixes.has_operand_size_override() {
                    return Ok(None);
                }
            }
            NasmEncodingToken::OperandSize64WithoutW => {
                if insn.default_address_size != AddressSize::Addr64
                    || insn.legacy_prefixes.has_operand_size_override()
                {
                    return Ok(None);
                }
            }

            NasmEncodingToken::LegacyPrefixF2 => {
                if !insn.legacy_prefixes.contains(LegacyPrefix::RepneF2) {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixF3 => {
                if !insn.legacy_prefixes.contains(LegacyPrefix::RepF3) {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixNoF3 => {
                if insn.legacy_prefixes.contains(LegacyPrefix::RepF3) {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixNoSimd => {
                if insn.legacy_prefixes.contains_repeat()
                    || insn.legacy_prefixes.has_operand_size_override()
                {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixMustRep => {
                if insn.simd_prefix() != SimdPrefix::PF3 {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixNoRep => {
                if insn.legacy_prefixes.contains_repeat() {
                    return Ok(None);
                }
            }
            NasmEncodingToken::LegacyPrefixDisassembleRepAsRepE
            | NasmEncodingToken::LegacyPrefixHleAlways
            | NasmEncodingToken::LegacyPrefixHleWithLock
            | NasmEncodingToken::LegacyPrefixXReleaseAlways
            | NasmEncodingToken::RexLockAsRexR
            | NasmEncodingToken::MiscAssembleWaitPrefix
            | NasmEncodingToken::MiscNoHigh8Register => {}

            NasmEncodingToken::Vex => {
                let Some(venc) = entry.vex_encoding() else {
                    // The parser never builds a Vex token without a
                    // descriptor; treat a hand-built entry as no match.
                    return Ok(None);
                };
                if insn.xex.xex_type().vex_kind() != Some(venc.kind()) {
                    return Ok(None);
                }
                expected_vex = Some(venc.kind());
                expected_map = venc.map().opcode_map();
                match venc.rexw() {
                    VexRexW::W0 => {
                        if insn.xex.operand_size_64() {
                            return Ok(None);
                        }
                    }
                    VexRexW::W1 => {
                        if !insn.xex.operand_size_64() {
                            return Ok(None);
                        }
                    }
                    VexRexW::Ignored => {}
                }
                if let Some(required) = venc.vector_length().vector_length() {
                    if let Some(actual) = insn.xex.vector_length() {
                        if actual != required {
                            return Ok(None);
                        }
                    }
                }
                if insn.simd_prefix() != venc.simd_prefix().simd_prefix() {
                    return Ok(None);
                }
                if venc.nd_register() == VexNdRegister::Invalid {
                    // No operand consumes vvvv: the wire field must be
                    // 1111, which decodes to 0.
                    if insn.xex.vvvv().is_some_and(|v| v != 0) {
                        return Ok(None);
                    }
                }
            }

            NasmEncodingToken::RexNoB => {
                if insn.xex.base_reg_extension() {
                    return Ok(None);
                }
            }
            NasmEncodingToken::RexNoW => {
                if insn.xex.operand_size_64() {
                    return Ok(None);
                }
            }

            NasmEncodingToken::Byte(byte) => {
                if state < MatchState::PostSimdPrefix && matches!(byte, 0x66 | 0xF2 | 0xF3) {
                    let prefix = match byte {
                        0x66 => LegacyPrefix::OperandSize,
                        0xF2 => LegacyPrefix::RepneF2,
                        _ => LegacyPrefix::RepF3,
                    };
                    if !insn.legacy_prefixes.ends_with(prefix) {
                        return Ok(None);
                    }
                    state = MatchState::PostSimdPrefix;
                } else if state < MatchState::Escape0F && byte == 0x0F {
                    if !insn.xex.xex_type().allows_escapes() {
                        return Ok(None);
                    }
                    expected_map = OpcodeMap::Escape0F;
                    state = MatchState::Escape0F;
                } else if state == MatchState::Escape0F && matches!(byte, 0x38 | 0x3A) {
                    expected_map = if byte == 0x38 {
                        OpcodeMap::Escape0F38
                    } else {
                        OpcodeMap::Escape0F3A
                    };
                    state = MatchState::PostEscape;
                } else if state < MatchState::PostOpcode {
                    if insn.main_byte != byte {
                        return Ok(None);
                    }
                    state = MatchState::PostOpcode;
                } else if state == MatchState::PostOpcode {
                    // A byte here is a ModR/M literal.
                    if !up_to_opcode {
                        match insn.modrm {
                            Some(modrm) if modrm.byte() == byte => {}
                            _ => return Ok(None),
                        }
                    }
                    has_modrm = true;
                    state = MatchState::PostModRm;
                } else {
                    // A byte after ModR/M is a constant immediate.
                    return Err(MatchError::UnimplementedConstantImmediate {
                        mnemonic: entry.mnemonic().to_string(),
                        byte,
                    });
                }
            }
            NasmEncodingToken::BytePlusRegister(byte) => {
                if state > MatchState::PostOpcode {
                    return Err(MatchError::UnimplementedOpcodeSuffix {
                        mnemonic: entry.mnemonic().to_string(),
                        token: token.code(),
                    });
                }
                if insn.main_byte & 0xF8 != byte {
                    return Ok(None);
                }
                state = MatchState::PostOpcode;
            }
            NasmEncodingToken::BytePlusConditionCode(byte) => {
                if state > MatchState::PostOpcode {
                    return Err(MatchError::UnimplementedOpcodeSuffix {
                        mnemonic: entry.mnemonic().to_string(),
                        token: token.code(),
                    });
                }
                if insn.main_byte & 0xF0 != byte {
                    return Ok(None);
                }
                state = MatchState::PostOpcode;
            }

            NasmEncodingToken::ModRm => {
                if !up_to_opcode && insn.modrm.is_none() {
                    return Ok(None);
                }
                has_modrm = true;
                state = state.max(MatchState::PostModRm);
            }
            NasmEncodingToken::ModRmFixedReg(reg) => {
                if !up_to_opcode {
                    match insn.modrm {
                        Some(modrm) if modrm.reg() == reg => {}
                        _ => return Ok(None),
                    }
                }
                has_modrm = true;
                state = state.max(MatchState::PostModRm);
            }

            NasmEncodingToken::VectorSib32X
            | NasmEncodingToken::VectorSib64X
            | NasmEncodingToken::VectorSib32Y
            | NasmEncodingToken::VectorSib64Y
            | NasmEncodingToken::VectorSib32Z
            | NasmEncodingToken::VectorSib64Z => {
                if !up_to_opcode && insn.sib.is_none() {
                    return Ok(None);
                }
            }

            NasmEncodingToken::ImmediateByte
            | NasmEncodingToken::ImmediateByteSigned
            | NasmEncodingToken::ImmediateByteUnsigned
            | NasmEncodingToken::ImmediateIs4
            | NasmEncodingToken::ImmediateRelativeOffset8
            | NasmEncodingToken::ImmediateWord
            | NasmEncodingToken::ImmediateDword
            | NasmEncodingToken::ImmediateDwordSigned
            | NasmEncodingToken::ImmediateQword
            | NasmEncodingToken::ImmediateRelativeOffset => {
                immediate_size += token.immediate_width(insn.default_address_size);
                state = state.max(MatchState::Immediates);
            }
        }
    }

    // Register/memory agreement for ModR/M r/m operands. Unknowable
    // before the ModR/M byte has been read.
    if !up_to_opcode {
        for operand in entry.operands() {
            if operand.field != NasmOperandField::BaseReg {
                continue;
            }
            let is_reg = insn.modrm.map_or(true, |m| m.is_direct());
            match operand.optype.kind() {
                OperandKind::Register if !is_reg => return Ok(None),
                OperandKind::Memory if is_reg => return Ok(None),
                _ => {}
            }
        }
    }

    let xex_ok = match expected_vex {
        None => insn.xex.xex_type().allows_escapes(),
        Some(kind) => insn.xex.xex_type().vex_kind() == Some(kind),
    };
    let matched = state >= MatchState::PostOpcode
        && xex_ok
        && insn.opcode_map == expected_map
        && (up_to_opcode
            || (insn.modrm.is_some() == has_modrm
                && insn.immediate_size_in_bytes == immediate_size));

    Ok(matched.then_some(MatchOutcome {
        has_modrm,
        immediate_size,
    }))
}
