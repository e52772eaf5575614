//! Parser for NASM `insns.dat` instruction definition lines.
//!
//! One line describes one instruction form in four whitespace-separated
//! columns: mnemonic, operand values, code string, flags. The code
//! string is bracketed and is treated as a single column even when it
//! contains spaces:
//!
//! ```text
//! ADD      rm32,imm8      [mi: o32 83 /0 ib,s]      8086,LOCK
//! VADDPS   xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE
//! ```
//!
//! Blank lines and `;` comments are skipped. The parser does not
//! recover inside a line; a caller that wants to keep going catches the
//! error and moves to the next line.

use insndb_x86::VexKind;

use crate::entry::NasmInsnsEntry;
use crate::error::ParseError;
use crate::flags::{NasmFlagSet, NasmInstructionFlag};
use crate::operand::{NasmOperand, NasmOperandField, NasmOperandType};
use crate::token::NasmEncodingToken;
use crate::vex::{
    EVexTupleType, VexEncoding, VexMap, VexNdRegister, VexRexW, VexSimdPrefix, VexVectorLength,
};

/// Parse one `insns.dat` line. Returns `Ok(None)` for blank and
/// comment lines.
pub fn parse_line(line: &str) -> Result<Option<NasmInsnsEntry>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') {
        return Ok(None);
    }

    let (mnemonic, rest) = take_word(trimmed).ok_or_else(|| ParseError::MissingColumn {
        missing: "mnemonic",
        line: line.to_string(),
    })?;
    if !is_valid_mnemonic(mnemonic) {
        return Err(ParseError::BadMnemonic(mnemonic.to_string()));
    }

    let (values_col, rest) = take_word(rest).ok_or_else(|| ParseError::MissingColumn {
        missing: "operands",
        line: line.to_string(),
    })?;

    let (code_col, rest) = take_code_column(rest, line)?;
    let flags_col = rest.trim();
    if flags_col.is_empty() {
        return Err(ParseError::MissingColumn {
            missing: "flags",
            line: line.to_string(),
        });
    }

    let code = parse_code_column(code_col)?;
    let operands = parse_operands(values_col, &code.fields, line)?;
    let flags = parse_flags(flags_col)?;

    Ok(Some(NasmInsnsEntry {
        mnemonic: mnemonic.to_string(),
        encoding_tokens: code.tokens,
        operands,
        vex_encoding: code.vex,
        evex_tuple_type: code.tuple,
        flags,
    }))
}

/// Split off the next whitespace-delimited word. Returns the word and
/// the remainder (not yet trimmed of leading whitespace).
fn take_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Split off the code column: either a whole bracketed `[...]` (spaces
/// preserved) or a single word such as `ignore`.
fn take_code_column<'a>(s: &'a str, line: &str) -> Result<(&'a str, &'a str), ParseError> {
    let s = s.trim_start();
    if s.is_empty() {
        return Err(ParseError::MissingColumn {
            missing: "code",
            line: line.to_string(),
        });
    }
    if s.starts_with('[') {
        let end = s
            .find(']')
            .ok_or_else(|| ParseError::UnterminatedBrackets(line.to_string()))?;
        Ok((&s[..=end], &s[end + 1..]))
    } else {
        take_word(s).ok_or_else(|| ParseError::MissingColumn {
            missing: "code",
            line: line.to_string(),
        })
    }
}

/// `[A-Z_0-9]+` with an optional literal `cc` suffix.
fn is_valid_mnemonic(s: &str) -> bool {
    let body = s.strip_suffix("cc").unwrap_or(s);
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

struct ParsedCode {
    tokens: Vec<NasmEncodingToken>,
    vex: Option<VexEncoding>,
    tuple: Option<EVexTupleType>,
    /// Raw operand-field characters from the bracket prelude.
    fields: String,
}

/// Parse the code column: `ignore`, or
/// `[ fields: tuple: encoding ]` with the first one or two
/// `:`-separated parts optional.
fn parse_code_column(code: &str) -> Result<ParsedCode, ParseError> {
    if code == "ignore" {
        return Ok(ParsedCode {
            tokens: Vec::new(),
            vex: None,
            tuple: None,
            fields: String::new(),
        });
    }
    let inner = code
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| ParseError::MalformedCodeString(code.to_string()))?
        .trim();

    let parts: Vec<&str> = inner.split(':').map(str::trim).collect();
    let (fields, tuple, encoding) = match parts.as_slice() {
        [encoding] => ("", None, *encoding),
        [fields, encoding] => (*fields, None, *encoding),
        [fields, tuple, encoding] => {
            let tuple = EVexTupleType::from_name(tuple)
                .ok_or_else(|| ParseError::UnknownTupleType(tuple.to_string()))?;
            (*fields, Some(tuple), *encoding)
        }
        _ => return Err(ParseError::MalformedCodeString(code.to_string())),
    };

    if !fields
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == '-' || c == '+')
    {
        return Err(ParseError::BadOperandFields {
            fields: fields.to_string(),
        });
    }

    let (tokens, vex) = parse_encoding(encoding)?;
    Ok(ParsedCode {
        tokens,
        vex,
        tuple,
        fields: fields.to_string(),
    })
}

/// Parse the space-separated encoding tokens.
fn parse_encoding(
    encoding: &str,
) -> Result<(Vec<NasmEncodingToken>, Option<VexEncoding>), ParseError> {
    let mut tokens = Vec::new();
    let mut vex = None;

    for tok in encoding.split_whitespace() {
        if let Some(t) = NasmEncodingToken::from_name(tok) {
            tokens.push(t);
        } else if let Some(t) = parse_hex_token(tok) {
            tokens.push(t);
        } else if let Some(digit) = parse_fixed_reg(tok) {
            tokens.push(NasmEncodingToken::ModRmFixedReg(digit));
        } else if tok.starts_with("vex.") || tok.starts_with("xop.") || tok.starts_with("evex.") {
            if vex.is_some() {
                return Err(ParseError::DuplicateVexDescriptor(tok.to_string()));
            }
            vex = Some(parse_vex_descriptor(tok)?);
            tokens.push(NasmEncodingToken::Vex);
        } else {
            return Err(ParseError::UnknownToken(tok.to_string()));
        }
    }

    Ok((tokens, vex))
}

/// `[0-9a-f]{2}` with an optional `+r` / `+c` suffix.
fn parse_hex_token(tok: &str) -> Option<NasmEncodingToken> {
    let (hex, suffix) = match tok.len() {
        2 => (tok, None),
        4 => {
            let (hex, suffix) = tok.split_at(2);
            (hex, Some(suffix))
        }
        _ => return None,
    };
    if !hex
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    {
        return None;
    }
    let byte = u8::from_str_radix(hex, 16).ok()?;
    match suffix {
        None => Some(NasmEncodingToken::Byte(byte)),
        Some("+r") => Some(NasmEncodingToken::BytePlusRegister(byte)),
        Some("+c") => Some(NasmEncodingToken::BytePlusConditionCode(byte)),
        Some(_) => None,
    }
}

/// `/0` .. `/7`.
fn parse_fixed_reg(tok: &str) -> Option<u8> {
    let digit = tok.strip_prefix('/')?;
    if digit.len() != 1 {
        return None;
    }
    let c = digit.chars().next()?;
    if ('0'..='7').contains(&c) {
        Some(c as u8 - b'0')
    } else {
        None
    }
}

/// Parse a dotted extended-prefix descriptor such as
/// `vex.nds.128.0f.wig`, `evex.512.66.0f3a.w1`, or `xop.m8.w0.nds.l0.p0`.
///
/// Two component orders exist: the AMD order (map first, recognised by
/// its leading `m`) and the Intel order. Optional slots fall through to
/// their defaults without consuming a component; the map is mandatory.
fn parse_vex_descriptor(tok: &str) -> Result<VexEncoding, ParseError> {
    let bad = |reason: &'static str| ParseError::BadVexDescriptor {
        descriptor: tok.to_string(),
        reason,
    };

    let lower = tok.to_ascii_lowercase();
    let mut comps = lower.split('.');
    let kind = match comps.next() {
        Some("vex") => VexKind::Vex,
        Some("xop") => VexKind::Xop,
        Some("evex") => VexKind::EVex,
        _ => return Err(bad("unknown prefix family")),
    };
    let comps: Vec<&str> = comps.collect();
    let mut idx = 0;

    // An optional slot consumes its component only when it recognises it.
    macro_rules! slot {
        ($parse:expr, $default:expr) => {
            match comps.get(idx).and_then(|c| $parse(c)) {
                Some(v) => {
                    idx += 1;
                    v
                }
                None => $default,
            }
        };
    }

    let amd_order = comps.first().is_some_and(|c| c.starts_with('m'));
    let (map, rexw, ndreg, length, simd);
    if amd_order {
        map = comps
            .get(idx)
            .and_then(|c| parse_map(c))
            .ok_or_else(|| bad("missing opcode map"))?;
        idx += 1;
        rexw = slot!(parse_rexw, VexRexW::Ignored);
        ndreg = slot!(parse_ndreg, VexNdRegister::Invalid);
        length = slot!(parse_length, VexVectorLength::Ignored);
        simd = slot!(parse_simd_amd, VexSimdPrefix::None);
    } else {
        ndreg = slot!(parse_ndreg, VexNdRegister::Invalid);
        length = slot!(parse_length, VexVectorLength::Ignored);
        simd = slot!(parse_simd_intel, VexSimdPrefix::None);
        map = comps
            .get(idx)
            .and_then(|c| parse_map(c))
            .ok_or_else(|| bad("missing opcode map"))?;
        idx += 1;
        rexw = slot!(parse_rexw, VexRexW::Ignored);
    }

    if idx != comps.len() {
        return Err(bad("trailing components"));
    }

    Ok(VexEncoding::new(kind, map, rexw, length, simd, ndreg))
}

fn parse_ndreg(c: &str) -> Option<VexNdRegister> {
    match c {
        "nds" => Some(VexNdRegister::Source),
        "ndd" => Some(VexNdRegister::Dest),
        "dds" => Some(VexNdRegister::SecondSource),
        _ => None,
    }
}

fn parse_length(c: &str) -> Option<VexVectorLength> {
    match c {
        "128" | "l0" | "lz" => Some(VexVectorLength::L128),
        "256" | "l1" => Some(VexVectorLength::L256),
        "512" | "l2" => Some(VexVectorLength::L512),
        "lig" => Some(VexVectorLength::Ignored),
        _ => None,
    }
}

fn parse_simd_intel(c: &str) -> Option<VexSimdPrefix> {
    match c {
        "np" => Some(VexSimdPrefix::None),
        "66" => Some(VexSimdPrefix::P66),
        "f2" => Some(VexSimdPrefix::PF2),
        "f3" => Some(VexSimdPrefix::PF3),
        _ => None,
    }
}

fn parse_simd_amd(c: &str) -> Option<VexSimdPrefix> {
    match c {
        "p0" => Some(VexSimdPrefix::None),
        "p1" => Some(VexSimdPrefix::P66),
        _ => None,
    }
}

fn parse_map(c: &str) -> Option<VexMap> {
    match c {
        "0f" => Some(VexMap::M0F),
        "0f38" => Some(VexMap::M0F38),
        "0f3a" => Some(VexMap::M0F3A),
        "m8" => Some(VexMap::Xop8),
        "m9" => Some(VexMap::Xop9),
        "m10" => Some(VexMap::Xop10),
        _ => None,
    }
}

fn parse_rexw(c: &str) -> Option<VexRexW> {
    match c {
        "w0" => Some(VexRexW::W0),
        "w1" => Some(VexRexW::W1),
        "wig" => Some(VexRexW::Ignored),
        _ => None,
    }
}

/// Combine the operand-values column with the field characters from the
/// code string.
fn parse_operands(
    values_col: &str,
    fields_str: &str,
    line: &str,
) -> Result<Vec<NasmOperand>, ParseError> {
    if values_col == "void" || values_col == "ignore" {
        if !fields_str.is_empty() {
            return Err(ParseError::OperandCountMismatch {
                values: 0,
                fields: fields_str.len(),
                line: line.to_string(),
            });
        }
        return Ok(Vec::new());
    }

    // `*` marks a relaxed operand; irrelevant to recognition.
    let cleaned: String = values_col.chars().filter(|&c| c != '*').collect();
    let mut values: Vec<String> = cleaned.split([',', ':']).map(str::to_string).collect();

    // IMUL's reg,imm form reuses the reg operand as the r/m operand.
    let mut fields_str = fields_str.to_string();
    if fields_str == "r+mi" && values.len() == 2 {
        fields_str = "rmi".to_string();
        let duplicated = values[0].replace("reg", "rm");
        values = vec![values[0].clone(), duplicated, values[1].clone()];
    }

    let fields: Vec<NasmOperandField> = fields_str
        .chars()
        .map(NasmOperandField::from_char)
        .collect::<Option<_>>()
        .ok_or_else(|| ParseError::BadOperandFields {
            fields: fields_str.clone(),
        })?;

    if values.len() != fields.len() {
        return Err(ParseError::OperandCountMismatch {
            values: values.len(),
            fields: fields.len(),
            line: line.to_string(),
        });
    }

    values
        .iter()
        .zip(fields)
        .map(|(value, field)| {
            // value = type|flag|flag...; only the type matters here.
            let type_name = value.split('|').next().unwrap_or_default();
            let optype = NasmOperandType::from_name(type_name)
                .ok_or_else(|| ParseError::UnknownOperandType(type_name.to_string()))?;
            Ok(NasmOperand { field, optype })
        })
        .collect()
}

/// Parse the flags column: `ignore` or comma-separated flag names.
fn parse_flags(col: &str) -> Result<NasmFlagSet, ParseError> {
    if col == "ignore" {
        return Ok(NasmFlagSet::new());
    }
    col.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            NasmInstructionFlag::from_name(name)
                .ok_or_else(|| ParseError::UnknownFlag(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|flags| flags.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::OperandKind;

    fn parsed(line: &str) -> NasmInsnsEntry {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn test_skip_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \t ").unwrap(), None);
        assert_eq!(parse_line("; instruction list").unwrap(), None);
        assert_eq!(parse_line("   ; indented comment").unwrap(), None);
    }

    #[test]
    fn test_add_rm32_imm8() {
        let e = parsed("ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,LOCK");
        assert_eq!(e.mnemonic(), "ADD");
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::OperandSize32,
                NasmEncodingToken::Byte(0x83),
                NasmEncodingToken::ModRmFixedReg(0),
                NasmEncodingToken::ImmediateByteSigned,
            ]
        );
        assert_eq!(e.operands().len(), 2);
        assert_eq!(e.operands()[0].field, NasmOperandField::BaseReg);
        assert_eq!(e.operands()[0].optype, NasmOperandType::Rm32);
        assert_eq!(e.operands()[1].field, NasmOperandField::Immediate);
        assert_eq!(e.operands()[1].optype, NasmOperandType::Imm8);
        assert!(e.flags().contains(NasmInstructionFlag::_8086));
        assert!(e.flags().contains(NasmInstructionFlag::Lock));
        assert!(!e.is_pseudo());
        assert!(!e.is_assemble_only());
    }

    #[test]
    fn test_mov_reg32_imm32() {
        let e = parsed("MOV reg32,imm32 [ri: o32 b8+r id] 386");
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::OperandSize32,
                NasmEncodingToken::BytePlusRegister(0xB8),
                NasmEncodingToken::ImmediateDword,
            ]
        );
        assert_eq!(e.operands()[0].field, NasmOperandField::ModReg);
        assert_eq!(e.operands()[0].optype, NasmOperandType::Reg32);
    }

    #[test]
    fn test_vaddps_vex() {
        let e = parsed("VADDPS xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE");
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::Vex,
                NasmEncodingToken::Byte(0x58),
                NasmEncodingToken::ModRm,
            ]
        );
        let venc = e.vex_encoding().unwrap();
        assert_eq!(venc.kind(), VexKind::Vex);
        assert_eq!(venc.nd_register(), VexNdRegister::Source);
        assert_eq!(venc.vector_length(), VexVectorLength::L128);
        assert_eq!(venc.simd_prefix(), VexSimdPrefix::None);
        assert_eq!(venc.map(), VexMap::M0F);
        assert_eq!(venc.rexw(), VexRexW::Ignored);

        assert_eq!(e.operands().len(), 3);
        assert_eq!(e.operands()[0].field, NasmOperandField::ModReg);
        assert_eq!(e.operands()[1].field, NasmOperandField::NonDestructiveReg);
        assert_eq!(e.operands()[2].field, NasmOperandField::BaseReg);
        assert_eq!(e.operands()[2].optype.kind(), OperandKind::RegisterOrMemory);
    }

    #[test]
    fn test_jcc_condition_family() {
        let e = parsed("Jcc imm [i: 70+c rb] 8086");
        assert!(e.has_condition_suffix());
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::BytePlusConditionCode(0x70),
                NasmEncodingToken::ImmediateRelativeOffset8,
            ]
        );
    }

    #[test]
    fn test_movsd_simd_prefix_bytes() {
        let e = parsed("MOVSD xmm1,xmm2/m64 [rm: f2i 0f 10 /r] WILLAMETTE,SSE2");
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::LegacyPrefixF2,
                NasmEncodingToken::Byte(0x0F),
                NasmEncodingToken::Byte(0x10),
                NasmEncodingToken::ModRm,
            ]
        );
    }

    #[test]
    fn test_void_operands() {
        let e = parsed("RET void [ c3] 8086");
        assert!(e.operands().is_empty());
        assert_eq!(e.encoding_tokens(), &[NasmEncodingToken::Byte(0xC3)]);
    }

    #[test]
    fn test_ignore_code_and_flags() {
        let e = parsed("DB ignore ignore ignore");
        assert!(e.encoding_tokens().is_empty());
        assert!(e.flags().is_empty());
        assert!(e.is_pseudo());
    }

    #[test]
    fn test_evex_with_tuple_type() {
        let e = parsed("VADDPD zmm1,zmm2,zmm3/m512 [rvm:fv: evex.nds.512.66.0f.w1 58 /r] AVX512");
        assert_eq!(e.evex_tuple_type(), Some(EVexTupleType::Fv));
        let venc = e.vex_encoding().unwrap();
        assert_eq!(venc.kind(), VexKind::EVex);
        assert_eq!(venc.vector_length(), VexVectorLength::L512);
        assert_eq!(venc.simd_prefix(), VexSimdPrefix::P66);
        assert_eq!(venc.rexw(), VexRexW::W1);
    }

    #[test]
    fn test_xop_amd_order_descriptor() {
        let e = parsed("VPHADDBD xmm1,xmm2/m128 [rm: xop.m9.w0.l0.p0 c2 /r] SSE5,AMD");
        let venc = e.vex_encoding().unwrap();
        assert_eq!(venc.kind(), VexKind::Xop);
        assert_eq!(venc.map(), VexMap::Xop9);
        assert_eq!(venc.rexw(), VexRexW::W0);
        assert_eq!(venc.vector_length(), VexVectorLength::L128);
        assert_eq!(venc.simd_prefix(), VexSimdPrefix::None);
        assert_eq!(venc.nd_register(), VexNdRegister::Invalid);
    }

    #[test]
    fn test_imul_field_expansion() {
        let e = parsed("IMUL reg32,imm32 [r+mi: o32 69 /r id] 386,SM");
        assert_eq!(e.operands().len(), 3);
        assert_eq!(e.operands()[0].field, NasmOperandField::ModReg);
        assert_eq!(e.operands()[0].optype, NasmOperandType::Reg32);
        assert_eq!(e.operands()[1].field, NasmOperandField::BaseReg);
        assert_eq!(e.operands()[1].optype, NasmOperandType::Rm32);
        assert_eq!(e.operands()[2].field, NasmOperandField::Immediate);
        assert_eq!(e.operands()[2].optype, NasmOperandType::Imm32);
    }

    #[test]
    fn test_relaxed_star_is_stripped() {
        let e = parsed("PUSH imm32* [i: o32 68 id] 386");
        assert_eq!(e.operands().len(), 1);
        assert_eq!(e.operands()[0].optype, NasmOperandType::Imm32);
    }

    #[test]
    fn test_operand_value_flags_ignored() {
        let e = parsed("CALL imm|near [i: odf e8 rel] 8086");
        assert_eq!(e.operands()[0].optype, NasmOperandType::Imm);
        assert_eq!(
            e.encoding_tokens(),
            &[
                NasmEncodingToken::OperandSizeNoOverride,
                NasmEncodingToken::Byte(0xE8),
                NasmEncodingToken::ImmediateRelativeOffset,
            ]
        );
    }

    #[test]
    fn test_bad_mnemonic() {
        assert!(matches!(
            parse_line("add rm32,imm8 [mi: 83 /0 ib] 8086"),
            Err(ParseError::BadMnemonic(_))
        ));
    }

    #[test]
    fn test_missing_columns() {
        assert!(matches!(
            parse_line("ADD"),
            Err(ParseError::MissingColumn { missing: "operands", .. })
        ));
        assert!(matches!(
            parse_line("ADD rm32,imm8"),
            Err(ParseError::MissingColumn { missing: "code", .. })
        ));
        assert!(matches!(
            parse_line("ADD rm32,imm8 [mi: 83 /0 ib,s]"),
            Err(ParseError::MissingColumn { missing: "flags", .. })
        ));
    }

    #[test]
    fn test_unterminated_brackets() {
        assert!(matches!(
            parse_line("ADD rm32,imm8 [mi: 83 /0 ib,s 8086"),
            Err(ParseError::UnterminatedBrackets(_))
        ));
    }

    #[test]
    fn test_unknown_token() {
        assert!(matches!(
            parse_line("ADD rm32,imm8 [mi: o32 83 /0 wibble] 8086"),
            Err(ParseError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_operand_count_mismatch() {
        assert!(matches!(
            parse_line("ADD rm32,imm8,imm8 [mi: o32 83 /0 ib,s] 8086"),
            Err(ParseError::OperandCountMismatch { .. })
        ));
        assert!(matches!(
            parse_line("ADD void [mi: o32 83 /0 ib,s] 8086"),
            Err(ParseError::OperandCountMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_operand_type_and_flag() {
        assert!(matches!(
            parse_line("ADD zorb,imm8 [mi: o32 83 /0 ib,s] 8086"),
            Err(ParseError::UnknownOperandType(_))
        ));
        assert!(matches!(
            parse_line("ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,WIBBLE"),
            Err(ParseError::UnknownFlag(_))
        ));
    }

    #[test]
    fn test_bad_vex_descriptors() {
        assert!(matches!(
            parse_line("VFOO xmm1,xmm2 [rm: vex.nds.128.0g.wig 58 /r] AVX"),
            Err(ParseError::BadVexDescriptor { .. })
        ));
        assert!(matches!(
            parse_line("VFOO xmm1,xmm2 [rm: vex.nds.128.0f.wig.extra 58 /r] AVX"),
            Err(ParseError::BadVexDescriptor { .. })
        ));
    }

    #[test]
    fn test_duplicate_vex_descriptor() {
        assert!(matches!(
            parse_line("VFOO xmm1,xmm2 [rm: vex.128.0f vex.128.0f 58 /r] AVX"),
            Err(ParseError::DuplicateVexDescriptor(_))
        ));
    }

    #[test]
    fn test_descriptor_defaults() {
        // Absent trailing rexw defaults to ignored; absent vvvv to invalid.
        let e = parsed("VFOO xmm1,xmm2/m128 [rm: vex.128.0f 58 /r] AVX");
        let venc = e.vex_encoding().unwrap();
        assert_eq!(venc.nd_register(), VexNdRegister::Invalid);
        assert_eq!(venc.rexw(), VexRexW::Ignored);
        assert_eq!(venc.vector_length(), VexVectorLength::L128);
    }

    #[test]
    fn test_descriptor_case_insensitive() {
        let e = parsed("VFOO xmm1,xmm2/m128 [rm: VEX.NDS.128.0F.WIG 58 /r] AVX");
        let venc = e.vex_encoding().unwrap();
        assert_eq!(venc.kind(), VexKind::Vex);
        assert_eq!(venc.nd_register(), VexNdRegister::Source);
    }

    #[test]
    fn test_encoding_string_round_trip() {
        for line in [
            "ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,LOCK",
            "MOV reg32,imm32 [ri: o32 b8+r id] 386",
            "VADDPS xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE",
            "MOVSD xmm1,xmm2/m64 [rm: f2i 0f 10 /r] WILLAMETTE,SSE2",
            "VPHADDBD xmm1,xmm2/m128 [rm: xop.m9.w0.l0.p0 c2 /r] SSE5,AMD",
        ] {
            let e = parsed(line);
            let reprinted = e.encoding_string();
            let (tokens, vex) = parse_encoding(&reprinted).unwrap();
            assert_eq!(tokens, e.encoding_tokens(), "line: {line}");
            assert_eq!(vex, e.vex_encoding(), "line: {line}");
        }
    }
}
