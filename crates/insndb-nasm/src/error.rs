//! Parse and match error types.

use thiserror::Error;

/// Error type for `insns.dat` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A non-comment line had fewer than four columns.
    #[error("missing {missing} column in line: {line:?}")]
    MissingColumn { missing: &'static str, line: String },

    /// The mnemonic column is not `[A-Z_0-9]+` with optional `cc` suffix.
    #[error("bad mnemonic: {0:?}")]
    BadMnemonic(String),

    /// A `[` code string without a closing `]`.
    #[error("unterminated code string in line: {0:?}")]
    UnterminatedBrackets(String),

    /// The bracketed code string had more than three `:`-separated parts.
    #[error("malformed code string: {0:?}")]
    MalformedCodeString(String),

    /// An encoding token matched no known form.
    #[error("unknown encoding token: {0:?}")]
    UnknownToken(String),

    /// A dotted VEX/XOP/EVEX descriptor could not be decoded.
    #[error("bad extended-prefix descriptor {descriptor:?}: {reason}")]
    BadVexDescriptor { descriptor: String, reason: &'static str },

    /// More than one dotted descriptor in a single encoding.
    #[error("duplicate extended-prefix descriptor: {0:?}")]
    DuplicateVexDescriptor(String),

    /// An operand-field character outside `-rmxijvs`.
    #[error("bad operand fields {fields:?}")]
    BadOperandFields { fields: String },

    /// The operand values do not line up with the operand fields.
    #[error("operand count mismatch: {values} values for {fields} fields in {line:?}")]
    OperandCountMismatch {
        values: usize,
        fields: usize,
        line: String,
    },

    /// An operand type name outside the known vocabulary.
    #[error("unknown operand type: {0:?}")]
    UnknownOperandType(String),

    /// A flag name outside the known vocabulary.
    #[error("unknown instruction flag: {0:?}")]
    UnknownFlag(String),

    /// An EVEX tuple-type name outside the known vocabulary.
    #[error("unknown EVEX tuple type: {0:?}")]
    UnknownTupleType(String),

    /// A parse error attributed to a line of a larger input.
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Wraps an error with the 1-based line number it occurred on.
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// A token or state the matcher explicitly does not handle, as opposed
/// to an ordinary non-match. Surfacing these separately lets a caller
/// tell "the database outgrew the matcher" from "not this instruction".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A plain opcode byte after ModR/M denotes a constant immediate,
    /// which a partial instruction cannot confirm byte-for-byte.
    #[error("{mnemonic}: constant immediate byte {byte:#04x} after ModR/M is not supported")]
    UnimplementedConstantImmediate { mnemonic: String, byte: u8 },

    /// A `+r`/`+cc` opcode token encountered past the opcode state.
    #[error("{mnemonic}: opcode suffix token {token:?} after the opcode is not supported")]
    UnimplementedOpcodeSuffix { mnemonic: String, token: String },
}
