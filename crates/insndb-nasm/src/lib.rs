//! # insndb-nasm
//!
//! An x86/x86-64 instruction-encoding database in NASM's `insns.dat`
//! format, and the matcher that recognises partially decoded
//! instructions against it.
//!
//! The pipeline has three stages:
//!
//! 1. [`parser::parse_line`] turns one definition line into a
//!    [`NasmInsnsEntry`]: mnemonic, encoding tokens, operands, flags,
//!    and (for AVX-style forms) the packed [`VexEncoding`] descriptor.
//! 2. [`matcher::match_entry`] runs an entry's token stream against a
//!    partial [`insndb_x86::Instruction`], deriving ModR/M presence and
//!    immediate width as it goes.
//! 3. [`InsnsDatabase::try_lookup`] runs the matcher over the whole
//!    database at opcode time and reconciles multiple matches.
//!
//! ```
//! use insndb_nasm::InsnsDatabase;
//! use insndb_x86::{AddressSize, Instruction};
//!
//! let db = InsnsDatabase::parse("ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,LOCK").unwrap();
//! let insn = Instruction::new(AddressSize::Addr32).with_main_byte(0x83);
//! let hit = db.try_lookup(&insn).unwrap().matched().unwrap();
//! assert_eq!(hit.entry.mnemonic(), "ADD");
//! assert!(hit.has_modrm);
//! assert_eq!(hit.immediate_size, 1);
//! ```

pub mod database;
pub mod entry;
pub mod error;
pub mod flags;
pub mod matcher;
pub mod operand;
pub mod parser;
pub mod token;
pub mod vex;

pub use database::{InsnsDatabase, Lookup, LookupMatch};
pub use entry::{NasmInsnsEntry, PSEUDO_MNEMONICS};
pub use error::{MatchError, ParseError};
pub use flags::{NasmFlagSet, NasmInstructionFlag};
pub use matcher::{match_entry, MatchOutcome};
pub use operand::{NasmOperand, NasmOperandField, NasmOperandType, OperandKind};
pub use parser::parse_line;
pub use token::NasmEncodingToken;
pub use vex::{
    EVexTupleType, VexEncoding, VexMap, VexNdRegister, VexRexW, VexSimdPrefix, VexVectorLength,
};
