//! # insndb-x86
//!
//! Machine-level value types for x86/x86-64 instruction encodings.
//!
//! This crate defines the vocabulary an instruction recogniser works in:
//! legacy prefixes, the extended-prefix families (REX/VEX/XOP/EVEX),
//! ModR/M and SIB bytes, opcode maps, operand/address sizes, and
//! condition codes. All types are small copyable values with no
//! interior mutability.

pub mod condition;
pub mod instruction;
pub mod modrm;
pub mod opcode_map;
pub mod prefix;
pub mod size;
pub mod xex;

pub use condition::{eflags, Condition};
pub use instruction::Instruction;
pub use modrm::{ModRm, Sib};
pub use opcode_map::OpcodeMap;
pub use prefix::{LegacyPrefix, LegacyPrefixGroup, LegacyPrefixList, SimdPrefix};
pub use size::{AddressSize, OperandSize, VectorLength};
pub use xex::{EVex, Rex, Vex2, Vex3, VexKind, Xex, XexType, Xop};
