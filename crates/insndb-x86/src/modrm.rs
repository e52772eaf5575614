//! ModR/M and SIB bytes.
//!
//! Both types wrap the raw byte and expose the subfields through
//! accessors. The raw byte is kept so an encoding that fixes a whole
//! ModR/M literal can be compared directly.

/// A ModR/M byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModRm(u8);

impl ModRm {
    pub fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Build from subfields. `mod_` is masked to 2 bits, `reg`/`rm` to 3.
    pub fn from_parts(mod_: u8, reg: u8, rm: u8) -> Self {
        Self(((mod_ & 0x3) << 6) | ((reg & 0x7) << 3) | (rm & 0x7))
    }

    /// The raw byte.
    pub fn byte(self) -> u8 {
        self.0
    }

    /// Mod field (2 bits).
    pub fn mod_(self) -> u8 {
        self.0 >> 6
    }

    /// Reg field (3 bits, before any REX extension).
    pub fn reg(self) -> u8 {
        (self.0 >> 3) & 0x7
    }

    /// R/M field (3 bits, before any REX extension).
    pub fn rm(self) -> u8 {
        self.0 & 0x7
    }

    /// Returns true for a direct register operand (mod == 11).
    pub fn is_direct(self) -> bool {
        self.mod_() == 0b11
    }

    /// Returns true if this ModR/M requires a SIB byte.
    pub fn needs_sib(self) -> bool {
        !self.is_direct() && self.rm() == 0b100
    }
}

/// A SIB byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sib(u8);

impl Sib {
    pub fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// The raw byte.
    pub fn byte(self) -> u8 {
        self.0
    }

    /// Scale field (2 bits).
    pub fn scale(self) -> u8 {
        self.0 >> 6
    }

    /// Index field (3 bits, before any REX extension).
    pub fn index(self) -> u8 {
        (self.0 >> 3) & 0x7
    }

    /// Base field (3 bits, before any REX extension).
    pub fn base(self) -> u8 {
        self.0 & 0x7
    }

    /// The actual scale factor (1, 2, 4, or 8).
    pub fn scale_factor(self) -> u8 {
        1 << self.scale()
    }
}
