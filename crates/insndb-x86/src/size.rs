//! Address, operand, and vector sizes.

/// Address size of an execution mode or instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressSize {
    Addr16,
    Addr32,
    Addr64,
}

impl AddressSize {
    /// Size in bits.
    pub fn bits(self) -> u16 {
        match self {
            Self::Addr16 => 16,
            Self::Addr32 => 32,
            Self::Addr64 => 64,
        }
    }

    /// The address size selected by a 0x67 override in this default mode.
    /// 16 and 32 toggle; 64-bit mode drops to 32.
    pub fn with_override(self) -> Self {
        match self {
            Self::Addr16 => Self::Addr32,
            Self::Addr32 => Self::Addr16,
            Self::Addr64 => Self::Addr32,
        }
    }

    /// Width in bytes of a `rel` immediate operand in this default mode:
    /// 2 for 16-bit, 4 otherwise.
    pub fn relative_offset_width(self) -> u8 {
        match self {
            Self::Addr16 => 2,
            Self::Addr32 | Self::Addr64 => 4,
        }
    }
}

/// Integer operand size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandSize {
    Word,
    Dword,
    Qword,
}

impl OperandSize {
    /// Size in bits.
    pub fn bits(self) -> u16 {
        match self {
            Self::Word => 16,
            Self::Dword => 32,
            Self::Qword => 64,
        }
    }

    /// Size in bytes.
    pub fn bytes(self) -> u8 {
        (self.bits() / 8) as u8
    }
}

/// SIMD vector length selected by a VEX/EVEX prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VectorLength {
    L128,
    L256,
    L512,
}

impl VectorLength {
    /// Decode the L/L'L bits of a VEX/EVEX prefix.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0b00 => Some(Self::L128),
            0b01 => Some(Self::L256),
            0b10 => Some(Self::L512),
            _ => None,
        }
    }

    /// Vector width in bits.
    pub fn bits(self) -> u16 {
        match self {
            Self::L128 => 128,
            Self::L256 => 256,
            Self::L512 => 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_override_toggles() {
        assert_eq!(AddressSize::Addr16.with_override(), AddressSize::Addr32);
        assert_eq!(AddressSize::Addr32.with_override(), AddressSize::Addr16);
        assert_eq!(AddressSize::Addr64.with_override(), AddressSize::Addr32);
    }

    #[test]
    fn test_relative_offset_width() {
        assert_eq!(AddressSize::Addr16.relative_offset_width(), 2);
        assert_eq!(AddressSize::Addr32.relative_offset_width(), 4);
        assert_eq!(AddressSize::Addr64.relative_offset_width(), 4);
    }

    #[test]
    fn test_vector_length_bits() {
        assert_eq!(VectorLength::from_bits(0), Some(VectorLength::L128));
        assert_eq!(VectorLength::from_bits(1), Some(VectorLength::L256));
        assert_eq!(VectorLength::from_bits(2), Some(VectorLength::L512));
        assert_eq!(VectorLength::from_bits(3), None);
        assert_eq!(VectorLength::L256.bits(), 256);
    }
}
