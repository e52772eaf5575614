//! x86 legacy prefixes.

/// A single legacy prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefix {
    /// LOCK prefix (0xF0)
    Lock,
    /// REPNE/REPNZ prefix (0xF2)
    RepneF2,
    /// REP/REPE/REPZ prefix (0xF3)
    RepF3,
    /// ES segment override (0x26)
    SegmentEs,
    /// CS segment override (0x2E)
    SegmentCs,
    /// SS segment override (0x36)
    SegmentSs,
    /// DS segment override (0x3E)
    SegmentDs,
    /// FS segment override (0x64)
    SegmentFs,
    /// GS segment override (0x65)
    SegmentGs,
    /// Operand size override (0x66)
    OperandSize,
    /// Address size override (0x67)
    AddressSize,
}

/// Prefix groups. At most one prefix of each group is legal per
/// instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefixGroup {
    /// Group 1: LOCK and repeat prefixes.
    LockRepeat,
    /// Group 2: segment overrides.
    Segment,
    /// Group 3: operand size override.
    OperandSize,
    /// Group 4: address size override.
    AddressSize,
}

impl LegacyPrefix {
    /// Classify a raw byte as a legacy prefix.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xF0 => Some(Self::Lock),
            0xF2 => Some(Self::RepneF2),
            0xF3 => Some(Self::RepF3),
            0x26 => Some(Self::SegmentEs),
            0x2E => Some(Self::SegmentCs),
            0x36 => Some(Self::SegmentSs),
            0x3E => Some(Self::SegmentDs),
            0x64 => Some(Self::SegmentFs),
            0x65 => Some(Self::SegmentGs),
            0x66 => Some(Self::OperandSize),
            0x67 => Some(Self::AddressSize),
            _ => None,
        }
    }

    /// The encoded prefix byte.
    pub fn byte(self) -> u8 {
        match self {
            Self::Lock => 0xF0,
            Self::RepneF2 => 0xF2,
            Self::RepF3 => 0xF3,
            Self::SegmentEs => 0x26,
            Self::SegmentCs => 0x2E,
            Self::SegmentSs => 0x36,
            Self::SegmentDs => 0x3E,
            Self::SegmentFs => 0x64,
            Self::SegmentGs => 0x65,
            Self::OperandSize => 0x66,
            Self::AddressSize => 0x67,
        }
    }

    /// The group this prefix belongs to.
    pub fn group(self) -> LegacyPrefixGroup {
        match self {
            Self::Lock | Self::RepneF2 | Self::RepF3 => LegacyPrefixGroup::LockRepeat,
            Self::SegmentEs
            | Self::SegmentCs
            | Self::SegmentSs
            | Self::SegmentDs
            | Self::SegmentFs
            | Self::SegmentGs => LegacyPrefixGroup::Segment,
            Self::OperandSize => LegacyPrefixGroup::OperandSize,
            Self::AddressSize => LegacyPrefixGroup::AddressSize,
        }
    }

    /// Returns true for the repeat prefixes F2/F3 (LOCK shares their
    /// group but is not a repeat).
    pub fn is_repeat(self) -> bool {
        matches!(self, Self::RepneF2 | Self::RepF3)
    }
}

/// The ordered legacy-prefix set of one instruction.
///
/// Holds at most one prefix per group; pushing a prefix whose group is
/// already occupied replaces the earlier one while keeping the new
/// prefix last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacyPrefixList {
    prefixes: Vec<LegacyPrefix>,
}

impl LegacyPrefixList {
    /// Creates an empty prefix list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan raw bytes for legacy prefixes. Returns the list and the
    /// number of bytes consumed; stops at the first non-prefix byte.
    pub fn from_bytes(bytes: &[u8]) -> (Self, usize) {
        let mut list = Self::new();
        let mut offset = 0;
        while offset < bytes.len() {
            match LegacyPrefix::from_byte(bytes[offset]) {
                Some(p) => list.push(p),
                None => break,
            }
            offset += 1;
        }
        (list, offset)
    }

    /// Append a prefix, displacing any earlier prefix of the same group.
    pub fn push(&mut self, prefix: LegacyPrefix) {
        self.prefixes.retain(|p| p.group() != prefix.group());
        self.prefixes.push(prefix);
    }

    /// Returns true if the exact prefix is present.
    pub fn contains(&self, prefix: LegacyPrefix) -> bool {
        self.prefixes.contains(&prefix)
    }

    /// Returns true if any prefix of the group is present.
    pub fn contains_group(&self, group: LegacyPrefixGroup) -> bool {
        self.prefixes.iter().any(|p| p.group() == group)
    }

    /// Returns true if a repeat prefix (F2/F3) is present.
    pub fn contains_repeat(&self) -> bool {
        self.prefixes.iter().any(|p| p.is_repeat())
    }

    /// Returns true if the given prefix is the last one in arrival order.
    pub fn ends_with(&self, prefix: LegacyPrefix) -> bool {
        self.prefixes.last() == Some(&prefix)
    }

    /// Returns true if the 0x66 operand-size override is present.
    pub fn has_operand_size_override(&self) -> bool {
        self.contains(LegacyPrefix::OperandSize)
    }

    /// Returns true if the 0x67 address-size override is present.
    pub fn has_address_size_override(&self) -> bool {
        self.contains(LegacyPrefix::AddressSize)
    }

    /// Iterate the prefixes in arrival order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = LegacyPrefix> + '_ {
        self.prefixes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn clear(&mut self) {
        self.prefixes.clear();
    }
}

impl FromIterator<LegacyPrefix> for LegacyPrefixList {
    fn from_iter<I: IntoIterator<Item = LegacyPrefix>>(iter: I) -> Self {
        let mut list = Self::new();
        for p in iter {
            list.push(p);
        }
        list
    }
}

/// A SIMD prefix: a legacy prefix acting as part of the opcode of an
/// SSE/AVX-style instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimdPrefix {
    /// No SIMD prefix.
    #[default]
    None,
    /// 0x66
    P66,
    /// 0xF2
    PF2,
    /// 0xF3
    PF3,
}

impl SimdPrefix {
    /// Classify a raw byte as a SIMD prefix.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x66 => Some(Self::P66),
            0xF2 => Some(Self::PF2),
            0xF3 => Some(Self::PF3),
            _ => None,
        }
    }

    /// Decode the two `pp` bits of a VEX/XOP/EVEX prefix.
    pub fn from_pp(pp: u8) -> Self {
        match pp & 0b11 {
            0b01 => Self::P66,
            0b10 => Self::PF3,
            0b11 => Self::PF2,
            _ => Self::None,
        }
    }

    /// The prefix byte, if any.
    pub fn byte(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::P66 => Some(0x66),
            Self::PF2 => Some(0xF2),
            Self::PF3 => Some(0xF3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_byte_round_trip() {
        for byte in [0xF0, 0xF2, 0xF3, 0x26, 0x2E, 0x36, 0x3E, 0x64, 0x65, 0x66, 0x67] {
            let p = LegacyPrefix::from_byte(byte).unwrap();
            assert_eq!(p.byte(), byte);
        }
        assert_eq!(LegacyPrefix::from_byte(0x90), None);
    }

    #[test]
    fn test_groups_are_disjoint() {
        assert_eq!(LegacyPrefix::Lock.group(), LegacyPrefixGroup::LockRepeat);
        assert_eq!(LegacyPrefix::RepF3.group(), LegacyPrefixGroup::LockRepeat);
        assert_eq!(LegacyPrefix::SegmentGs.group(), LegacyPrefixGroup::Segment);
        assert_eq!(LegacyPrefix::OperandSize.group(), LegacyPrefixGroup::OperandSize);
        assert_eq!(LegacyPrefix::AddressSize.group(), LegacyPrefixGroup::AddressSize);
    }

    #[test]
    fn test_lock_is_not_repeat() {
        assert!(!LegacyPrefix::Lock.is_repeat());
        assert!(LegacyPrefix::RepneF2.is_repeat());
        assert!(LegacyPrefix::RepF3.is_repeat());
    }

    #[test]
    fn test_push_replaces_same_group() {
        let mut list = LegacyPrefixList::new();
        list.push(LegacyPrefix::RepF3);
        list.push(LegacyPrefix::OperandSize);
        list.push(LegacyPrefix::RepneF2);
        assert_eq!(list.len(), 2);
        assert!(!list.contains(LegacyPrefix::RepF3));
        assert!(list.contains(LegacyPrefix::RepneF2));
        assert!(list.ends_with(LegacyPrefix::RepneF2));
    }

    #[test]
    fn test_at_most_four() {
        let mut list = LegacyPrefixList::new();
        list.push(LegacyPrefix::Lock);
        list.push(LegacyPrefix::SegmentFs);
        list.push(LegacyPrefix::OperandSize);
        list.push(LegacyPrefix::AddressSize);
        list.push(LegacyPrefix::RepF3);
        list.push(LegacyPrefix::SegmentGs);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_from_bytes_stops_at_opcode() {
        let (list, n) = LegacyPrefixList::from_bytes(&[0x66, 0xF2, 0x0F, 0x58]);
        assert_eq!(n, 2);
        assert_eq!(list.len(), 2);
        assert!(list.ends_with(LegacyPrefix::RepneF2));
        assert!(list.has_operand_size_override());
    }

    #[test]
    fn test_simd_prefix_from_pp() {
        assert_eq!(SimdPrefix::from_pp(0), SimdPrefix::None);
        assert_eq!(SimdPrefix::from_pp(1), SimdPrefix::P66);
        assert_eq!(SimdPrefix::from_pp(2), SimdPrefix::PF3);
        assert_eq!(SimdPrefix::from_pp(3), SimdPrefix::PF2);
    }
}
