//! Instruction flags from the `insns.dat` flags column.

/// One flag from the fourth `insns.dat` column.
///
/// Flag names that start with a digit (`8086`, `386`, `3DNOW`) are
/// prefixed with an underscore here; `from_name` applies the same
/// rewrite before looking a textual name up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NasmInstructionFlag {
    // CPU generations
    _8086,
    _186,
    _286,
    _386,
    _486,
    Pent,
    P6,
    Katmai,
    Willamette,
    Prescott,
    X64,
    Nehalem,
    Westmere,
    Sandybridge,
    Future,
    Ia64,

    // Encoding qualifiers
    Priv,
    Smm,
    Prot,
    Lock,
    NoLong,
    Long,
    NoHle,
    Hle,
    Mib,
    Sib,
    Undoc,
    Obsolete,
    Never,
    Nop,
    Cyrix,
    Amd,

    // Operand size matching
    Sb,
    Sw,
    Sd,
    Sq,
    So,
    Sy,
    Sz,
    Sx,
    Sm,
    Sm2,
    Ar0,
    Ar1,
    Ar2,
    Ar3,
    Ar4,
    Opt,
    /// No disassemble: the entry exists for the assembler only.
    Nd,

    // Feature sets
    Fpu,
    Mmx,
    _3DNow,
    Sse,
    Sse2,
    Sse3,
    Vmx,
    Ssse3,
    Sse4A,
    Sse41,
    Sse42,
    Sse5,
    Avx,
    Avx2,
    Fma,
    Bmi1,
    Bmi2,
    Tbm,
    Rtm,
    Invpcid,
    Avx512,
    Avx512Cd,
    Avx512Er,
    Avx512Pf,
    Avx512Vl,
    Avx512Dq,
    Avx512Bw,
    Avx512Ifma,
    Avx512Vbmi,
    Mpx,
    Sha,
    Prefetchwt1,
    Aes,
    Vaes,
    Pclmul,
    Vpclmulqdq,
    Gfni,
    Adx,
    Sgx,
    Cet,
}

impl NasmInstructionFlag {
    /// Case-insensitive lookup; digit-leading names get an underscore
    /// prefix first.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let key = if upper.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{upper}")
        } else {
            upper
        };
        Some(match key.as_str() {
            "_8086" => Self::_8086,
            "_186" => Self::_186,
            "_286" => Self::_286,
            "_386" => Self::_386,
            "_486" => Self::_486,
            "PENT" => Self::Pent,
            "P6" => Self::P6,
            "KATMAI" => Self::Katmai,
            "WILLAMETTE" => Self::Willamette,
            "PRESCOTT" => Self::Prescott,
            "X64" => Self::X64,
            "NEHALEM" => Self::Nehalem,
            "WESTMERE" => Self::Westmere,
            "SANDYBRIDGE" => Self::Sandybridge,
            "FUTURE" => Self::Future,
            "IA64" => Self::Ia64,
            "PRIV" => Self::Priv,
            "SMM" => Self::Smm,
            "PROT" => Self::Prot,
            "LOCK" => Self::Lock,
            "NOLONG" => Self::NoLong,
            "LONG" => Self::Long,
            "NOHLE" => Self::NoHle,
            "HLE" => Self::Hle,
            "MIB" => Self::Mib,
            "SIB" => Self::Sib,
            "UNDOC" => Self::Undoc,
            "OBSOLETE" => Self::Obsolete,
            "NEVER" => Self::Never,
            "NOP" => Self::Nop,
            "CYRIX" => Self::Cyrix,
            "AMD" => Self::Amd,
            "SB" => Self::Sb,
            "SW" => Self::Sw,
            "SD" => Self::Sd,
            "SQ" => Self::Sq,
            "SO" => Self::So,
            "SY" => Self::Sy,
            "SZ" => Self::Sz,
            "SX" => Self::Sx,
            "SM" => Self::Sm,
            "SM2" => Self::Sm2,
            "AR0" => Self::Ar0,
            "AR1" => Self::Ar1,
            "AR2" => Self::Ar2,
            "AR3" => Self::Ar3,
            "AR4" => Self::Ar4,
            "OPT" => Self::Opt,
            "ND" => Self::Nd,
            "FPU" => Self::Fpu,
            "MMX" => Self::Mmx,
            "_3DNOW" => Self::_3DNow,
            "SSE" => Self::Sse,
            "SSE2" => Self::Sse2,
            "SSE3" => Self::Sse3,
            "VMX" => Self::Vmx,
            "SSSE3" => Self::Ssse3,
            "SSE4A" => Self::Sse4A,
            "SSE41" => Self::Sse41,
            "SSE42" => Self::Sse42,
            "SSE5" => Self::Sse5,
            "AVX" => Self::Avx,
            "AVX2" => Self::Avx2,
            "FMA" => Self::Fma,
            "BMI1" => Self::Bmi1,
            "BMI2" => Self::Bmi2,
            "TBM" => Self::Tbm,
            "RTM" => Self::Rtm,
            "INVPCID" => Self::Invpcid,
            "AVX512" => Self::Avx512,
            "AVX512CD" => Self::Avx512Cd,
            "AVX512ER" => Self::Avx512Er,
            "AVX512PF" => Self::Avx512Pf,
            "AVX512VL" => Self::Avx512Vl,
            "AVX512DQ" => Self::Avx512Dq,
            "AVX512BW" => Self::Avx512Bw,
            "AVX512IFMA" => Self::Avx512Ifma,
            "AVX512VBMI" => Self::Avx512Vbmi,
            "MPX" => Self::Mpx,
            "SHA" => Self::Sha,
            "PREFETCHWT1" => Self::Prefetchwt1,
            "AES" => Self::Aes,
            "VAES" => Self::Vaes,
            "PCLMUL" => Self::Pclmul,
            "VPCLMULQDQ" => Self::Vpclmulqdq,
            "GFNI" => Self::Gfni,
            "ADX" => Self::Adx,
            "SGX" => Self::Sgx,
            "CET" => Self::Cet,
            _ => return None,
        })
    }

    fn bit(self) -> u128 {
        1u128 << (self as u8)
    }
}

/// A set of instruction flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NasmFlagSet(u128);

impl NasmFlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: NasmInstructionFlag) {
        self.0 |= flag.bit();
    }

    pub fn contains(&self, flag: NasmInstructionFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<NasmInstructionFlag> for NasmFlagSet {
    fn from_iter<I: IntoIterator<Item = NasmInstructionFlag>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_names_get_underscore() {
        assert_eq!(
            NasmInstructionFlag::from_name("8086"),
            Some(NasmInstructionFlag::_8086)
        );
        assert_eq!(
            NasmInstructionFlag::from_name("3dnow"),
            Some(NasmInstructionFlag::_3DNow)
        );
        assert_eq!(
            NasmInstructionFlag::from_name("386"),
            Some(NasmInstructionFlag::_386)
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            NasmInstructionFlag::from_name("lock"),
            Some(NasmInstructionFlag::Lock)
        );
        assert_eq!(
            NasmInstructionFlag::from_name("Avx512vl"),
            Some(NasmInstructionFlag::Avx512Vl)
        );
        assert_eq!(NasmInstructionFlag::from_name("NOTAFLAG"), None);
    }

    #[test]
    fn test_flag_set() {
        let mut set = NasmFlagSet::new();
        assert!(set.is_empty());
        set.insert(NasmInstructionFlag::Lock);
        set.insert(NasmInstructionFlag::_8086);
        set.insert(NasmInstructionFlag::Lock);
        assert_eq!(set.len(), 2);
        assert!(set.contains(NasmInstructionFlag::Lock));
        assert!(set.contains(NasmInstructionFlag::_8086));
        assert!(!set.contains(NasmInstructionFlag::Nd));
    }

    #[test]
    fn test_from_iter() {
        let set: NasmFlagSet = [NasmInstructionFlag::Avx, NasmInstructionFlag::Sandybridge]
            .into_iter()
            .collect();
        assert!(set.contains(NasmInstructionFlag::Avx));
        assert_eq!(set.len(), 2);
    }
}
