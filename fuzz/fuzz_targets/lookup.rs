#![no_main]

use libfuzzer_sys::fuzz_target;
use insndb_nasm::InsnsDatabase;
use insndb_x86::{
    AddressSize, Instruction, LegacyPrefixList, ModRm, OpcodeMap, Rex, Sib, Vex2, Vex3, Xex,
};

const INSNS: &str = "\
ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,LOCK
MOV reg32,imm32 [ri: o32 b8+r id] 386
MOV rm32,reg32 [mr: o32 89 /r] 8086
LEA reg32,mem [rm: o32 8d /r] 8086
RET void [ c3] 8086
CALL imm [i: odf e8 rel] 8086
Jcc imm [i: 70+c rb] 8086
ADDPD xmm1,xmm2/m128 [rm: 66 0f 58 /r] WILLAMETTE,SSE2
VADDPS xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE
";

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let db = InsnsDatabase::parse(INSNS).expect("static database parses");

    let default = match data[0] & 0x3 {
        0 => AddressSize::Addr16,
        1 => AddressSize::Addr32,
        _ => AddressSize::Addr64,
    };
    let (prefixes, _) = LegacyPrefixList::from_bytes(&data[1..4]);
    let xex = match data[4] & 0x3 {
        0 => Xex::Escapes,
        1 => Xex::Rex(Rex::from_byte(0x40 | (data[5] & 0x0F))),
        2 => Xex::Vex2(Vex2::from_byte(data[5])),
        _ => Xex::Vex3(Vex3::from_bytes(data[5], data[6])),
    };

    let mut insn = Instruction::new(default)
        .with_legacy_prefixes(prefixes)
        .with_xex(xex)
        .with_main_byte(data[7]);
    if insn.xex.opcode_map().is_none() {
        insn = insn.with_opcode_map(match data[4] >> 6 {
            0 => OpcodeMap::Default,
            1 => OpcodeMap::Escape0F,
            2 => OpcodeMap::Escape0F38,
            _ => OpcodeMap::Escape0F3A,
        });
    }

    // Lookup should never panic, and repeated lookups must agree.
    let first = db.try_lookup(&insn);
    let second = db.try_lookup(&insn);
    match (&first, &second) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(_), Err(_)) => {}
        _ => panic!("lookup is not deterministic"),
    }

    // Extending the instruction must not panic either.
    if data.len() >= 10 {
        let full = insn
            .with_modrm(ModRm::new(data[8]))
            .with_sib(Sib::new(data[9]))
            .with_immediate_size(data[8] & 0x0F);
        for entry in db.iter() {
            let _ = insndb_nasm::match_entry(entry, &full, false);
        }
    }
});
