//! Benchmarks for database parsing and opcode-time lookup.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use insndb_nasm::InsnsDatabase;
use insndb_x86::{AddressSize, Instruction, LegacyPrefix, OpcodeMap};

/// A representative slice of instruction definitions.
const INSNS: &str = "\
ADD rm32,imm8 [mi: o32 83 /0 ib,s] 8086,LOCK
OR rm32,imm8 [mi: o32 83 /1 ib,s] 8086,LOCK
SUB rm32,imm8 [mi: o32 83 /5 ib,s] 8086,LOCK
ADD rm32,reg32 [mr: o32 01 /r] 8086,LOCK
ADD reg32,rm32 [rm: o32 03 /r] 8086
MOV reg32,imm32 [ri: o32 b8+r id] 386
MOV rm32,reg32 [mr: o32 89 /r] 8086
MOV reg32,rm32 [rm: o32 8b /r] 8086
LEA reg32,mem [rm: o32 8d /r] 8086
PUSH imm32 [i: o32 68 id] 386
RET void [ c3] 8086
CALL imm [i: odf e8 rel] 8086
Jcc imm [i: 70+c rb] 8086
SETcc rm8 [m: 0f 90+c /r] 386
ADDPD xmm1,xmm2/m128 [rm: 66 0f 58 /r] WILLAMETTE,SSE2
MOVSD xmm1,xmm2/m64 [rm: f2i 0f 10 /r] WILLAMETTE,SSE2
PSHUFB xmm1,xmm2/m128 [rm: 66 0f 38 00 /r] SSSE3
VADDPS xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE
VADDPD ymm1,ymm2,ymm3/m256 [rvm: vex.nds.256.66.0f.wig 58 /r] AVX,SANDYBRIDGE
VADDPD zmm1,zmm2,zmm3/m512 [rvm:fv: evex.nds.512.66.0f.w1 58 /r] AVX512
";

/// Opcode-time probes hitting different corners of the database.
fn probes() -> Vec<Instruction> {
    vec![
        Instruction::new(AddressSize::Addr32).with_main_byte(0x83),
        Instruction::new(AddressSize::Addr32).with_main_byte(0xBD),
        Instruction::new(AddressSize::Addr32).with_main_byte(0xC3),
        Instruction::new(AddressSize::Addr64).with_main_byte(0x74),
        Instruction::new(AddressSize::Addr64)
            .with_legacy_prefixes([LegacyPrefix::OperandSize].into_iter().collect())
            .with_opcode_map(OpcodeMap::Escape0F)
            .with_main_byte(0x58),
        Instruction::new(AddressSize::Addr32).with_main_byte(0x0E), // miss
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("single_line", |b| {
        b.iter(|| {
            let _ = insndb_nasm::parse_line(black_box(
                "VADDPS xmm1,xmm2,xmm3/m128 [rvm: vex.nds.128.0f.wig 58 /r] AVX,SANDYBRIDGE",
            ));
        })
    });

    group.throughput(Throughput::Bytes(INSNS.len() as u64));
    group.bench_function("database", |b| {
        b.iter(|| {
            let _ = InsnsDatabase::parse(black_box(INSNS));
        })
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let db = InsnsDatabase::parse(INSNS).expect("benchmark database parses");
    let probes = probes();

    let mut group = c.benchmark_group("lookup");

    group.bench_function("hit", |b| {
        b.iter(|| {
            let _ = db.try_lookup(black_box(&probes[0]));
        })
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            let _ = db.try_lookup(black_box(&probes[5]));
        })
    });

    for rounds in [16, 64, 256] {
        group.throughput(Throughput::Elements(rounds as u64 * probes.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("mixed_stream", rounds),
            &rounds,
            |b, &rounds| {
                b.iter(|| {
                    for _ in 0..rounds {
                        for probe in &probes {
                            let _ = db.try_lookup(black_box(probe));
                        }
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_lookup);
criterion_main!(benches);
