#[macro_use]
extern crate criterion;
extern crate histgen;

use criterion::Criterion;
use histgen::encode::{Format, Vocabulary};
use histgen::generator::{GeneratorConfig, HistoryGenerator, Mode};
use histgen::history::ObjectKind;
use histgen::ingest::{pair_log, render_log, MethodTable, Remapper};

fn generate(kind: ObjectKind, mode: Mode, n: usize) {
    let history = HistoryGenerator::seeded(kind, GeneratorConfig::default(), 1).generate(mode, n);
    criterion::black_box(history);
}

fn bench_generate_stack(c: &mut Criterion) {
    c.bench_function("generate_stack_10k", |b| {
        b.iter(|| generate(ObjectKind::Stack, Mode::Linearizable, 10_000))
    });
}

fn bench_generate_pqueue(c: &mut Criterion) {
    c.bench_function("generate_pqueue_10k", |b| {
        b.iter(|| generate(ObjectKind::PriorityQueue, Mode::NonLinearizable, 10_000))
    });
}

fn bench_encode(c: &mut Criterion) {
    let history = HistoryGenerator::seeded(ObjectKind::Queue, GeneratorConfig::default(), 2)
        .generate(Mode::Linearizable, 10_000);
    for format in [Format::Interval, Format::Bracket, Format::Edn].iter() {
        let name = format!("encode_{}_10k", format);
        c.bench_function(&name, |b| {
            b.iter(|| format.encode(&history, Vocabulary::canonical()))
        });
    }
}

fn bench_pair(c: &mut Criterion) {
    let history = HistoryGenerator::seeded(ObjectKind::Queue, GeneratorConfig::default(), 3)
        .generate(Mode::Linearizable, 10_000);
    let raw = pair_log(&render_log(
        &history
            .iter()
            .enumerate()
            .map(|(i, op)| histgen::ingest::RawOperation {
                process_id: op.process_id,
                token: op.method.to_string(),
                value: Some(op.value),
                invocation: 2 * i as i64,
                response: 2 * i as i64 + 1,
            })
            .collect::<Vec<_>>(),
    ))
    .unwrap();
    let log = render_log(&raw);
    c.bench_function("pair_and_remap_10k", |b| {
        b.iter(|| {
            let raw = pair_log(&log).unwrap();
            Remapper::new(MethodTable::canonical(ObjectKind::Queue))
                .remap(&raw)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_generate_stack, bench_generate_pqueue, bench_encode, bench_pair);
criterion_main!(benches);
