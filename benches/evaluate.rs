use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ruletree::{AttributeType, Engine, EngineBuilder, Node, Record, Rule, Schema};

/// An engine over `n` numeric attributes `f0..fn` and a record setting each to 10.
fn setup(n: usize) -> (Engine, Record) {
    let mut schema = Schema::builder();
    let mut record = Record::new();
    for i in 0..n {
        let name = format!("f{i}");
        schema = schema.attribute(&name, AttributeType::Number);
        record = record.set(&name, 10_i64);
    }
    let engine = EngineBuilder::new().schema(schema.build()).build();
    (engine, record)
}

/// `f0 >= 1 AND f1 >= 1 AND ...`
fn conjunction(n: usize) -> String {
    (0..n)
        .map(|i| format!("f{i} >= 1"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (engine, record) = setup(n);
        let ast = engine.compile_checked(&conjunction(n)).unwrap();
        group.bench_function(&format!("{n}_operands"), |b| {
            b.iter(|| engine.evaluate(black_box(&ast), black_box(&record)));
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_eval");

    for &n in &[10, 100, 500] {
        let (engine, record) = setup(n);
        let rules: Vec<Rule> = (0..n)
            .map(|i| {
                let ast = engine.compile(&format!("f{i} > 5 OR f{i} < 1")).unwrap();
                Rule::new(format!("r{i}"), ast)
            })
            .collect();
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| engine.evaluate_rules(black_box(&rules), black_box(&record)));
        });
    }

    group.finish();
}

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");

    for &n in &[5, 20, 50] {
        let (engine, _) = setup(n);
        let text = conjunction(n);
        group.bench_function(&format!("{n}_operands"), |b| {
            b.iter(|| engine.compile_checked(black_box(&text)).unwrap());
        });
    }

    group.finish();
}

fn bench_persisted_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("persisted_form");

    let (engine, _) = setup(50);
    let ast = engine.compile(&conjunction(50)).unwrap();
    let json = serde_json::to_string(&ast).unwrap();

    group.bench_function("to_json_50_operands", |b| {
        b.iter(|| serde_json::to_string(black_box(&ast)).unwrap());
    });
    group.bench_function("from_json_50_operands", |b| {
        b.iter(|| serde_json::from_str::<Node>(black_box(&json)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_batch,
    bench_compilation,
    bench_persisted_form
);
criterion_main!(benches);
