use ruletree::{EngineBuilder, MemoryStore, Record, RuleService, Schema};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=ruletree=debug shows compile and per-rule failure events.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = Schema::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/schema.json"))
        .expect("failed to load schema");
    let service = RuleService::new(EngineBuilder::new().schema(schema).build(), MemoryStore::new());

    for (name, text) in [
        ("adult", "age >= 18"),
        ("well_paid", "salary > 50000"),
        ("sales", "department = Sales"),
    ] {
        service
            .create_rule(name, text)
            .expect("failed to create rule");
    }

    // No salary: `well_paid` fails on its own, the others still report.
    let record = Record::new().set("age", 29_i64).set("department", "Sales");
    let report = service.evaluate_all(&record);

    println!("{report}");
    for outcome in report.results() {
        println!("  {outcome}");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("failed to serialize report")
    );
}
