use ruletree::{EngineBuilder, MemoryStore, Record, RuleService, Schema};

fn main() {
    let schema = Schema::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/schema.json"))
        .expect("failed to load schema");
    let service = RuleService::new(EngineBuilder::new().schema(schema).build(), MemoryStore::new());

    service
        .create_rule("veteran", "experience >= 20")
        .expect("failed to create rule");
    service
        .create_rule("sales_lead", r#"department = "Sales" AND salary > 80000"#)
        .expect("failed to create rule");

    let combined = service
        .combine_rules(&["veteran", "sales_lead"])
        .expect("failed to combine rules");
    println!("{}: {}", combined.name, combined.ast);

    // Combining the same rules again collides with the stored name.
    if let Err(e) = service.combine_rules(&["veteran", "sales_lead"]) {
        println!("Second combine rejected: {e}");
    }

    let record = Record::new()
        .set("age", 45_i64)
        .set("department", "Marketing")
        .set("salary", 70_000_i64)
        .set("experience", 22_i64);
    let passed = service
        .evaluate_rule(&combined.name, &record)
        .expect("failed to evaluate");
    println!("Combined rule passes: {passed}");
}
