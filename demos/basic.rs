use ruletree::{AttributeType, EngineBuilder, Record, Schema};

fn main() {
    let engine = EngineBuilder::new()
        .schema(
            Schema::builder()
                .attribute("age", AttributeType::Number)
                .attribute("department", AttributeType::String)
                .attribute("experience", AttributeType::Number)
                .build(),
        )
        .build();

    let ast = engine
        .compile_checked(r#"(age > 30 AND department = "Sales") OR experience > 10"#)
        .expect("failed to compile rule");

    println!("Tree: {ast}");
    println!(
        "Stored form: {}",
        serde_json::to_string_pretty(&ast).expect("failed to serialize tree")
    );

    let record = Record::new()
        .set("age", 25_i64)
        .set("department", "Sales")
        .set("experience", 15_i64);

    match engine.evaluate(&ast, &record) {
        Ok(passed) => println!("Result: {passed}"),
        Err(e) => println!("Evaluation failed: {e}"),
    }
}
