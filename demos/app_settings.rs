//! Declares an application settings tree, fills it from JSON and checks
//! that everything required was provided.
//!
//! Run with `RUST_LOG=debug` to see options being defined on the fly.

use ns_options_core::{
    Definition, Namespace, NameAdvice, OptionType, Result, Rules, Value, advise_option_name,
};
use ns_options_demos::init_logging;

fn settings_body() -> Definition {
    Definition::new()
        .option("stage", OptionType::Symbol, Rules::new().with_default(Value::symbol("dev")))
        .option("verbose", OptionType::Boolean, Rules::new().with_default(false))
        .namespace(
            "server",
            Definition::new()
                .option("host", OptionType::String, Rules::new().with_default("127.0.0.1"))
                .option("port", OptionType::Integer, Rules::new().mark_required()),
        )
        .namespace(
            "db",
            Definition::new()
                .option("url", OptionType::String, Rules::new().mark_required())
                .option("pool", OptionType::Integer, Rules::new().with_default(5)),
        )
}

fn main() -> Result<()> {
    init_logging("info");

    let mut settings = Namespace::new("settings");
    settings.define_body(&settings_body())?;
    println!("required options set: {}", settings.required_set()?);

    let input = serde_json::json!({
        "stage": "prod",
        "server": { "port": "8443" },
        "db": { "url": "postgres://localhost/app", "pool": 20 },
        "feature_flags": ["beta-ui"]
    });
    if let Some(object) = input.as_object() {
        settings.apply_json(object)?;
    }
    println!("required options set: {}", settings.required_set()?);

    for (name, value) in settings.entries()? {
        println!("{name} = {value}");
    }

    // A host exposing options as properties would refuse this one.
    if let Some(advice @ NameAdvice::Reserved { .. }) = advise_option_name(&settings, "define") {
        println!("refused: {advice}");
    }

    println!("{:#}", settings.to_json()?);
    Ok(())
}
