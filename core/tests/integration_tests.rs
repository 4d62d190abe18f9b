use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ns_options_core::{
    Definition, Error, Namespace, OptionType, Rules, Value, ValueMap, value_map,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_definition() -> Definition {
    Definition::new()
        .option("stage", OptionType::String, Rules::new().with_default("dev"))
        .option("debug", OptionType::Boolean, Rules::new().with_default(false))
        .namespace(
            "db",
            Definition::new()
                .option("url", OptionType::String, Rules::new().mark_required())
                .option("pool", OptionType::Integer, Rules::new().with_default(5)),
        )
        .namespace(
            "cache",
            Definition::new().namespace(
                "redis",
                Definition::new().option("ttl", OptionType::Float, Rules::new().mark_required()),
            ),
        )
}

fn app() -> Namespace {
    let mut app = Namespace::new("app");
    app.define_body(&app_definition()).unwrap();
    app
}

fn counting_lazy(counter: &Rc<Cell<u32>>, result: Value) -> Value {
    let counter = Rc::clone(counter);
    Value::lazy(move || {
        counter.set(counter.get() + 1);
        result.clone()
    })
}

// ---------------------------------------------------------------------------
// Typed writes
// ---------------------------------------------------------------------------

#[test]
fn test_scalar_writes_are_coerced() {
    let mut ns = Namespace::build("typed", |ns| {
        ns.add_option("count", OptionType::Integer, Rules::new())?;
        ns.add_option("ratio", OptionType::Float, Rules::new())?;
        ns.add_option("label", OptionType::String, Rules::new())?;
        ns.add_option("mode", OptionType::Symbol, Rules::new())?;
        ns.add_option("enabled", OptionType::Boolean, Rules::new())?;
        Ok(())
    })
    .unwrap();

    ns.set_option("count", "42").unwrap();
    ns.set_option("ratio", 2).unwrap();
    ns.set_option("label", 7).unwrap();
    ns.set_option("mode", "fast").unwrap();
    ns.set_option("enabled", "false").unwrap();

    assert_eq!(ns.option_value("count").unwrap(), Value::Integer(42));
    assert_eq!(ns.option_value("ratio").unwrap(), Value::Float(2.0));
    assert_eq!(ns.option_value("label").unwrap(), Value::from("7"));
    assert_eq!(ns.option_value("mode").unwrap(), Value::symbol("fast"));
    assert_eq!(ns.option_value("enabled").unwrap(), Value::Bool(false));
}

#[test]
fn test_nil_write_clears_any_type() {
    let mut ns = app();
    ns.set_option("stage", Value::Nil).unwrap();
    ns.set_option("debug", Value::Nil).unwrap();

    assert_eq!(ns.option_value("stage").unwrap(), Value::Nil);
    assert_eq!(ns.option_value("debug").unwrap(), Value::Nil);
}

#[test]
fn test_failed_coercion_keeps_previous_value() {
    let mut ns = app();
    let db = ns.namespace_mut("db").unwrap();
    db.set_option("pool", 8).unwrap();

    let err = db.set_option("pool", "eight").unwrap_err();
    assert!(matches!(err, Error::Coerce(_)));
    assert!(err.to_string().contains("Integer"));
    assert_eq!(db.option_value("pool").unwrap(), Value::Integer(8));
}

#[test]
fn test_oversized_array_length_is_rejected() {
    let mut ns = Namespace::new("lists");
    ns.add_option("list", OptionType::Array, Rules::new()).unwrap();

    let err = ns.set_option("list", i64::MAX).unwrap_err();
    assert!(matches!(err, Error::Coerce(_)));
    assert_eq!(ns.option_value("list").unwrap(), Value::Nil);

    ns.set_option("list", 2).unwrap();
    assert_eq!(
        ns.option_value("list").unwrap(),
        Value::from(vec![Value::Nil, Value::Nil])
    );
}

#[test]
fn test_unknown_names_are_errors_outside_apply() {
    let mut ns = app();

    assert!(matches!(
        ns.set_option("missing", 1),
        Err(Error::UnknownOption(name)) if name == "missing"
    ));
    assert!(matches!(ns.option_value("missing"), Err(Error::UnknownOption(_))));
    assert!(matches!(ns.namespace("missing"), Err(Error::UnknownNamespace(_))));
}

#[test]
fn test_stage_scenario() {
    let mut ns = Namespace::new("deploy");
    ns.add_option("stage", OptionType::String, Rules::new().with_default("dev"))
        .unwrap();
    assert_eq!(ns.option_value("stage").unwrap(), Value::from("dev"));

    ns.set_option("stage", Value::symbol("prod")).unwrap();
    assert_eq!(ns.option_value("stage").unwrap(), Value::from("prod"));
}

// ---------------------------------------------------------------------------
// Export and apply
// ---------------------------------------------------------------------------

#[test]
fn test_apply_scenario_orders_options_before_namespaces() {
    let mut ns = Namespace::build("settings", |ns| {
        ns.add_option("a", OptionType::Integer, Rules::new())?;
        ns.add_option("b", OptionType::Integer, Rules::new())?;
        ns.add_namespace_with("child", |child| {
            child.add_option("c", OptionType::Integer, Rules::new())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    ns.apply(&value_map([
        ("a", Value::from(1)),
        ("child", Value::map([("c", Value::from(2))])),
        ("b", Value::from(3)),
    ]))
    .unwrap();

    let keys: Vec<_> = ns.entries().unwrap().map(|(key, _)| key).collect();
    assert_eq!(keys, ["a", "b", "child"]);
    assert_eq!(
        ns.to_hash().unwrap(),
        value_map([
            ("a", Value::from(1)),
            ("b", Value::from(3)),
            ("child", Value::map([("c", Value::from(2))])),
        ])
    );
}

#[test]
fn test_to_hash_apply_round_trip() {
    let mut source = app();
    source
        .apply(&value_map([
            ("stage", Value::from("staging")),
            (
                "db",
                Value::map([("url", Value::from("postgres://db")), ("pool", Value::from(20))]),
            ),
            (
                "cache",
                Value::map([("redis", Value::map([("ttl", Value::from(1.5))]))]),
            ),
        ]))
        .unwrap();

    let exported = source.to_hash().unwrap();
    let mut target = app();
    target.apply(&exported).unwrap();

    assert_eq!(target.to_hash().unwrap(), exported);
    assert_eq!(target, source);
}

#[test]
fn test_apply_defines_unknown_options_from_runtime_type() {
    let mut ns = app();
    ns.apply(&value_map([
        ("workers", Value::from(4)),
        ("tags", Value::from(vec![Value::from("a")])),
    ]))
    .unwrap();

    assert_eq!(
        ns.get_option("workers").unwrap().option_type(),
        &OptionType::Integer
    );
    assert_eq!(ns.get_option("tags").unwrap().option_type(), &OptionType::Array);

    ns.set_option("workers", "8").unwrap();
    assert_eq!(ns.option_value("workers").unwrap(), Value::Integer(8));
}

#[test]
fn test_apply_ignores_scalars_aimed_at_namespaces() {
    let mut ns = app();
    let before = ns.to_hash().unwrap();

    ns.apply(&value_map([("db", Value::from("not a map"))])).unwrap();

    assert!(ns.has_namespace("db"));
    assert_eq!(ns.to_hash().unwrap(), before);
}

#[test]
fn test_applied_arrays_are_copied() {
    let mut ns = Namespace::new("lists");
    let mut values = value_map([("hosts", Value::from(vec![Value::from("a")]))]);
    ns.apply(&values).unwrap();

    values["hosts"].as_array_mut().unwrap().push(Value::from("b"));

    assert_eq!(
        ns.option_value("hosts").unwrap(),
        Value::from(vec![Value::from("a")])
    );
}

#[test]
fn test_exported_hash_is_detached() {
    let ns = Namespace::from_map(
        "lists",
        &value_map([("hosts", Value::from(vec![Value::from("a")]))]),
    )
    .unwrap();

    let mut exported = ns.to_hash().unwrap();
    exported["hosts"].as_array_mut().unwrap().clear();

    assert_eq!(ns.option_value("hosts").unwrap().as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Shape copies and reset
// ---------------------------------------------------------------------------

#[test]
fn test_build_from_copies_shape_not_state() {
    let mut prototype = app();
    prototype.set_option("stage", "prod").unwrap();
    prototype
        .namespace_mut("db")
        .unwrap()
        .set_option("url", "postgres://prototype")
        .unwrap();

    let mut copy = Namespace::new("copy");
    copy.build_from(&prototype).unwrap();

    assert_eq!(copy.to_hash().unwrap(), app().to_hash().unwrap());
    assert!(copy.namespace("cache").unwrap().has_namespace("redis"));

    copy.set_option("stage", "qa").unwrap();
    assert_eq!(prototype.option_value("stage").unwrap(), Value::from("prod"));
}

#[test]
fn test_instances_do_not_share_storage() {
    let prototype = app();
    let mut first = prototype.instantiate().unwrap();
    let second = prototype.instantiate().unwrap();

    first.namespace_mut("db").unwrap().set_option("pool", 1).unwrap();

    assert_eq!(first.name(), "app");
    assert_eq!(
        second.namespace("db").unwrap().option_value("pool").unwrap(),
        Value::Integer(5)
    );
    assert_eq!(
        prototype.namespace("db").unwrap().option_value("pool").unwrap(),
        Value::Integer(5)
    );
}

#[test]
fn test_reset_is_idempotent() {
    let mut ns = app();
    let defaults = ns.to_hash().unwrap();

    ns.apply(&value_map([
        ("stage", Value::from("prod")),
        ("debug", Value::from(true)),
        ("db", Value::map([("pool", Value::from(50))])),
    ]))
    .unwrap();
    assert_ne!(ns.to_hash().unwrap(), defaults);

    ns.reset().unwrap();
    assert_eq!(ns.to_hash().unwrap(), defaults);
    ns.reset().unwrap();
    assert_eq!(ns.to_hash().unwrap(), defaults);
}

// ---------------------------------------------------------------------------
// Conflicts between options and namespaces
// ---------------------------------------------------------------------------

#[test]
fn test_option_replaces_namespace_subtree() {
    let mut ns = app();
    ns.add_option("db", OptionType::String, Rules::new().with_default("sqlite"))
        .unwrap();

    assert!(!ns.has_namespace("db"));
    assert_eq!(ns.option_value("db").unwrap(), Value::from("sqlite"));
    // The required db.url went with the subtree.
    ns.namespace_mut("cache")
        .unwrap()
        .namespace_mut("redis")
        .unwrap()
        .set_option("ttl", 3)
        .unwrap();
    assert!(ns.required_set().unwrap());
}

#[test]
fn test_namespace_replaces_option() {
    let mut ns = app();
    ns.add_namespace("stage");

    assert!(!ns.has_option("stage"));
    assert!(ns.has_namespace("stage"));
    assert_eq!(ns.options().len(), 1);
}

#[test]
fn test_redefining_a_namespace_starts_empty() {
    let mut ns = app();
    ns.add_namespace("db");

    assert!(ns.namespace("db").unwrap().options().is_empty());
}

// ---------------------------------------------------------------------------
// Required options
// ---------------------------------------------------------------------------

#[test]
fn test_required_set_checks_nested_namespaces() {
    let mut ns = app();
    assert!(!ns.required_set().unwrap());

    ns.namespace_mut("db")
        .unwrap()
        .set_option("url", "postgres://db")
        .unwrap();
    assert!(!ns.required_set().unwrap());

    ns.apply(&value_map([(
        "cache",
        Value::map([("redis", Value::map([("ttl", Value::from("0.5"))]))]),
    )]))
    .unwrap();
    assert!(ns.required_set().unwrap());
}

#[test]
fn test_required_option_with_default_is_set() {
    let ns = Namespace::build("ns", |ns| {
        ns.add_option(
            "level",
            OptionType::Symbol,
            Rules::new().with_default(Value::symbol("info")).mark_required(),
        )?;
        Ok(())
    })
    .unwrap();

    assert!(ns.required_set().unwrap());
}

#[test]
fn test_rules_from_map_accepts_legacy_require() {
    let rules = Rules::from_map(value_map([
        ("require", Value::from(true)),
        ("default", Value::from(3)),
        ("doc", Value::from("retry count")),
    ]));

    assert!(rules.required);
    assert_eq!(rules.default, Value::Integer(3));
    assert_eq!(rules.extra.get("doc"), Some(&Value::from("retry count")));
}

// ---------------------------------------------------------------------------
// Lazy values
// ---------------------------------------------------------------------------

#[test]
fn test_lazy_value_is_evaluated_on_every_read() {
    let counter = Rc::new(Cell::new(0));
    let mut ns = Namespace::new("lazy");
    ns.add_option("port", OptionType::Integer, Rules::new()).unwrap();
    ns.set_option("port", counting_lazy(&counter, Value::from("8080")))
        .unwrap();

    assert_eq!(counter.get(), 0);
    assert_eq!(ns.option_value("port").unwrap(), Value::Integer(8080));
    assert_eq!(ns.option_value("port").unwrap(), Value::Integer(8080));
    assert_eq!(counter.get(), 2);

    ns.to_hash().unwrap();
    assert_eq!(counter.get(), 3);
}

#[test]
fn test_lazy_value_sees_later_changes() {
    let host = Rc::new(RefCell::new(String::from("localhost")));
    let captured = Rc::clone(&host);

    let mut ns = Namespace::new("lazy");
    ns.add_option(
        "url",
        OptionType::String,
        Rules::new().with_default(Value::lazy(move || {
            Value::from(format!("http://{}", captured.borrow()))
        })),
    )
    .unwrap();

    assert_eq!(ns.option_value("url").unwrap(), Value::from("http://localhost"));
    *host.borrow_mut() = "example.com".into();
    assert_eq!(ns.option_value("url").unwrap(), Value::from("http://example.com"));
}

#[test]
fn test_lazy_typed_option_returns_callable() {
    let counter = Rc::new(Cell::new(0));
    let mut ns = Namespace::new("lazy");
    ns.add_option("hook", OptionType::Lazy, Rules::new()).unwrap();
    ns.set_option("hook", counting_lazy(&counter, Value::from(1)))
        .unwrap();

    let hook = ns.option_value("hook").unwrap();
    assert!(hook.is_lazy());
    assert_eq!(counter.get(), 0);

    assert!(ns.set_option("hook", 5).is_err());
}

#[test]
fn test_lazy_result_that_fails_coercion_surfaces_on_read() {
    let mut ns = Namespace::new("lazy");
    ns.add_option("count", OptionType::Integer, Rules::new().mark_required())
        .unwrap();
    ns.set_option("count", Value::lazy(|| Value::from("many")))
        .unwrap();

    assert!(matches!(ns.option_value("count"), Err(Error::Coerce(_))));
    assert!(ns.required_set().is_err());
}

// ---------------------------------------------------------------------------
// JSON interop
// ---------------------------------------------------------------------------

#[test]
fn test_json_export_of_configured_tree() {
    let mut ns = app();
    ns.apply_json(
        serde_json::json!({
            "stage": "prod",
            "db": { "url": "postgres://db" },
            "cache": { "redis": { "ttl": 2 } }
        })
        .as_object()
        .unwrap(),
    )
    .unwrap();

    assert_eq!(
        ns.to_json().unwrap(),
        serde_json::json!({
            "stage": "prod",
            "debug": false,
            "db": { "url": "postgres://db", "pool": 5 },
            "cache": { "redis": { "ttl": 2.0 } }
        })
    );
}

#[test]
fn test_from_map_struct_style() {
    let values: ValueMap = value_map([
        ("name", Value::from("worker")),
        ("retries", Value::from(3)),
        ("verbose", Value::from(true)),
    ]);
    let ns = Namespace::from_map("job", &values).unwrap();

    assert_eq!(ns.to_hash().unwrap(), values);
    assert_eq!(
        ns.get_option("verbose").unwrap().option_type(),
        &OptionType::Boolean
    );
}
