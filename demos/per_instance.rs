//! Derives per-connection settings from a shared prototype.
//!
//! Each instance starts from the prototype's defaults and keeps its own
//! values; a lazy default reads shared state at the time of the read.

use std::cell::RefCell;
use std::rc::Rc;

use ns_options_core::{Namespace, OptionType, Result, Rules, Value};
use ns_options_demos::init_logging;

fn main() -> Result<()> {
    init_logging("warn");

    let region = Rc::new(RefCell::new(String::from("eu-west-1")));
    let endpoint_region = Rc::clone(&region);

    let prototype = Namespace::build("connection", |conn| {
        conn.add_option("timeout", OptionType::Float, Rules::new().with_default(30))?;
        conn.add_option(
            "endpoint",
            OptionType::String,
            Rules::new().with_default(Value::lazy(move || {
                Value::from(format!("https://{}.example.com", endpoint_region.borrow()))
            })),
        )?;
        conn.add_namespace_with("retry", |retry| {
            retry.add_option("attempts", OptionType::Integer, Rules::new().with_default(3))?;
            Ok(())
        })?;
        Ok(())
    })?;

    let mut fast = prototype.instantiate()?;
    fast.set_option("timeout", "2.5")?;
    fast.namespace_mut("retry")?.set_option("attempts", 0)?;

    let slow = prototype.instantiate()?;

    *region.borrow_mut() = "us-east-2".into();

    for conn in [&fast, &slow] {
        println!("{}", serde_json::to_string(&conn.to_json()?)?);
    }
    Ok(())
}
