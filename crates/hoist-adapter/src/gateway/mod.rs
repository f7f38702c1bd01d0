//! Deployer Gateways - Implementations of the `Deployer` port
//!
//! `command` bridges to an external SDK helper process, `simulated` stands
//! in for it where nothing real should be touched.

pub mod command;
pub mod simulated;

use hoist_domain::InitArg;
use serde_json::Value;

/// JSON form of an init argument, as sent to external deployers
pub fn init_arg_to_json(arg: &InitArg) -> Value {
    match arg {
        InitArg::Bool(b) => Value::Bool(*b),
        InitArg::Int(n) => Value::from(*n),
        InitArg::Uint(n) => Value::from(*n),
        InitArg::Text(s) => Value::String(s.clone()),
        InitArg::List(items) => Value::Array(items.iter().map(init_arg_to_json).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_arg_to_json() {
        let arg = InitArg::List(vec![
            InitArg::Text("TKN".into()),
            InitArg::Int(-1),
            InitArg::Uint(u64::MAX),
            InitArg::Bool(false),
        ]);
        assert_eq!(init_arg_to_json(&arg), json!(["TKN", -1, u64::MAX, false]));
    }
}
