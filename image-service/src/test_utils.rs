use std::collections::HashMap;

use envconfig::Envconfig;

use crate::config::Config;
use crate::prometheus::setup_metrics_registry;
use crate::router;

/// Build handler state from a fake environment, with a fresh metrics registry.
pub fn state_with_env(vars: &[(&str, &str)]) -> router::State {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::init_from_hashmap(&env).unwrap();
    router::State::new(config.into(), setup_metrics_registry().unwrap())
}
