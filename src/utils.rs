use std::env::var;

/// Get the value of an ENV var when it is set and not empty
pub fn env_var_non_empty(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

/// Get the value of ENV var, or a default
///
/// The default is used when the var is missing or empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    env_var_non_empty(var_name).unwrap_or_else(or_else)
}
