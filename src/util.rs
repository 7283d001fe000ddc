/// Parse "true"/"false"/"1"/"0" (and yes/no, on/off) from a &str.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a strictly positive integer, tolerating surrounding whitespace.
pub fn parse_positive(s: &str) -> Option<u64> {
    s.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

/// Read an environment variable, treating blank values as unset.
pub fn env_value(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
