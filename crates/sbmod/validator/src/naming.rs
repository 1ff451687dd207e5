//! Namespace naming convention

use sbmod_types::RawNamespaceConfig;

pub const MIN_NAME_LEN: usize = 6;
pub const MAX_NAME_LEN: usize = 50;

const DEFAULT_ENVIRONMENT: &str = "dev";

/// Namespace name for a raw document.
///
/// `custom_name` wins, prefixed with `sb-{environment}-` when an environment
/// is set. Without a custom name the name is `sb-{environment}-{location}`,
/// using `location_short` when present and a slug of `location` otherwise.
pub fn derive_namespace_name(raw: &RawNamespaceConfig) -> String {
    let environment = non_empty(raw.environment.as_deref());

    if let Some(custom) = non_empty(raw.custom_name.as_deref()) {
        return match environment {
            Some(env) => format!("sb-{}-{}", env, custom),
            None => custom.to_string(),
        };
    }

    let location = match non_empty(raw.location_short.as_deref()) {
        Some(short) => short.to_string(),
        None => slug(&raw.location),
    };

    format!(
        "sb-{}-{}",
        environment.unwrap_or(DEFAULT_ENVIRONMENT),
        location
    )
}

/// Check a namespace name against provider naming rules
pub fn check_namespace_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(format!(
            "invalid namespace name '{}': must be {}-{} characters, got {}",
            name, MIN_NAME_LEN, MAX_NAME_LEN, len
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!(
            "invalid namespace name '{}': only letters, digits and hyphens are allowed",
            name
        ));
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(format!(
            "invalid namespace name '{}': must start with a letter",
            name
        ));
    }

    if !name.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "invalid namespace name '{}': must end with a letter or digit",
            name
        ));
    }

    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn slug(location: &str) -> String {
    location
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
