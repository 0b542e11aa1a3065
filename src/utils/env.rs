/// Get environment variable with HSTS_ prefix, falling back to unprefixed version
///
/// This helper function checks for `HSTS_{key}` first, then falls back to `{key}`
/// so deployments can scope the variable or reuse an existing unscoped one.
///
/// # Examples
///
/// ```rust
/// use axum_hsts::utils::get_env_with_prefix;
///
/// // Checks HSTS_MAX_AGE first, then MAX_AGE
/// let max_age = get_env_with_prefix("MAX_AGE");
///
/// // Checks HSTS_ENABLED first, then ENABLED
/// let enabled = get_env_with_prefix("ENABLED");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("HSTS_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
