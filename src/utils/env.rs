/// Get environment variable with HELM_ prefix, falling back to unprefixed version
///
/// This helper function checks for `HELM_{key}` first, then falls back to `{key}`
/// so deployments can keep their existing variable names.
///
/// # Examples
///
/// ```rust
/// use helm_headers::utils::get_env_with_prefix;
///
/// // Checks HELM_X_FRAME_OPTIONS first, then X_FRAME_OPTIONS
/// let frame_options = get_env_with_prefix("X_FRAME_OPTIONS");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("HELM_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Serialises tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
