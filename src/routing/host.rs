//! Host normalization.

/// Lowercase a host and drop any `:port` suffix.
///
/// Total over all inputs: an empty host normalizes to an empty string.
pub fn normalize_host(host: &str) -> String {
    host.split(':').next().unwrap_or_default().to_lowercase()
}
