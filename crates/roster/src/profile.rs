/// Only URLs under this prefix are treated as profiles.
pub const PROFILE_PREFIX: &str = "https://leetcode.com/u/";

/// Extracts the account handle from a profile URL.
///
/// The handle is everything after [`PROFILE_PREFIX`] with a single trailing
/// slash removed. Anything else, including an empty handle, is unrecognized.
pub fn profile_handle(url: &str) -> Option<&str> {
    let rest = url.strip_prefix(PROFILE_PREFIX)?;
    let handle = rest.strip_suffix('/').unwrap_or(rest);
    if handle.is_empty() {
        None
    } else {
        Some(handle)
    }
}
