//src/normalize.rs

/// Strips a version suffix, so `NP_820224.1` becomes `NP_820224`.
/// Everything from the first `.` onwards is dropped.
#[inline]
pub fn base_identifier(id: &str) -> &str {
    id.split_once('.').map_or(id, |(base, _)| base)
}
