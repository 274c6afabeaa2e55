// Formatting helpers shared by the text reports and CSV exports

/// Count right-aligned in `width` with a leading space, e.g. `spaced(42, 5)` is `"   42"`
///
/// Matches the space-flag integer verb the report consumers already parse:
/// the sign slot is always a blank, so a value as wide as the field still
/// gets one separating space.
pub fn spaced(n: u64, width: usize) -> String {
    format!("{:>width$}", format!(" {}", n), width = width)
}

/// Left-aligned, padded and truncated to exactly `width` characters
pub fn fixed_width(s: &str, width: usize) -> String {
    format!("{:<width$.width$}", s, width = width)
}

/// Right-aligned, padded and truncated to exactly `width` characters
pub fn fixed_width_right(s: &str, width: usize) -> String {
    format!("{:>width$.width$}", s, width = width)
}

/// Float with a fixed number of decimals
pub fn decimals(x: f64, places: usize) -> String {
    format!("{:.*}", places, x)
}
