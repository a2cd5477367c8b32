use std::ops::Range;

/// Splits `0..len` into `parts` contiguous half-open ranges.
///
/// The first `parts - 1` ranges hold exactly `len / parts` indices; the last
/// one takes whatever is left. When `parts > len` the leading ranges are
/// empty. `parts` of zero yields no ranges.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let mut ranges = Vec::with_capacity(parts);
    for i in 0..parts - 1 {
        ranges.push(i * base..(i + 1) * base);
    }
    ranges.push((parts - 1) * base..len);
    ranges
}
