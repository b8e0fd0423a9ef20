//! Small descriptive statistics used by the day aggregators.

use std::collections::BTreeMap;

/// Median of raw offsets, rounded to the nearest minute.
///
/// An even count averages the two middle values, so -420 and -480 give -450.
pub fn median(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let avg = (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0;
        Some(avg.round() as i32)
    }
}

/// Most frequent value. Ties go to the smallest value so the result does not
/// depend on input order.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        // BTreeMap iterates ascending, so a strict `>` keeps the smallest tie
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((value, count));
        }
    }

    best.map(|(v, _)| v)
}
