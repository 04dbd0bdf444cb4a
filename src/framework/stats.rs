/// Prefix of `steps` covered by the cursor (`steps[0..=cursor]`).
pub fn visited<S>(steps: &[S], cursor: Option<usize>) -> &[S] {
    match cursor {
        Some(idx) => &steps[..(idx + 1).min(steps.len())],
        None => &[],
    }
}

/// Count visited steps matching `pred`.
pub fn count_visited<S, F>(steps: &[S], cursor: Option<usize>, pred: F) -> usize
where
    F: Fn(&S) -> bool,
{
    visited(steps, cursor).iter().filter(|&step| pred(step)).count()
}
