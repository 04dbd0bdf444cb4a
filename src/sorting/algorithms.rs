//! Step recorders for the three sorts

use super::{Element, Mark, SortStep};

struct Recorder {
    elements: Vec<Element>,
    steps: Vec<SortStep>,
    comparisons: usize,
    swaps: usize,
}

impl Recorder {
    fn new(values: &[i64]) -> Self {
        Self {
            elements: values.iter().map(|&value| Element::new(value)).collect(),
            steps: Vec::new(),
            comparisons: 0,
            swaps: 0,
        }
    }

    fn value(&self, index: usize) -> i64 {
        self.elements[index].value
    }

    /// Snapshot with temporary marks layered over the persistent ones
    fn snapshot(&mut self, description: String, overlay: &[(usize, Mark)]) {
        let mut array = self.elements.clone();
        for &(index, mark) in overlay {
            if let Some(element) = array.get_mut(index) {
                element.mark = mark;
            }
        }
        self.steps.push(SortStep {
            description,
            array,
            comparisons: self.comparisons,
            swaps: self.swaps,
        });
    }

    fn finish(mut self) -> Vec<SortStep> {
        for element in &mut self.elements {
            element.mark = Mark::Sorted;
        }
        self.snapshot("Sorting complete!".to_string(), &[]);
        self.steps
    }
}

/// Bubble sort: compare/swap adjacent pairs, the tail grows sorted
pub fn bubble_sort(values: &[i64]) -> Vec<SortStep> {
    let mut rec = Recorder::new(values);
    let n = values.len();

    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - pass {
            rec.comparisons += 1;
            let pair = [(j, Mark::Comparing), (j + 1, Mark::Comparing)];
            let (a, b) = (rec.value(j), rec.value(j + 1));
            rec.snapshot(format!("Compare {} and {}", a, b), &pair);

            if a > b {
                rec.swaps += 1;
                rec.elements.swap(j, j + 1);
                rec.snapshot(format!("Swap {} and {}", b, a), &pair);
            }
        }
        rec.elements[n - 1 - pass].mark = Mark::Sorted;
    }

    rec.finish()
}

/// Quick sort, Lomuto partition with the last element as pivot
pub fn quick_sort(values: &[i64]) -> Vec<SortStep> {
    let mut rec = Recorder::new(values);
    quick_range(&mut rec, 0, values.len());
    rec.finish()
}

// Sorts the half-open range `lo..hi`.
fn quick_range(rec: &mut Recorder, lo: usize, hi: usize) {
    if hi <= lo {
        return;
    }
    if hi - lo == 1 {
        rec.elements[lo].mark = Mark::Sorted;
        let value = rec.value(lo);
        rec.snapshot(format!("Element {} is in place", value), &[]);
        return;
    }

    let pivot = hi - 1;
    let mut store = lo;
    for j in lo..pivot {
        rec.comparisons += 1;
        let (current, pivot_value) = (rec.value(j), rec.value(pivot));
        rec.snapshot(
            format!("Compare {} with pivot {}", current, pivot_value),
            &[(j, Mark::Comparing), (pivot, Mark::Pivot)],
        );

        if current < pivot_value {
            rec.swaps += 1;
            rec.elements.swap(store, j);
            let (a, b) = (rec.value(store), rec.value(j));
            rec.snapshot(
                format!("Swap {} and {}", a, b),
                &[(store, Mark::Comparing), (j, Mark::Comparing), (pivot, Mark::Pivot)],
            );
            store += 1;
        }
    }

    rec.swaps += 1;
    rec.elements.swap(store, pivot);
    rec.elements[store].mark = Mark::Sorted;
    let placed = rec.value(store);
    rec.snapshot(format!("Pivot {} is in place", placed), &[]);

    quick_range(rec, lo, store);
    quick_range(rec, store + 1, hi);
}

/// Top-down merge sort; counts comparisons only
pub fn merge_sort(values: &[i64]) -> Vec<SortStep> {
    let mut rec = Recorder::new(values);
    if !values.is_empty() {
        merge_range(&mut rec, 0, values.len() - 1);
    }
    rec.finish()
}

// Sorts the inclusive range `left..=right`.
fn merge_range(rec: &mut Recorder, left: usize, right: usize) {
    if left >= right {
        return;
    }
    let mid = left + (right - left) / 2;
    merge_range(rec, left, mid);
    merge_range(rec, mid + 1, right);

    for k in left..=right {
        rec.elements[k].mark = if k <= mid { Mark::LeftRun } else { Mark::RightRun };
    }
    rec.snapshot("Mark the left and right runs".to_string(), &[]);

    let mut merged = Vec::with_capacity(right - left + 1);
    let (mut i, mut j) = (left, mid + 1);
    while i <= mid && j <= right {
        rec.comparisons += 1;
        let (a, b) = (rec.value(i), rec.value(j));
        rec.snapshot(
            format!("Compare {} and {}", a, b),
            &[(i, Mark::Comparing), (j, Mark::Comparing)],
        );

        let take = if a <= b { &mut i } else { &mut j };
        rec.elements[*take].mark = Mark::Sorted;
        merged.push(rec.elements[*take]);
        *take += 1;
        rec.snapshot("Merge element".to_string(), &[]);
    }
    for (rest, end, side) in [(i, mid, "left"), (j, right, "right")] {
        for k in rest..=end {
            rec.elements[k].mark = Mark::Sorted;
            merged.push(rec.elements[k]);
            rec.snapshot(format!("Merge remaining {} element", side), &[]);
        }
    }

    for (offset, element) in merged.into_iter().enumerate() {
        rec.elements[left + offset] = element;
    }
    rec.snapshot("Merge done".to_string(), &[]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(steps: &[SortStep]) -> Vec<i64> {
        steps
            .last()
            .map(|s| s.array.iter().map(|e| e.value).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_all_sorts_agree() {
        let input = [5, 1, 4, 2, 8, 2, -3];
        let mut expected = input.to_vec();
        expected.sort_unstable();
        for steps in [bubble_sort(&input), quick_sort(&input), merge_sort(&input)] {
            assert_eq!(values(&steps), expected);
            let last = steps.last().unwrap();
            assert_eq!(last.description, "Sorting complete!");
            assert!(last.array.iter().all(|e| e.mark == Mark::Sorted));
        }
    }

    #[test]
    fn test_bubble_counts() {
        let steps = bubble_sort(&[3, 2, 1]);
        let last = steps.last().unwrap();
        assert_eq!(last.comparisons, 3);
        assert_eq!(last.swaps, 3);
        assert_eq!(steps.len(), 3 + 3 + 1);
    }

    #[test]
    fn test_counters_never_decrease() {
        let steps = quick_sort(&[9, 7, 5, 3, 1, 2, 4, 6, 8]);
        for pair in steps.windows(2) {
            assert!(pair[1].comparisons >= pair[0].comparisons);
            assert!(pair[1].swaps >= pair[0].swaps);
        }
    }

    #[test]
    fn test_merge_sort_has_no_swaps() {
        let steps = merge_sort(&[4, 3, 2, 1]);
        assert!(steps.iter().all(|s| s.swaps == 0));
        assert_eq!(steps.last().map(|s| s.comparisons), Some(4));
    }

    #[test]
    fn test_single_element() {
        assert_eq!(bubble_sort(&[7]).len(), 1);
        assert_eq!(merge_sort(&[7]).len(), 1);
        assert_eq!(quick_sort(&[7]).len(), 2);
    }
}
