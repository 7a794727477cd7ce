//! Index sort used by the attribute statistics pass.
//!
//! The base quicksort is not stable, so a second pass reorders every block of
//! equal keys by original position.

use std::cmp::Ordering;

/// Total order on attribute values where NaN (missing) sorts after every
/// number and compares equal to other NaNs.
pub fn compare_keys(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Return the positions of `keys` in ascending order. Ties keep their input
/// order and NaN keys come last. `keys` is left untouched.
pub fn stable_sort_indices(keys: &[f64]) -> Vec<usize> {
    let mut index: Vec<usize> = (0..keys.len()).collect();
    let by_key = |a: usize, b: usize| compare_keys(keys[a], keys[b]);
    quick_sort(&mut index, &by_key);

    let mut i = 0;
    while i < index.len() {
        let mut end = i + 1;
        while end < index.len() && by_key(index[i], index[end]) == Ordering::Equal {
            end += 1;
        }
        if end - i > 1 {
            quick_sort(&mut index[i..end], &|a: usize, b: usize| a.cmp(&b));
        }
        i = end;
    }
    index
}

fn quick_sort<F>(index: &mut [usize], cmp: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    if index.len() > 1 {
        sort_range(index, 0, index.len() as isize - 1, cmp);
    }
}

fn sort_range<F>(index: &mut [usize], left: isize, right: isize, cmp: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    if left < right {
        let middle = partition(index, left, right, cmp);
        sort_range(index, left, middle, cmp);
        sort_range(index, middle + 1, right, cmp);
    }
}

/// Hoare-style partition around the element at the midpoint of `[l, r]`.
fn partition<F>(index: &mut [usize], mut l: isize, mut r: isize, cmp: &F) -> isize
where
    F: Fn(usize, usize) -> Ordering,
{
    let pivot = index[((l + r) / 2) as usize];
    while l < r {
        while cmp(index[l as usize], pivot) == Ordering::Less && l < r {
            l += 1;
        }
        while cmp(index[r as usize], pivot) == Ordering::Greater && l < r {
            r -= 1;
        }
        if l < r {
            index.swap(l as usize, r as usize);
            l += 1;
            r -= 1;
        }
    }
    if l == r && cmp(index[r as usize], pivot) == Ordering::Greater {
        r -= 1;
    }
    r
}
