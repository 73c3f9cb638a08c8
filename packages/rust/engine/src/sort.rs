//! Partition-based in-place sort with a caller-supplied key.
//!
//! Single pivot (the last element of each range), Lomuto partitioning.
//! The sort is not stable: elements with equal keys may come out in any
//! relative order.

/// Sort `items` in place by the key `key` extracts.
pub fn quicksort_by_key<T, K, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    sort_range(items, &key);
}

fn sort_range<T, K, F>(mut items: &mut [T], key: &F)
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    // Recurse into the smaller side, loop on the larger.
    while items.len() > 1 {
        let pivot = partition(items, key);
        let (low, rest) = std::mem::take(&mut items).split_at_mut(pivot);
        let high = &mut rest[1..];

        if low.len() < high.len() {
            sort_range(low, key);
            items = high;
        } else {
            sort_range(high, key);
            items = low;
        }
    }
}

/// Move everything keyed below the pivot in front of it; return the pivot's final index.
fn partition<T, K, F>(items: &mut [T], key: &F) -> usize
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    let last = items.len() - 1;
    let pivot = key(&items[last]);
    let mut boundary = 0;

    for i in 0..last {
        if key(&items[i]) < pivot {
            items.swap(boundary, i);
            boundary += 1;
        }
    }

    items.swap(boundary, last);
    boundary
}
