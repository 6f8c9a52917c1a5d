//! Median of two sorted sequences by binary partition search.
//!
//! The search runs over the shorter sequence only, so a call costs
//! O(log(min(m, n))) comparisons and O(1) extra space. Inputs are validated
//! eagerly: the first NaN or out-of-order element fails the whole call.

use log::debug;

use crate::{array_error, core::AlgoResult};

/// Finds the median of two sorted sequences without merging them.
///
/// Both sequences must be sorted in non-descending order and free of NaN,
/// and at least one of them must be non-empty.
pub fn find_median_sorted(nums1: &[f64], nums2: &[f64]) -> AlgoResult<f64> {
    validate_sequence(nums1, "nums1")?;
    validate_sequence(nums2, "nums2")?;

    debug!(
        "Finding median for arrays of size {} and {}",
        nums1.len(),
        nums2.len()
    );

    match (nums1.is_empty(), nums2.is_empty()) {
        (true, true) => return Err(array_error!("Both arrays cannot be empty")),
        (true, false) => return Ok(single_median(nums2)),
        (false, true) => return Ok(single_median(nums1)),
        (false, false) => {}
    }

    let (shorter, longer) = if nums1.len() <= nums2.len() {
        (nums1, nums2)
    } else {
        (nums2, nums1)
    };

    let m = shorter.len();
    let n = longer.len();
    let total = m + n;
    let half = (total + 1) / 2;

    let (mut left, mut right) = (0usize, m);

    while left <= right {
        let partition_x = (left + right) / 2;
        // half >= m because m <= n, so this never underflows
        let partition_y = half - partition_x;

        let max_left_x = if partition_x == 0 {
            f64::NEG_INFINITY
        } else {
            shorter[partition_x - 1]
        };
        let min_right_x = if partition_x == m {
            f64::INFINITY
        } else {
            shorter[partition_x]
        };
        let max_left_y = if partition_y == 0 {
            f64::NEG_INFINITY
        } else {
            longer[partition_y - 1]
        };
        let min_right_y = if partition_y == n {
            f64::INFINITY
        } else {
            longer[partition_y]
        };

        if max_left_x <= min_right_y && max_left_y <= min_right_x {
            let left_max = max_left_x.max(max_left_y);
            let median = if total % 2 == 1 {
                left_max
            } else {
                midpoint(left_max, min_right_x.min(min_right_y))
            };
            debug!("Calculated median: {median}");
            return Ok(median);
        } else if max_left_x > min_right_y {
            match partition_x.checked_sub(1) {
                Some(next) => right = next,
                None => break,
            }
        } else {
            left = partition_x + 1;
        }
    }

    Err(array_error!(
        "Unable to find median - arrays may not be properly sorted"
    ))
}

/// Merges two sorted sequences into one sorted vector in O(m + n).
///
/// Applies the same validation as [`find_median_sorted`] except that two
/// empty inputs are allowed and produce an empty vector.
pub fn merge_sorted(nums1: &[f64], nums2: &[f64]) -> AlgoResult<Vec<f64>> {
    validate_sequence(nums1, "nums1")?;
    validate_sequence(nums2, "nums2")?;

    let mut merged = Vec::with_capacity(nums1.len() + nums2.len());
    let (mut i, mut j) = (0, 0);

    while i < nums1.len() && j < nums2.len() {
        if nums1[i] <= nums2[j] {
            merged.push(nums1[i]);
            i += 1;
        } else {
            merged.push(nums2[j]);
            j += 1;
        }
    }

    merged.extend_from_slice(&nums1[i..]);
    merged.extend_from_slice(&nums2[j..]);
    Ok(merged)
}

fn validate_sequence(seq: &[f64], name: &str) -> AlgoResult<()> {
    if let Some((index, value)) = seq.iter().enumerate().find(|(_, v)| v.is_nan()) {
        return Err(array_error!(
            "Array '{}' contains invalid value at index {}: {}. Only integers and floats are allowed.",
            name,
            index,
            value
        ));
    }

    for (index, pair) in seq.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(array_error!(
                "Array '{}' is not sorted. Element at index {} ({}) is less than element at index {} ({})",
                name,
                index + 1,
                pair[1],
                index,
                pair[0]
            ));
        }
    }

    Ok(())
}

/// Classic median of one non-empty sorted sequence.
fn single_median(seq: &[f64]) -> f64 {
    let n = seq.len();
    if n % 2 == 1 {
        seq[n / 2]
    } else {
        midpoint(seq[n / 2 - 1], seq[n / 2])
    }
}

/// Mean of two values. Finite operands always give a finite mean.
fn midpoint(a: f64, b: f64) -> f64 {
    a / 2.0 + b / 2.0
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::core::AlgoError;

    fn reference_median(a: &[f64], b: &[f64]) -> f64 {
        let merged = merge_sorted(a, b).unwrap();
        single_median(&merged)
    }

    fn random_sorted(rng: &mut StdRng, max_len: usize) -> Vec<f64> {
        let len = rng.gen_range(0..=max_len);
        let mut v: Vec<f64> = (0..len).map(|_| rng.gen_range(-50..50) as f64).collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn test_known_medians() {
        assert_eq!(find_median_sorted(&[1.0, 3.0], &[2.0]).unwrap(), 2.0);
        assert_eq!(find_median_sorted(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(
            find_median_sorted(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0]).unwrap(),
            3.5
        );
        assert_eq!(find_median_sorted(&[1.0, 1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap(), 1.5);
        assert_eq!(
            find_median_sorted(&[-3.0, -1.0, 0.0], &[-2.0, 1.0, 2.0]).unwrap(),
            -0.5
        );
    }

    #[test]
    fn test_one_side_empty() {
        assert_eq!(find_median_sorted(&[], &[7.0]).unwrap(), 7.0);
        assert_eq!(find_median_sorted(&[-4.5], &[]).unwrap(), -4.5);
        assert_eq!(find_median_sorted(&[], &[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert_eq!(find_median_sorted(&[1.0, 2.0, 3.0, 4.0], &[]).unwrap(), 2.5);
    }

    #[test]
    fn test_floats() {
        let median = find_median_sorted(&[1.1, 2.2, 3.3], &[1.5, 2.5, 3.5]).unwrap();
        assert!((median - 2.35).abs() < 1e-9);
    }

    #[test]
    fn test_unbalanced_lengths() {
        let long: Vec<f64> = (0..101).map(f64::from).collect();
        assert_eq!(find_median_sorted(&[1000.0], &long).unwrap(), 50.5);
        assert_eq!(find_median_sorted(&long, &[-1.0]).unwrap(), 49.5);
    }

    #[test]
    fn test_both_empty_fails() {
        let err = find_median_sorted(&[], &[]).unwrap_err();
        assert!(matches!(err, AlgoError::ArrayOperation(_)));
        assert_eq!(err.message(), "Both arrays cannot be empty");
    }

    #[test]
    fn test_nan_fails() {
        let err = find_median_sorted(&[1.0, f64::NAN], &[3.0, 4.0]).unwrap_err();
        assert!(matches!(err, AlgoError::ArrayOperation(_)));
        assert!(err.message().contains("'nums1'"));
        assert!(err.message().contains("index 1"));
    }

    #[test]
    fn test_unsorted_fails() {
        let err = find_median_sorted(&[1.0, 2.0], &[6.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(err, AlgoError::ArrayOperation(_)));
        assert!(err.message().contains("Array 'nums2' is not sorted"));
    }

    #[test]
    fn test_symmetry_and_reference_cross_check() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = random_sorted(&mut rng, 12);
            let b = random_sorted(&mut rng, 12);
            if a.is_empty() && b.is_empty() {
                continue;
            }
            let forward = find_median_sorted(&a, &b).unwrap();
            let backward = find_median_sorted(&b, &a).unwrap();
            assert_eq!(forward, backward, "a={a:?} b={b:?}");
            assert_eq!(forward, reference_median(&a, &b), "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        assert_eq!(find_median_sorted(&[f64::MAX], &[f64::MAX]).unwrap(), f64::MAX);
        assert_eq!(
            find_median_sorted(&[-f64::MAX], &[-f64::MAX]).unwrap(),
            -f64::MAX
        );
        assert_eq!(find_median_sorted(&[-f64::MAX], &[f64::MAX]).unwrap(), 0.0);
        assert_eq!(
            find_median_sorted(&[], &[1.0, f64::MAX, f64::MAX, f64::MAX]).unwrap(),
            f64::MAX
        );
        let median = find_median_sorted(&[-f64::MAX, -1e308], &[-f64::MAX, -1e308]).unwrap();
        assert!(median.is_finite());
        assert!(median < -1e308);
    }

    #[test]
    fn test_merge_sorted() {
        assert_eq!(
            merge_sorted(&[1.0, 4.0, 9.0], &[2.0, 4.0]).unwrap(),
            vec![1.0, 2.0, 4.0, 4.0, 9.0]
        );
        assert!(merge_sorted(&[], &[]).unwrap().is_empty());
        assert!(merge_sorted(&[3.0, 1.0], &[]).is_err());
    }
}
