use std::cmp::Ordering;

/// Resolve a `(start, stop, step)` selection against `count` records.
///
/// Negative bounds count from `count + 1`, so `-1` names the position just
/// past the last record. `stop` is clamped to `count`. The direction implied
/// by `start`/`stop` decides the sign of `step`; only its magnitude is taken
/// from the caller, and a zero step is treated as one. `start == stop`
/// selects nothing. Positions outside `0..count` are skipped.
pub fn resolve(
    count: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as i64;
    let mut start = start.unwrap_or(0);
    let mut stop = stop.unwrap_or(n);
    let stride = step.unwrap_or(1).unsigned_abs().clamp(1, i64::MAX as u64) as i64;

    if start < 0 {
        start = start.saturating_add(n + 1);
    }
    if stop < 0 {
        stop = stop.saturating_add(n + 1);
    }
    let forward = match stop.cmp(&start) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => return Vec::new(),
    };
    stop = stop.min(n);

    let mut out = Vec::new();
    if forward {
        // first position at or above zero on the stride
        let mut i = if start < 0 {
            start.saturating_add(div_ceil(-start, stride).saturating_mul(stride))
        } else {
            start
        };
        while i < stop && i < n {
            out.push(i as usize);
            i = match i.checked_add(stride) {
                Some(next) => next,
                None => break,
            };
        }
    } else {
        // first position at or below the last record on the stride
        let last = n - 1;
        let mut i = if start > last {
            let overshoot = div_ceil(start.saturating_sub(last), stride);
            start.saturating_sub(overshoot.saturating_mul(stride))
        } else {
            start
        };
        while i > stop && i >= 0 {
            out.push(i as usize);
            i = match i.checked_sub(stride) {
                Some(next) => next,
                None => break,
            };
        }
    }
    out
}

fn div_ceil(a: i64, b: i64) -> i64 {
    a / b + i64::from(a % b != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_everything() {
        assert_eq!(resolve(5, None, None, None), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve(0, None, None, None), Vec::<usize>::new());
    }

    #[test]
    fn test_forward_range() {
        assert_eq!(resolve(5, Some(1), Some(3), None), vec![1, 2]);
        assert_eq!(resolve(5, Some(0), Some(100), None), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve(5, None, None, Some(0)), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_direction_overrides_step_sign() {
        assert_eq!(resolve(5, Some(3), Some(0), None), vec![3, 2, 1]);
        assert_eq!(resolve(5, Some(3), Some(0), Some(1)), vec![3, 2, 1]);
        assert_eq!(resolve(5, Some(0), Some(4), Some(-2)), vec![0, 2]);
    }

    #[test]
    fn test_equal_bounds_are_empty() {
        assert!(resolve(5, Some(2), Some(2), None).is_empty());
        assert!(resolve(5, Some(-1), None, None).is_empty());
    }

    #[test]
    fn test_negative_bounds_count_from_past_the_end() {
        assert_eq!(resolve(5, Some(-2), None, None), vec![4]);
        assert_eq!(resolve(5, Some(-1), Some(0), None), vec![4, 3, 2, 1]);
        assert_eq!(resolve(5, Some(0), Some(-3), None), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_positions_skipped() {
        // 10, 7 fall past the end; 4 is the first real record on the stride
        assert_eq!(resolve(5, Some(10), Some(0), Some(3)), vec![4, 1]);
        assert_eq!(resolve(5, Some(-20), Some(3), Some(4)), vec![2]);
        assert!(resolve(5, Some(10), Some(12), None).is_empty());
    }

    #[test]
    fn test_extreme_bounds() {
        assert!(resolve(0, Some(i64::MAX), None, None).is_empty());
        assert!(resolve(0, Some(i64::MIN), Some(i64::MAX), Some(i64::MIN)).is_empty());
        // walking down from past the end toward the default stop selects nothing
        assert!(resolve(3, Some(i64::MAX), None, None).is_empty());
        assert_eq!(resolve(3, Some(i64::MAX), Some(0), None), vec![2, 1]);
        assert_eq!(resolve(3, Some(i64::MIN), None, Some(i64::MAX)), Vec::<usize>::new());
        assert_eq!(resolve(3, None, Some(i64::MIN), None), vec![0]);
    }
}
