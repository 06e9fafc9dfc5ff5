//! Running totals per action.

/// Add two times, returning `None` if the sum is not representable as `i64`.
///
/// The sum is formed in `i128`, which cannot overflow for two `i64`
/// operands, and then narrowed.
///
/// # Example
/// ```
/// use action_tally::checked_accumulate;
///
/// assert_eq!(checked_accumulate(100, 50), Some(150));
/// assert_eq!(checked_accumulate(i64::MAX, 1), None);
/// assert_eq!(checked_accumulate(i64::MAX - 1, 1), Some(i64::MAX));
/// ```
pub fn checked_accumulate(total: i64, time: i64) -> Option<i64> {
    let sum = i128::from(total) + i128::from(time);
    i64::try_from(sum).ok()
}

/// Accumulated state for one action.
///
/// `count` is at least 1 for any entry held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyEntry {
    /// Sum of all accepted times
    pub total_time: i64,
    /// Number of accepted events
    pub count: u64,
}

impl TallyEntry {
    /// Entry for the first occurrence of an action.
    pub fn first(time: i64) -> Self {
        Self {
            total_time: time,
            count: 1,
        }
    }

    /// Entry restored verbatim from a snapshot.
    pub fn from_parts(total_time: i64, count: u64) -> Self {
        Self { total_time, count }
    }

    /// The entry after one more occurrence, or `None` on overflow.
    ///
    /// `self` is never modified, so a failed accumulation leaves the stored
    /// entry as it was.
    pub fn accumulate(&self, time: i64) -> Option<Self> {
        Some(Self {
            total_time: checked_accumulate(self.total_time, time)?,
            count: self.count.checked_add(1)?,
        })
    }

    /// Average time per event, truncated toward zero.
    pub fn average(&self) -> i64 {
        // |quotient| <= |total_time| since count >= 1, so it fits in i64.
        (i128::from(self.total_time) / i128::from(self.count.max(1))) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accumulate_bounds() {
        assert_eq!(checked_accumulate(0, 0), Some(0));
        assert_eq!(checked_accumulate(i64::MAX, 0), Some(i64::MAX));
        assert_eq!(checked_accumulate(i64::MAX, 1), None);
        assert_eq!(checked_accumulate(1 << 62, 1 << 62), None);
        assert_eq!(checked_accumulate((1 << 62) - 1, 1 << 62), Some(i64::MAX));
        assert_eq!(checked_accumulate(i64::MIN, -1), None);
        assert_eq!(checked_accumulate(-5, 3), Some(-2));
    }

    #[test]
    fn test_accumulate() {
        let entry = TallyEntry::first(100);
        let entry = entry.accumulate(200).unwrap();
        assert_eq!(entry, TallyEntry::from_parts(300, 2));
        assert_eq!(entry.average(), 150);
    }

    #[test]
    fn test_accumulate_overflow_leaves_entry() {
        let entry = TallyEntry::first(i64::MAX - 10);
        assert!(entry.accumulate(11).is_none());
        assert_eq!(entry, TallyEntry::first(i64::MAX - 10));
        assert!(entry.accumulate(10).is_some());
    }

    #[test]
    fn test_count_overflow() {
        let entry = TallyEntry::from_parts(0, u64::MAX);
        assert!(entry.accumulate(0).is_none());
    }

    #[test]
    fn test_average_truncates() {
        assert_eq!(TallyEntry::from_parts(10, 3).average(), 3);
        assert_eq!(TallyEntry::from_parts(-10, 3).average(), -3);
        assert_eq!(TallyEntry::from_parts(75, 1).average(), 75);
    }

    #[test]
    fn test_average_with_count_beyond_i64() {
        assert_eq!(TallyEntry::from_parts(i64::MAX, 1 << 63).average(), 0);
        assert_eq!(TallyEntry::from_parts(i64::MIN, 1 << 63).average(), -1);
        assert_eq!(TallyEntry::from_parts(i64::MAX, u64::MAX).average(), 0);
        assert_eq!(TallyEntry::from_parts(i64::MAX, 1).average(), i64::MAX);
    }
}
