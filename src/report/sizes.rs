//! The geometric size sequence benchmarks step through.

/// Iterator over `min, min*10, min*100, ...`, inclusive of the last value
/// that does not exceed `max`.
#[derive(Debug, Clone)]
pub struct SizeSteps {
    next: u64,
    max: u64,
}

impl SizeSteps {
    pub fn new(min: u64, max: u64) -> Self {
        Self { next: min, max }
    }
}

impl Iterator for SizeSteps {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next == 0 || self.next > self.max {
            return None;
        }
        let current = self.next;
        // A zero sentinel ends the sequence once the next step overflows
        self.next = current.checked_mul(10).unwrap_or(0);
        Some(current)
    }
}

/// Number of size magnitudes between `min` and `max`, i.e.
/// `log10(max/min) + 1` for power-of-ten ranges.
pub fn magnitude_steps(min: u64, max: u64) -> usize {
    SizeSteps::new(min, max).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_by_ten_until_exceeding_max() {
        let sizes: Vec<u64> = SizeSteps::new(1_000, 1_000_000_000).collect();
        assert_eq!(
            sizes,
            vec![
                1_000,
                10_000,
                100_000,
                1_000_000,
                10_000_000,
                100_000_000,
                1_000_000_000
            ]
        );
    }

    #[test]
    fn test_single_step_when_min_equals_max() {
        let sizes: Vec<u64> = SizeSteps::new(1_000, 1_000).collect();
        assert_eq!(sizes, vec![1_000]);
    }

    #[test]
    fn test_stops_before_non_decade_max() {
        // 10_000 would exceed 9_999, so only the first step is produced
        let sizes: Vec<u64> = SizeSteps::new(1_000, 9_999).collect();
        assert_eq!(sizes, vec![1_000]);
    }

    #[test]
    fn test_terminates_when_next_step_overflows() {
        // The step past 10^19 overflows u64; the sequence must still end
        let sizes: Vec<u64> = SizeSteps::new(10_000_000_000_000_000_000, u64::MAX).collect();
        assert_eq!(sizes, vec![10_000_000_000_000_000_000]);

        assert_eq!(SizeSteps::new(1_000, u64::MAX).count(), 17);
        assert_eq!(magnitude_steps(1, u64::MAX), 20);
    }

    #[test]
    fn test_empty_when_min_above_max() {
        assert_eq!(SizeSteps::new(10_000, 1_000).count(), 0);
    }

    #[test]
    fn test_magnitude_steps() {
        assert_eq!(magnitude_steps(1_000, 1_000_000_000), 7);
        assert_eq!(magnitude_steps(1_000, 1_000), 1);
        assert_eq!(magnitude_steps(100, 100_000), 4);
    }
}
