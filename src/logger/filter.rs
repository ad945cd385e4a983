use crate::types::Level;

/// A call at `level` goes out only if it is at or below `threshold` and
/// there is somewhere to write it.
#[inline]
pub fn should_log(level: Level, threshold: Level, has_destination: bool) -> bool {
    has_destination && level <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_or_below_threshold_passes() {
        assert!(should_log(0, 2, true));
        assert!(should_log(2, 2, true));
        assert!(!should_log(3, 2, true));
    }

    #[test]
    fn no_destination_rejects_everything() {
        for level in 0..8 {
            assert!(!should_log(level, Level::MAX, false));
        }
    }

    #[test]
    fn zero_threshold_only_admits_zero() {
        assert!(should_log(0, 0, true));
        assert!(!should_log(1, 0, true));
    }
}
