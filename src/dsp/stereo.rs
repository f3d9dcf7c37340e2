//! Mid/side stereo width for the wet path

/// Rescale the side component of a wet stereo pair
///
/// `width = 0` collapses to mono, `width = 1` keeps the spread produced
/// by the two independent channel banks.
#[inline]
pub fn apply_width(left: f32, right: f32, width: f32) -> (f32, f32) {
    let mid = 0.5 * (left + right);
    let side = 0.5 * (left - right);
    (mid + side * width, mid - side * width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(0.7, -0.2 ; "opposite signs")]
    #[test_case(0.25, 0.25 ; "already mono")]
    #[test_case(-1.0, 0.0 ; "one side silent")]
    fn test_zero_width_is_mono(left: f32, right: f32) {
        let (l, r) = apply_width(left, right, 0.0);
        assert_eq!(l, r);
        assert_relative_eq!(l, 0.5 * (left + right));
    }

    #[test]
    fn test_full_width_preserves_channels() {
        let (l, r) = apply_width(0.75, -0.25, 1.0);
        assert_relative_eq!(l, 0.75);
        assert_relative_eq!(r, -0.25);
    }

    #[test]
    fn test_half_width_narrows() {
        let (l, r) = apply_width(1.0, 0.0, 0.5);
        assert_relative_eq!(l, 0.75);
        assert_relative_eq!(r, 0.25);
    }
}
