use foundation::math::Vec3;

/// Drops every point equal to the one before it.
///
/// The engine may repeat a waypoint; drawing a zero-length segment for it
/// would leave a gap in the reveal timing and a degenerate cylinder.
pub fn collapse_repeats(points: &[Vec3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::collapse_repeats;
    use foundation::math::Vec3;

    #[test]
    fn collapses_only_consecutive_repeats() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(collapse_repeats(&[a, b, b, c]), vec![a, b, c]);
        assert_eq!(collapse_repeats(&[a, b, a]), vec![a, b, a]);
        assert_eq!(collapse_repeats(&[a, a, a]), vec![a]);
        assert!(collapse_repeats(&[]).is_empty());
    }
}
