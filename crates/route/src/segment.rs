use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Where pooled segments go when the current route does not need them.
pub const PARKED_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: -1000.0,
};

/// One straight piece of a drawn route.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Vec3,
    pub to: Vec3,
}

impl Segment {
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    pub fn parked() -> Self {
        Self::new(PARKED_POSITION, PARKED_POSITION)
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.from + self.to).scale(0.5)
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }

    pub fn direction(&self) -> Option<Vec3> {
        (self.to - self.from).normalize()
    }

    /// Unit quaternion `[x, y, z, w]` rotating +Y onto the segment direction.
    ///
    /// A cylinder mesh built along +Y, scaled to [`Segment::length`] and placed
    /// at [`Segment::midpoint`] with this rotation covers the segment.
    pub fn rotation_from_y(&self) -> [f64; 4] {
        let Some(d) = self.direction() else {
            return [0.0, 0.0, 0.0, 1.0];
        };
        let w = Vec3::Y.dot(d) + 1.0;
        if w < 1e-12 {
            // Antiparallel: any half-turn about an axis perpendicular to +Y.
            return [0.0, 0.0, 1.0, 0.0];
        }
        let axis = Vec3::Y.cross(d);
        let n = (axis.dot(axis) + w * w).sqrt();
        [axis.x / n, axis.y / n, axis.z / n, w / n]
    }
}

#[cfg(test)]
mod tests {
    use super::Segment;
    use foundation::math::Vec3;

    fn rotate(q: [f64; 4], v: Vec3) -> Vec3 {
        // v' = v + 2w(u x v) + 2(u x (u x v))
        let u = Vec3::new(q[0], q[1], q[2]);
        let t = u.cross(v).scale(2.0);
        v + t.scale(q[3]) + u.cross(t)
    }

    #[test]
    fn midpoint_and_length() {
        let s = Segment::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(6.0, 8.0, 0.0));
        assert_eq!(s.midpoint(), Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(s.length(), 10.0);
    }

    #[test]
    fn rotation_maps_y_onto_direction() {
        for to in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(3.0, -2.0, 5.0),
        ] {
            let s = Segment::new(Vec3::ZERO, to);
            let q = s.rotation_from_y();
            let got = rotate(q, Vec3::Y);
            assert!(got.approx_eq(s.direction().unwrap(), 1e-9), "{to:?} -> {got:?}");
        }
    }

    #[test]
    fn zero_length_segment_has_identity_rotation() {
        let s = Segment::parked();
        assert_eq!(s.length(), 0.0);
        assert_eq!(s.rotation_from_y(), [0.0, 0.0, 0.0, 1.0]);
    }
}
