use catalog::City;
use foundation::ids::CityId;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Colors as `0xRRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub idle: u32,
    pub outline: u32,
    pub path: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle: 0xffddbb,
            outline: 0x398464,
            path: 0x88722e,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStyle {
    Idle,
    /// Raised slightly off the globe and drawn in the path color.
    Selected,
}

/// Where and how to draw one city's puck.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub city: CityId,
    pub position: Vec3,
    pub color: u32,
    pub style: MarkerStyle,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerPlacement {
    pub globe_radius: f64,
    /// Radial scale for selected markers, e.g. `1.0001`.
    pub lift: f64,
    pub palette: Palette,
}

impl MarkerPlacement {
    /// Projects the city onto the globe (raised when selected).
    ///
    /// A city at the origin has no outward direction and gets no marker.
    pub fn place(&self, city: &City, style: MarkerStyle) -> Option<Marker> {
        let outward = city.position.normalize()?;
        let (radius, color) = match style {
            MarkerStyle::Idle => (self.globe_radius, self.palette.idle),
            MarkerStyle::Selected => (self.globe_radius * self.lift, self.palette.path),
        };
        Some(Marker {
            city: city.id,
            position: outward.scale(radius),
            color,
            style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerPlacement, MarkerStyle, Palette};
    use catalog::City;
    use foundation::ids::CityId;
    use foundation::math::Vec3;

    fn placement() -> MarkerPlacement {
        MarkerPlacement {
            globe_radius: 500.0,
            lift: 1.0001,
            palette: Palette::default(),
        }
    }

    #[test]
    fn selected_markers_are_raised() {
        let city = City {
            id: CityId(3),
            position: Vec3::new(0.0, 500.0, 0.0),
        };
        let idle = placement().place(&city, MarkerStyle::Idle).unwrap();
        let raised = placement().place(&city, MarkerStyle::Selected).unwrap();

        assert!(idle.position.approx_eq(Vec3::new(0.0, 500.0, 0.0), 1e-9));
        assert!(raised.position.approx_eq(Vec3::new(0.0, 500.05, 0.0), 1e-9));
        assert_eq!(idle.color, 0xffddbb);
        assert_eq!(raised.color, 0x88722e);
        assert_eq!(raised.city, CityId(3));
    }

    #[test]
    fn origin_has_no_marker() {
        let city = City {
            id: CityId(0),
            position: Vec3::ZERO,
        };
        assert!(placement().place(&city, MarkerStyle::Selected).is_none());
    }
}
