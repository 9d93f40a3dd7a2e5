use catalog::CityCatalog;
use foundation::ids::CityId;
use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// Pick radii of a city puck: the inner disc and its outline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PuckRadii {
    pub inner: f64,
    pub outer: f64,
}

impl PuckRadii {
    /// The outline is twice the puck radius.
    pub fn from_puck_radius(radius: f64) -> Self {
        Self {
            inner: radius,
            outer: radius * 2.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CityHit {
    pub city: CityId,
    pub distance: f64,
    pub point: Vec3,
}

/// Deterministic ray picking of city pucks.
///
/// Each puck is a disc centred on the city and facing away from the globe
/// centre.
///
/// Ordering contract:
/// - Inner discs are tested first; outer discs only if no inner disc is hit.
/// - Within a pass the closest hit wins; equal distances go to the lower id.
pub fn pick_city(catalog: &CityCatalog, ray: Ray, radii: PuckRadii) -> Option<CityHit> {
    let dir = ray.dir.normalize()?;
    nearest_disc_hit(catalog, ray.origin, dir, radii.inner)
        .or_else(|| nearest_disc_hit(catalog, ray.origin, dir, radii.outer))
}

fn nearest_disc_hit(catalog: &CityCatalog, origin: Vec3, dir: Vec3, radius: f64) -> Option<CityHit> {
    let mut best: Option<(f64, CityId)> = None;
    for city in catalog.iter() {
        let Some(normal) = city.position.normalize() else {
            continue;
        };
        let Some(t) = ray_disc_hit_t(origin, dir, city.position, normal, radius) else {
            continue;
        };
        best = match best {
            Some((bt, bid)) if t.total_cmp(&bt).then_with(|| city.id.cmp(&bid)).is_ge() => {
                Some((bt, bid))
            }
            _ => Some((t, city.id)),
        };
    }

    let (t, city) = best?;
    Some(CityHit {
        city,
        distance: t,
        point: origin + dir.scale(t),
    })
}

fn ray_disc_hit_t(origin: Vec3, dir: Vec3, center: Vec3, normal: Vec3, radius: f64) -> Option<f64> {
    let denom = dir.dot(normal);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (center - origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    let point = origin + dir.scale(t);
    (point.distance(center) <= radius).then_some(t)
}
