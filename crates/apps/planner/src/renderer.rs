use catalog::City;
use foundation::ids::CityId;
use foundation::math::Vec3;
use scene::Marker;

/// Marker updates caused by one click.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub selected: CityId,
    /// City that left the selection, if any. Not reported while the same city
    /// still fills the other slot.
    pub evicted: Option<CityId>,
    /// Raised marker for `selected`.
    pub raised: Option<Marker>,
    /// Lowered marker for `evicted`.
    pub lowered: Option<Marker>,
}

/// Presentation layer driven by [`crate::MapSession`].
///
/// Scene construction, camera and meshes live behind this trait.
pub trait Renderer {
    fn on_catalog_ready(&mut self, cities: &[City], markers: &[Marker]);

    /// Segment `index` of the pool now spans `from..to`.
    fn on_path_segment(&mut self, index: usize, from: Vec3, to: Vec3);

    /// Segment `index` was moved out of view for reuse.
    fn on_segment_parked(&mut self, _index: usize) {}

    fn on_selection_changed(&mut self, change: &SelectionChange);

    fn request_repaint(&mut self) {}
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_catalog_ready(&mut self, _cities: &[City], _markers: &[Marker]) {}

    fn on_path_segment(&mut self, _index: usize, _from: Vec3, _to: Vec3) {}

    fn on_selection_changed(&mut self, _change: &SelectionChange) {}
}
