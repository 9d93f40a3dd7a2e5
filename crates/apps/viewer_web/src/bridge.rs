use catalog::City;
use foundation::ids::CityId;
use foundation::math::Vec3;
use js_sys::{Array, Function, Reflect};
use planner::{Renderer, SelectionChange};
use route::{PARKED_POSITION, Segment};
use scene::{Marker, Palette};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Everything a cylinder mesh needs to span one route segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPayload {
    pub index: usize,
    pub from: Vec3,
    pub to: Vec3,
    pub midpoint: Vec3,
    pub length: f64,
    /// Quaternion `[x, y, z, w]` taking +Y onto the segment direction.
    pub rotation: [f64; 4],
    pub radius: f64,
    pub color: u32,
}

impl SegmentPayload {
    pub fn new(index: usize, segment: Segment, radius: f64, color: u32) -> Self {
        Self {
            index,
            from: segment.from,
            to: segment.to,
            midpoint: segment.midpoint(),
            length: segment.length(),
            rotation: segment.rotation_from_y(),
            radius,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPayload {
    pub selected: CityId,
    pub evicted: Option<CityId>,
    pub raised: Option<Marker>,
    pub lowered: Option<Marker>,
    pub outline: u32,
}

impl SelectionPayload {
    pub fn new(change: &SelectionChange, palette: Palette) -> Self {
        Self {
            selected: change.selected,
            evicted: change.evicted,
            raised: change.raised,
            lowered: change.lowered,
            outline: palette.outline,
        }
    }
}

pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

fn log_js_error(method: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(&format!("renderer.{method} failed:")), err);
}

/// [`Renderer`] backed by a JavaScript object.
///
/// Methods are looked up by name on every call. `onSegmentParked` and
/// `requestRepaint` are optional. Callbacks run while the session is borrowed
/// and must not call back into this module.
pub struct JsRenderer {
    target: JsValue,
    path_radius: f64,
    palette: Palette,
}

impl JsRenderer {
    pub fn new(target: JsValue, path_radius: f64, palette: Palette) -> Self {
        Self {
            target,
            path_radius,
            palette,
        }
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        if let Err(err) = self.try_call(method, args) {
            log_js_error(method, &err);
        }
    }

    fn try_call(&self, method: &str, args: &[JsValue]) -> Result<(), JsValue> {
        let value = Reflect::get(&self.target, &JsValue::from_str(method))?;
        if value.is_undefined() {
            return Ok(());
        }
        let func: Function = value.dyn_into()?;
        func.apply(&self.target, &args.iter().collect::<Array>())?;
        Ok(())
    }

    fn call_with<T: Serialize>(&self, method: &str, payload: &T) {
        match to_js(payload) {
            Ok(arg) => self.call(method, &[arg]),
            Err(err) => log_js_error(method, &err),
        }
    }
}

#[derive(Serialize)]
struct CatalogPayload<'a> {
    cities: &'a [City],
    markers: &'a [Marker],
}

#[derive(Serialize)]
struct ParkedPayload {
    index: usize,
    position: Vec3,
}

impl Renderer for JsRenderer {
    fn on_catalog_ready(&mut self, cities: &[City], markers: &[Marker]) {
        self.call_with("onCatalogReady", &CatalogPayload { cities, markers });
    }

    fn on_path_segment(&mut self, index: usize, from: Vec3, to: Vec3) {
        let payload = SegmentPayload::new(
            index,
            Segment::new(from, to),
            self.path_radius,
            self.palette.path,
        );
        self.call_with("onPathSegment", &payload);
    }

    fn on_segment_parked(&mut self, index: usize) {
        self.call_with(
            "onSegmentParked",
            &ParkedPayload {
                index,
                position: PARKED_POSITION,
            },
        );
    }

    fn on_selection_changed(&mut self, change: &SelectionChange) {
        self.call_with("onSelectionChanged", &SelectionPayload::new(change, self.palette));
    }

    fn request_repaint(&mut self) {
        self.call("requestRepaint", &[]);
    }
}
