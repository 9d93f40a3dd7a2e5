use console_error_panic_hook::set_once;
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use engine::{FixtureEngine, NativeEngine};
use foundation::ids::CityId;
use foundation::math::Vec3;
use foundation::time::Millis;
use planner::{ClickOutcome, MapSession, SessionConfig, SessionError};
use scene::Ray;

mod bridge;
mod slot;
pub use bridge::{JsRenderer, SegmentPayload, SelectionPayload};
use bridge::to_js;
use slot::{replace_slot, with_slot};

type WebSession = MapSession<Box<dyn NativeEngine>, JsRenderer>;

thread_local! {
    static SESSION: RefCell<Option<WebSession>> = const { RefCell::new(None) };
}

#[derive(Serialize)]
struct ClickPayload {
    city: CityId,
    evicted: Option<CityId>,
    route: Option<Vec<CityId>>,
    segments: usize,
}

impl ClickPayload {
    fn new(city: CityId, outcome: ClickOutcome) -> Self {
        Self {
            city,
            evicted: outcome.evicted,
            route: outcome.route,
            segments: outcome.segments,
        }
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.to_string())
}

fn clock(now_ms: f64) -> Millis {
    Millis(now_ms.max(0.0) as u64)
}

fn load_config(config_json: Option<String>) -> Result<SessionConfig, SessionError> {
    match config_json {
        Some(json) => SessionConfig::from_json(&json),
        None => Ok(SessionConfig::default()),
    }
}

fn install(
    engine: Box<dyn NativeEngine>,
    renderer: JsValue,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let config = load_config(config_json).map_err(js_error)?;
    let renderer = JsRenderer::new(renderer, config.path_radius, config.palette);
    // Dropping the previous session releases its foreign buffer first.
    let previous = SESSION.with(|slot| replace_slot(slot, None)).map_err(js_error)?;
    drop(previous);
    let session = MapSession::start(engine, renderer, config).map_err(js_error)?;
    web_sys::console::log_1(&JsValue::from_str(&format!(
        "map session ready with {} cities",
        session.catalog().len()
    )));
    SESSION
        .with(|slot| replace_slot(slot, Some(session)))
        .map_err(js_error)?;
    Ok(())
}

fn with_session<T>(
    f: impl FnOnce(&mut WebSession) -> Result<T, SessionError>,
) -> Result<T, JsValue> {
    SESSION
        .with(|slot| with_slot(slot, f))
        .map_err(js_error)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Starts a session backed by a JSON engine fixture.
///
/// `renderer` is a JS object with `onCatalogReady`, `onPathSegment` and
/// `onSelectionChanged` methods, plus optional `onSegmentParked` and
/// `requestRepaint`.
#[wasm_bindgen]
pub fn start_fixture_session(
    renderer: JsValue,
    fixture_json: &str,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let engine = FixtureEngine::from_json(fixture_json)
        .map_err(|e| js_error(SessionError::Engine(e)))?;
    install(Box::new(engine), renderer, config_json)
}

/// Starts a session backed by the natively linked path engine.
#[cfg(feature = "linked-engine")]
#[wasm_bindgen]
pub fn start_linked_session(renderer: JsValue, config_json: Option<String>) -> Result<(), JsValue> {
    install(Box::new(engine::LinkedEngine::new()), renderer, config_json)
}

/// Clicks `city` at `now_ms` (the page clock). Returns the click outcome.
#[wasm_bindgen]
pub fn click_city(city: u32, now_ms: f64) -> Result<JsValue, JsValue> {
    let city = CityId(city);
    let outcome = with_session(|s| s.click(city, clock(now_ms)))?;
    to_js(&ClickPayload::new(city, outcome))
}

/// Picks a city puck along a world-space ray and clicks it.
///
/// Returns `null` when the ray hits nothing.
#[wasm_bindgen]
pub fn pick_at(
    origin_x: f64,
    origin_y: f64,
    origin_z: f64,
    dir_x: f64,
    dir_y: f64,
    dir_z: f64,
    now_ms: f64,
) -> Result<JsValue, JsValue> {
    let ray = Ray::new(
        Vec3::new(origin_x, origin_y, origin_z),
        Vec3::new(dir_x, dir_y, dir_z),
    );
    let now = clock(now_ms);
    let picked = with_session(|s| {
        let Some(outcome) = s.click_ray(ray, now)? else {
            return Ok(None);
        };
        // The picked city is always the newest selection entry.
        let city = s.selection().ids().last().copied();
        Ok(city.map(|city| ClickPayload::new(city, outcome)))
    })?;
    match picked {
        Some(payload) => to_js(&payload),
        None => Ok(JsValue::NULL),
    }
}

/// Fires every segment reveal due at `now_ms`. Returns how many were drawn.
#[wasm_bindgen]
pub fn advance_clock(now_ms: f64) -> Result<u32, JsValue> {
    let drawn = with_session(|s| Ok(s.advance(clock(now_ms))))?;
    Ok(u32::try_from(drawn).unwrap_or(u32::MAX))
}

#[wasm_bindgen]
pub fn city_name(city: u32) -> Result<String, JsValue> {
    with_session(|s| s.city_name(CityId(city)))
}

#[wasm_bindgen]
pub fn catalog_json() -> Result<String, JsValue> {
    with_session(|s| Ok(s.catalog().to_json()))
}
