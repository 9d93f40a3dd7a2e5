use catalog::{CatalogError, City};
use engine::{EngineError, FixtureEngine, NativeEngine, OutSlots, TrackingAllocator};
use foundation::ids::CityId;
use foundation::math::Vec3;
use foundation::time::Millis;
use planner::{MapSession, NullRenderer, Renderer, SelectionChange, SessionConfig, SessionError};
use pretty_assertions::assert_eq;
use scene::{Marker, MarkerStyle, Ray};

const DEMO: &str = include_str!("../fixtures/demo.json");

#[derive(Debug, Clone, PartialEq)]
enum Event {
    CatalogReady(usize),
    Segment(usize, Vec3, Vec3),
    Parked(usize),
    Selection(SelectionChange),
    Repaint,
}

#[derive(Debug, Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn segments(events: &[Event]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Segment(i, _, _) => Some(*i),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for Recorder {
    fn on_catalog_ready(&mut self, cities: &[City], markers: &[Marker]) {
        assert_eq!(cities.len(), markers.len());
        assert!(markers.iter().all(|m| m.style == MarkerStyle::Idle));
        self.events.push(Event::CatalogReady(cities.len()));
    }

    fn on_path_segment(&mut self, index: usize, from: Vec3, to: Vec3) {
        self.events.push(Event::Segment(index, from, to));
    }

    fn on_segment_parked(&mut self, index: usize) {
        self.events.push(Event::Parked(index));
    }

    fn on_selection_changed(&mut self, change: &SelectionChange) {
        self.events.push(Event::Selection(change.clone()));
    }

    fn request_repaint(&mut self) {
        self.events.push(Event::Repaint);
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        step_ms: 100,
        ..SessionConfig::default()
    }
}

fn session() -> MapSession<FixtureEngine, Recorder> {
    let engine = FixtureEngine::from_json(DEMO).unwrap();
    MapSession::start(engine, Recorder::default(), config()).unwrap()
}

fn ids(v: &[u32]) -> Vec<CityId> {
    v.iter().copied().map(CityId).collect()
}

#[test]
fn start_publishes_the_catalog() {
    let mut s = session();
    assert_eq!(s.catalog().len(), 6);
    assert_eq!(
        s.catalog().position(CityId(1)).unwrap(),
        Vec3::new(0.0, 500.0, 0.0)
    );
    assert_eq!(s.renderer_mut().take(), vec![Event::CatalogReady(6)]);
}

#[test]
fn third_click_evicts_the_oldest_and_lowers_its_marker() {
    let mut s = session();
    s.renderer_mut().take();

    let first = s.click(CityId(0), Millis(0)).unwrap();
    assert_eq!(first.route, None);
    assert_eq!(s.selection().ids(), &ids(&[0])[..]);

    let second = s.click(CityId(3), Millis(0)).unwrap();
    assert_eq!(second.route, Some(ids(&[0, 1, 2, 3])));
    assert_eq!(second.segments, 3);

    let third = s.click(CityId(5), Millis(0)).unwrap();
    assert_eq!(third.evicted, Some(CityId(0)));
    assert_eq!(s.selection().ids(), &ids(&[3, 5])[..]);

    let changes: Vec<SelectionChange> = s
        .renderer_mut()
        .take()
        .into_iter()
        .filter_map(|e| match e {
            Event::Selection(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(changes.len(), 3);
    let last = &changes[2];
    assert_eq!(last.selected, CityId(5));
    assert_eq!(last.evicted, Some(CityId(0)));
    let raised = last.raised.unwrap();
    assert_eq!(raised.style, MarkerStyle::Selected);
    assert!(raised.position.approx_eq(Vec3::new(0.0, 0.0, -500.05), 1e-9));
    let lowered = last.lowered.unwrap();
    assert_eq!(lowered.city, CityId(0));
    assert!(lowered.position.approx_eq(Vec3::new(500.0, 0.0, 0.0), 1e-9));
}

#[test]
fn route_is_revealed_one_segment_per_step() {
    let mut s = session();
    s.click(CityId(0), Millis(0)).unwrap();
    s.click(CityId(3), Millis(1000)).unwrap();
    s.renderer_mut().take();

    assert_eq!(s.advance(Millis(1099)), 0);
    assert_eq!(s.advance(Millis(1100)), 1);
    assert_eq!(s.advance(Millis(1300)), 2);

    let events = s.renderer_mut().take();
    assert_eq!(Recorder::segments(&events), vec![0, 1, 2]);
    assert_eq!(events.iter().filter(|e| **e == Event::Repaint).count(), 3);
    assert_eq!(
        events[0],
        Event::Segment(0, Vec3::new(500.0, 0.0, 0.0), Vec3::new(0.0, 500.0, 0.0))
    );
}

#[test]
fn rapid_reselection_discards_the_older_reveal() {
    let mut s = session();
    s.click(CityId(0), Millis(0)).unwrap();
    s.click(CityId(3), Millis(0)).unwrap();
    assert_eq!(s.advance(Millis(100)), 1);

    // New pair (3, 0) before the first reveal finishes.
    s.click(CityId(0), Millis(150)).unwrap();
    s.renderer_mut().take();

    s.advance(Millis(10_000));
    let events = s.renderer_mut().take();
    // Only the two segments of 3 -> 4 -> 0 are drawn.
    assert_eq!(Recorder::segments(&events), vec![0, 1]);
    assert_eq!(
        events[0],
        Event::Segment(0, Vec3::new(-500.0, 0.0, 0.0), Vec3::new(0.0, -500.0, 0.0))
    );
    assert_eq!(s.animation().pending(), 0);
}

#[test]
fn repeated_waypoints_are_drawn_once() {
    let mut s = session();
    s.click(CityId(1), Millis(0)).unwrap();
    let outcome = s.click(CityId(5), Millis(0)).unwrap();
    assert_eq!(outcome.route, Some(ids(&[1, 2, 2, 5])));
    assert_eq!(outcome.segments, 2);
}

#[test]
fn shorter_route_parks_the_surplus() {
    let mut s = session();
    s.click(CityId(0), Millis(0)).unwrap();
    s.click(CityId(3), Millis(0)).unwrap();
    s.advance(Millis(1000));
    s.renderer_mut().take();

    // Same city twice: degenerate single-stop route, nothing left to draw.
    s.click(CityId(3), Millis(2000)).unwrap();
    let outcome_events = s.renderer_mut().take();
    let parked: Vec<usize> = outcome_events
        .iter()
        .filter_map(|e| match e {
            Event::Parked(i) => Some(*i),
            _ => None,
        })
        .collect();
    assert_eq!(parked, vec![0, 1, 2]);
    assert_eq!(s.animation().pool().visible_count(), 0);
}

#[test]
fn repeated_city_stays_selected_when_one_copy_is_evicted() {
    let mut s = session();
    s.click(CityId(2), Millis(0)).unwrap();
    s.click(CityId(2), Millis(0)).unwrap();
    let outcome = s.click(CityId(4), Millis(0)).unwrap();
    assert_eq!(outcome.evicted, None);
    assert!(s.selection().contains(CityId(2)));
}

#[test]
fn unknown_city_is_rejected_without_touching_selection() {
    let mut s = session();
    assert_eq!(
        s.click(CityId(42), Millis(0)).unwrap_err(),
        SessionError::Catalog(CatalogError::UnknownCity(CityId(42)))
    );
    assert!(s.selection().is_empty());
}

#[test]
fn click_by_ray_picks_the_puck() {
    let mut s = session();
    let ray = Ray::new(Vec3::new(0.0, 1000.0, 1.0), Vec3::new(0.0, -1.0, 0.0));
    let outcome = s.click_ray(ray, Millis(0)).unwrap();
    assert!(outcome.is_some());
    assert_eq!(s.selection().ids(), &ids(&[1])[..]);

    let miss = Ray::new(Vec3::new(0.0, 1000.0, 50.0), Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(s.click_ray(miss, Millis(0)).unwrap(), None);
    assert_eq!(s.selection().len(), 1);
}

#[test]
fn names_are_fetched_once() {
    let engine = FixtureEngine::from_json(DEMO).unwrap();
    let mut s = MapSession::start(engine, NullRenderer, config()).unwrap();
    let calls = s.engine().calls();

    assert_eq!(s.city_name(CityId(2)).unwrap(), "Perth");
    assert_eq!(s.city_name(CityId(2)).unwrap(), "Perth");
    assert_eq!(s.engine().calls(), calls + 1);
    assert!(s.city_name(CityId(99)).is_err());
}

/// Fixture engine whose routes come back with a fractional index.
struct Garbled(FixtureEngine);

impl NativeEngine for Garbled {
    unsafe fn airport_xyz(&mut self, out: OutSlots) {
        unsafe { self.0.airport_xyz(out) }
    }

    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32) {
        unsafe { out.write_all(&[f64::from(source), 2.5, f64::from(dest)]) }
    }

    unsafe fn city_name(&mut self, out: OutSlots, city: i32) {
        unsafe { self.0.city_name(out, city) }
    }
}

#[test]
fn engine_failure_abandons_only_the_current_render() {
    let engine = Garbled(FixtureEngine::from_json(DEMO).unwrap());
    let mut s = MapSession::start(engine, Recorder::default(), config()).unwrap();
    s.click(CityId(0), Millis(0)).unwrap();

    let err = s.click(CityId(3), Millis(0)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Engine(EngineError::NonIntegral { index: 1, .. })
    ));
    // The click still counts; nothing was scheduled.
    assert!(s.selection().is_pair_complete());
    assert_eq!(s.animation().generation(), 0);
    assert_eq!(s.advance(Millis(10_000)), 0);
}

/// Fixture engine whose routes into one destination come back garbled.
struct BrokenTowards {
    inner: FixtureEngine,
    dest: i32,
}

impl NativeEngine for BrokenTowards {
    unsafe fn airport_xyz(&mut self, out: OutSlots) {
        unsafe { self.inner.airport_xyz(out) }
    }

    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32) {
        if dest == self.dest {
            unsafe { out.write_all(&[f64::from(source), 0.5, f64::from(dest)]) }
        } else {
            unsafe { self.inner.path_out_real(out, source, dest) }
        }
    }

    unsafe fn city_name(&mut self, out: OutSlots, city: i32) {
        unsafe { self.inner.city_name(out, city) }
    }
}

#[test]
fn failed_reselection_lets_the_previous_reveal_finish() {
    let engine = BrokenTowards {
        inner: FixtureEngine::from_json(DEMO).unwrap(),
        dest: 5,
    };
    let mut s = MapSession::start(engine, Recorder::default(), config()).unwrap();
    s.click(CityId(0), Millis(0)).unwrap();
    s.click(CityId(3), Millis(0)).unwrap();
    assert_eq!(s.advance(Millis(100)), 1);

    // 3 -> 5 fails while segments 1 and 2 of 0 -> 3 are still queued.
    let err = s.click(CityId(5), Millis(150)).unwrap_err();
    assert!(matches!(err, SessionError::Engine(EngineError::NonIntegral { .. })));
    assert_eq!(s.selection().ids(), &ids(&[3, 5])[..]);
    assert_eq!(s.animation().generation(), 1);
    s.renderer_mut().take();

    assert_eq!(s.advance(Millis(1000)), 2);
    let events = s.renderer_mut().take();
    assert_eq!(Recorder::segments(&events), vec![1, 2]);
    assert_eq!(events.last(), Some(&Event::Repaint));
    assert!(events.contains(&Event::Segment(
        2,
        Vec3::new(0.0, 0.0, 500.0),
        Vec3::new(-500.0, 0.0, 0.0)
    )));
    assert_eq!(s.animation().pool().visible_count(), 3);
}

#[test]
fn catalog_that_overflows_the_buffer_fails_to_start() {
    let engine = FixtureEngine::from_json(DEMO).unwrap();
    let config = SessionConfig {
        buffer_rows: 4,
        buffer_cols: 4,
        ..SessionConfig::default()
    };
    let err = MapSession::start(engine, NullRenderer, config).err().unwrap();
    assert_eq!(
        err,
        SessionError::Engine(EngineError::Corruption {
            reported: 18,
            capacity: 16
        })
    );
}

#[test]
fn dropping_the_session_releases_foreign_memory() {
    let alloc = TrackingAllocator::new();
    let engine = FixtureEngine::from_json(DEMO).unwrap();
    let mut s =
        MapSession::start_with_allocator(engine, NullRenderer, config(), alloc.clone()).unwrap();
    s.click(CityId(0), Millis(0)).unwrap();
    s.click(CityId(3), Millis(0)).unwrap();
    assert_eq!(alloc.live_allocations(), 2);

    drop(s);
    assert_eq!(alloc.live_allocations(), 0);
    assert_eq!(alloc.live_bytes(), 0);
}
