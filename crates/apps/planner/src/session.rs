use std::collections::BTreeMap;

use catalog::{CatalogError, CityCatalog};
use engine::{ForeignAllocator, NativeEngine, NativeEngineAdapter, SystemAllocator};
use foundation::ids::CityId;
use foundation::time::Millis;
use route::{PathAnimation, RenderPlan};
use scene::{Marker, MarkerPlacement, MarkerStyle, Ray, SelectionState, pick_city};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::renderer::{Renderer, SelectionChange};

/// What a click did.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub evicted: Option<CityId>,
    /// Route fetched for the completed pair, if the click completed one.
    pub route: Option<Vec<CityId>>,
    /// Segments scheduled for reveal.
    pub segments: usize,
}

/// One map instance: engine bridge, catalog, selection and route animation.
///
/// All state is owned here and mutated only through `&mut self`, which keeps
/// native calls from overlapping on the shared buffer.
pub struct MapSession<E, R, A: ForeignAllocator = SystemAllocator> {
    config: SessionConfig,
    adapter: NativeEngineAdapter<E, A>,
    catalog: CityCatalog,
    selection: SelectionState,
    animation: PathAnimation,
    placement: MarkerPlacement,
    names: BTreeMap<CityId, String>,
    renderer: R,
}

impl<E: NativeEngine, R: Renderer> MapSession<E, R, SystemAllocator> {
    pub fn start(engine: E, renderer: R, config: SessionConfig) -> Result<Self, SessionError> {
        Self::start_with_allocator(engine, renderer, config, SystemAllocator)
    }
}

impl<E: NativeEngine, R: Renderer, A: ForeignAllocator> MapSession<E, R, A> {
    /// Acquires the foreign buffer, loads the catalog and hands it to the renderer.
    pub fn start_with_allocator(
        engine: E,
        mut renderer: R,
        config: SessionConfig,
        allocator: A,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let mut adapter = NativeEngineAdapter::with_allocator(
            engine,
            config.buffer_capacity(),
            config.globe_radius,
            allocator,
        )?;
        let catalog = CityCatalog::from_positions(adapter.load_catalog()?)?;
        let placement = config.marker_placement();

        let markers: Vec<Marker> = catalog
            .iter()
            .filter_map(|city| placement.place(city, MarkerStyle::Idle))
            .collect();
        tracing::info!(cities = catalog.len(), "catalog ready");
        renderer.on_catalog_ready(catalog.cities(), &markers);

        Ok(Self {
            animation: PathAnimation::new(config.step_ms),
            config,
            adapter,
            catalog,
            selection: SelectionState::new(),
            placement,
            names: BTreeMap::new(),
            renderer,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn animation(&self) -> &PathAnimation {
        &self.animation
    }

    pub fn engine(&self) -> &E {
        self.adapter.engine()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Handles a click on `city` at time `now`.
    ///
    /// The selection always updates. If the pair is complete the route is
    /// fetched and its reveal scheduled; an engine or catalog failure abandons
    /// only this render and leaves what is on screen untouched.
    pub fn click(&mut self, city: CityId, now: Millis) -> Result<ClickOutcome, SessionError> {
        if !self.catalog.contains(city) {
            return Err(CatalogError::UnknownCity(city).into());
        }

        let evicted = self
            .selection
            .record_click(city)
            .filter(|id| !self.selection.contains(*id));
        self.notify_selection(city, evicted);

        let Some((source, dest)) = self.selection.pair() else {
            return Ok(ClickOutcome {
                evicted,
                route: None,
                segments: 0,
            });
        };

        let (route, plan) = self.render_route(source, dest, now).inspect_err(|e| {
            tracing::warn!(%source, %dest, error = %e, "abandoning route render");
        })?;

        Ok(ClickOutcome {
            evicted,
            route: Some(route),
            segments: plan.segments,
        })
    }

    /// Picks the city under `ray` and clicks it. A miss is ignored.
    pub fn click_ray(&mut self, ray: Ray, now: Millis) -> Result<Option<ClickOutcome>, SessionError> {
        let Some(hit) = pick_city(&self.catalog, ray, self.config.puck_radii()) else {
            return Ok(None);
        };
        self.click(hit.city, now).map(Some)
    }

    /// Fires due segment tasks. Returns how many segments were drawn.
    pub fn advance(&mut self, now: Millis) -> usize {
        let mut drawn = 0;
        for fired in self.animation.advance(now) {
            let Some(draw) = fired.drawn() else {
                continue;
            };
            self.renderer
                .on_path_segment(draw.index, draw.segment.from, draw.segment.to);
            self.renderer.request_repaint();
            drawn += 1;
        }
        drawn
    }

    /// Display name of `city`, fetched from the engine once and then cached.
    pub fn city_name(&mut self, city: CityId) -> Result<String, SessionError> {
        if !self.catalog.contains(city) {
            return Err(CatalogError::UnknownCity(city).into());
        }
        if let Some(name) = self.names.get(&city) {
            return Ok(name.clone());
        }
        let name = self.adapter.lookup_name(city)?;
        self.names.insert(city, name.clone());
        Ok(name)
    }

    fn render_route(
        &mut self,
        source: CityId,
        dest: CityId,
        now: Millis,
    ) -> Result<(Vec<CityId>, RenderPlan), SessionError> {
        let route = self.adapter.query_path(source, dest)?;
        let plan = self.animation.begin_render(&self.catalog, &route, now)?;
        for &index in &plan.pool.parked {
            self.renderer.on_segment_parked(index);
        }
        Ok((route, plan))
    }

    fn notify_selection(&mut self, selected: CityId, evicted: Option<CityId>) {
        let place = |id: CityId, style| {
            self.catalog
                .get(id)
                .and_then(|city| self.placement.place(city, style))
        };
        let change = SelectionChange {
            selected,
            evicted,
            raised: place(selected, MarkerStyle::Selected),
            lowered: evicted.and_then(|id| place(id, MarkerStyle::Idle)),
        };
        self.renderer.on_selection_changed(&change);
    }
}
