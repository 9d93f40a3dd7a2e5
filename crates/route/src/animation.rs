use catalog::{CatalogError, CityCatalog};
use foundation::ids::CityId;
use foundation::math::Vec3;
use foundation::time::Millis;
use runtime::{DeferredQueue, Generation, GenerationToken, Stamped};

use crate::dedup::collapse_repeats;
use crate::pool::{PoolChange, SegmentPool};
use crate::segment::Segment;

/// Deferred update of one pooled segment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentTask {
    pub index: usize,
    pub segment: Segment,
}

/// What [`PathAnimation::begin_render`] set in motion.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub token: GenerationToken,
    /// Route points after collapsing repeats.
    pub points: Vec<Vec3>,
    pub segments: usize,
    pub pool: PoolChange,
}

/// A task that fired while still current.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentDraw {
    pub index: usize,
    pub segment: Segment,
    pub token: GenerationToken,
}

/// Outcome of one fired task.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fired {
    Drawn(SegmentDraw),
    /// Superseded by a newer render; nothing was touched.
    Stale { index: usize, token: GenerationToken },
}

impl Fired {
    pub fn drawn(self) -> Option<SegmentDraw> {
        match self {
            Fired::Drawn(d) => Some(d),
            Fired::Stale { .. } => None,
        }
    }
}

/// Reveals a route one segment at a time.
///
/// Each render bumps the generation and schedules segment `k` (1-based) at
/// `now + k * step_ms`, stamped with the new generation. Older tasks are left
/// queued; when they fire against a newer generation they do nothing.
#[derive(Debug)]
pub struct PathAnimation {
    generation: Generation,
    queue: DeferredQueue<Stamped<SegmentTask>>,
    pool: SegmentPool,
    step_ms: u64,
}

impl PathAnimation {
    pub fn new(step_ms: u64) -> Self {
        Self {
            generation: Generation::new(),
            queue: DeferredQueue::new(),
            pool: SegmentPool::new(),
            step_ms,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.value()
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn pool(&self) -> &SegmentPool {
        &self.pool
    }

    /// Tasks still queued, stale ones included.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.next_due()
    }

    /// Resolves `route` against the catalog and schedules its reveal.
    ///
    /// Unknown ids fail before anything changes, so the previous render stays
    /// intact.
    pub fn begin_render(
        &mut self,
        catalog: &CityCatalog,
        route: &[CityId],
        now: Millis,
    ) -> Result<RenderPlan, CatalogError> {
        let points = catalog.positions(route)?;
        Ok(self.begin_render_points(&points, now))
    }

    pub fn begin_render_points(&mut self, points: &[Vec3], now: Millis) -> RenderPlan {
        let points = collapse_repeats(points);
        let token = self.generation.advance();

        let segments = points.len().saturating_sub(1);
        for (i, pair) in points.windows(2).enumerate() {
            let task = SegmentTask {
                index: i,
                segment: Segment::new(pair[0], pair[1]),
            };
            let delay = (i as u64 + 1).saturating_mul(self.step_ms);
            self.queue.schedule(now, delay, Stamped::new(token, task));
        }

        let pool = self.pool.prepare(segments);
        tracing::debug!(
            generation = token.value(),
            segments,
            created = pool.created,
            parked = pool.parked.len(),
            "route render scheduled"
        );

        RenderPlan {
            token,
            points,
            segments,
            pool,
        }
    }

    /// Fires every task due at or before `now`, in schedule order.
    pub fn advance(&mut self, now: Millis) -> Vec<Fired> {
        let mut fired = Vec::new();
        while let Some(due) = self.queue.pop_due(now) {
            let token = due.payload.token;
            let index = due.payload.payload.index;
            match due.payload.into_current(&self.generation) {
                Some(task) => {
                    // Current tasks never outnumber the slots prepared for their render.
                    let shown = self.pool.show(task.index, task.segment);
                    debug_assert!(shown, "segment {} has no pool slot", task.index);
                    fired.push(Fired::Drawn(SegmentDraw {
                        index: task.index,
                        segment: task.segment,
                        token,
                    }));
                }
                None => {
                    tracing::trace!(generation = token.value(), index, "stale segment task skipped");
                    fired.push(Fired::Stale { index, token });
                }
            }
        }
        fired
    }
}
