use std::fs;
use std::path::PathBuf;

use catalog::City;
use clap::Parser;
use engine::{FixtureEngine, NativeEngine};
use foundation::ids::CityId;
use foundation::math::Vec3;
use foundation::time::Millis;
use planner::{MapSession, Renderer, SelectionChange, SessionConfig, SessionError};
use scene::Marker;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Replays city clicks against the path engine and prints each route.
#[derive(Debug, Parser)]
#[command(name = "planner")]
struct Args {
    /// Engine fixture (JSON with `cities`, `names`, `routes`).
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Use the engine linked into this binary instead of a fixture.
    #[cfg(feature = "linked-engine")]
    #[arg(long, conflicts_with = "fixture")]
    linked: bool,

    /// Session config (JSON). Defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// City ids, clicked in order.
    cities: Vec<u32>,
}

/// Logs every renderer callback.
#[derive(Debug, Default)]
struct LogRenderer {
    segments: usize,
}

impl Renderer for LogRenderer {
    fn on_catalog_ready(&mut self, cities: &[City], markers: &[Marker]) {
        info!(cities = cities.len(), markers = markers.len(), "catalog ready");
    }

    fn on_path_segment(&mut self, index: usize, from: Vec3, to: Vec3) {
        self.segments += 1;
        info!(index, ?from, ?to, "segment");
    }

    fn on_segment_parked(&mut self, index: usize) {
        info!(index, "segment parked");
    }

    fn on_selection_changed(&mut self, change: &SelectionChange) {
        info!(selected = %change.selected, evicted = ?change.evicted, "selection changed");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            SessionConfig::from_json(&raw).map_err(|e| e.to_string())?
        }
        None => SessionConfig::default(),
    };

    let engine = open_engine(&args)?;
    let mut session =
        MapSession::start(engine, LogRenderer::default(), config).map_err(|e| e.to_string())?;
    let step_ms = session.config().step_ms;

    let mut now = Millis::ZERO;
    for id in args.cities.iter().copied().map(CityId) {
        let outcome = match session.click(id, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(city = %id, error = %e, "click failed");
                continue;
            }
        };

        // Let the whole reveal play out before the next click.
        now = now + step_ms.saturating_mul(outcome.segments as u64 + 1);
        session.advance(now);

        if let Some(route) = outcome.route {
            println!("{}", describe_route(&mut session, &route).map_err(|e| e.to_string())?);
        }
    }

    info!(drawn = session.renderer().segments, "replay finished");
    Ok(())
}

fn describe_route<E: NativeEngine>(
    session: &mut MapSession<E, LogRenderer>,
    route: &[CityId],
) -> Result<String, SessionError> {
    let names = route
        .iter()
        .map(|&id| -> Result<String, SessionError> {
            let name = session.city_name(id)?;
            Ok(if name.is_empty() { id.to_string() } else { name })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{} ({} stops)", names.join(" -> "), route.len()))
}

fn open_engine(args: &Args) -> Result<Box<dyn NativeEngine>, String> {
    #[cfg(feature = "linked-engine")]
    {
        if args.linked {
            return Ok(Box::new(engine::LinkedEngine::new()));
        }
    }

    let Some(path) = &args.fixture else {
        return Err("an engine is required: pass --fixture <json>".to_string());
    };
    let raw = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let engine = FixtureEngine::from_json(&raw).map_err(|e| e.to_string())?;
    Ok(Box::new(engine))
}
