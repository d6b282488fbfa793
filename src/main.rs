use anyhow::Context;
use tracing::{info, warn};

use echo_core::grid::EscalatorGrid;
use echo_core::logging::init_tracing;
use echo_core::{AngleRange, Stage, StageConfig, Step, TileId, TileInfo, TrackCursor, Vector3};

/// Straight run, an escalator with a shortcut seen from the side, a stack of
/// two intersection levels and a launcher at the end.
fn build_demo_stage(config: StageConfig) -> anyhow::Result<(Stage, TileId)> {
    let mut stage = Stage::with_config(config);
    let flat = Vector3::ZERO;

    let mut track = Vec::new();
    for i in 0..3 {
        track.push(stage.add_grid(TileInfo::at(0.0, 0.0, i as f32), None, None)?);
    }

    let shortcut = stage.add_grid(TileInfo::at(3.0, 2.0, 3.0), None, None)?;
    let side_view = Vector3::new(0.0, 90.0, 0.0);
    let escalator = stage.add_escalator(
        EscalatorGrid::new(
            TileInfo::at(0.0, 0.0, 3.0),
            vec![(AngleRange::new(side_view, Vector3::new(0.0, 100.0, 0.0)), shortcut)],
        ),
        None,
        None,
    )?;
    track.push(escalator);

    let lower = stage.add_intersection(TileInfo::at(0.0, 0.0, 4.0), None, None, flat)?;
    let upper = stage.add_intersection(TileInfo::at(0.0, 2.0, 4.0), None, None, flat)?;
    stage.add_to_level(0.0, lower)?;
    stage.add_to_level(2.0, upper)?;
    track.push(lower);

    stage.link_track(&track)?;

    let launcher = stage.add_launcher(TileInfo::at(0.0, 0.0, 5.0), Some(lower), None, Vec::new())?;
    stage.set_real_next(lower, Some(launcher));
    stage.link(shortcut, upper)?;

    Ok((stage, track[0]))
}

fn walk(stage: &mut Stage, start: TileId, angle: Vector3, max_steps: usize) {
    let mut cursor = TrackCursor::new(start);
    for _ in 0..max_steps {
        match cursor.advance(stage, angle) {
            Step::Moved(tile) => {
                let pos = cursor
                    .position(stage, angle)
                    .map(|info| info.pos.to_string())
                    .unwrap_or_default();
                info!(%angle, %tile, %pos, "rolled");
            }
            Step::Fell => {
                warn!(%angle, "fell into the hole");
                return;
            }
            Step::Stopped => {
                info!(%angle, tile = %cursor.current, "stopped");
                return;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => StageConfig::load(&path)
            .with_context(|| format!("failed to load stage config from {path}"))?,
        None => StageConfig::default(),
    };
    init_tracing(&config.logging)?;

    let (mut stage, start) = build_demo_stage(config)?;
    info!(tiles = stage.tile_count(), levels = stage.levels().len(), "demo stage built");

    for angle in [
        Vector3::ZERO,
        Vector3::new(0.0, 90.0, 0.0),
        Vector3::new(40.0, 0.0, 0.0),
    ] {
        walk(&mut stage, start, angle, 32);
    }
    Ok(())
}
