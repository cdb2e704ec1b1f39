//! Transient tracer and blast effects kept purely for drawing.

use skirmish_core::{CellCoord, CellPoint, EffectKind, EffectSnapshot};
use skirmish_world::TerrainGrid;

use crate::tuning::EffectTuning;

#[derive(Clone, Debug, PartialEq)]
struct Effect {
    kind: EffectKind,
    position: CellPoint,
    velocity: (f32, f32),
    radius: f32,
    max_radius: f32,
    remaining_frames: u32,
}

/// Pool of live effects, pruned every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct EffectPool {
    effects: Vec<Effect>,
}

impl EffectPool {
    /// Launches a tracer from `from` toward `to`.
    pub(crate) fn spawn_tracer(&mut self, tuning: &EffectTuning, from: CellCoord, to: CellCoord) {
        let origin = CellPoint::cell_center(from);
        let rows = (to.row() - from.row()) as f32;
        let columns = (to.column() - from.column()) as f32;
        let length = (rows * rows + columns * columns).sqrt().max(f32::EPSILON);
        self.effects.push(Effect {
            kind: EffectKind::Tracer,
            position: origin,
            velocity: (rows / length * tuning.speed, columns / length * tuning.speed),
            radius: 0.0,
            max_radius: 0.0,
            remaining_frames: tuning.lifetime_frames,
        });
    }

    /// Starts a blast growing out of `center` up to `radius` cells.
    pub(crate) fn spawn_blast(&mut self, tuning: &EffectTuning, center: CellCoord, radius: u32) {
        self.effects.push(Effect {
            kind: EffectKind::Blast,
            position: CellPoint::cell_center(center),
            velocity: (0.0, 0.0),
            radius: 0.0,
            max_radius: radius as f32,
            remaining_frames: tuning.lifetime_frames,
        });
    }

    /// Ages every effect by one frame and drops the expired ones.
    ///
    /// Tracers also expire when they enter rock, water or leave the board.
    pub(crate) fn advance(&mut self, tuning: &EffectTuning, terrain: &TerrainGrid) {
        for effect in &mut self.effects {
            effect.remaining_frames = effect.remaining_frames.saturating_sub(1);
            match effect.kind {
                EffectKind::Tracer => {
                    effect.position = CellPoint::new(
                        effect.position.row() + effect.velocity.0,
                        effect.position.column() + effect.velocity.1,
                    );
                    if !terrain.passable(effect.position.containing_cell()) {
                        effect.remaining_frames = 0;
                    }
                }
                EffectKind::Blast => {
                    effect.radius = (effect.radius + tuning.speed).min(effect.max_radius);
                }
            }
        }
        self.effects.retain(|effect| effect.remaining_frames > 0);
    }

    pub(crate) fn snapshots(&self) -> Vec<EffectSnapshot> {
        self.effects
            .iter()
            .map(|effect| EffectSnapshot {
                kind: effect.kind,
                position: effect.position,
                radius: effect.radius,
                remaining_frames: effect.remaining_frames,
            })
            .collect()
    }
}
