//! Spike and turret placement
//!
//! Spikes sit on ground tiles. Turrets hang on side walls and turn their own
//! tile into wall, so placing them changes the topology and forces a
//! re-segmentation.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::HazardConfig;
use crate::error::Result;
use crate::zones::{Location, ZoneAnalyzer};

/// Direction a turret fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Spike,
    Turret { facing: Facing },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub location: Location,
}

impl Hazard {
    pub fn is_turret(&self) -> bool {
        matches!(self.kind, HazardKind::Turret { .. })
    }
}

/// Number of tiles to fill for a density, rounded half up.
fn target_count(density: f64, eligible: usize) -> usize {
    (density * eligible as f64 + 0.5).floor() as usize
}

/// Draw up to `target` distinct tiles from `candidates`, skipping occupied ones.
fn draw<R: Rng + ?Sized>(
    mut candidates: Vec<Location>,
    target: usize,
    occupied: &mut BTreeSet<Location>,
    rng: &mut R,
) -> Vec<Location> {
    let mut picked = Vec::with_capacity(target);
    while picked.len() < target && !candidates.is_empty() {
        let location = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        if occupied.insert(location) {
            picked.push(location);
        }
    }
    picked
}

/// Scatter spikes over the ground tiles of every zone.
///
/// `occupied` holds tiles already taken by other hazards and gains the new
/// spikes.
pub fn place_spikes<R: Rng + ?Sized>(
    analyzer: &ZoneAnalyzer,
    config: &HazardConfig,
    occupied: &mut BTreeSet<Location>,
    rng: &mut R,
) -> Vec<Hazard> {
    let mut spikes = Vec::new();
    for zone in analyzer.zones() {
        let target = target_count(config.spike_density, zone.ground_count());
        let candidates: Vec<Location> = zone.ground.iter().copied().collect();
        spikes.extend(draw(candidates, target, occupied, rng).into_iter().map(|location| Hazard {
            kind: HazardKind::Spike,
            location,
        }));
    }
    tracing::debug!(count = spikes.len(), "spikes placed");
    spikes
}

/// Mount turrets on the left and right walls of every zone.
///
/// Tiles walled on both sides are skipped. Each turret tile becomes wall and
/// the analyzer is re-segmented once all turrets are down.
pub fn place_turrets<R: Rng + ?Sized>(
    analyzer: &mut ZoneAnalyzer,
    config: &HazardConfig,
    occupied: &mut BTreeSet<Location>,
    rng: &mut R,
) -> Result<Vec<Hazard>> {
    // Snapshot both sides first; mounting turrets leaves the zones stale.
    let mut sides = Vec::new();
    for facing in [Facing::Right, Facing::Left] {
        for zone in analyzer.zones() {
            let (wall_side, other_side) = match facing {
                Facing::Right => (&zone.left, &zone.right),
                Facing::Left => (&zone.right, &zone.left),
            };
            let candidates: Vec<Location> = wall_side.difference(other_side).copied().collect();
            sides.push((facing, target_count(config.turret_density, wall_side.len()), candidates));
        }
    }

    let mut turrets = Vec::new();
    for (facing, target, candidates) in sides {
        for location in draw(candidates, target, occupied, rng) {
            analyzer.mutate_grid(location.col, location.row, true)?;
            turrets.push(Hazard {
                kind: HazardKind::Turret { facing },
                location,
            });
        }
    }

    if !turrets.is_empty() {
        analyzer.resegment();
    }
    tracing::debug!(count = turrets.len(), "turrets placed");
    Ok(turrets)
}

/// Spikes first, then turrets, sharing one occupancy set.
pub fn place_hazards<R: Rng + ?Sized>(
    analyzer: &mut ZoneAnalyzer,
    config: &HazardConfig,
    rng: &mut R,
) -> Result<Vec<Hazard>> {
    let mut occupied = BTreeSet::new();
    let mut hazards = place_spikes(analyzer, config, &mut occupied, rng);
    hazards.extend(place_turrets(analyzer, config, &mut occupied, rng)?);
    Ok(hazards)
}
