//! Spawn and exit placement inside a validated zone.
//!
//! Both points must stand on ground. The spawn needs a flat floor under a
//! one-tile alcove; the exit needs a flat floor and two tiles of headroom
//! beside it for the taller exit structure.

use serde::{Deserialize, Serialize};

use super::{AnalyzerState, Location, Zone, ZoneAnalyzer, ZoneId};

/// A spawn/exit pair inside one zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnExit {
    pub spawn: Location,
    pub exit: Location,
}

impl SpawnExit {
    pub fn distance(&self) -> f64 {
        self.spawn.distance_squared(&self.exit).sqrt()
    }
}

/// Open floor on both sides, no wall left/right/above.
fn is_spawn_site(zone: &Zone, location: &Location) -> bool {
    if zone.touches_side_wall(location) || zone.ceiling.contains(location) {
        return false;
    }
    [-1, 1].into_iter().all(|side| {
        location
            .offset(0, side)
            .is_some_and(|beside| zone.ground.contains(&beside))
    })
}

/// Like a spawn site, plus no low ceiling beside it or one row up beside it.
fn is_exit_site(zone: &Zone, location: &Location) -> bool {
    if zone.touches_side_wall(location) || zone.ceiling.contains(location) {
        return false;
    }
    [-1, 1].into_iter().all(|side| {
        let beside_ok = location
            .offset(0, side)
            .is_some_and(|beside| zone.ground.contains(&beside) && !zone.ceiling.contains(&beside));
        let above_ok = location
            .offset(-1, side)
            .map_or(true, |above| !zone.ceiling.contains(&above));
        beside_ok && above_ok
    })
}

impl ZoneAnalyzer {
    /// Pick the spawn and exit inside `zone_id`.
    ///
    /// Ground tiles are sorted by (row, col); the spawn is searched from the
    /// front and the exit from the back so the pair tends to span the zone.
    /// The first pair at least `min_distance` apart wins: both tiles leave the
    /// zone's ground set and its size drops by two.
    ///
    /// Returns `None` when no pair fits; the attempt should be discarded.
    /// Stale zones are never searched: the call returns `None` and leaves the
    /// analyzer state untouched.
    pub fn select_spawn_exit(&mut self, zone_id: ZoneId, min_distance: f64) -> Option<SpawnExit> {
        if self.is_stale() {
            tracing::warn!(zone = zone_id.0, state = ?self.state, "spawn/exit requested on stale zones");
            return None;
        }
        let Some(index) = self.zones.iter().position(|z| z.id == zone_id) else {
            tracing::warn!(zone = zone_id.0, "spawn/exit requested for unknown zone");
            self.state = AnalyzerState::SpawnExitFailed;
            return None;
        };

        let found = {
            let zone = &self.zones[index];
            let candidates: Vec<Location> = zone.ground.iter().copied().collect();
            let spawn_ok: Vec<bool> = candidates.iter().map(|loc| is_spawn_site(zone, loc)).collect();
            let exit_ok: Vec<bool> = candidates.iter().map(|loc| is_exit_site(zone, loc)).collect();
            let min_sq = min_distance * min_distance;

            (0..candidates.len())
                .filter(|&i| spawn_ok[i])
                .find_map(|i| {
                    (i + 1..candidates.len())
                        .rev()
                        .filter(|&j| exit_ok[j])
                        .find(|&j| candidates[i].distance_squared(&candidates[j]) >= min_sq)
                        .map(|j| SpawnExit { spawn: candidates[i], exit: candidates[j] })
                })
        };

        let Some(pair) = found else {
            tracing::debug!(zone = zone_id.0, "no spawn/exit pair satisfies the layout constraints");
            self.state = AnalyzerState::SpawnExitFailed;
            return None;
        };

        let zone = &mut self.zones[index];
        zone.ground.remove(&pair.spawn);
        zone.ground.remove(&pair.exit);
        zone.size = zone.size.saturating_sub(2);

        self.spawn = pair.spawn;
        self.exit = pair.exit;
        self.state = AnalyzerState::SpawnExitSelected;
        Some(pair)
    }

    /// The selected pair, if any.
    pub fn selected_spawn_exit(&self) -> Option<SpawnExit> {
        if self.spawn.is_undefined() || self.exit.is_undefined() {
            return None;
        }
        Some(SpawnExit { spawn: self.spawn, exit: self.exit })
    }
}
