//! Zone segmentation and layout validation
//!
//! Splits the cave's open space into 4-connected zones, classifies each
//! zone tile by the walls around it, decides whether the layout is dominated
//! by a single navigable zone, and picks the spawn and exit inside it.

mod segment;
mod spawn_exit;

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::automaton::CaveAutomaton;
use crate::error::{LevelError, Result};
use crate::tilemap::Tilemap;

pub use spawn_exit::SpawnExit;

/// Default share of open tiles the largest zone must own.
pub const DEFAULT_VALIDITY_THRESHOLD: f64 = 0.65;

/// Default minimum distance (in tiles) between spawn and exit.
pub const DEFAULT_MIN_SPAWN_EXIT_DISTANCE: f64 = 60.0;

/// Zone identifier (0 = wall, -1 = unassigned floor, 1+ = zone).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub i32);

impl ZoneId {
    pub const WALL: ZoneId = ZoneId(0);
    pub const UNASSIGNED: ZoneId = ZoneId(-1);

    pub fn is_wall(&self) -> bool {
        self.0 == 0
    }

    pub fn is_unassigned(&self) -> bool {
        self.0 == -1
    }

    pub fn is_zone(&self) -> bool {
        self.0 > 0
    }
}

/// Grid coordinate. Orders by row, then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    /// Marker for a location that has not been computed yet.
    pub const UNDEFINED: Location = Location { row: usize::MAX, col: usize::MAX };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }

    /// Neighbouring location, or `None` when it would leave the non-negative quadrant.
    pub fn offset(&self, d_row: i64, d_col: i64) -> Option<Location> {
        if self.is_undefined() {
            return None;
        }
        let row = usize::try_from(self.row as i64 + d_row).ok()?;
        let col = usize::try_from(self.col as i64 + d_col).ok()?;
        Some(Location { row, col })
    }

    pub fn distance_squared(&self, other: &Location) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        dr * dr + dc * dc
    }
}

/// A maximal 4-connected region of floor tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    /// Number of tiles in the zone.
    pub size: usize,
    /// Tiles with a wall (or the map edge) directly below.
    pub ground: BTreeSet<Location>,
    /// Tiles with a wall (or the map edge) directly above.
    pub ceiling: BTreeSet<Location>,
    /// Tiles with a wall (or the map edge) to the left.
    pub left: BTreeSet<Location>,
    /// Tiles with a wall (or the map edge) to the right.
    pub right: BTreeSet<Location>,
}

impl Zone {
    pub(crate) fn new(id: ZoneId) -> Self {
        Self {
            id,
            size: 0,
            ground: BTreeSet::new(),
            ceiling: BTreeSet::new(),
            left: BTreeSet::new(),
            right: BTreeSet::new(),
        }
    }

    pub fn ground_count(&self) -> usize {
        self.ground.len()
    }

    /// Bounded on at least one vertical side (left or right).
    pub fn touches_side_wall(&self, location: &Location) -> bool {
        self.left.contains(location) || self.right.contains(location)
    }
}

/// Progress of one generation attempt through the analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyzerState {
    Uninitialized,
    BoundaryEnforced,
    Segmented,
    Valid,
    Invalid,
    SpawnExitSelected,
    SpawnExitFailed,
    /// The grid changed after the last segmentation.
    Stale,
}

/// Owns a cave grid and the zones derived from it.
///
/// Owning the automaton means nothing else can mutate the grid while a
/// segmentation pass runs.
#[derive(Clone, Debug)]
pub struct ZoneAnalyzer {
    automaton: CaveAutomaton,
    zoned: Tilemap<ZoneId>,
    zones: Vec<Zone>,
    spawn: Location,
    exit: Location,
    state: AnalyzerState,
}

impl ZoneAnalyzer {
    pub fn new(automaton: CaveAutomaton) -> Self {
        let zoned = Tilemap::new_with(automaton.height(), automaton.width(), ZoneId::UNASSIGNED);
        let mut analyzer = Self {
            automaton,
            zoned,
            zones: Vec::new(),
            spawn: Location::UNDEFINED,
            exit: Location::UNDEFINED,
            state: AnalyzerState::Uninitialized,
        };
        analyzer.initialize_from_grid();
        analyzer
    }

    pub fn automaton(&self) -> &CaveAutomaton {
        &self.automaton
    }

    pub fn into_automaton(self) -> CaveAutomaton {
        self.automaton
    }

    pub fn grid(&self) -> &Tilemap<bool> {
        self.automaton.grid()
    }

    pub fn zoned_grid(&self) -> &Tilemap<ZoneId> {
        &self.zoned
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// True unless the zone data matches the current grid.
    ///
    /// Only a completed segmentation (and the validation and selection steps
    /// that follow it) leaves the zones queryable. Resetting the zoned grid
    /// or enforcing the boundary afterwards invalidates them again.
    pub fn is_stale(&self) -> bool {
        !matches!(
            self.state,
            AnalyzerState::Segmented
                | AnalyzerState::Valid
                | AnalyzerState::Invalid
                | AnalyzerState::SpawnExitSelected
                | AnalyzerState::SpawnExitFailed
        )
    }

    /// Current spawn and exit; both are [`Location::UNDEFINED`] until selected.
    pub fn spawn_exit(&self) -> (Location, Location) {
        (self.spawn, self.exit)
    }

    /// Reset the zoned grid from the wall grid and forget all zones.
    pub fn initialize_from_grid(&mut self) {
        let grid = self.automaton.grid();
        if self.zoned.height != grid.height || self.zoned.width != grid.width {
            self.zoned = Tilemap::new_with(grid.height, grid.width, ZoneId::UNASSIGNED);
        }
        for (row, col, id) in self.zoned.iter_mut() {
            *id = if *grid.get(row, col) { ZoneId::WALL } else { ZoneId::UNASSIGNED };
        }
        self.zones.clear();
        self.state = AnalyzerState::Uninitialized;
    }

    /// Force the outermost ring of the grid to wall so every zone is enclosed.
    pub fn enforce_boundary(&mut self) {
        if self.zoned.height != self.automaton.height() || self.zoned.width != self.automaton.width() {
            self.initialize_from_grid();
        }
        let height = self.automaton.height();
        let width = self.automaton.width();
        if height == 0 || width == 0 {
            return;
        }

        let grid = self.automaton.grid_mut();
        for row in 0..height {
            for col in [0, width - 1] {
                grid.set(row, col, true);
                self.zoned.set(row, col, ZoneId::WALL);
            }
        }
        for col in 0..width {
            for row in [0, height - 1] {
                grid.set(row, col, true);
                self.zoned.set(row, col, ZoneId::WALL);
            }
        }
        self.state = AnalyzerState::BoundaryEnforced;
    }

    /// Rebuild zones after the grid was mutated.
    pub fn resegment(&mut self) {
        self.initialize_from_grid();
        self.segment();
    }

    /// Largest zone when it owns at least `threshold` of all zone tiles.
    pub fn is_valid(&self, threshold: f64) -> Option<&Zone> {
        let mut largest: Option<&Zone> = None;
        let mut total = 0usize;
        for zone in &self.zones {
            total += zone.size;
            if largest.map_or(true, |l| l.size < zone.size) {
                largest = Some(zone);
            }
        }

        let largest = largest?;
        if total == 0 || (largest.size as f64 / total as f64) < threshold {
            return None;
        }
        Some(largest)
    }

    /// [`ZoneAnalyzer::is_valid`], recording the outcome in the analyzer state.
    pub fn validate(&mut self, threshold: f64) -> Option<ZoneId> {
        let result = self.is_valid(threshold).map(|z| z.id);
        self.state = if result.is_some() { AnalyzerState::Valid } else { AnalyzerState::Invalid };
        result
    }

    /// Set a single grid cell. Zones are not rebuilt; call
    /// [`ZoneAnalyzer::resegment`] before reading zone data again.
    pub fn mutate_grid(&mut self, col: usize, row: usize, wall: bool) -> Result<()> {
        self.automaton.mark(row, col, wall)?;
        self.state = AnalyzerState::Stale;
        Ok(())
    }

    /// Resize the owned grid (see [`CaveAutomaton::resize`]); marks zones stale.
    pub fn resize_grid<R: Rng + ?Sized>(&mut self, height: usize, width: usize, reinitialize: bool, rng: &mut R) {
        if height == 0 || width == 0 {
            return;
        }
        self.automaton.resize(height, width, reinitialize, rng);
        self.state = AnalyzerState::Stale;
    }

    /// Zone containing `location`, `None` for wall tiles.
    pub fn zone_at(&self, location: Location) -> Result<Option<&Zone>> {
        if self.is_stale() {
            return Err(LevelError::StaleZones);
        }
        let id = *self.zoned.try_get(location.row, location.col)?;
        if !id.is_zone() {
            return Ok(None);
        }
        self.zone(id).map(Some).ok_or(LevelError::UnknownZone(id))
    }

    /// Wall test treating anything outside the grid as solid.
    pub(crate) fn is_solid(&self, location: Option<Location>) -> bool {
        match location {
            Some(loc) if self.grid().in_bounds(loc.row, loc.col) => *self.grid().get(loc.row, loc.col),
            _ => true,
        }
    }
}
