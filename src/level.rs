//! A generated level and the in-game edits it supports.

use std::path::Path;

use rand::Rng;

use crate::decor::{wall_styles, ColorScheme, WallStyle};
use crate::error::Result;
use crate::hazards::Hazard;
use crate::minimap;
use crate::noise::NoiseField;
use crate::seeds::LevelSeeds;
use crate::tilemap::Tilemap;
use crate::zones::{Location, SpawnExit, Zone, ZoneAnalyzer, ZoneId};

/// Default blast radius of a bomb, in tiles.
pub const BOMB_RADIUS: usize = 3;

/// What a detonation changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlastReport {
    /// Wall tiles turned into floor.
    pub carved: Vec<Location>,
    /// Hazards removed by the blast.
    pub destroyed: Vec<Hazard>,
}

/// Output of a successful generation run.
#[derive(Clone, Debug)]
pub struct Level {
    pub seeds: LevelSeeds,
    /// Attempts consumed, including the successful one.
    pub attempts: usize,
    /// Validity threshold the level was accepted at.
    pub threshold: f64,
    analyzer: ZoneAnalyzer,
    noise: NoiseField,
    spawn_exit: SpawnExit,
    hazards: Vec<Hazard>,
    color_scheme: ColorScheme,
    wall_styles: Tilemap<Option<WallStyle>>,
}

impl Level {
    pub(crate) fn assemble(
        seeds: LevelSeeds,
        attempts: usize,
        threshold: f64,
        analyzer: ZoneAnalyzer,
        noise: NoiseField,
        spawn_exit: SpawnExit,
        hazards: Vec<Hazard>,
        color_scheme: ColorScheme,
    ) -> Self {
        let wall_styles = wall_styles(analyzer.zoned_grid(), &noise);
        Self {
            seeds,
            attempts,
            threshold,
            analyzer,
            noise,
            spawn_exit,
            hazards,
            color_scheme,
            wall_styles,
        }
    }

    pub fn height(&self) -> usize {
        self.analyzer.grid().height
    }

    pub fn width(&self) -> usize {
        self.analyzer.grid().width
    }

    pub fn analyzer(&self) -> &ZoneAnalyzer {
        &self.analyzer
    }

    pub fn grid(&self) -> &Tilemap<bool> {
        self.analyzer.grid()
    }

    pub fn zoned_grid(&self) -> &Tilemap<ZoneId> {
        self.analyzer.zoned_grid()
    }

    pub fn zones(&self) -> &[Zone] {
        self.analyzer.zones()
    }

    pub fn spawn_exit(&self) -> SpawnExit {
        self.spawn_exit
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn wall_styles(&self) -> &Tilemap<Option<WallStyle>> {
        &self.wall_styles
    }

    pub fn is_stale(&self) -> bool {
        self.analyzer.is_stale()
    }

    /// Zone containing `location`, `None` for wall.
    pub fn zone_at(&self, location: Location) -> Result<Option<&Zone>> {
        self.analyzer.zone_at(location)
    }

    /// Zone holding the spawn and exit.
    pub fn main_zone(&self) -> Result<Option<&Zone>> {
        self.zone_at(self.spawn_exit.spawn)
    }

    /// Set one tile. Call [`Level::resegment`] before the next zone query.
    pub fn toggle_wall(&mut self, location: Location, wall: bool) -> Result<()> {
        self.analyzer.mutate_grid(location.col, location.row, wall)
    }

    /// Resize the grid; see [`crate::automaton::CaveAutomaton::resize`].
    /// Zones stay stale until [`Level::resegment`].
    pub fn resize<R: Rng + ?Sized>(&mut self, height: usize, width: usize, reinitialize: bool, rng: &mut R) {
        self.analyzer.resize_grid(height, width, reinitialize, rng);
    }

    /// Rebuild zones and wall styling from the current grid.
    pub fn resegment(&mut self) {
        self.analyzer.resegment();
        self.wall_styles = wall_styles(self.analyzer.zoned_grid(), &self.noise);
    }

    /// Blow a diamond-shaped hole (`|dr| + |dc| <= radius`) centred on `center`.
    ///
    /// Wall tiles become floor except on the outer frame. Hazards inside the
    /// blast are destroyed; a destroyed turret frees its tile. Zones are
    /// rebuilt afterwards.
    pub fn detonate(&mut self, center: Location, radius: usize) -> Result<BlastReport> {
        self.analyzer.grid().try_get(center.row, center.col)?;

        let (height, width) = (self.height(), self.width());
        let inside_frame = |loc: &Location| loc.row > 0 && loc.col > 0 && loc.row + 1 < height && loc.col + 1 < width;

        let radius = radius as i64;
        let mut report = BlastReport::default();
        for d_row in -radius..=radius {
            let reach = radius - d_row.abs();
            for d_col in -reach..=reach {
                let Some(tile) = center.offset(d_row, d_col).filter(inside_frame) else {
                    continue;
                };

                if *self.analyzer.grid().get(tile.row, tile.col) {
                    self.analyzer.mutate_grid(tile.col, tile.row, false)?;
                    report.carved.push(tile);
                }

                let (hit, kept): (Vec<Hazard>, Vec<Hazard>) =
                    self.hazards.drain(..).partition(|hazard| hazard.location == tile);
                self.hazards = kept;
                report.destroyed.extend(hit);
            }
        }

        tracing::debug!(
            carved = report.carved.len(),
            destroyed = report.destroyed.len(),
            "bomb detonated at ({}, {})",
            center.row,
            center.col
        );
        self.resegment();
        Ok(report)
    }

    /// Floor tiles a rope covers when dropped at `location`: the tile itself
    /// and every tile above it up to the first wall. Empty on a wall tile.
    pub fn rope_span(&self, location: Location) -> Result<Vec<Location>> {
        let grid = self.analyzer.grid();
        grid.try_get(location.row, location.col)?;

        Ok((0..=location.row)
            .rev()
            .map(|row| Location::new(row, location.col))
            .take_while(|tile| !*grid.get(tile.row, tile.col))
            .collect())
    }

    /// RGBA minimap of the current zoned grid with spawn and exit marked.
    pub fn minimap_rgba(&self) -> Vec<u8> {
        minimap::export_rgba(self.zoned_grid(), self.spawn_exit.spawn, self.spawn_exit.exit)
    }

    pub fn save_minimap(&self, path: impl AsRef<Path>, scale: u32) -> Result<()> {
        minimap::save_minimap(self.zoned_grid(), self.spawn_exit.spawn, self.spawn_exit.exit, scale, path)
    }
}
