//! Cave topology from a birth/starvation cellular automaton
//!
//! Cells start as wall with a fixed probability, then a few synchronous
//! smoothing steps turn the noise into connected caverns.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tilemap::Tilemap;

/// Parameters of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonRules {
    /// Probability that a cell starts as wall (default: 0.39).
    pub alive_probability: f64,
    /// A floor cell becomes wall when more than this many neighbours are wall.
    pub birth_limit: u8,
    /// A wall cell survives when at least this many neighbours are wall.
    pub starvation_limit: u8,
}

impl Default for AutomatonRules {
    fn default() -> Self {
        Self {
            alive_probability: 0.39,
            birth_limit: 3,
            starvation_limit: 4,
        }
    }
}

impl AutomatonRules {
    pub fn with_probability(alive_probability: f64) -> Self {
        Self {
            alive_probability,
            ..Self::default()
        }
    }
}

/// Boolean wall/floor grid evolved by [`AutomatonRules`]. `true` is wall.
#[derive(Clone, Debug)]
pub struct CaveAutomaton {
    rules: AutomatonRules,
    grid: Tilemap<bool>,
}

impl CaveAutomaton {
    /// Create a `height` x `width` grid seeded from `rng`.
    pub fn new<R: Rng + ?Sized>(height: usize, width: usize, rules: AutomatonRules, rng: &mut R) -> Self {
        let mut automaton = Self {
            rules,
            grid: Tilemap::new_with(height, width, false),
        };
        automaton.randomize(rng);
        automaton
    }

    /// Wrap an existing grid without randomizing it.
    pub fn from_grid(grid: Tilemap<bool>, rules: AutomatonRules) -> Self {
        Self { rules, grid }
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn rules(&self) -> &AutomatonRules {
        &self.rules
    }

    pub fn grid(&self) -> &Tilemap<bool> {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Tilemap<bool> {
        &mut self.grid
    }

    /// Re-roll every cell independently.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let p = self.rules.alive_probability;
        for (_, _, cell) in self.grid.iter_mut() {
            *cell = rng.gen::<f64>() < p;
        }
    }

    /// Number of wall cells among the 8 surrounding cells. Off-grid counts as wall.
    pub fn wall_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                if r < 0 || c < 0 || r >= self.grid.height as i64 || c >= self.grid.width as i64 {
                    count += 1;
                } else if *self.grid.get(r as usize, c as usize) {
                    count += 1;
                }
            }
        }
        count
    }

    /// One synchronous update of every cell.
    pub fn step(&mut self) {
        let next = Tilemap::from_fn(self.grid.height, self.grid.width, |row, col| {
            let walls = self.wall_neighbors(row, col);
            if *self.grid.get(row, col) {
                walls >= self.rules.starvation_limit
            } else {
                walls > self.rules.birth_limit
            }
        });
        self.grid = next;
    }

    pub fn simulate(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Change the grid dimensions. Zero dimensions are ignored.
    ///
    /// Shrinking drops trailing rows/columns, growing appends floor. With
    /// `reinitialize` the whole grid is re-rolled afterwards.
    pub fn resize<R: Rng + ?Sized>(&mut self, height: usize, width: usize, reinitialize: bool, rng: &mut R) {
        if height == 0 || width == 0 {
            return;
        }
        self.grid.resize(height, width, false);
        if reinitialize {
            self.randomize(rng);
        }
    }

    pub fn mark(&mut self, row: usize, col: usize, wall: bool) -> Result<()> {
        self.grid.try_set(row, col, wall)
    }

    pub fn wall_count(&self) -> usize {
        self.grid.count(|&wall| wall)
    }
}
