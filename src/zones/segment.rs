//! Breadth-first flood fill over the zoned grid.

use std::collections::VecDeque;

use super::{AnalyzerState, Location, Zone, ZoneAnalyzer, ZoneId};

/// West, east, north, south.
const ORTHOGONAL: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

impl ZoneAnalyzer {
    /// Assign every unassigned floor tile to a zone.
    ///
    /// Zones are discovered in row-major order and numbered from
    /// `zones.len() + 1`. A spawn/exit pair selected earlier is kept out of
    /// its zone's ground set.
    pub fn segment(&mut self) {
        let height = self.zoned.height;
        let width = self.zoned.width;

        for row in 0..height {
            for col in 0..width {
                if self.zoned.get(row, col).is_unassigned() && !*self.grid().get(row, col) {
                    let zone = self.flood_fill(Location::new(row, col));
                    tracing::trace!(zone = zone.id.0, size = zone.size, "zone discovered");
                    self.zones.push(zone);
                }
            }
        }

        self.state = AnalyzerState::Segmented;
    }

    fn flood_fill(&mut self, start: Location) -> Zone {
        let id = ZoneId(self.zones.len() as i32 + 1);
        let mut zone = Zone::new(id);
        let mut queue = VecDeque::new();

        self.zoned.set(start.row, start.col, id);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for (d_row, d_col) in ORTHOGONAL {
                let Some(next) = current.offset(d_row, d_col) else {
                    continue;
                };
                if !self.zoned.in_bounds(next.row, next.col) {
                    continue;
                }
                // Claim on discovery so a tile is never queued twice
                if !*self.grid().get(next.row, next.col) && self.zoned.get(next.row, next.col).is_unassigned() {
                    self.zoned.set(next.row, next.col, id);
                    queue.push_back(next);
                }
            }

            self.classify(current, &mut zone);
            zone.size += 1;
        }

        if !self.spawn.is_undefined()
            && !self.exit.is_undefined()
            && zone.ground.contains(&self.spawn)
            && zone.ground.contains(&self.exit)
        {
            zone.ground.remove(&self.spawn);
            zone.ground.remove(&self.exit);
        }

        zone
    }

    /// Record which sides of `location` are bounded by wall or the map edge.
    fn classify(&self, location: Location, zone: &mut Zone) {
        if self.is_solid(location.offset(0, -1)) {
            zone.left.insert(location);
        }
        if self.is_solid(location.offset(0, 1)) {
            zone.right.insert(location);
        }
        if self.is_solid(location.offset(-1, 0)) {
            zone.ceiling.insert(location);
        }
        if self.is_solid(location.offset(1, 0)) {
            zone.ground.insert(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::analyzer_from_rows;
    use super::*;
    use crate::automaton::{AutomatonRules, CaveAutomaton};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn segmented(seed: u64, height: usize, width: usize) -> ZoneAnalyzer {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut automaton = CaveAutomaton::new(height, width, AutomatonRules::default(), &mut rng);
        automaton.simulate(5);
        let mut analyzer = ZoneAnalyzer::new(automaton);
        analyzer.enforce_boundary();
        analyzer.segment();
        analyzer
    }

    #[test]
    fn test_every_cell_assigned() {
        for seed in 0..8 {
            let analyzer = segmented(seed, 48, 64);
            for (row, col, id) in analyzer.zoned_grid().iter() {
                assert!(!id.is_unassigned(), "({row}, {col}) left unassigned");
                assert_eq!(id.is_wall(), *analyzer.grid().get(row, col));
            }
        }
    }

    #[test]
    fn test_sizes_and_walls_cover_grid() {
        for seed in 0..8 {
            let analyzer = segmented(seed, 40, 40);
            let zone_tiles: usize = analyzer.zones().iter().map(|z| z.size).sum();
            assert_eq!(zone_tiles + analyzer.automaton().wall_count(), 40 * 40);
        }
    }

    #[test]
    fn test_zone_ids_in_discovery_order() {
        let analyzer = segmented(11, 50, 50);
        for (idx, zone) in analyzer.zones().iter().enumerate() {
            assert_eq!(zone.id, ZoneId(idx as i32 + 1));
        }

        // First tile of each zone in row-major order appears in id order
        let mut first_seen = Vec::new();
        for (_, _, id) in analyzer.zoned_grid().iter() {
            if id.is_zone() && !first_seen.contains(id) {
                first_seen.push(*id);
            }
        }
        let ids: Vec<ZoneId> = analyzer.zones().iter().map(|z| z.id).collect();
        assert_eq!(first_seen, ids);
    }

    #[test]
    fn test_boundary_sets_match_neighbours() {
        let analyzer = segmented(5, 40, 40);
        let grid = analyzer.grid();
        for zone in analyzer.zones() {
            for (row, col, id) in analyzer.zoned_grid().iter() {
                if *id != zone.id {
                    continue;
                }
                let loc = Location::new(row, col);
                assert_eq!(zone.ground.contains(&loc), *grid.get(row + 1, col));
                assert_eq!(zone.ceiling.contains(&loc), *grid.get(row - 1, col));
                assert_eq!(zone.left.contains(&loc), *grid.get(row, col - 1));
                assert_eq!(zone.right.contains(&loc), *grid.get(row, col + 1));
            }
        }
    }

    #[test]
    fn test_map_edge_counts_as_solid() {
        // No enforced border: the edge itself bounds the zone
        let mut analyzer = analyzer_from_rows(&[
            "...",
            ".#.",
        ]);
        analyzer.segment();

        let zone = &analyzer.zones()[0];
        assert_eq!(zone.size, 5);
        assert!(zone.ceiling.contains(&Location::new(0, 1)));
        assert!(zone.ground.contains(&Location::new(0, 1)));
        assert!(zone.ground.contains(&Location::new(1, 0)));
        assert!(zone.left.contains(&Location::new(0, 0)));
        assert!(zone.right.contains(&Location::new(1, 0)));
        assert!(!zone.left.contains(&Location::new(0, 1)));
    }

    #[test]
    fn test_diagonal_tiles_are_separate_zones() {
        let mut analyzer = analyzer_from_rows(&[
            ".#",
            "#.",
        ]);
        analyzer.segment();
        assert_eq!(analyzer.zones().len(), 2);
        assert_eq!(*analyzer.zoned_grid().get(1, 1), ZoneId(2));
    }

    #[test]
    fn test_large_open_grid_does_not_recurse() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let automaton = CaveAutomaton::new(400, 400, AutomatonRules::with_probability(0.0), &mut rng);
        let mut analyzer = ZoneAnalyzer::new(automaton);
        analyzer.enforce_boundary();
        analyzer.segment();
        assert_eq!(analyzer.zones().len(), 1);
        assert_eq!(analyzer.zones()[0].size, 398 * 398);
    }
}
