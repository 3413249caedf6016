//! Wall styling from the noise field.
//!
//! Purely cosmetic: nothing here feeds back into the topology.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseField;
use crate::tilemap::Tilemap;
use crate::zones::ZoneId;

/// Texture family for a wall tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallStyle {
    Cross,
    Signs,
    Cement,
    Mat,
    Brick,
}

impl WallStyle {
    /// Bands: `[0, 0.3)` cross, `[0.3, 0.4)` signs, `[0.6, 0.7)` cement,
    /// `[0.7, 1.0)` mat, anything else brick.
    pub fn from_noise(value: f32) -> Self {
        match value {
            v if (0.0..0.3).contains(&v) => WallStyle::Cross,
            v if (0.3..0.4).contains(&v) => WallStyle::Signs,
            v if (0.6..0.7).contains(&v) => WallStyle::Cement,
            v if (0.7..1.0).contains(&v) => WallStyle::Mat,
            _ => WallStyle::Brick,
        }
    }

    fn index(self) -> u8 {
        match self {
            WallStyle::Cross => 1,
            WallStyle::Signs => 2,
            WallStyle::Cement => 3,
            WallStyle::Mat => 4,
            WallStyle::Brick => 5,
        }
    }

    /// Tile asset name, e.g. `WallTile3Snow`.
    pub fn asset_name(self, scheme: ColorScheme) -> String {
        format!("WallTile{}{}", self.index(), scheme.name())
    }
}

/// Palette shared by every wall tile in a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScheme {
    Royal,
    Snow,
    #[default]
    Arid,
    Gold,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [ColorScheme::Royal, ColorScheme::Snow, ColorScheme::Arid, ColorScheme::Gold];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Royal => "Royal",
            ColorScheme::Snow => "Snow",
            ColorScheme::Arid => "Arid",
            ColorScheme::Gold => "Gold",
        }
    }
}

/// Style for every wall tile; floor tiles are `None`.
///
/// Wall tiles outside the noise field fall back to brick.
pub fn wall_styles(zoned: &Tilemap<ZoneId>, noise: &NoiseField) -> Tilemap<Option<WallStyle>> {
    Tilemap::from_fn(zoned.height, zoned.width, |row, col| {
        if !zoned.get(row, col).is_wall() {
            return None;
        }
        let style = if noise.field.in_bounds(row, col) {
            WallStyle::from_noise(noise.get(row, col))
        } else {
            WallStyle::Brick
        };
        Some(style)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_style_bands() {
        assert_eq!(WallStyle::from_noise(0.0), WallStyle::Cross);
        assert_eq!(WallStyle::from_noise(0.29), WallStyle::Cross);
        assert_eq!(WallStyle::from_noise(0.3), WallStyle::Signs);
        assert_eq!(WallStyle::from_noise(0.45), WallStyle::Brick);
        assert_eq!(WallStyle::from_noise(0.6), WallStyle::Cement);
        assert_eq!(WallStyle::from_noise(0.7), WallStyle::Mat);
        assert_eq!(WallStyle::from_noise(1.0), WallStyle::Brick);
    }

    #[test]
    fn test_asset_names() {
        assert_eq!(WallStyle::Cement.asset_name(ColorScheme::Snow), "WallTile3Snow");
        assert_eq!(WallStyle::Brick.asset_name(ColorScheme::Royal), "WallTile5Royal");
    }

    #[test]
    fn test_every_scheme_reachable() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(ColorScheme::random(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_styles_only_on_walls() {
        let zoned = Tilemap::from_fn(3, 3, |r, c| if r == 1 && c == 1 { ZoneId(1) } else { ZoneId::WALL });
        let noise = NoiseField {
            field: Tilemap::from_fn(2, 2, |r, c| [[0.1, 0.35], [0.65, 0.5]][r][c]),
        };
        let styles = wall_styles(&zoned, &noise);

        assert_eq!(*styles.get(1, 1), None);
        assert_eq!(*styles.get(0, 0), Some(WallStyle::Cross));
        assert_eq!(*styles.get(0, 1), Some(WallStyle::Signs));
        assert_eq!(*styles.get(1, 0), Some(WallStyle::Cement));
        // Outside the 2x2 noise field
        assert_eq!(*styles.get(2, 2), Some(WallStyle::Brick));
    }
}
