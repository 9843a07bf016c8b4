//! Random display colors for plots and critical points.
//!
//! The generator is owned by the session state and can be seeded, so color assignment is
//! reproducible in tests and in scripted sessions.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct ColorGenerator {
    rng: StdRng,
}

impl ColorGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Next color as `#rrggbb`, six lowercase hex digits.
    pub fn next_color(&mut self) -> String {
        let rgb: u32 = self.rng.random_range(0..=0xff_ffff);
        format!("#{:06x}", rgb)
    }
}

/// Parses `#rrggbb` into its components; used by the renderer.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    Some(((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}
