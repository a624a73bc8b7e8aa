// Copyright (c) 2026 rezky_nightky

use rand::{seq::IndexedRandom, Rng};

use crate::{
    cell::{Cell, Intensity},
    frame::Frame,
    glyphs::RAIN_GLYPHS,
    palette::Palette,
    runtime::Mode,
};

/// Calm drops slower than this are drawn dimmed.
const DIM_BELOW_SPEED: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainParams {
    pub generation_chance: f32,
    pub max_new_drops: u16,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl RainParams {
    pub fn for_mode(mode: Mode, cols: u16) -> Self {
        match mode {
            Mode::Storm => Self {
                generation_chance: 0.5,
                max_new_drops: (cols / 8).max(1),
                min_speed: 0.3,
                max_speed: 1.0,
            },
            Mode::Calm => Self {
                generation_chance: 0.3,
                max_new_drops: (cols / 15).max(1),
                min_speed: 0.3,
                max_speed: 0.6,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub col: u16,
    pub row: f32,
    pub speed: f32,
    pub glyph: char,
}

impl Raindrop {
    /// Screen row of the drop. Rows only ever grow, so truncation is safe.
    pub fn line(&self) -> u16 {
        self.row as u16
    }
}

#[derive(Clone, Debug, Default)]
pub struct RainField {
    rows: u16,
    cols: u16,
    drops: Vec<Raindrop>,
}

impl RainField {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            drops: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn clear(&mut self) {
        self.drops.clear();
    }

    #[cfg(test)]
    pub fn push(&mut self, drop: Raindrop) {
        self.drops.push(drop);
    }

    pub fn reset(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
        self.drops.clear();
    }

    /// Rolls once against `generation_chance`; on success adds between one
    /// and `max_new_drops` drops on row zero. Returns how many were added.
    pub fn spawn<R: Rng + ?Sized>(&mut self, params: &RainParams, rng: &mut R) -> usize {
        if self.cols == 0 || self.rows == 0 {
            return 0;
        }
        if rng.random::<f32>() >= params.generation_chance {
            return 0;
        }

        let count = rng.random_range(1..=params.max_new_drops.max(1));
        let (lo, hi) = if params.min_speed <= params.max_speed {
            (params.min_speed, params.max_speed)
        } else {
            (params.max_speed, params.min_speed)
        };

        self.drops.reserve(count as usize);
        for _ in 0..count {
            let col = rng.random_range(0..self.cols);
            let speed = rng.random_range(lo..=hi);
            let glyph = RAIN_GLYPHS.choose(rng).copied().unwrap_or('|');
            self.drops.push(Raindrop {
                col,
                row: 0.0,
                speed,
                glyph,
            });
        }
        count as usize
    }

    /// Moves every drop down by its speed and silently drops the ones that
    /// left the bottom of the screen.
    pub fn advance(&mut self) {
        let rows = self.rows as f32;
        self.drops.retain_mut(|d| {
            d.row += d.speed;
            d.row.trunc() < rows
        });
    }

    pub fn render(&self, frame: &mut Frame, mode: Mode, palette: &Palette) {
        for d in &self.drops {
            let intensity = match mode {
                Mode::Storm => Intensity::Bold,
                Mode::Calm if d.speed < DIM_BELOW_SPEED => Intensity::Dim,
                Mode::Calm => Intensity::Normal,
            };
            frame.put(d.line(), d.col, Cell::new(d.glyph, palette.rain, intensity));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn forced(mode: Mode, cols: u16) -> RainParams {
        RainParams {
            generation_chance: 1.0,
            ..RainParams::for_mode(mode, cols)
        }
    }

    #[test]
    fn params_follow_mode() {
        let calm = RainParams::for_mode(Mode::Calm, 80);
        assert_eq!(calm.max_new_drops, 5);
        assert_eq!((calm.min_speed, calm.max_speed), (0.3, 0.6));

        let storm = RainParams::for_mode(Mode::Storm, 80);
        assert_eq!(storm.max_new_drops, 10);
        assert_eq!((storm.min_speed, storm.max_speed), (0.3, 1.0));
        assert!(storm.generation_chance > calm.generation_chance);
    }

    #[test]
    fn narrow_screens_still_spawn_at_least_one_drop() {
        assert_eq!(RainParams::for_mode(Mode::Calm, 3).max_new_drops, 1);
        assert_eq!(RainParams::for_mode(Mode::Storm, 0).max_new_drops, 1);
    }

    #[test]
    fn calm_tick_spawns_within_bounds_then_advances_by_speed() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = RainField::new(24, 80);

        let added = field.spawn(&forced(Mode::Calm, 80), &mut rng);
        assert!((1..=5).contains(&added));
        assert_eq!(field.len(), added);
        for d in field.drops() {
            assert_eq!(d.row, 0.0);
            assert!(d.col < 80);
            assert!((0.3..=0.6).contains(&d.speed));
            assert!(RAIN_GLYPHS.contains(&d.glyph));
        }

        field.advance();
        assert_eq!(field.len(), added);
        for d in field.drops() {
            assert_eq!(d.row, d.speed);
        }
    }

    #[test]
    fn failed_roll_spawns_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = RainField::new(24, 80);
        let params = RainParams {
            generation_chance: 0.0,
            ..RainParams::for_mode(Mode::Storm, 80)
        };
        for _ in 0..100 {
            assert_eq!(field.spawn(&params, &mut rng), 0);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn rows_never_decrease_until_removal() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = RainField::new(10, 20);
        let params = forced(Mode::Storm, 20);
        field.spawn(&params, &mut rng);

        let mut prev: Vec<Raindrop> = field.drops().to_vec();
        for _ in 0..50 {
            field.advance();
            for d in field.drops() {
                let before = prev
                    .iter()
                    .find(|p| p.col == d.col && p.speed == d.speed)
                    .expect("surviving drop existed last tick");
                assert!(d.row >= before.row);
            }
            prev = field.drops().to_vec();
        }
        assert!(field.is_empty());
    }

    #[test]
    fn drop_is_removed_exactly_when_its_line_reaches_height() {
        let mut field = RainField::new(5, 10);
        field.drops.push(Raindrop {
            col: 0,
            row: 4.5,
            speed: 0.4,
            glyph: '|',
        });
        field.advance();
        assert_eq!(field.len(), 1, "row 4.9 truncates to the last line");
        field.advance();
        assert!(field.is_empty(), "row 5.3 is past the last line");
    }

    #[test]
    fn drop_on_last_line_survives() {
        let mut field = RainField::new(5, 10);
        field.drops.push(Raindrop {
            col: 0,
            row: 3.0,
            speed: 1.0,
            glyph: '|',
        });
        field.advance();
        assert_eq!(field.len(), 1);
        assert_eq!(field.drops()[0].line(), 4);
        field.advance();
        assert!(field.is_empty());
    }

    #[test]
    fn render_uses_mode_and_speed_for_intensity() {
        let palette = Palette::default();
        let mut field = RainField::new(5, 10);
        field.drops.push(Raindrop {
            col: 1,
            row: 0.0,
            speed: 0.5,
            glyph: '.',
        });
        field.drops.push(Raindrop {
            col: 2,
            row: 1.7,
            speed: 0.9,
            glyph: '|',
        });

        let mut frame = Frame::new(10, 5);
        field.render(&mut frame, Mode::Calm, &palette);
        assert_eq!(frame.get(0, 1).unwrap().intensity, Intensity::Dim);
        assert_eq!(frame.get(1, 2).unwrap().intensity, Intensity::Normal);
        assert_eq!(frame.get(1, 2).unwrap().fg, palette.rain);

        let mut frame = Frame::new(10, 5);
        field.render(&mut frame, Mode::Storm, &palette);
        assert_eq!(frame.get(0, 1).unwrap().intensity, Intensity::Bold);
        assert_eq!(frame.get(1, 2).unwrap().intensity, Intensity::Bold);
    }

    #[test]
    fn render_skips_drops_outside_a_smaller_frame() {
        let mut field = RainField::new(20, 40);
        field.drops.push(Raindrop {
            col: 30,
            row: 15.0,
            speed: 0.5,
            glyph: '|',
        });
        let mut frame = Frame::new(10, 5);
        field.render(&mut frame, Mode::Calm, &Palette::default());
        assert_eq!(frame.occupied(), 0);
    }

    #[test]
    fn zero_sized_field_never_spawns() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = RainField::new(0, 0);
        assert_eq!(field.spawn(&forced(Mode::Storm, 0), &mut rng), 0);
    }
}
