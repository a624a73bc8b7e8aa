// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use crate::{
    bolt::{Bolt, BoltTuning},
    frame::Frame,
    palette::Palette,
    runtime::Mode,
};

pub const LIGHTNING_CHANCE: f32 = 0.005;
pub const MAX_ACTIVE_BOLTS: usize = 3;

#[derive(Clone, Debug)]
pub struct BoltManager {
    pub spawn_chance: f32,
    pub max_active: usize,
    pub tuning: BoltTuning,
    bolts: Vec<Bolt>,
}

impl Default for BoltManager {
    fn default() -> Self {
        Self {
            spawn_chance: LIGHTNING_CHANCE,
            max_active: MAX_ACTIVE_BOLTS,
            tuning: BoltTuning::default(),
            bolts: Vec::new(),
        }
    }
}

impl BoltManager {
    #[allow(dead_code)]
    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn len(&self) -> usize {
        self.bolts.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.bolts.is_empty()
    }

    pub fn clear(&mut self) {
        self.bolts.clear();
    }

    #[cfg(test)]
    pub fn push(&mut self, bolt: Bolt) {
        self.bolts.push(bolt);
    }

    /// Storm-only. Starts a bolt in the middle half of the width and the top
    /// fifth of the height when the roll succeeds and there is room.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        mode: Mode,
        rows: u16,
        cols: u16,
        now: Instant,
        rng: &mut R,
    ) -> bool {
        if !mode.is_storm() || self.bolts.len() >= self.max_active {
            return false;
        }
        if rows == 0 || cols == 0 {
            return false;
        }
        if rng.random::<f32>() >= self.spawn_chance {
            return false;
        }

        let col_lo = cols / 4;
        let col_hi = (3 * (cols as u32) / 4).min(cols as u32 - 1) as u16;
        let start_col = rng.random_range(col_lo..=col_hi.max(col_lo));
        let start_row = rng.random_range(0..=rows / 5);

        let bolt = Bolt::new(start_row, start_col, rows, cols, self.tuning, now, rng);
        debug!(
            row = start_row,
            col = start_col,
            target = bolt.target_len(),
            active = self.bolts.len() + 1,
            "bolt spawned"
        );
        self.bolts.push(bolt);
        true
    }

    pub fn advance_all<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        let before = self.bolts.len();
        self.bolts.retain_mut(|b| b.update(now, rng));
        let expired = before - self.bolts.len();
        if expired > 0 {
            debug!(expired, active = self.bolts.len(), "bolts faded out");
        }
    }

    pub fn render_all(&self, frame: &mut Frame, palette: &Palette, now: Instant) {
        for b in &self.bolts {
            b.render(frame, palette.lightning, now);
        }
    }
}
