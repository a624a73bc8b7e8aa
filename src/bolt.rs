// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crossterm::style::Color;
use rand::Rng;

use crate::{
    cell::{Cell, Intensity},
    frame::Frame,
    glyphs::bolt_glyph,
};

pub const GROWTH_DELAY: Duration = Duration::from_millis(2);
pub const SEGMENT_LIFESPAN: Duration = Duration::from_millis(800);

/// Horizontal wander of the main channel per step.
const WANDER: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoltTuning {
    pub growth_delay: Duration,
    pub lifespan: Duration,
    pub branch_chance: f32,
    pub max_branches: usize,
    pub fork_chance: f32,
    pub fork_spread: i32,
}

impl Default for BoltTuning {
    fn default() -> Self {
        Self {
            growth_delay: GROWTH_DELAY,
            lifespan: SEGMENT_LIFESPAN,
            branch_chance: 0.3,
            max_branches: 2,
            fork_chance: 0.15,
            fork_spread: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub row: u16,
    pub col: u16,
    pub born: Instant,
}

impl Segment {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Growing,
    Frozen,
}

/// One lightning strike. Grows downward a step at a time while `Growing`,
/// then only fades. The owner drops it once `update` reports nothing left
/// to show.
#[derive(Clone, Debug)]
pub struct Bolt {
    segments: Vec<Segment>,
    target_len: usize,
    phase: Phase,
    last_growth: Instant,
    rows: u16,
    cols: u16,
    tuning: BoltTuning,
}

/// Random target length in `[rows/2, rows-2]`. Short screens collapse the
/// range to `rows/2`, never below one.
pub fn target_length<R: Rng + ?Sized>(rows: u16, rng: &mut R) -> usize {
    let lo = (rows / 2).max(1) as usize;
    let hi = (rows.saturating_sub(2) as usize).max(lo);
    rng.random_range(lo..=hi)
}

/// Collapses segments sharing a cell. The later segment replaces the
/// earlier one in place.
fn dedup_cells(fresh: Vec<Segment>) -> Vec<Segment> {
    let mut unique: Vec<Segment> = Vec::with_capacity(fresh.len());
    for seg in fresh {
        match unique
            .iter_mut()
            .find(|s| s.row == seg.row && s.col == seg.col)
        {
            Some(slot) => *slot = seg,
            None => unique.push(seg),
        }
    }
    unique
}

fn shifted(col: u16, offset: i32, cols: u16) -> u16 {
    let max = cols.saturating_sub(1) as i32;
    (col as i32 + offset).clamp(0, max) as u16
}

impl Bolt {
    pub fn new<R: Rng + ?Sized>(
        start_row: u16,
        start_col: u16,
        rows: u16,
        cols: u16,
        tuning: BoltTuning,
        now: Instant,
        rng: &mut R,
    ) -> Self {
        let target_len = target_length(rows, rng);
        Self::with_target(start_row, start_col, rows, cols, target_len, tuning, now)
    }

    pub fn with_target(
        start_row: u16,
        start_col: u16,
        rows: u16,
        cols: u16,
        target_len: usize,
        tuning: BoltTuning,
        now: Instant,
    ) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            segments: vec![Segment {
                row: start_row.min(rows - 1),
                col: start_col.min(cols - 1),
                born: now,
            }],
            target_len: target_len.max(1),
            phase: Phase::Growing,
            last_growth: now,
            rows,
            cols,
            tuning,
        }
    }

    #[allow(dead_code)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn is_growing(&self) -> bool {
        self.phase == Phase::Growing
    }

    /// Advances growth if it is due, then reports whether any segment is
    /// still within its lifespan.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> bool {
        if self.phase == Phase::Growing
            && now.saturating_duration_since(self.last_growth) >= self.tuning.growth_delay
        {
            self.last_growth = now;
            let before = self.segments.len();
            let added = self.grow(now, rng);
            let at_bottom = self
                .segments
                .last()
                .is_some_and(|s| s.row.saturating_add(1) >= self.rows);

            if added == 0 || before >= self.target_len || at_bottom {
                self.phase = Phase::Frozen;
            }
        }

        self.is_visible(now)
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.segments
            .iter()
            .any(|s| s.age(now) <= self.tuning.lifespan)
    }

    /// One growth step from the newest segment. Returns how many segments
    /// were appended.
    fn grow<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> usize {
        let Some(last) = self.segments.last().copied() else {
            return 0;
        };
        if last.row.saturating_add(1) >= self.rows {
            return 0;
        }

        let mut branches = 1;
        if rng.random::<f32>() < self.tuning.branch_chance {
            branches = rng.random_range(1..=self.tuning.max_branches + 1);
        }
        // Branches alone never overshoot the target; a fork may add one more.
        let room = self.target_len.saturating_sub(self.segments.len()).max(1);
        branches = branches.min(room);

        // Every branch of a step lands on the next row; only the column
        // carries over from one branch to the next.
        let row = last.row.saturating_add(1).min(self.rows - 1);
        let mut fresh: Vec<Segment> = Vec::with_capacity(branches + 1);
        let mut col = last.col;
        let mut primary_col = col;
        for i in 0..branches {
            col = shifted(col, rng.random_range(-WANDER..=WANDER), self.cols);
            fresh.push(Segment { row, col, born: now });
            if i == 0 {
                primary_col = col;
            }
        }

        if rng.random::<f32>() < self.tuning.fork_chance {
            let spread = self.tuning.fork_spread.max(1);
            let mut offset = rng.random_range(-spread..=spread);
            if offset == 0 {
                offset = if rng.random_bool(0.5) { 1 } else { -1 };
            }
            let fork_col = shifted(last.col, offset, self.cols);
            if fork_col != primary_col {
                fresh.push(Segment {
                    row,
                    col: fork_col,
                    born: now,
                });
            }
        }

        let unique = dedup_cells(fresh);
        let added = unique.len();
        self.segments.extend(unique);
        added
    }

    pub fn render(&self, frame: &mut Frame, color: Option<Color>, now: Instant) {
        let lifespan = self.tuning.lifespan.as_secs_f32();
        if lifespan <= 0.0 {
            return;
        }
        for s in &self.segments {
            let norm_age = s.age(now).as_secs_f32() / lifespan;
            let Some(ch) = bolt_glyph(norm_age) else {
                continue;
            };
            frame.put(s.row, s.col, Cell::new(ch, color, Intensity::Bold));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn straight() -> BoltTuning {
        BoltTuning {
            branch_chance: 0.0,
            fork_chance: 0.0,
            ..BoltTuning::default()
        }
    }

    fn step(bolt: &mut Bolt, t0: Instant, n: u32, rng: &mut StdRng) -> bool {
        bolt.update(t0 + GROWTH_DELAY * n, rng)
    }

    #[test]
    fn target_length_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let t = target_length(24, &mut rng);
            assert!((12..=22).contains(&t));
        }
        assert_eq!(target_length(2, &mut rng), 1);
        assert_eq!(target_length(3, &mut rng), 1);
        assert_eq!(target_length(0, &mut rng), 1);
    }

    #[test]
    fn straight_bolt_grows_one_row_per_step_until_target() {
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        let mut bolt = Bolt::with_target(0, 40, 24, 80, 10, straight(), t0);

        for n in 1..=10 {
            assert!(bolt.is_growing());
            assert!(step(&mut bolt, t0, n, &mut rng));
        }

        let segs = bolt.segments();
        assert_eq!(segs.len(), 11);
        assert_eq!(bolt.phase(), Phase::Frozen);
        for pair in segs.windows(2) {
            assert_eq!(pair[1].row, pair[0].row + 1);
            assert!((pair[1].col as i32 - pair[0].col as i32).abs() <= 2);
        }

        step(&mut bolt, t0, 11, &mut rng);
        assert_eq!(bolt.segments().len(), 11);
    }

    #[test]
    fn growth_waits_for_the_delay() {
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        let mut bolt = Bolt::with_target(0, 40, 24, 80, 10, straight(), t0);
        bolt.update(t0 + Duration::from_micros(500), &mut rng);
        assert_eq!(bolt.segments().len(), 1);
        bolt.update(t0 + GROWTH_DELAY, &mut rng);
        assert_eq!(bolt.segments().len(), 2);
    }

    #[test]
    fn growing_bolt_never_exceeds_target_plus_one() {
        let tuning = BoltTuning {
            branch_chance: 1.0,
            fork_chance: 1.0,
            ..BoltTuning::default()
        };
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t0 = Instant::now();
            let mut bolt = Bolt::new(0, 40, 24, 80, tuning, t0, &mut rng);
            let mut n = 1;
            while bolt.is_growing() {
                step(&mut bolt, t0, n, &mut rng);
                if bolt.is_growing() {
                    assert!(bolt.segments().len() <= bolt.target_len() + 1);
                }
                n += 1;
                assert!(n < 100, "bolt never froze");
            }
        }
    }

    #[test]
    fn bolt_freezes_at_the_bottom_row() {
        let mut rng = StdRng::seed_from_u64(9);
        let t0 = Instant::now();
        let mut bolt = Bolt::with_target(0, 5, 4, 10, 100, straight(), t0);
        let mut n = 1;
        while bolt.is_growing() {
            step(&mut bolt, t0, n, &mut rng);
            n += 1;
        }
        let last = bolt.segments().last().unwrap();
        assert_eq!(last.row, 3);
        assert_eq!(bolt.segments().len(), 4);
        assert!(bolt.segments().iter().all(|s| s.row < 4 && s.col < 10));
    }

    #[test]
    fn bolt_starting_on_the_bottom_row_freezes_without_growing() {
        let mut rng = StdRng::seed_from_u64(9);
        let t0 = Instant::now();
        let mut bolt = Bolt::with_target(3, 5, 4, 10, 100, straight(), t0);
        step(&mut bolt, t0, 1, &mut rng);
        assert_eq!(bolt.phase(), Phase::Frozen);
        assert_eq!(bolt.segments().len(), 1);
    }

    #[test]
    fn forks_stay_inside_bounds_and_never_duplicate_a_cell_in_one_step() {
        let tuning = BoltTuning {
            branch_chance: 1.0,
            fork_chance: 1.0,
            ..BoltTuning::default()
        };
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t0 = Instant::now();
            let mut bolt = Bolt::with_target(0, 0, 12, 3, 50, tuning, t0);
            for n in 1..=20 {
                step(&mut bolt, t0, n, &mut rng);
            }
            let segs = bolt.segments();
            assert!(segs.iter().all(|s| s.row < 12 && s.col < 3));
            for (i, a) in segs.iter().enumerate() {
                for b in &segs[i + 1..] {
                    if a.born == b.born {
                        assert!((a.row, a.col) != (b.row, b.col));
                    }
                }
            }
        }
    }

    #[test]
    fn branches_of_one_step_share_the_next_row() {
        let tuning = BoltTuning {
            branch_chance: 1.0,
            fork_chance: 0.0,
            ..BoltTuning::default()
        };
        let mut multi_branch_steps = 0;
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t0 = Instant::now();
            let mut bolt = Bolt::with_target(0, 40, 24, 80, 20, tuning, t0);
            step(&mut bolt, t0, 1, &mut rng);

            let added = &bolt.segments()[1..];
            assert!((1..=3).contains(&added.len()));
            if added.len() > 1 {
                multi_branch_steps += 1;
            }
            assert!(added.iter().all(|s| s.row == 1), "seed {seed}: {added:?}");

            let mut prev_col = 40i32;
            for s in added {
                assert!((s.col as i32 - prev_col).abs() <= WANDER);
                prev_col = s.col as i32;
            }
            for (i, a) in added.iter().enumerate() {
                assert!(added[i + 1..].iter().all(|b| b.col != a.col));
            }
        }
        assert!(multi_branch_steps > 0);
    }

    #[test]
    fn fork_lands_on_the_branch_row_within_spread() {
        let tuning = BoltTuning {
            branch_chance: 1.0,
            fork_chance: 1.0,
            ..BoltTuning::default()
        };
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t0 = Instant::now();
            let mut bolt = Bolt::with_target(5, 40, 24, 80, 20, tuning, t0);
            step(&mut bolt, t0, 1, &mut rng);

            let added = &bolt.segments()[1..];
            assert!((1..=4).contains(&added.len()));
            for s in added {
                assert_eq!(s.row, 6);
                assert!((s.col as i32 - 40).abs() <= 3 * WANDER);
            }
            for (i, a) in added.iter().enumerate() {
                assert!(added[i + 1..].iter().all(|b| b.col != a.col));
            }
        }
    }

    #[test]
    fn dedup_keeps_the_later_write_for_a_shared_cell() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(1);
        let seg = |col, born| Segment { row: 4, col, born };

        let out = dedup_cells(vec![seg(7, t0), seg(8, t0), seg(7, t1)]);
        assert_eq!(out, vec![seg(7, t1), seg(8, t0)]);

        let out = dedup_cells(vec![seg(1, t0), seg(2, t0), seg(3, t0)]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn keep_until_every_segment_is_older_than_lifespan() {
        let mut rng = StdRng::seed_from_u64(2);
        let t0 = Instant::now();
        let mut bolt = Bolt::with_target(0, 10, 24, 80, 3, straight(), t0);
        for n in 1..=5 {
            step(&mut bolt, t0, n, &mut rng);
        }
        let newest = bolt.segments().iter().map(|s| s.born).max().unwrap();

        assert!(bolt.update(newest + SEGMENT_LIFESPAN, &mut rng));
        assert!(!bolt.update(newest + SEGMENT_LIFESPAN + Duration::from_millis(1), &mut rng));
    }

    #[test]
    fn segment_glyph_fades_with_age() {
        let t0 = Instant::now();
        let bolt = Bolt::with_target(2, 3, 24, 80, 10, straight(), t0);

        let mut frame = Frame::new(80, 24);
        bolt.render(&mut frame, Some(Color::DarkYellow), t0 + Duration::from_millis(100));
        let cell = frame.get(2, 3).unwrap();
        assert_eq!(cell.ch, '#');
        assert_eq!(cell.intensity, Intensity::Bold);
        assert_eq!(cell.fg, Some(Color::DarkYellow));

        let mut frame = Frame::new(80, 24);
        bolt.render(&mut frame, None, t0 + Duration::from_millis(400));
        assert_eq!(frame.get(2, 3).unwrap().ch, '+');

        let mut frame = Frame::new(80, 24);
        bolt.render(&mut frame, None, t0 + Duration::from_millis(700));
        assert_eq!(frame.get(2, 3).unwrap().ch, '*');

        let mut frame = Frame::new(80, 24);
        bolt.render(&mut frame, None, t0 + Duration::from_millis(900));
        assert_eq!(frame.occupied(), 0);
    }

    #[test]
    fn start_position_is_clamped_into_bounds() {
        let t0 = Instant::now();
        let bolt = Bolt::with_target(50, 200, 24, 80, 10, straight(), t0);
        let s = bolt.segments()[0];
        assert_eq!((s.row, s.col), (23, 79));
    }
}
