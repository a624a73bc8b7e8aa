// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::{
    display::Display,
    frame::Frame,
    palette::Palette,
    rain::{RainField, RainParams},
    runtime::Mode,
    storm::BoltManager,
};

pub const UPDATE_INTERVAL: Duration = Duration::from_millis(15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Quit,
    ToggleStorm,
    Resize,
}

pub fn transition_for(ev: &Event) -> Option<Transition> {
    match ev {
        Event::Resize(..) => Some(Transition::Resize),
        Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Transition::Quit),
            (KeyCode::Esc, _) | (KeyCode::Char('q' | 'Q'), _) => Some(Transition::Quit),
            (KeyCode::Char('t' | 'T'), _) => Some(Transition::ToggleStorm),
            _ => None,
        },
        _ => None,
    }
}

/// Fixed-interval pacing without catch-up: a late tick starts right away and
/// the schedule restarts from there.
#[derive(Clone, Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Time left before the next tick may start.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Sleeps out the rest of the interval and returns the tick start.
    pub fn wait(&mut self) -> Instant {
        let left = self.remaining(Instant::now());
        if !left.is_zero() {
            thread::sleep(left);
        }
        let start = Instant::now();
        self.last = Some(start);
        start
    }
}

/// Rain, lightning and the storm toggle for one screen.
pub struct Simulation {
    rows: u16,
    cols: u16,
    mode: Mode,
    running: bool,
    force_redraw: bool,
    palette: Palette,
    rain: RainField,
    bolts: BoltManager,
    rng: StdRng,
}

impl Simulation {
    pub fn new(rows: u16, cols: u16, palette: Palette, rng: StdRng) -> Self {
        Self {
            rows,
            cols,
            mode: Mode::Calm,
            running: true,
            force_redraw: true,
            palette,
            rain: RainField::new(rows, cols),
            bolts: BoltManager::default(),
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bounds(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn rain(&self) -> &RainField {
        &self.rain
    }

    #[cfg(test)]
    pub fn bolts(&self) -> &BoltManager {
        &self.bolts
    }

    #[cfg(test)]
    pub fn bolts_mut(&mut self) -> &mut BoltManager {
        &mut self.bolts
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_storm(&mut self) {
        self.mode = self.mode.toggled();
        info!(
            mode = self.mode.label(),
            dropped_drops = self.rain.len(),
            dropped_bolts = self.bolts.len(),
            "storm toggled"
        );
        self.rain.clear();
        self.bolts.clear();
        self.force_redraw = true;
    }

    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
        self.rain.reset(rows, cols);
        self.bolts.clear();
        self.force_redraw = true;
        info!(rows, cols, "display resized");
    }

    /// One simulation step: lightning first, then rain.
    pub fn tick(&mut self, now: Instant) {
        self.bolts
            .maybe_spawn(self.mode, self.rows, self.cols, now, &mut self.rng);
        self.bolts.advance_all(now, &mut self.rng);

        let params = RainParams::for_mode(self.mode, self.cols);
        self.rain.spawn(&params, &mut self.rng);
        self.rain.advance();
    }

    /// Redraws everything into `frame`. Rain is drawn over lightning.
    pub fn render(&mut self, frame: &mut Frame, now: Instant) {
        if self.force_redraw {
            frame.invalidate();
            self.force_redraw = false;
        }
        frame.clear();
        self.bolts.render_all(frame, &self.palette, now);
        self.rain.render(frame, self.mode, &self.palette);
    }
}

/// Drives `sim` against `display` at [`UPDATE_INTERVAL`] until quit, or
/// until `stop` is raised from outside.
pub fn run<D: Display>(display: &mut D, sim: &mut Simulation, stop: &AtomicBool) -> Result<()> {
    run_paced(display, sim, stop, UPDATE_INTERVAL)
}

pub fn run_paced<D: Display>(
    display: &mut D,
    sim: &mut Simulation,
    stop: &AtomicBool,
    interval: Duration,
) -> Result<()> {
    let (rows, cols) = display.dimensions()?;
    if (rows, cols) != sim.bounds() {
        sim.resize(rows, cols);
    }
    let mut frame = Frame::new(cols, rows);
    let mut pacer = Pacer::new(interval);

    while sim.is_running() {
        if stop.load(Ordering::Relaxed) {
            sim.quit();
            break;
        }

        while let Some(ev) = display.poll_input(Duration::ZERO)? {
            match transition_for(&ev) {
                Some(Transition::Quit) => sim.quit(),
                Some(Transition::ToggleStorm) => sim.toggle_storm(),
                Some(Transition::Resize) => {
                    let (rows, cols) = display.dimensions()?;
                    sim.resize(rows, cols);
                    frame = Frame::new(cols, rows);
                }
                None => {}
            }
            if !sim.is_running() {
                break;
            }
        }
        if !sim.is_running() {
            break;
        }

        let now = pacer.wait();
        sim.tick(now);
        sim.render(&mut frame, now);
        if let Err(e) = display.commit_frame(&mut frame) {
            warn!(error = %e, "display failed, stopping");
            return Err(e);
        }
    }

    Ok(())
}
