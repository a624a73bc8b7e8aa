// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::time::Duration;

use crossterm::event::Event;

use crate::frame::Frame;

/// What the simulation needs from a screen. Cell writes and clearing happen
/// on the [`Frame`] back buffer; `commit_frame` pushes it out.
pub trait Display {
    /// Current size as `(rows, cols)`.
    fn dimensions(&self) -> Result<(u16, u16)>;

    /// Returns the next pending input, waiting at most `timeout`.
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Event>>;

    fn commit_frame(&mut self, frame: &mut Frame) -> Result<()>;
}
