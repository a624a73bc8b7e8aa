// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::{Cell, Intensity};
use crate::display::Display;
use crate::frame::Frame;

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }
}

/// Dirty cells that differ from what is on screen, in screen order.
fn collect_changes(last: &LastFrame, frame: &Frame, out: &mut Vec<usize>) {
    out.clear();
    out.extend(
        frame
            .dirty_indices()
            .iter()
            .copied()
            .filter(|&i| last.cells.get(i).is_some_and(|c| *c != frame.cell_at_index(i))),
    );
    out.sort_unstable();
}

fn intensity_attr(i: Intensity) -> Attribute {
    match i {
        Intensity::Bold => Attribute::Bold,
        Intensity::Dim => Attribute::Dim,
        Intensity::Normal => Attribute::NormalIntensity,
    }
}

/// Pen state while queueing a frame, so unchanged attributes are not
/// re-sent for every cell.
struct Pen {
    fg: Option<Color>,
    intensity: Intensity,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if cell.fg != self.fg {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = cell.fg;
        }
        if cell.intensity != self.intensity {
            // Bold and dim share one SGR slot; clear it before switching.
            out.queue(SetAttribute(Attribute::NormalIntensity))?;
            if cell.intensity != Intensity::Normal {
                out.queue(SetAttribute(intensity_attr(cell.intensity)))?;
            }
            self.intensity = cell.intensity;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Option<LastFrame>,
    order: Vec<usize>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            order: Vec::new(),
        })
    }

    fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let mut pen = Pen {
            fg: None,
            intensity: Intensity::Normal,
        };
        let mut cur_pos: Option<(u16, u16)> = None;

        let size_changed = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);

        if size_changed {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(LastFrame::new(frame.width, frame.height));
        }

        let total_cells = frame.width as usize * frame.height as usize;
        let dirty_is_large = total_cells > 0 && frame.dirty_indices().len() >= total_cells / 3;
        let full_redraw = size_changed || frame.is_dirty_all() || dirty_is_large;

        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };

        if full_redraw {
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let cell = frame.cell_at_index(idx);
                    pen.apply(&mut self.stdout, &cell)?;
                    self.stdout.queue(Print(cell.ch))?;
                    last.cells[idx] = cell;
                }
            }

            self.stdout.queue(SetAttribute(Attribute::Reset))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.flush()?;
            frame.clear_dirty();
            return Ok(());
        }

        // Changed cells in screen order. The cursor advances on its own
        // after a print, so a move is only queued when the cell is not
        // right after the previous one.
        let width = frame.width as usize;
        collect_changes(last, frame, &mut self.order);

        for &idx in &self.order {
            let cell = frame.cell_at_index(idx);
            last.cells[idx] = cell;

            let pos = ((idx % width) as u16, (idx / width) as u16);
            if cur_pos != Some(pos) {
                self.stdout.queue(cursor::MoveTo(pos.0, pos.1))?;
            }
            pen.apply(&mut self.stdout, &cell)?;
            self.stdout.queue(Print(cell.ch))?;

            let next_x = pos.0.saturating_add(1);
            cur_pos = (next_x < frame.width).then_some((next_x, pos.1));
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Display for Terminal {
    fn dimensions(&self) -> Result<(u16, u16)> {
        let (cols, rows) = terminal::size()?;
        Ok((rows, cols))
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            return event::read().map(Some);
        }
        Ok(None)
    }

    fn commit_frame(&mut self, frame: &mut Frame) -> Result<()> {
        self.draw(frame)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
