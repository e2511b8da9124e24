//! Progress reporting for batch runs.
//!
//! The driver reports through [`ProgressSink`]; the CLI renders a bar on
//! stderr and library callers can pass [`NoProgress`].

use std::io::{self, IsTerminal, Write};
use std::time::Instant;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};

/// Number of numbered steps in a migration run.
pub const NUM_STEPS: usize = 2;

/// Receiver of progress events from a batch run.
pub trait ProgressSink {
    /// A new numbered step begins.
    fn step(&mut self, number: usize, message: &str);

    /// Per-file work begins over `total` files.
    fn start(&mut self, total: usize);

    /// One file is done.
    fn tick(&mut self);

    /// Print a message above the bar without disturbing it.
    fn interrupt(&mut self, message: &str);

    fn finish(&mut self);
}

/// Discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn step(&mut self, _number: usize, _message: &str) {}
    fn start(&mut self, _total: usize) {}
    fn tick(&mut self) {}
    fn interrupt(&mut self, _message: &str) {}
    fn finish(&mut self) {}
}

/// Renders `[>>>>>     ] 50% 1.2s` on a terminal.
///
/// On a terminal the step marker is dimmed and interrupt lines are red;
/// otherwise output is plain text.
pub struct BarProgress<W: Write> {
    out: W,
    width: usize,
    total: usize,
    done: usize,
    started: Option<Instant>,
    draw_bar: bool,
}

impl BarProgress<io::Stderr> {
    /// A bar on stderr, drawn only when stderr is a terminal.
    pub fn stderr() -> Self {
        let draw_bar = io::stderr().is_terminal();
        BarProgress::new(io::stderr(), draw_bar)
    }
}

impl<W: Write> BarProgress<W> {
    pub fn new(out: W, draw_bar: bool) -> Self {
        BarProgress {
            out,
            width: 40,
            total: 0,
            done: 0,
            started: None,
            draw_bar,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self) -> String {
        let ratio = if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        };
        let filled = ((ratio * self.width as f64).floor() as usize).min(self.width);
        let eta = match self.started {
            Some(started) if self.done > 0 && self.done < self.total => {
                let per_item = started.elapsed().as_secs_f64() / self.done as f64;
                per_item * (self.total - self.done) as f64
            }
            _ => 0.0,
        };
        format!(
            "[{}{}] {}% {:.1}s",
            ">".repeat(filled),
            " ".repeat(self.width - filled),
            (ratio * 100.0).floor() as u32,
            eta
        )
    }

    fn draw(&mut self) {
        if !self.draw_bar {
            return;
        }
        let line = self.render();
        // Progress output is best effort.
        let _ = write!(self.out, "\r{}", line);
        let _ = self.out.flush();
    }

    fn clear(&mut self) {
        if self.draw_bar && self.started.is_some() {
            let _ = queue!(self.out, Clear(ClearType::CurrentLine), MoveToColumn(0));
        }
    }
}

impl<W: Write> ProgressSink for BarProgress<W> {
    fn step(&mut self, number: usize, message: &str) {
        let marker = format!("[{}/{}]", number, NUM_STEPS);
        let _ = if self.draw_bar {
            writeln!(self.out, "{} {}", marker.dim(), message)
        } else {
            writeln!(self.out, "{} {}", marker, message)
        };
    }

    fn start(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.started = Some(Instant::now());
        self.draw();
    }

    fn tick(&mut self) {
        self.done = (self.done + 1).min(self.total);
        self.draw();
    }

    fn interrupt(&mut self, message: &str) {
        self.clear();
        let _ = if self.draw_bar {
            writeln!(self.out, "{}", message.red())
        } else {
            writeln!(self.out, "{}", message)
        };
        self.draw();
    }

    fn finish(&mut self) {
        if self.draw_bar && self.started.is_some() {
            let _ = writeln!(self.out);
        }
        self.started = None;
    }
}
