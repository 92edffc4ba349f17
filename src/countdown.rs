//! Step countdown: MM:SS formatting, the tick sequence, and in-place rendering.

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

pub const TICK: Duration = Duration::from_secs(1);

/// Zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Yields `n, n-1, ..., 0`.
#[derive(Debug, Clone)]
pub struct Countdown {
    next: Option<u64>,
}

impl Countdown {
    pub fn new(total: u64) -> Self {
        Self { next: Some(total) }
    }
}

impl Iterator for Countdown {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = current.checked_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(n) => {
                let len = usize::try_from(n).ok().and_then(|n| n.checked_add(1));
                (len.unwrap_or(usize::MAX), len)
            }
            None => (0, Some(0)),
        }
    }
}

/// Source of the one-second pause between countdown renders.
pub trait Ticker {
    fn tick(&mut self);
}

impl<T: Ticker + ?Sized> Ticker for &mut T {
    fn tick(&mut self) {
        (**self).tick();
    }
}

/// Blocks the current thread for one [`TICK`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepTicker;

impl Ticker for SleepTicker {
    fn tick(&mut self) {
        thread::sleep(TICK);
    }
}

/// Render `Time remaining: MM:SS` for every value of the countdown, overwriting
/// the same terminal line, with one tick between consecutive renders.
pub fn run_countdown<W: Write, T: Ticker>(out: &mut W, ticker: &mut T, total: u64) -> io::Result<()> {
    for remaining in Countdown::new(total) {
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("Time remaining: {}", format_mmss(remaining)))
        )?;
        out.flush()?;

        if remaining > 0 {
            ticker.tick();
        }
    }
    writeln!(out)?;
    Ok(())
}
