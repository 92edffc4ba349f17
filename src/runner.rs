//! Line-based guided session.
//!
//! Walks the recipe one step at a time, blocking on a line of input for every
//! acknowledgment. A timed step runs its countdown after the first
//! acknowledgment and then waits for a second one: the timer reaching zero
//! never advances the session by itself.

use crate::countdown::{run_countdown, Ticker};
use crate::error::SessionError;
use crate::model::Recipe;
use std::io::{BufRead, Write};
use tracing::debug;

const DIVIDER: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingStart,
    AwaitingStepAck { index: usize },
    CountingDown { index: usize },
    AwaitingStepDone { index: usize },
    Completed,
}

impl SessionState {
    /// The state that follows `self` for `recipe`, or `None` once completed.
    pub fn next(self, recipe: &Recipe) -> Option<SessionState> {
        use SessionState::*;

        match self {
            AwaitingStart => Some(AwaitingStepAck { index: 0 }),
            AwaitingStepAck { index } => {
                let timed = recipe.get(index).is_some_and(|s| s.has_timer());
                Some(if timed {
                    CountingDown { index }
                } else {
                    AwaitingStepDone { index }
                })
            }
            CountingDown { index } => Some(AwaitingStepDone { index }),
            AwaitingStepDone { index } if index + 1 < recipe.len() => {
                Some(AwaitingStepAck { index: index + 1 })
            }
            AwaitingStepDone { .. } => Some(Completed),
            Completed => None,
        }
    }
}

pub struct GuidedRunner<R, W, T> {
    input: R,
    output: W,
    ticker: T,
    state: SessionState,
}

impl<R: BufRead, W: Write, T: Ticker> GuidedRunner<R, W, T> {
    pub fn new(input: R, output: W, ticker: T) -> Self {
        Self {
            input,
            output,
            ticker,
            state: SessionState::AwaitingStart,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the whole session. Returns once the completion message is shown.
    pub fn run(&mut self, recipe: &Recipe) -> Result<(), SessionError> {
        self.state = SessionState::AwaitingStart;
        loop {
            debug!("Session state: {:?}", self.state);
            self.enter(recipe)?;
            match self.state.next(recipe) {
                Some(next) => self.state = next,
                None => break,
            }
        }
        Ok(())
    }

    fn enter(&mut self, recipe: &Recipe) -> Result<(), SessionError> {
        match self.state {
            SessionState::AwaitingStart => {
                self.divider()?;
                writeln!(self.output, "Cooking Assistant - Guided Mode")?;
                self.divider()?;
                self.prompt("Press ENTER to begin...")?;
            }
            SessionState::AwaitingStepAck { index } => {
                let step = &recipe.steps()[index];
                self.divider()?;
                writeln!(self.output, "Step {}/{}:", index + 1, recipe.len())?;
                writeln!(self.output, "{}", step.description())?;
                writeln!(self.output, "Suggested time: {} seconds\n", step.duration())?;
                self.prompt("Press ENTER when you're ready to start this step...")?;
            }
            SessionState::CountingDown { index } => {
                let duration = recipe.steps()[index].duration();
                run_countdown(&mut self.output, &mut self.ticker, duration)?;
                writeln!(self.output, "Timer finished!")?;
            }
            SessionState::AwaitingStepDone { index } => {
                if recipe.steps()[index].has_timer() {
                    writeln!(
                        self.output,
                        "\nTimer reached 0. You may still need a moment to finish."
                    )?;
                    self.prompt(
                        "When you have actually finished this step, press ENTER to continue...",
                    )?;
                } else {
                    writeln!(self.output, "This step has no timer.")?;
                    self.prompt("When you have finished this step, press ENTER to continue...")?;
                }
            }
            SessionState::Completed => {
                self.divider()?;
                writeln!(self.output, "All steps completed! Enjoy your meal!")?;
                self.divider()?;
                self.output.flush()?;
            }
        }
        Ok(())
    }

    fn divider(&mut self) -> Result<(), SessionError> {
        writeln!(self.output, "\n{}", DIVIDER)?;
        Ok(())
    }

    /// Print `text` and block until a full line is read. Content is ignored.
    fn prompt(&mut self, text: &str) -> Result<(), SessionError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(())
    }
}
