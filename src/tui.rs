//! Full-screen dashboard: step list, active step card and a pausable timer.

use crate::countdown::format_mmss;
use crate::model::Recipe;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    NotStarted,
    Running { since: Instant, banked: Duration },
    Paused { banked: Duration },
    Finished,
}

/// Wall-clock step timer that can be paused and resumed.
#[derive(Debug, Clone)]
pub struct StepTimer {
    total: Duration,
    phase: TimerPhase,
}

impl StepTimer {
    pub fn new(secs: u64) -> Self {
        Self {
            total: Duration::from_secs(secs),
            phase: TimerPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.phase {
            TimerPhase::NotStarted => Duration::ZERO,
            TimerPhase::Running { since, banked } => banked + now.saturating_duration_since(since),
            TimerPhase::Paused { banked } => banked,
            TimerPhase::Finished => self.total,
        }
    }

    /// Whole seconds left, rounded up so a fresh timer shows its full duration.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let left = self.total.saturating_sub(self.elapsed(now));
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }

    pub fn ratio(&self, now: Instant) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.elapsed(now).as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn start(&mut self, now: Instant) {
        if self.phase == TimerPhase::NotStarted {
            self.phase = TimerPhase::Running {
                since: now,
                banked: Duration::ZERO,
            };
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        self.phase = match self.phase {
            TimerPhase::Running { .. } => TimerPhase::Paused {
                banked: self.elapsed(now),
            },
            TimerPhase::Paused { banked } => TimerPhase::Running { since: now, banked },
            other => other,
        };
    }

    /// Returns true exactly once, on the update that finishes the timer.
    pub fn update(&mut self, now: Instant) -> bool {
        if matches!(self.phase, TimerPhase::Running { .. }) && self.elapsed(now) >= self.total {
            self.phase = TimerPhase::Finished;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    Done,
    Active,
    Upcoming,
}

pub struct Dashboard<'a> {
    pub recipe: &'a Recipe,
    pub current: usize,
    pub timer: StepTimer,
    pub completed: bool,
    pub now: Instant,
}

impl<'a> Dashboard<'a> {
    pub fn new(recipe: &'a Recipe, now: Instant) -> Self {
        Self {
            recipe,
            current: 0,
            timer: StepTimer::new(recipe.steps()[0].duration()),
            completed: false,
            now,
        }
    }

    /// The main button: finish an untimed or finished step, otherwise start
    /// the timer, or pause/resume it once started.
    pub fn press_enter(&mut self, now: Instant) {
        if self.completed {
            return;
        }
        self.tick(now);
        let timed = self.recipe.steps()[self.current].has_timer();
        match self.timer.phase() {
            _ if !timed => self.advance(),
            TimerPhase::Finished => self.advance(),
            TimerPhase::NotStarted => self.timer.start(now),
            TimerPhase::Running { .. } | TimerPhase::Paused { .. } => self.timer.toggle_pause(now),
        }
    }

    pub fn press_space(&mut self, now: Instant) {
        if !self.completed {
            self.tick(now);
            self.timer.toggle_pause(now);
        }
    }

    /// Dispatch one key press. Returns false when the dashboard should close:
    /// `q`/`Esc` at any time, or any key on the completion screen.
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        if self.completed {
            return false;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter => self.press_enter(now),
            KeyCode::Char(' ') => self.press_space(now),
            _ => {}
        }
        true
    }

    /// Advance the clock. Returns true when the active timer just ran out.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.now = now;
        self.timer.update(now)
    }

    pub fn mark(&self, index: usize) -> StepMark {
        if self.completed || index < self.current {
            StepMark::Done
        } else if index == self.current {
            StepMark::Active
        } else {
            StepMark::Upcoming
        }
    }

    fn advance(&mut self) {
        debug!("Step {} done", self.current + 1);
        if self.current + 1 < self.recipe.len() {
            self.current += 1;
            self.timer = StepTimer::new(self.recipe.steps()[self.current].duration());
        } else {
            self.completed = true;
        }
    }
}

/// Run the dashboard on the alternate screen. The terminal is restored even
/// when the session itself fails.
pub fn run_tui(recipe: &Recipe) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let outcome = run(&mut terminal, recipe);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;

    outcome
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, recipe: &Recipe) -> Result<()> {
    let mut dash = Dashboard::new(recipe, Instant::now());

    loop {
        if dash.tick(Instant::now()) {
            // Audible alarm when the timer runs out.
            let out = terminal.backend_mut();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        terminal.draw(|f| ui(f, &dash))?;

        if event::poll(POLL)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if !dash.handle_key(code, Instant::now()) {
                    break;
                }
            }
        }
    }

    Ok(())
}

pub fn ui(f: &mut Frame, dash: &Dashboard) {
    let size = f.area();

    let root_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(size);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(root_chunks[0]);

    // Steps list.
    let items: Vec<ListItem> = dash
        .recipe
        .steps()
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            let (marker, style) = match dash.mark(idx) {
                StepMark::Done => ("[✓]", Style::default().fg(Color::Green)),
                StepMark::Active => (
                    "[>]",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                StepMark::Upcoming => ("[ ]", Style::default().fg(Color::DarkGray)),
            };
            let time = if step.has_timer() {
                format!(" ({})", format_mmss(step.duration()))
            } else {
                String::new()
            };
            ListItem::new(format!("{} {}. {}{}", marker, idx + 1, step.description(), time))
                .style(style)
        })
        .collect();

    let steps_list =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Steps"));
    f.render_widget(steps_list, chunks[0]);

    if dash.completed {
        let done = Paragraph::new("\nAll steps completed! Enjoy your meal!\n\nPress any key to exit.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Done"));
        f.render_widget(done, chunks[1]);
    } else {
        render_step_card(f, dash, chunks[1]);
    }

    let help = if dash.completed {
        " Press any key to exit."
    } else {
        " Enter=Start/Done | Space=Pause/Resume | q=Quit"
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(format!(" Step {}/{} |", dash.current + 1, dash.recipe.len())),
        Span::raw(help),
    ]));
    f.render_widget(status, root_chunks[1]);
}

fn render_step_card(f: &mut Frame, dash: &Dashboard, area: ratatui::layout::Rect) {
    let step = &dash.recipe.steps()[dash.current];
    let now = dash.now;

    let card_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(area);

    let card = Paragraph::new(step.description().to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Step {} of {}", dash.current + 1, dash.recipe.len())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(card, card_chunks[0]);

    if !step.has_timer() {
        let note = Paragraph::new("No timer. Press Enter when you are done.")
            .block(Block::default().borders(Borders::ALL).title("Timer"));
        f.render_widget(note, card_chunks[1]);
        return;
    }

    let remaining = format_mmss(dash.timer.remaining_secs(now));
    let (title, label, color) = match dash.timer.phase() {
        TimerPhase::NotStarted => ("Timer", format!("{} - press Enter to start", remaining), Color::White),
        TimerPhase::Running { .. } => ("Timer running", remaining, Color::Yellow),
        TimerPhase::Paused { .. } => ("Timer paused", format!("{} (paused)", remaining), Color::Blue),
        TimerPhase::Finished => (
            "Timer complete!",
            "Timer complete! Press Enter when you have actually finished.".to_string(),
            Color::Green,
        ),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color))
        .ratio(dash.timer.ratio(now))
        .label(label);
    f.render_widget(gauge, card_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use ratatui::backend::TestBackend;

    fn recipe() -> Recipe {
        Recipe::new(vec![Step::new("Crack eggs", 10), Step::new("Serve", 0)]).unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn timer_pauses_and_resumes() {
        let t0 = Instant::now();
        let mut timer = StepTimer::new(10);
        assert_eq!(timer.remaining_secs(t0), 10);

        timer.start(t0);
        assert_eq!(timer.remaining_secs(t0 + secs(3)), 7);

        timer.toggle_pause(t0 + secs(4));
        assert_eq!(timer.remaining_secs(t0 + secs(100)), 6);

        timer.toggle_pause(t0 + secs(100));
        assert!(!timer.update(t0 + secs(105)));
        assert!(timer.update(t0 + secs(106)));
        assert_eq!(timer.phase(), TimerPhase::Finished);
        assert!(!timer.update(t0 + secs(107)));
        assert_eq!(timer.remaining_secs(t0 + secs(107)), 0);
    }

    #[test]
    fn finished_timer_waits_for_enter() {
        let t0 = Instant::now();
        let recipe = recipe();
        let mut dash = Dashboard::new(&recipe, t0);

        dash.press_enter(t0);
        assert!(matches!(dash.timer.phase(), TimerPhase::Running { .. }));

        assert!(dash.tick(t0 + secs(10)));
        assert_eq!(dash.current, 0);
        assert_eq!(dash.mark(0), StepMark::Active);

        dash.press_enter(t0 + secs(11));
        assert_eq!(dash.current, 1);
        assert_eq!(dash.mark(0), StepMark::Done);
        assert_eq!(dash.mark(1), StepMark::Active);

        dash.press_enter(t0 + secs(12));
        assert!(dash.completed);
        assert_eq!(dash.mark(1), StepMark::Done);
    }

    #[test]
    fn enter_while_running_pauses() {
        let t0 = Instant::now();
        let recipe = recipe();
        let mut dash = Dashboard::new(&recipe, t0);

        dash.press_enter(t0);
        dash.press_enter(t0 + secs(2));
        assert_eq!(dash.timer.phase(), TimerPhase::Paused { banked: secs(2) });
        dash.press_space(t0 + secs(5));
        assert!(matches!(dash.timer.phase(), TimerPhase::Running { .. }));
        assert_eq!(dash.current, 0);
    }

    #[test]
    fn key_dispatch_and_quit() {
        let t0 = Instant::now();
        let recipe = recipe();
        let mut dash = Dashboard::new(&recipe, t0);

        assert!(dash.handle_key(KeyCode::Char('x'), t0));
        assert_eq!(dash.timer.phase(), TimerPhase::NotStarted);

        assert!(dash.handle_key(KeyCode::Enter, t0));
        assert!(matches!(dash.timer.phase(), TimerPhase::Running { .. }));
        assert!(dash.handle_key(KeyCode::Char(' '), t0 + secs(1)));
        assert!(matches!(dash.timer.phase(), TimerPhase::Paused { .. }));

        assert!(!dash.handle_key(KeyCode::Char('q'), t0 + secs(2)));
        assert!(!dash.handle_key(KeyCode::Esc, t0 + secs(2)));
        assert!(!dash.completed);
    }

    #[test]
    fn any_key_closes_completion_screen() {
        let t0 = Instant::now();
        let recipe = Recipe::new(vec![Step::new("Serve", 0)]).unwrap();
        let mut dash = Dashboard::new(&recipe, t0);

        assert!(dash.handle_key(KeyCode::Enter, t0));
        assert!(dash.completed);
        assert!(!dash.handle_key(KeyCode::Char('x'), t0));
        assert!(!dash.handle_key(KeyCode::Enter, t0));
    }

    #[test]
    fn renders_step_list_and_card() {
        let t0 = Instant::now();
        let recipe = recipe();
        let dash = Dashboard::new(&recipe, t0);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| ui(f, &dash)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("[>] 1. Crack eggs (00:10)"));
        assert!(text.contains("[ ] 2. Serve"));
        assert!(text.contains("Step 1 of 2"));
        assert!(text.contains("00:10 - press Enter to start"));
    }
}
