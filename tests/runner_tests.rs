//! Line-based guided sessions driven with scripted input.

use recipe_guide::{GuidedRunner, Recipe, SessionError, SessionState, Step, Ticker};

#[derive(Default)]
struct CountingTicker {
    ticks: u64,
}

impl Ticker for CountingTicker {
    fn tick(&mut self) {
        self.ticks += 1;
    }
}

fn recipe(steps: &[(&str, u64)]) -> Recipe {
    Recipe::new(steps.iter().map(|(d, s)| Step::new(*d, *s)).collect()).unwrap()
}

fn run_session(recipe: &Recipe, input: &str) -> (Result<(), SessionError>, String, u64, SessionState) {
    let mut out = Vec::new();
    let mut ticker = CountingTicker::default();
    let (res, state) = {
        let mut runner = GuidedRunner::new(input.as_bytes(), &mut out, &mut ticker);
        let res = runner.run(recipe);
        (res, runner.state())
    };
    (res, String::from_utf8(out).unwrap(), ticker.ticks, state)
}

#[test]
fn visits_every_step_in_order() {
    let recipe = recipe(&[("Crack eggs", 0), ("Whisk mixture", 0), ("Serve", 0)]);
    // start + one ack and one done per untimed step
    let (res, out, ticks, state) = run_session(&recipe, "\n\n\n\n\n\n\n");

    res.unwrap();
    assert_eq!(state, SessionState::Completed);
    assert_eq!(ticks, 0);

    let positions: Vec<usize> = ["Step 1/3:", "Step 2/3:", "Step 3/3:", "All steps completed!"]
        .iter()
        .map(|s| out.find(s).expect("missing output"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(out.matches("This step has no timer.").count(), 3);
    assert_eq!(out.matches("Step 1/3:").count(), 1);
}

#[test]
fn timed_step_counts_down_then_needs_second_ack() {
    let recipe = recipe(&[("Simmer", 3)]);
    let (res, out, ticks, state) = run_session(&recipe, "\n\n\n");

    res.unwrap();
    assert_eq!(state, SessionState::Completed);
    assert_eq!(ticks, 3);
    assert_eq!(out.matches("Time remaining:").count(), 4);
    assert!(out.contains("Suggested time: 3 seconds"));

    let finished = out.find("Timer finished!").unwrap();
    let buffer = out.find("Timer reached 0.").unwrap();
    let done_prompt = out.find("When you have actually finished this step").unwrap();
    let completed = out.find("All steps completed!").unwrap();
    assert!(finished < buffer && buffer < done_prompt && done_prompt < completed);
}

#[test]
fn does_not_complete_without_final_ack() {
    let recipe = recipe(&[("Simmer", 2), ("Serve", 0)]);
    // start, ack step 1, done step 1, ack step 2, but no final done
    let (res, out, _, state) = run_session(&recipe, "go\nok\nyes\nsure\n");

    assert!(matches!(res, Err(SessionError::InputClosed)));
    assert_eq!(state, SessionState::AwaitingStepDone { index: 1 });
    assert!(!out.contains("All steps completed!"));
}

#[test]
fn acknowledgment_content_is_ignored() {
    let recipe = recipe(&[("Serve", 0)]);
    let (res, _, _, state) = run_session(&recipe, "anything at all\nq\nstop\n");
    res.unwrap();
    assert_eq!(state, SessionState::Completed);
}

#[test]
fn closed_input_before_start() {
    let recipe = recipe(&[("Serve", 0)]);
    let (res, out, _, state) = run_session(&recipe, "");
    assert!(matches!(res, Err(SessionError::InputClosed)));
    assert_eq!(state, SessionState::AwaitingStart);
    assert!(out.contains("Press ENTER to begin..."));
    assert!(!out.contains("Step 1/1:"));
}
