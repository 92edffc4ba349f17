use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

/// A single recipe step: what to do and how long it should take.
///
/// A duration of zero means the step has no timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    description: String,
    duration: u64,
}

impl Step {
    pub fn new(description: impl Into<String>, duration: u64) -> Self {
        Self {
            description: description.into(),
            duration,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Suggested duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn has_timer(&self) -> bool {
        self.duration > 0
    }
}

/// Ordered, non-empty list of steps. Order is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    steps: Vec<Step>,
}

impl Recipe {
    /// Returns `None` when `steps` is empty.
    pub fn new(steps: Vec<Step>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self { steps })
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed `Recipe`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }
}

/// Why a recipe line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing '|' delimiter")]
    MissingDelimiter,
    #[error("empty duration or description")]
    EmptyField,
    #[error("invalid duration")]
    InvalidDuration,
    #[error("negative duration")]
    NegativeDuration,
}

/// Parse a trimmed duration field: a whole, non-negative number of seconds.
pub fn parse_duration(field: &str) -> Result<u64, SkipReason> {
    let field = field.trim();
    if field.is_empty() {
        return Err(SkipReason::EmptyField);
    }
    let seconds: i64 = field.parse().map_err(|_| SkipReason::InvalidDuration)?;
    u64::try_from(seconds).map_err(|_| SkipReason::NegativeDuration)
}

/// A skipped line, 1-based. For YAML recipes `line` is the entry index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWarning {
    pub line: usize,
    pub reason: SkipReason,
}

impl fmt::Display for LineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}, skipping", self.line, self.reason)
    }
}

/// Result of a successful load: the recipe and whatever was skipped on the way.
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub recipe: Recipe,
    pub warnings: Vec<LineWarning>,
}

// ------------------ YAML step file ------------------

#[derive(Debug, Deserialize)]
pub struct StepFile {
    pub steps: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StepEntry {
    #[serde(default)]
    pub description: String,

    /// Kept untyped; a bad value skips this entry in `validate`, not the document.
    #[serde(default)]
    pub duration: Option<Value>,
}

impl StepEntry {
    pub fn validate(&self) -> Result<Step, SkipReason> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(SkipReason::EmptyField);
        }
        let duration = match &self.duration {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
                (Some(secs), _) => secs,
                (None, Some(_)) => return Err(SkipReason::NegativeDuration),
                (None, None) => return Err(SkipReason::InvalidDuration),
            },
            Some(Value::String(text)) => parse_duration(text)?,
            Some(_) => return Err(SkipReason::InvalidDuration),
        };
        Ok(Step::new(description, duration))
    }
}
