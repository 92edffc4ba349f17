//! Recipe loading.
//!
//! Text recipes are one step per line, `<seconds>|<description>`. Blank lines
//! and lines starting with `#` are ignored. Malformed lines are skipped with a
//! warning; only an unreadable source or a recipe with no valid steps is fatal.

use crate::error::LoadError;
use crate::model::{parse_duration, LineWarning, LoadedRecipe, Recipe, SkipReason, Step, StepFile};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

pub const DELIM: char = '|';
pub const COMMENT: char = '#';

/// Load a recipe from `path`. `.yaml`/`.yml` files use the YAML step-file
/// format, everything else the line format.
pub fn load_recipe(path: &Path) -> Result<LoadedRecipe, LoadError> {
    let (steps, warnings) = if is_yaml(path) {
        load_yaml(path)?
    } else {
        let file = File::open(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        parse_recipe(BufReader::new(file)).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?
    };

    debug!(
        "Loaded {} step(s) from {} ({} skipped)",
        steps.len(),
        path.display(),
        warnings.len()
    );

    let recipe = Recipe::new(steps).ok_or_else(|| LoadError::NoValidSteps {
        path: path.to_path_buf(),
    })?;

    Ok(LoadedRecipe { recipe, warnings })
}

/// Parse line-format recipe text. Returns the valid steps in order and a
/// warning for every skipped line. Only read errors fail; bytes that are not
/// UTF-8 are replaced with U+FFFD.
pub fn parse_recipe<R: BufRead>(reader: R) -> io::Result<(Vec<Step>, Vec<LineWarning>)> {
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);
        match parse_line(&line) {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => {}
            Err(reason) => {
                let warning = LineWarning {
                    line: idx + 1,
                    reason,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok((steps, warnings))
}

/// Parse one line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Step>, SkipReason> {
    if line.is_empty() || line.starts_with(COMMENT) {
        return Ok(None);
    }

    let (seconds, description) = line
        .split_once(DELIM)
        .ok_or(SkipReason::MissingDelimiter)?;

    let seconds = seconds.trim();
    let description = description.trim();
    if seconds.is_empty() || description.is_empty() {
        return Err(SkipReason::EmptyField);
    }

    Ok(Some(Step::new(description, parse_duration(seconds)?)))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn load_yaml(path: &Path) -> Result<(Vec<Step>, Vec<LineWarning>), LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let file: StepFile = serde_yaml::from_str(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    for (idx, entry) in file.steps.iter().enumerate() {
        match entry.validate() {
            Ok(step) => steps.push(step),
            Err(reason) => {
                let warning = LineWarning {
                    line: idx + 1,
                    reason,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok((steps, warnings))
}
