use anyhow::{Context, Result};
use dialoguer::Input;
use recipe_guide::cli::Cli;
use recipe_guide::{load_recipe, logging, tui, GuidedRunner, SleepTicker};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::info;

const PATH_PROMPT: &str = "Enter the recipe file path (e.g., omelette.txt)";

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_logger(cli.verbose);

    println!("=== Real-Time Cooking Assistant ===\n");

    let path = match cli.recipe {
        Some(path) => path,
        None => prompt_recipe_path()?,
    };

    let loaded = load_recipe(&path).context("Failed to load recipe")?;
    info!(
        "Loaded {} step(s), skipped {} line(s)",
        loaded.recipe.len(),
        loaded.warnings.len()
    );

    if cli.tui {
        return tui::run_tui(&loaded.recipe);
    }

    let stdin = io::stdin();
    let mut runner = GuidedRunner::new(stdin.lock(), io::stdout(), SleepTicker);
    runner
        .run(&loaded.recipe)
        .context("Guided session aborted")?;

    Ok(())
}

fn prompt_recipe_path() -> Result<PathBuf> {
    if io::stdin().is_terminal() {
        let path: String = Input::new()
            .with_prompt(PATH_PROMPT)
            .interact_text()
            .context("Failed to read recipe path")?;
        return Ok(PathBuf::from(path.trim()));
    }

    print!("{}: ", PATH_PROMPT);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read recipe path")?;
    Ok(PathBuf::from(line.trim()))
}
