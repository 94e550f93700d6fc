use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;

const BIN_NAME: &str = "tracker";

pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_completions(shell);

    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            tracing::debug!(%shell, path = %path.display(), "Wrote completion script");
            println!("{}", path.display());
        }
        None => io::stdout().write_all(&script)?,
    }

    Ok(())
}

/// Completion script for `shell`, covering every subcommand and global flag
pub fn render_completions(shell: Shell) -> Vec<u8> {
    let mut script = Vec::new();
    generate(shell, &mut Cli::command(), BIN_NAME, &mut script);
    script
}
