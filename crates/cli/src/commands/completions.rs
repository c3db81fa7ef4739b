//! completions command - Generate shell completions

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::exit_code::ExitCode;

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> ExitCode {
    let mut cmd = super::Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "depot", &mut std::io::stdout());
    ExitCode::Success
}
