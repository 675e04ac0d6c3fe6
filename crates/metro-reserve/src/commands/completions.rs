//! Shell completions generation

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionsArgs};

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout().lock());
    Ok(())
}

/// Completion script for `shell`, named after the binary clap knows about
fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_completes_subcommands_and_book_flags() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("metro-reserve"));
        assert!(bash.contains("book"));
        assert!(bash.contains("--max-retry"));
        assert!(bash.contains("--loop-duration"));
    }

    #[test]
    fn test_zsh_script_is_generated() {
        assert!(script(Shell::Zsh).starts_with("#compdef metro-reserve"));
    }
}
