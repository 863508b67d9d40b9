// Tally CLI - Command Line Interface
// Usage: tally [FILE] [OPTIONS]

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use tally_core::builtins;
use tally_core::Interpreter;

/// Tally - a stack-based scripting language for driving test scenarios
#[derive(Parser)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A stack-based scripting language", long_about = None)]
struct Cli {
    /// Script file to run
    file: Option<PathBuf>,

    /// Execute inline code
    #[arg(short = 'e', long = "exec")]
    exec: Option<String>,

    /// Start with an empty scope chain (no base vocabulary)
    #[arg(long = "bare")]
    bare: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut interp = Interpreter::new();
    if !cli.bare {
        builtins::install(&mut interp);
    }

    if let Some(code) = cli.exec {
        interp.run(Cursor::new(code));
    } else if let Some(path) = cli.file {
        match File::open(&path) {
            Ok(file) => interp.run(BufReader::new(file)),
            Err(err) => {
                eprintln!(
                    "{} cannot open {}: {}",
                    "Error:".red().bold(),
                    path.display(),
                    err
                );
                std::process::exit(1);
            }
        }
    } else {
        repl(interp);
    }
}

fn repl(mut interp: Interpreter) {
    use reedline::{FileBackedHistory, Prompt, PromptHistorySearch, PromptHistorySearchStatus};
    use reedline::{Reedline, Signal};
    use std::borrow::Cow;

    struct TallyPrompt;

    impl Prompt for TallyPrompt {
        fn render_prompt_left(&self) -> Cow<'_, str> {
            Cow::Borrowed(">>> ")
        }
        fn render_prompt_right(&self) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_indicator(&self, _: reedline::PromptEditMode) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
            Cow::Borrowed("... ")
        }
        fn render_prompt_history_search_indicator(
            &self,
            history_search: PromptHistorySearch,
        ) -> Cow<'_, str> {
            let prefix = match history_search.status {
                PromptHistorySearchStatus::Passing => "",
                PromptHistorySearchStatus::Failing => "failing ",
            };
            Cow::Owned(format!("({}reverse-search: {}) ", prefix, history_search.term))
        }
    }

    println!();
    println!(
        "  {}  {}",
        "Tally".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("  {}", "Ctrl-D to quit".bright_black());
    println!();

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tally_history");
    let mut line_editor = match FileBackedHistory::with_file(1000, history_path) {
        Ok(history) => Reedline::create().with_history(Box::new(history)),
        Err(_) => Reedline::create(),
    };

    loop {
        match line_editor.read_line(&TallyPrompt) {
            Ok(Signal::Success(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match interp.run_line(&line) {
                    Ok(()) => {
                        let rendered: Vec<String> =
                            interp.data.iter().map(|v| interp.render(v)).collect();
                        println!("{}", format!("ok [ {} ]", rendered.join(" ")).bright_black());
                    }
                    Err(err) => err.report(),
                }
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }
}
