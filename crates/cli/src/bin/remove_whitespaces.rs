//! Replace spaces with underscores in file names.
//!
//! Scans one directory (not recursively, hidden entries excluded), shows the
//! planned renames, asks for confirmation, then renames.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use homeutils_cli::logging::init_tracing;
use homeutils_cli::report::{conflict_lines, rename_table};
use homeutils_cli::style;
use homeutils_cli::terminal::TerminalPrompter;
use homeutils_core::errors::RenameError;
use homeutils_core::prompt::{confirm, Prompter};
use homeutils_core::rename::RenamePlan;

/// Replace whitespace with underscores in the file names of a directory.
#[derive(Parser, Debug)]
#[command(name = "remove-whitespaces", version, about)]
struct Cli {
    /// Directory whose entries should be renamed.
    directory: Option<PathBuf>,

    /// Rename without asking for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Leave names matching this glob pattern alone (repeatable).
    #[arg(long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// Show debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    NothingToDo,
    Renamed,
    Declined,
    SomeFailed,
}

impl Finish {
    fn exit_code(self) -> ExitCode {
        match self {
            Finish::NothingToDo | Finish::Renamed => ExitCode::SUCCESS,
            Finish::Declined | Finish::SomeFailed => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli, &mut TerminalPrompter::new()) {
        Ok(finish) => finish.exit_code(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, prompter: &mut dyn Prompter) -> Result<Finish> {
    let Some(directory) = cli.directory else {
        anyhow::bail!("please specify a directory");
    };

    let plan = match RenamePlan::scan_filtered(&directory, &cli.ignore) {
        Ok(plan) => plan,
        Err(RenameError::NotADirectory(path)) => {
            anyhow::bail!("please specify a directory ('{}' is not one)", path.display())
        }
        Err(e) => return Err(e.into()),
    };

    if plan.is_empty() {
        println!("Nothing to rename.");
        return Ok(Finish::NothingToDo);
    }

    println!("{}", style::header("The following files will be renamed:"));
    println!();
    println!("{}", rename_table(&plan));

    let conflicts = plan.conflicts();
    if !conflicts.is_empty() {
        println!();
        for line in conflict_lines(&conflicts) {
            println!("{}", style::warn(&line));
        }
    }
    println!();

    if !cli.yes && !confirm(prompter, "Do you want to continue? [y/n]")? {
        println!("No changes made. Exiting.");
        return Ok(Finish::Declined);
    }

    let report = plan.apply();
    for (_, err) in &report.failed {
        eprintln!("{}", style::error(&err.to_string()));
    }

    if report.is_success() {
        println!(
            "{}",
            style::success(&format!("Renamed {} file(s).", report.renamed.len()))
        );
        Ok(Finish::Renamed)
    } else {
        println!(
            "{}",
            style::warn(&format!(
                "Renamed {} file(s), {} failed.",
                report.renamed.len(),
                report.failed.len()
            ))
        );
        Ok(Finish::SomeFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::Path;

    use homeutils_core::errors::PromptError;
    use tempfile::TempDir;

    struct Answers {
        queue: VecDeque<&'static str>,
        asked: usize,
    }

    impl Answers {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                queue: answers.iter().copied().collect(),
                asked: 0,
            }
        }
    }

    impl Prompter for Answers {
        fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
            self.asked += 1;
            self.queue
                .pop_front()
                .map(String::from)
                .ok_or_else(|| PromptError::EndOfInput(prompt.to_string()))
        }

        fn inform(&mut self, _message: &str) {}

        fn warn(&mut self, _message: &str) {}
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn cli_for(dir: &Path, extra: &[&str]) -> Cli {
        let dir = dir.to_string_lossy().to_string();
        let mut args = vec!["remove-whitespaces"];
        args.extend_from_slice(extra);
        args.push(dir.as_str());
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["remove-whitespaces", "--ignore", "*.iso", "-y", "/tmp/x"]).unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/x")));
        assert!(cli.yes);
        assert_eq!(cli.ignore, vec!["*.iso"]);
    }

    #[test]
    fn test_directory_is_optional_for_custom_error() {
        let cli = Cli::try_parse_from(["remove-whitespaces"]).unwrap();
        assert!(cli.directory.is_none());
        assert!(run(cli, &mut Answers::new(&[])).is_err());
    }

    #[test]
    fn test_yes_renames_without_prompting() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a b.txt");

        let mut answers = Answers::new(&[]);
        let finish = run(cli_for(tmp.path(), &["--yes"]), &mut answers).unwrap();

        assert_eq!(finish, Finish::Renamed);
        assert_eq!(answers.asked, 0);
        assert!(tmp.path().join("a_b.txt").exists());
        assert!(!tmp.path().join("a b.txt").exists());
    }

    #[test]
    fn test_empty_plan_succeeds_without_asking() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "plain.txt");

        let mut answers = Answers::new(&[]);
        let finish = run(cli_for(tmp.path(), &[]), &mut answers).unwrap();

        assert_eq!(finish, Finish::NothingToDo);
        assert_eq!(answers.asked, 0);
    }

    #[test]
    fn test_decline_leaves_files_and_fails() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a b.txt");

        let finish = run(cli_for(tmp.path(), &[]), &mut Answers::new(&["n"])).unwrap();

        assert_eq!(finish, Finish::Declined);
        assert!(tmp.path().join("a b.txt").exists());
        assert!(!tmp.path().join("a_b.txt").exists());
    }

    #[test]
    fn test_unrecognized_answer_asks_again() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a b.txt");

        let mut answers = Answers::new(&["maybe", "", "Y"]);
        let finish = run(cli_for(tmp.path(), &[]), &mut answers).unwrap();

        assert_eq!(finish, Finish::Renamed);
        assert_eq!(answers.asked, 3);
        assert!(tmp.path().join("a_b.txt").exists());
    }

    #[test]
    fn test_failed_rename_fails_the_run() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a b");
        touch(tmp.path(), "a_b");
        touch(tmp.path(), "c d");

        let finish = run(cli_for(tmp.path(), &[]), &mut Answers::new(&["y"])).unwrap();

        assert_eq!(finish, Finish::SomeFailed);
        assert!(tmp.path().join("a b").exists());
        assert!(tmp.path().join("c_d").exists());
    }

    #[test]
    fn test_exit_codes() {
        for (finish, success) in [
            (Finish::NothingToDo, true),
            (Finish::Renamed, true),
            (Finish::Declined, false),
            (Finish::SomeFailed, false),
        ] {
            let expected = if success { ExitCode::SUCCESS } else { ExitCode::FAILURE };
            assert_eq!(format!("{:?}", finish.exit_code()), format!("{:?}", expected));
        }
    }
}
