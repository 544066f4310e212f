//! Progress reporting threaded explicitly through the pipeline stages

use colored::Colorize;

/// Sink for progress and status messages.
///
/// A stage announces work with [`step`](Reporter::step) and closes it with
/// [`done`](Reporter::done) or [`fail`](Reporter::fail).
pub trait Reporter: Send + Sync {
    /// A unit of work has started
    fn step(&self, message: &str);

    /// The current unit of work succeeded
    fn done(&self, message: &str);

    /// The current unit of work failed
    fn fail(&self, message: &str);

    /// An informational note
    fn info(&self, message: &str);

    /// Something went wrong but the run continues
    fn warn(&self, message: &str);
}

/// Line-oriented reporter writing colored output to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn step(&self, message: &str) {
        println!("{} {}", "->".blue(), message);
    }

    fn done(&self, message: &str) {
        println!("{} {}", "✔".green(), message);
    }

    fn fail(&self, message: &str) {
        eprintln!("{} {}", "✖".red(), message.red());
    }

    fn info(&self, message: &str) {
        println!("{} {}", "i".cyan(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }
}
