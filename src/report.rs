use std::io::{self, Write};

use colored::Colorize;

use crate::path_format::AnalysisPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStyle {
    Normal,
    /// Disabled analyses are shown but excluded from execution.
    Dimmed,
}

/// Presentation seam between the workflow and the terminal. The workflow
/// only decides what to say; styling and the blocking confirmation read live
/// behind this trait so tests can script both sides.
pub trait Reporter {
    fn info(&mut self, message: &str);

    /// Positive progress/result line.
    fn success(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// `label: value` line with the value emphasized.
    fn detail(&mut self, label: &str, value: &str);

    fn path(&mut self, path: &AnalysisPath, style: PathStyle);

    /// Prints the prompt and blocks for one line of input. Returns the
    /// trimmed answer; interpretation is the caller's business.
    fn prompt_line(&mut self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn success(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn warning(&mut self, message: &str) {
        println!("{}", message.yellow());
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn detail(&mut self, label: &str, value: &str) {
        println!("{label}: {}", value.green());
    }

    fn path(&mut self, path: &AnalysisPath, style: PathStyle) {
        let paint = |text: &str| match style {
            PathStyle::Normal => text.normal(),
            PathStyle::Dimmed => text.yellow(),
        };
        for ancestor in &path.ancestors {
            print!("{}{}", paint(ancestor), "\\".cyan());
        }
        println!("{}{}{}", paint(&path.target), "|".green(), paint(&path.analysis));
    }

    fn prompt_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
