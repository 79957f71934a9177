//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [`Console`] that owns the input and output streams

use std::io::{self, BufRead, BufReader, Write};

use crate::boundary::BoundaryWarning;
use crate::error::{ReleaseError, Result};

pub mod formatter;

pub use formatter::{
    format_boundary_warning, format_error, format_status, format_success, format_warning,
};

/// Input and output channels for one release run.
///
/// Reading past the end of input selects the default answer, so a run
/// without a terminal proceeds with the defaults. A quiet console drops
/// progress lines but still shows warnings, prompts and results.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    quiet: bool,
}

impl Console {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Console {
            input,
            output,
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Console bound to the process standard streams
    pub fn stdio() -> Self {
        Console::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    fn print(&mut self, text: &str) {
        // Write errors are ignored
        let _ = writeln!(self.output, "{}", text);
        let _ = self.output.flush();
    }

    fn progress(&mut self, text: &str) {
        if !self.quiet {
            self.print(text);
        }
    }

    pub fn line(&mut self, message: &str) {
        self.progress(message);
    }

    pub fn status(&mut self, message: &str) {
        self.progress(&formatter::format_status(message));
    }

    pub fn success(&mut self, message: &str) {
        self.progress(&formatter::format_success(message));
    }

    /// Printed even when quiet
    pub fn result(&mut self, message: &str) {
        self.print(message);
    }

    pub fn warn(&mut self, message: &str) {
        self.print(&formatter::format_warning(message));
    }

    pub fn boundary_warning(&mut self, warning: &BoundaryWarning) {
        self.print(&formatter::format_boundary_warning(warning));
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    /// Prompts user to confirm an action with a yes/no prompt.
    ///
    /// Accepts "y"/"yes" and "n"/"no" (case-insensitive) and asks again on
    /// anything else. Empty input or end of input selects `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let prompt = formatter::format_confirm(question, default);
        loop {
            let answer = match self.read_answer(&prompt)? {
                Some(answer) => answer.to_lowercase(),
                None => return Ok(default),
            };

            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                other => self.warn(&format!("Please answer yes or no, not '{}'.", other)),
            }
        }
    }

    /// Prompts user to pick one of `options`.
    ///
    /// Accepts a 1-based index, or text equal to or starting an option, and
    /// asks again on anything else. Empty input or end of input selects
    /// `options[default]`.
    pub fn choice(&mut self, question: &str, options: &[String], default: usize) -> Result<String> {
        if options.is_empty() {
            return Err(ReleaseError::prompt("no options to choose from"));
        }
        let default = default.min(options.len() - 1);

        let prompt = formatter::format_choice(question, options, default);
        loop {
            let answer = match self.read_answer(&prompt)? {
                Some(answer) if !answer.is_empty() => answer,
                _ => return Ok(options[default].clone()),
            };

            match select(options, &answer) {
                Some(option) => return Ok(option.clone()),
                None => self.warn(&format!("'{}' is not one of the options.", answer)),
            }
        }
    }

    /// Prompts user for free text; end of input yields an empty string.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        let prompt = formatter::format_question(question);
        Ok(self.read_answer(&prompt)?.unwrap_or_default())
    }
}

fn select<'a>(options: &'a [String], answer: &str) -> Option<&'a String> {
    if let Ok(index) = answer.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| options.get(i));
    }

    options
        .iter()
        .find(|option| option.as_str() == answer)
        .or_else(|| options.iter().find(|option| option.starts_with(answer)))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Output sink whose contents stay readable after the console owns it
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Console fed with scripted input
    pub fn scripted(input: &str) -> (Console, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let console = Console::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(buffer.clone()),
        );
        (console, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::scripted;

    fn options() -> Vec<String> {
        vec![
            "major (1.0.0)".to_string(),
            "minor (0.1.0)".to_string(),
            "custom".to_string(),
        ]
    }

    #[test]
    fn test_confirm_defaults_on_empty_and_eof() {
        let (mut console, _) = scripted("\n");
        assert!(console.confirm("Go?", true).unwrap());
        assert!(!console.confirm("Go?", false).unwrap());
    }

    #[test]
    fn test_confirm_reads_answers() {
        let (mut console, out) = scripted("y\nNO\nYes\n");
        assert!(console.confirm("A?", false).unwrap());
        assert!(!console.confirm("B?", true).unwrap());
        assert!(console.confirm("C?", false).unwrap());
        assert!(out.contents().contains("A?"));
    }

    #[test]
    fn test_confirm_asks_again_after_typo() {
        let (mut console, out) = scripted("yse\ny\n");
        assert!(console.confirm("Go?", false).unwrap());
        let output = out.contents();
        assert!(output.contains("Please answer yes or no, not 'yse'."));
        assert_eq!(output.matches("Go?").count(), 2);
    }

    #[test]
    fn test_confirm_typo_then_eof_takes_default() {
        let (mut console, _) = scripted("maybe\n");
        assert!(console.confirm("Go?", true).unwrap());
        let (mut console, _) = scripted("maybe\n");
        assert!(!console.confirm("Go?", false).unwrap());
    }

    #[test]
    fn test_choice_by_index_text_and_default() {
        let (mut console, _) = scripted("1\nminor\n\n");
        assert_eq!(console.choice("Pick", &options(), 1).unwrap(), "major (1.0.0)");
        assert_eq!(console.choice("Pick", &options(), 0).unwrap(), "minor (0.1.0)");
        assert_eq!(console.choice("Pick", &options(), 1).unwrap(), "minor (0.1.0)");
        assert_eq!(console.choice("Pick", &options(), 2).unwrap(), "custom");
    }

    #[test]
    fn test_choice_asks_again_on_invalid_selection() {
        let (mut console, out) = scripted("7\nhuge\n3\n");
        assert_eq!(console.choice("Pick", &options(), 0).unwrap(), "custom");
        let output = out.contents();
        assert!(output.contains("'7' is not one of the options."));
        assert!(output.contains("'huge' is not one of the options."));
    }

    #[test]
    fn test_choice_without_options_fails() {
        let (mut console, _) = scripted("1\n");
        assert!(console.choice("Pick", &[], 0).is_err());
    }

    #[test]
    fn test_quiet_console_keeps_warnings_and_results() {
        let (console, out) = scripted("");
        let mut console = console.with_quiet(true);
        console.status("working");
        console.success("done");
        console.line("plain");
        console.warn("careful");
        console.result("1.2.3");

        let output = out.contents();
        assert!(!output.contains("working"));
        assert!(!output.contains("done"));
        assert!(!output.contains("plain"));
        assert!(output.contains("careful"));
        assert!(output.contains("1.2.3"));
    }

    #[test]
    fn test_ask_trims_input() {
        let (mut console, _) = scripted("  1.2.3  \n");
        assert_eq!(console.ask("Version").unwrap(), "1.2.3");
        assert_eq!(console.ask("Version").unwrap(), "");
    }
}
