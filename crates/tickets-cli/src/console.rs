use std::fmt;
use std::io::{self, BufRead, Write};

/// Typing this on its own line cancels the form being filled in.
pub const CANCEL: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageKind::Info => "info",
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Value(String),
    Cancel,
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line-oriented terminal: prompts on `out`, answers from `input`.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Print `prompt` and read one line without its terminator. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        // Bytes that are not UTF-8 are replaced rather than ending the session.
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask for a value. An empty answer keeps `current`.
    pub fn ask(&mut self, label: &str, current: Option<&str>) -> io::Result<Answer> {
        let prompt = match current {
            Some(c) => format!("{label} [{c}]: "),
            None => format!("{label}: "),
        };
        let Some(line) = self.read_line(&prompt)? else {
            return Ok(Answer::Cancel);
        };
        if line.trim() == CANCEL {
            return Ok(Answer::Cancel);
        }
        if line.trim().is_empty() {
            if let Some(c) = current {
                return Ok(Answer::Value(c.to_string()));
            }
        }
        Ok(Answer::Value(line))
    }

    /// Pick one of `options` by its 1-based number. Returns `None` on cancel.
    pub fn choose(
        &mut self,
        label: &str,
        options: &[String],
        current: usize,
    ) -> io::Result<Option<usize>> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.out, "  {}) {}", i + 1, option)?;
        }
        loop {
            let default = (current + 1).to_string();
            let answer = match self.ask(label, Some(&default))? {
                Answer::Cancel => return Ok(None),
                Answer::Value(v) => v,
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => self.message(
                    MessageKind::Warning,
                    &format!("choose a number between 1 and {}", options.len()),
                )?,
            }
        }
    }

    /// `y`/`yes` confirms; anything else, including end of input, declines.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.read_line(&format!("{question} [y/N]: "))?;
        Ok(matches!(
            answer.as_deref().map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    pub fn message(&mut self, kind: MessageKind, text: &str) -> io::Result<()> {
        writeln!(self.out, "{kind}: {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn read_line_tolerates_invalid_utf8() {
        let mut c = Console::new(Cursor::new(b"Jos\xe9\nquit\n".to_vec()), Vec::new());
        assert_eq!(c.read_line("> ").unwrap().as_deref(), Some("Jos\u{FFFD}"));
        assert_eq!(c.read_line("> ").unwrap().as_deref(), Some("quit"));
        assert_eq!(c.read_line("> ").unwrap(), None);
    }

    #[test]
    fn ask_keeps_current_on_empty_answer() {
        let mut c = console("\n");
        assert_eq!(
            c.ask("Name", Some("Ana")).unwrap(),
            Answer::Value("Ana".to_string())
        );
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Name [Ana]: "));
    }

    #[test]
    fn ask_cancels_on_dot_or_eof() {
        let mut c = console(".\n");
        assert_eq!(c.ask("Name", None).unwrap(), Answer::Cancel);
        assert_eq!(c.ask("Name", None).unwrap(), Answer::Cancel);
    }

    #[test]
    fn choose_retries_out_of_range() {
        let mut c = console("9\n2\n");
        let options = vec!["Low".to_string(), "Medium".to_string()];
        assert_eq!(c.choose("Priority", &options, 0).unwrap(), Some(1));
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("warning: choose a number between 1 and 2"));
    }

    #[test]
    fn choose_defaults_to_current() {
        let mut c = console("\n");
        let options = vec!["Low".to_string(), "Medium".to_string(), "High".to_string()];
        assert_eq!(c.choose("Priority", &options, 2).unwrap(), Some(2));
    }

    #[test]
    fn confirm_defaults_to_no() {
        let mut c = console("Y\n\nmaybe\n");
        assert!(c.confirm("Delete?").unwrap());
        assert!(!c.confirm("Delete?").unwrap());
        assert!(!c.confirm("Delete?").unwrap());
        assert!(!c.confirm("Delete?").unwrap());
    }
}
