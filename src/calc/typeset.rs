//! Post-render hook for the math typesetter. Typesetting is best effort and
//! never affects engine state.

use anyhow::Result;
use std::io::Write;

pub trait Typesetter {
    fn load(&mut self) -> Result<()>;
    fn typeset(&mut self, markup: &[String]) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct NoopTypesetter;

impl Typesetter for NoopTypesetter {
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn typeset(&mut self, _markup: &[String]) -> Result<()> {
        Ok(())
    }
}

/// Strips the inline-math wrapper, e.g. `\(\LARGE{x = 5}\)` becomes `x = 5`.
pub fn plain_text(markup: &str) -> &str {
    let inner = markup
        .strip_prefix("\\(")
        .and_then(|s| s.strip_suffix("\\)"))
        .unwrap_or(markup);
    inner
        .strip_prefix("\\LARGE{")
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(inner)
}

/// Writes each newly visible result as plain text.
#[derive(Debug)]
pub struct TerminalTypesetter<W: Write> {
    out: W,
    printed: usize,
}

impl<W: Write> TerminalTypesetter<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Typesetter for TerminalTypesetter<W> {
    fn load(&mut self) -> Result<()> {
        self.printed = 0;
        Ok(())
    }

    fn typeset(&mut self, markup: &[String]) -> Result<()> {
        if markup.len() < self.printed {
            self.printed = 0;
        }
        for item in &markup[self.printed..] {
            writeln!(self.out, "{}", plain_text(item))?;
        }
        self.printed = markup.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unwraps_markup() {
        assert_eq!(plain_text("\\(\\LARGE{x = 5}\\)"), "x = 5");
        assert_eq!(plain_text("y = 2"), "y = 2");
    }

    #[test]
    fn terminal_typesetter_prints_only_new_items() {
        let mut typesetter = TerminalTypesetter::new(Vec::new());
        typesetter.load().expect("load");
        typesetter
            .typeset(&["\\(\\LARGE{a = 1}\\)".to_string()])
            .expect("first");
        typesetter
            .typeset(&[
                "\\(\\LARGE{a = 1}\\)".to_string(),
                "\\(\\LARGE{b = 2}\\)".to_string(),
            ])
            .expect("second");
        let out = String::from_utf8(typesetter.into_inner()).expect("utf8");
        assert_eq!(out, "a = 1\nb = 2\n");
    }
}
