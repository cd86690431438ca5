//! Append-only text accumulation for rendered artifacts.

/// Line-oriented builder with tab indentation.
///
/// Each synthesizer owns one builder per artifact; nothing is shared
/// between synthesizers.
#[derive(Debug, Default)]
pub struct TextBuilder {
    buf: String,
    depth: usize,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation. An empty line gets no
    /// trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Append pre-rendered text verbatim, ignoring indentation.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Open a brace block: write `header`, then indent.
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header).indent()
    }

    /// Close a brace block opened with [`open`](Self::open).
    pub fn close(&mut self) -> &mut Self {
        self.dedent().line("}")
    }

    /// Append `name type` lines with the types aligned in one column, the
    /// way gofmt lays out consecutive struct fields.
    pub fn fields<N, T>(&mut self, fields: &[(N, T)]) -> &mut Self
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let width = fields
            .iter()
            .map(|(name, _)| name.as_ref().len())
            .max()
            .unwrap_or(0);
        for (name, ty) in fields {
            self.line(format!("{:<width$} {}", name.as_ref(), ty.as_ref()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Indefinite article for `word`: `an Account`, `a Widget`.
pub fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
