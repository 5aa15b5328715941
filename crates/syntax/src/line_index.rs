use houdini_types::Position;

/// Where each line of a source text starts, for turning the byte offsets
/// reported by the parser into editor positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first byte of every line
    starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(newline, _)| newline + 1))
            .collect();
        Self { starts }
    }

    /// Zero-based line containing a byte offset
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// 1-indexed line and character column of a byte offset into `text`,
    /// which must be the text the index was built from.
    ///
    /// Columns count `char`s, so a multi-byte character before the offset
    /// moves it by one. Offsets past the end clamp to the end, and an offset
    /// inside a character falls back to its byte column.
    #[must_use]
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line = self.line_of(offset);
        let start = self.starts.get(line).copied().unwrap_or(0);
        let column = text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        Position::new(line as u32 + 1, column as u32 + 1)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
