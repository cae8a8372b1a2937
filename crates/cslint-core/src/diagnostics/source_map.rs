//! Offset-to-position mapping for a source file

use std::path::Path;

use super::Location;
use crate::cst::TextRange;

/// Precomputed line-start table for converting byte offsets to 1-based
/// line/column positions. Columns count characters, not bytes.
#[derive(Debug, Clone)]
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 0-based index of the line containing `offset`
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
    }

    /// Byte offset of the start of the 0-based line `index`
    pub fn line_start(&self, index: usize) -> usize {
        self.line_starts
            .get(index)
            .or(self.line_starts.last())
            .copied()
            .unwrap_or(0)
    }

    /// Convert a byte offset to a 1-based (line, column) pair
    pub fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        let start = self.line_starts[line];
        let column = source[start..offset.min(source.len())].chars().count();
        (line + 1, column + 1)
    }

    /// Build a diagnostic `Location` for a text range
    pub fn location(&self, source: &str, file: &Path, range: TextRange) -> Location {
        let start = usize::from(range.start());
        let end = usize::from(range.end());
        let (line, column) = self.line_col(source, start);
        let (end_line, end_column) = self.line_col(source, end);
        Location {
            file: file.to_path_buf(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            offset: start,
            length: end - start,
        }
    }

    /// The leading whitespace of the line containing `offset`
    pub fn line_indent<'a>(&self, source: &'a str, offset: usize) -> &'a str {
        let start = self.line_start(self.line_index(offset));
        let line_end = source[start..]
            .find(['\n', '\r'])
            .map(|rel| start + rel)
            .unwrap_or(source.len());
        let line = &source[start..line_end];
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..indent_len]
    }
}
