//! Offset bookkeeping and whitespace handling for textual edits.
//!
//! Refactorings edit the original text in place instead of reprinting the
//! tree, so untouched code keeps its exact formatting.

use crate::editor::{Edit, Position, Selection};
use crate::errors::ServiceError;
use std::ops::Range;

/// Maps byte offsets to line/character positions and back.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn position(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(self.len);
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = text[self.line_starts[line]..offset].chars().count();
        Position::new(line, character)
    }

    /// Positions past the end of a line clamp to the line end; lines past the
    /// end of the buffer clamp to the buffer end.
    pub fn offset(&self, text: &str, position: Position) -> usize {
        let Some(&start) = self.line_starts.get(position.line) else {
            return self.len;
        };
        let end = text[start..].find('\n').map_or(self.len, |i| start + i);
        text[start..end]
            .char_indices()
            .nth(position.character)
            .map_or(end, |(i, _)| start + i)
    }

    pub fn selection(&self, text: &str, range: Range<usize>) -> Selection {
        Selection::from_positions(self.position(text, range.start), self.position(text, range.end))
    }

    pub fn range(&self, text: &str, selection: Selection) -> Range<usize> {
        self.offset(text, selection.start())..self.offset(text, selection.end())
    }
}

/// Replace the bytes in `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset..offset, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, String::new())
    }

    pub fn to_edit(&self, source: &str, index: &LineIndex) -> Edit {
        Edit::new(index.selection(source, self.range.clone()), self.text.clone())
    }
}

/// Apply non-overlapping edits. Insertions at the same offset keep their order.
pub fn apply_text_edits(source: &str, mut edits: Vec<TextEdit>) -> Result<String, ServiceError> {
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut result = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        if edit.range.start < cursor || edit.range.end > source.len() {
            return Err(ServiceError::Internal(format!(
                "edit {:?} overlaps a previous edit or leaves the buffer",
                edit.range
            )));
        }
        result.push_str(&source[cursor..edit.range.start]);
        result.push_str(&edit.text);
        cursor = edit.range.end;
    }
    result.push_str(&source[cursor..]);
    Ok(result)
}

/// Apply host-level edits, expressed in line/character coordinates.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, ServiceError> {
    let index = LineIndex::new(source);
    let text_edits = edits
        .iter()
        .map(|edit| TextEdit::replace(index.range(source, edit.selection), edit.text.clone()))
        .collect();
    apply_text_edits(source, text_edits)
}

pub fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

pub fn line_end(source: &str, offset: usize) -> usize {
    source[offset..].find('\n').map_or(source.len(), |i| offset + i)
}

/// Leading whitespace of the line containing `offset`.
pub fn indentation_at(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let line = &source[start..line_end(source, offset)];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &source[start..start + width]
}

/// Only whitespace precedes `offset` on its line.
pub fn starts_line(source: &str, offset: usize) -> bool {
    source[line_start(source, offset)..offset].trim().is_empty()
}

/// Only whitespace follows `offset` on its line.
pub fn ends_line(source: &str, offset: usize) -> bool {
    source[offset..line_end(source, offset)].trim().is_empty()
}

/// Widen `range` to the full lines it covers when nothing else shares them,
/// so deleting it does not leave an empty line behind.
pub fn whole_lines(source: &str, range: Range<usize>) -> Range<usize> {
    if !starts_line(source, range.start) || !ends_line(source, range.end) {
        return range;
    }
    let end = line_end(source, range.end);
    let end = if end < source.len() { end + 1 } else { end };
    line_start(source, range.start)..end
}

/// Smallest indentation step used in `source`; two spaces when nothing is indented.
pub fn detect_indent_unit(source: &str) -> String {
    let mut smallest: Option<usize> = None;
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            return "\t".to_string();
        }
        let width = line.len() - line.trim_start_matches(' ').len();
        if width > 0 {
            smallest = Some(smallest.map_or(width, |s| s.min(width)));
        }
    }
    " ".repeat(smallest.unwrap_or(2))
}

/// Move `text` from indentation `from` to indentation `to`.
///
/// The first line is left alone: it is pasted at a position whose
/// indentation the caller controls.
pub fn reindent(text: &str, from: &str, to: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            result.push_str(line);
            continue;
        }
        result.push('\n');
        if line.trim().is_empty() {
            if line.ends_with('\r') {
                result.push('\r');
            }
            continue;
        }
        let body = line
            .strip_prefix(from)
            .unwrap_or_else(|| line.trim_start_matches([' ', '\t']));
        result.push_str(to);
        result.push_str(body);
    }
    result
}
