//! Permissive CSV tokenizer
//!
//! Bank exports are frequently hand-edited or pasted, so the scanner never
//! rejects input: malformed quoting degrades into literal text instead of
//! raising. The trade-off is deliberate; a strict parser would bounce files
//! that every spreadsheet happily opens.

use crate::domain::ParsedTable;

/// Delimiters considered during auto-detection, in tie-break order
pub const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Pick the most frequent candidate delimiter in the first line
///
/// Ties go to the earlier candidate, so a line with equal comma and
/// semicolon counts detects as comma.
pub fn detect_delimiter(first_line: &str) -> char {
    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0usize;
    for cand in DELIMITER_CANDIDATES {
        let count = first_line.chars().filter(|&c| c == cand).count();
        if count > best_count {
            best = cand;
            best_count = count;
        }
    }
    best
}

/// Split raw text into a header row plus data rows
///
/// Single left-to-right scan with an in-quotes flag:
/// - inside quotes a doubled quote character emits one literal quote and
///   stays quoted; any other quote character exits quoted mode; everything
///   else (including delimiters and newlines) is copied
/// - outside quotes a quote character enters quoted mode without emitting,
///   the delimiter ends the cell, `\n` ends the row, `\r` is dropped
/// - end of input flushes any pending cell/row
///
/// The first row is always treated as headers; no subsequent row is
/// dropped, even when empty.
pub fn tokenize(text: &str, delimiter: char, quote: char) -> ParsedTable {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == quote {
                if chars.peek() == Some(&quote) {
                    cell.push(quote);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
        } else if ch == quote {
            in_quotes = true;
        } else if ch == delimiter {
            current.push(std::mem::take(&mut cell));
        } else if ch == '\n' {
            current.push(std::mem::take(&mut cell));
            rows.push(std::mem::take(&mut current));
        } else if ch == '\r' {
            // dropped, handles \r\n terminators
        } else {
            cell.push(ch);
        }
    }
    if !cell.is_empty() || !current.is_empty() {
        current.push(cell);
        rows.push(current);
    }

    let mut rows = rows.into_iter();
    let headers = rows.next().unwrap_or_default();
    ParsedTable {
        headers,
        rows: rows.collect(),
    }
}
