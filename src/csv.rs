//! Minimal comma-separated text reading and writing.

use std::io::{self, Write};
use std::mem::take;

const BOM: char = '\u{feff}';

/// Parses CSV text into rows. Quotes, doubled quotes, CRLF and a leading
/// byte-order mark are handled; blank lines are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    // trailing row without newline, even if a quote was left open
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.len() == 1 && row[0].is_empty();
    if !blank {
        rows.push(row);
    }
}

/// Quotes a field when it holds a separator, quote or line break.
pub fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Formats one row as a line, including the trailing newline.
pub fn format_row<S: AsRef<str>>(row: &[S]) -> String {
    let mut line =
        row.iter().map(|cell| escape(cell.as_ref())).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

/// Writes a single row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    w.write_all(format_row(row).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let rows = parse_rows("Title,Author\nSolaris,Stanisław Lem\n");
        assert_eq!(rows, vec![vec!["Title", "Author"], vec!["Solaris", "Stanisław Lem"]]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let rows = parse_rows("\"Hello, World\",\"She said \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![vec!["Hello, World", "She said \"hi\""]]);
    }

    #[test]
    fn test_parse_newline_inside_quotes() {
        let rows = parse_rows("\"two\nlines\",x\n");
        assert_eq!(rows, vec![vec!["two\nlines", "x"]]);
    }

    #[test]
    fn test_parse_crlf_bom_and_blank_lines() {
        let rows = parse_rows("\u{feff}Title,Author\r\n\r\nDiuna,Frank Herbert\r\n");
        assert_eq!(rows, vec![vec!["Title", "Author"], vec!["Diuna", "Frank Herbert"]]);
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let rows = parse_rows("a,b\nc,d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_rows("").is_empty());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("15,50"), "\"15,50\"");
        assert_eq!(escape("a \"b\""), "\"a \"\"b\"\"\"");
    }

    #[test]
    fn test_format_row_parses_back() {
        let row = ["The Hobbit", "J. R. R. Tolkien", "15,50", "dobry", "/p/1"];
        let line = format_row(&row);
        assert_eq!(line, "The Hobbit,J. R. R. Tolkien,\"15,50\",dobry,/p/1\n");
        assert_eq!(parse_rows(&line), vec![row.to_vec()]);
    }

    #[test]
    fn test_write_row() {
        let mut out = Vec::new();
        write_row(&mut out, &["a", "b"]).unwrap();
        assert_eq!(out, b"a,b\n");
    }
}
