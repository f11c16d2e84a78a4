//! Output formatting for shelf books and matched listings (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::csv;
use crate::goodreads::BookQuery;
use crate::pipeline::sink::HEADER;
use crate::skupszop::ResultRow;

/// Formats run output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats books read from a shelf.
    pub fn format_books(&self, books: &[BookQuery]) -> String {
        if books.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => csv::format_row(&["Title", "Author"]),
                _ => "No books found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(books).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_books(books),
            OutputFormat::Markdown => self.markdown_books(books),
            OutputFormat::Csv => {
                let mut out = csv::format_row(&["Title", "Author"]);
                for book in books {
                    out.push_str(&csv::format_row(&[&book.title, &book.author]));
                }
                out
            }
        }
    }

    /// Formats matched listings.
    pub fn format_rows(&self, rows: &[ResultRow]) -> String {
        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => csv::format_row(&HEADER),
                _ => "No matching listings found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_rows(rows),
            OutputFormat::Markdown => self.markdown_rows(rows),
            OutputFormat::Csv => {
                let mut out = csv::format_row(&HEADER);
                for row in rows {
                    out.push_str(&csv::format_row(&row.to_record()));
                }
                out
            }
        }
    }

    // Table formatting

    fn table_books(&self, books: &[BookQuery]) -> String {
        let title_width = 50;
        let author_width = 30;

        let mut lines = Vec::new();
        lines.push(format!("{:<title_width$}  {}", "Title", "Author"));
        lines.push(format!("{:-<title_width$}  {:-<author_width$}", "", ""));

        for book in books {
            lines.push(format!(
                "{:<title_width$}  {}",
                truncate(&book.title, title_width),
                truncate(&book.author, author_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} books", books.len()));

        lines.join("\n")
    }

    fn table_rows(&self, rows: &[ResultRow]) -> String {
        let price_width = 12;
        let condition_width = 14;
        let title_width = 40;
        let author_width = 25;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<price_width$}  {:<condition_width$}  {:<title_width$}  {:<author_width$}  {}",
            "Price", "Condition", "Title", "Author", "Link"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<condition_width$}  {:-<title_width$}  {:-<author_width$}  {:-<4}",
            "", "", "", "", ""
        ));

        for row in rows {
            lines.push(format!(
                "{:>price_width$}  {:<condition_width$}  {:<title_width$}  {:<author_width$}  {}",
                row.price,
                truncate(&row.condition, condition_width),
                truncate(&row.title, title_width),
                truncate(&row.authors_joined(), author_width),
                row.link
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} offers", rows.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_books(&self, books: &[BookQuery]) -> String {
        let mut lines = Vec::new();

        lines.push("| Title | Author |".to_string());
        lines.push("|-------|--------|".to_string());
        for book in books {
            lines.push(format!("| {} | {} |", md_cell(&book.title), md_cell(&book.author)));
        }

        lines.join("\n")
    }

    fn markdown_rows(&self, rows: &[ResultRow]) -> String {
        let mut lines = Vec::new();

        lines.push("| Title | Author | Price | Condition | Link |".to_string());
        lines.push("|-------|--------|-------|-----------|------|".to_string());
        for row in rows {
            lines.push(format!(
                "| {} | {} | {} | {} | [Link]({}) |",
                md_cell(&row.title),
                md_cell(&row.authors_joined()),
                row.price,
                md_cell(&row.condition),
                row.link
            ));
        }

        lines.join("\n")
    }
}

/// Shortens to `width` characters, marking the cut with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
