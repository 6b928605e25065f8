use crate::results::VoteTally;
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const TOP_MM: f32 = 272.0;
const BOTTOM_MARGIN_MM: f32 = 25.0;
const WRAP_COLUMNS: usize = 90;
const FILENAME_PREFIX_CHARS: usize = 20;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf rendering failed: {0}")]
    Render(String),
}

/// Render a poll report as a PDF: the question, then one titled body section
/// (the analysis text for text polls, the vote breakdown for choice polls),
/// and a generation-date footer.
pub fn analysis_pdf(
    question: &str,
    section_title: &str,
    body: &str,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Poll Analysis",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Render(e.to_string()))?;

    let mut column = TextColumn {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_MM,
    };

    column.line("Poll Analysis", 20.0, &bold, 14.0);
    column.line("Question:", 16.0, &bold, 8.0);
    for line in wrap(question, WRAP_COLUMNS) {
        column.line(&line, 12.0, &regular, 6.0);
    }
    column.space(6.0);
    column.line(section_title, 16.0, &bold, 8.0);
    for paragraph in body.lines() {
        if paragraph.trim().is_empty() {
            column.space(6.0);
            continue;
        }
        for line in wrap(paragraph, WRAP_COLUMNS) {
            column.line(&line, 12.0, &regular, 6.0);
        }
    }

    let footer = format!("Generated on {}", Utc::now().format("%Y-%m-%d"));
    column
        .layer
        .use_text(footer, 10.0, Mm(LEFT_MARGIN_MM), Mm(12.0), &regular);

    doc.save_to_bytes()
        .map_err(|e| ReportError::Render(e.to_string()))
}

/// Plain-text vote breakdown used as the report body for choice polls.
pub fn tally_body(tally: &VoteTally) -> String {
    let mut lines = Vec::with_capacity(tally.options.len() + 2);
    let label = if tally.total_votes == 1 { "vote" } else { "votes" };
    lines.push(format!("{} {} cast in total.", tally.total_votes, label));
    lines.push(String::new());
    for option in &tally.options {
        let label = if option.votes == 1 { "vote" } else { "votes" };
        lines.push(format!(
            "{}: {} {} ({}%)",
            option.text, option.votes, label, option.percent
        ));
    }
    lines.join("\n")
}

/// Download filename for a poll's report: a sanitized prefix of the question
/// plus the poll id.
pub fn report_filename(question: &str, poll_id: &str) -> String {
    let prefix: String = question
        .chars()
        .take(FILENAME_PREFIX_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let prefix = prefix.trim_matches('_');
    if prefix.is_empty() {
        format!("poll-analysis-{poll_id}.pdf")
    } else {
        format!("{prefix}-{poll_id}.pdf")
    }
}

struct TextColumn<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl TextColumn<'_> {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef, advance: f32) {
        if self.y < BOTTOM_MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MM;
        }
        self.layer
            .use_text(text, size, Mm(LEFT_MARGIN_MM), Mm(self.y), font);
        self.y -= advance;
    }

    fn space(&mut self, advance: f32) {
        self.y -= advance;
    }
}

/// Greedy word wrap by character count. Words longer than the column are
/// emitted on their own line rather than split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
