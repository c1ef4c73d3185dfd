//! One-page printable summary of a finished screening.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::result::{ScreeningSummary, DISCLAIMER};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("pdf rendering failed: {0}")]
    Render(String),
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const WRAP_COLUMNS: usize = 88;

struct TextCursor {
    layer: PdfLayerReference,
    y: Mm,
}

impl TextCursor {
    /// Draw one line and move the cursor down, opening a new page when the
    /// current one is used up.
    fn line(
        &mut self,
        doc: &PdfDocumentReference,
        text: &str,
        size: f32,
        x: f32,
        font: &IndirectFontRef,
        advance: f32,
    ) {
        if self.y < Mm(BOTTOM_MARGIN) {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP);
        }
        self.layer.use_text(text, size, Mm(x), self.y, font);
        self.y -= Mm(advance);
    }

    fn gap(&mut self, advance: f32) {
        self.y -= Mm(advance);
    }
}

/// Render the summary as an A4 PDF and hand back the raw bytes.
pub fn render_summary(summary: &ScreeningSummary) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Momly Screening Summary",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "content",
    );
    let body = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Render(err.to_string()))?;

    let mut cursor = TextCursor {
        layer: doc.get_page(first_page).get_layer(first_layer),
        y: Mm(TOP),
    };

    cursor.line(&doc, "Momly Screening Summary", 14.0, 20.0, &bold, 6.0);
    let completed = summary.completed_at.format("%Y-%m-%d %H:%M UTC").to_string();
    cursor.line(&doc, &format!("Completed: {completed}"), 9.0, 20.0, &body, 4.5);
    cursor.line(&doc, DISCLAIMER, 8.0, 20.0, &body, 8.0);

    cursor.line(&doc, "RESPONDENT", 11.0, 20.0, &bold, 6.0);
    cursor.line(&doc, &format!("Name: {}", summary.respondent_name), 9.0, 25.0, &body, 4.5);
    cursor.line(&doc, &format!("Location: {}", summary.location), 9.0, 25.0, &body, 4.5);
    cursor.line(&doc, &format!("Age: {}", summary.age), 9.0, 25.0, &body, 4.5);
    cursor.line(
        &doc,
        &format!("Family support: {}", summary.family_support.label()),
        9.0,
        25.0,
        &body,
        4.5,
    );
    cursor.gap(4.0);

    cursor.line(&doc, "ANSWERS", 11.0, 20.0, &bold, 6.0);
    for answer in &summary.answers {
        let question = format!("{}. {}", answer.question, answer.text);
        for line in wrap_text(&question, WRAP_COLUMNS) {
            cursor.line(&doc, &line, 9.0, 25.0, &body, 4.5);
        }
        let choice = format!("{} (score {})", answer.choice, answer.score);
        for line in wrap_text(&choice, WRAP_COLUMNS) {
            cursor.line(&doc, &line, 9.0, 30.0, &bold, 4.5);
        }
        cursor.gap(1.5);
    }
    cursor.gap(4.0);

    cursor.line(&doc, "RESULT", 11.0, 20.0, &bold, 6.0);
    cursor.line(
        &doc,
        &format!("EPDS total: {} of 30", summary.total_score),
        10.0,
        25.0,
        &body,
        5.0,
    );
    cursor.line(
        &doc,
        &format!("Risk level: {}", summary.risk_label),
        10.0,
        25.0,
        &bold,
        7.0,
    );

    cursor.line(&doc, "GUIDANCE", 11.0, 20.0, &bold, 6.0);
    for tip in &summary.tips {
        for (index, line) in wrap_text(tip, WRAP_COLUMNS).into_iter().enumerate() {
            let text = if index == 0 {
                format!("- {line}")
            } else {
                format!("  {line}")
            };
            cursor.line(&doc, &text, 9.0, 25.0, &body, 4.5);
        }
    }

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    buffer
        .into_inner()
        .map_err(|err| ExportError::Render(err.to_string()))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::questionnaire::{QuestionBank, ITEM_COUNT};
    use crate::screening::result::assemble;
    use crate::screening::session::{Demographics, FamilySupport, ScreeningSession};

    fn sample_summary() -> ScreeningSummary {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        let intake = Demographics::new("Amina", "Nairobi", 27, FamilySupport::Low)
            .expect("valid intake");
        session.begin(intake).expect("intake accepted");
        for number in 1..=ITEM_COUNT as u8 {
            session.record_answer(&bank, number, 3).expect("answer accepted");
        }
        let assessment = session.completed().expect("complete session");
        let record = assemble(assessment.total_score(), "Profound".to_owned());
        ScreeningSummary::compose(&assessment, &record, &bank)
    }

    #[test]
    fn renders_a_parseable_pdf() {
        let bytes = render_summary(&sample_summary()).expect("render succeeds");
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF stream");
        assert!(bytes.len() > 1_000, "summary content should be present");
    }

    #[test]
    fn wrapping_keeps_lines_inside_the_column() {
        let wrapped = wrap_text(
            "Yes, most of the time I haven't been able to cope at all",
            20,
        );
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|line| line.len() <= 20));
        assert_eq!(wrap_text("", 20), vec![String::new()]);
    }
}
