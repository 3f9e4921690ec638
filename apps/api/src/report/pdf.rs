//! Interview report rendering: candidate block plus one block per question,
//! laid out on A4 pages and serialized to an in-memory PDF.
//!
//! Text is written with the standard Helvetica faces under WinAnsiEncoding, so
//! only characters in U+0000..=U+00FF can be printed, minus the C1 controls
//! U+0080..=U+009F. Anything else fails the
//! whole report with `ReportError::UnsupportedCharacter`; there is no
//! transliteration.

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use thiserror::Error;
use tracing::debug;

use crate::report::font_metrics::{get_metrics, FontFace, PageConfig};

pub const REPORT_TITLE: &str = "TalentScout Interview Report";
const NO_ANSWER: &str = "No answer provided";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{field} contains {character:?}, which the report font cannot encode")]
    UnsupportedCharacter { character: char, field: String },

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One question block of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub question: String,
    pub answer: String,
    pub score: u8,
    pub feedback: String,
}

/// Renders the report and returns the PDF bytes. Nothing touches the filesystem.
pub fn build_report(
    full_name: &str,
    email: &str,
    entries: &[ReportEntry],
    config: &PageConfig,
) -> Result<Bytes, ReportError> {
    let mut writer = PageWriter::new(config);

    writer.centered(REPORT_TITLE, FontFace::Bold, config.title_font_size_pt, "title")?;
    writer.gap(config.section_gap_pt);

    writer.paragraph(&format!("Candidate: {full_name}"), FontFace::Regular, "candidate name")?;
    writer.paragraph(&format!("Email: {email}"), FontFace::Regular, "email")?;
    writer.gap(config.section_gap_pt);

    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        let answer = if entry.answer.trim().is_empty() {
            NO_ANSWER
        } else {
            entry.answer.as_str()
        };

        writer.paragraph(
            &format!("Q{n}: {}", entry.question),
            FontFace::Bold,
            &format!("question {n}"),
        )?;
        writer.paragraph(
            &format!("Answer: {answer}"),
            FontFace::Regular,
            &format!("answer {n}"),
        )?;
        writer.paragraph(
            &format!("Score: {}/10", entry.score),
            FontFace::Regular,
            &format!("score {n}"),
        )?;
        writer.paragraph(
            &format!("Feedback: {}", entry.feedback),
            FontFace::Regular,
            &format!("feedback {n}"),
        )?;
        writer.gap(config.entry_gap_pt);
    }

    let pages = writer.finish();
    debug!("Report laid out on {} page(s)", pages.len());
    serialize(pages, config)
}

/// Encodes text as Latin-1 bytes, failing on the first character above U+00FF
/// or in the C1 control range U+0080..=U+009F, whose bytes WinAnsiEncoding
/// maps to unrelated glyphs.
pub fn encode_latin1(text: &str, field: &str) -> Result<Vec<u8>, ReportError> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte) if !(0x80..=0x9F).contains(&byte) => Ok(byte),
            _ => Err(ReportError::UnsupportedCharacter {
                character: c,
                field: field.to_string(),
            }),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates text operations page by page, breaking to a new page when
/// the next line would cross the bottom margin.
struct PageWriter<'a> {
    config: &'a PageConfig,
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    /// Top of the next line, in points from the page bottom.
    cursor_y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Vec::new(),
            cursor_y: config.page_height_pt - config.margin_pt,
        }
    }

    fn gap(&mut self, height_pt: f32) {
        self.cursor_y -= height_pt;
    }

    fn break_page_if_needed(&mut self, line_height_pt: f32) {
        if self.cursor_y - line_height_pt < self.config.margin_pt {
            self.pages.push(std::mem::take(&mut self.current));
            self.cursor_y = self.config.page_height_pt - self.config.margin_pt;
        }
    }

    fn line(&mut self, bytes: Vec<u8>, face: FontFace, size_pt: f32, x_pt: f32, line_height_pt: f32) {
        self.break_page_if_needed(line_height_pt);
        let baseline = self.cursor_y - size_pt;

        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(face.resource_name().as_bytes().to_vec()),
                    Object::Integer(size_pt.round() as i64),
                ],
            ),
            Operation::new(
                "Td",
                vec![
                    Object::Integer(x_pt.round() as i64),
                    Object::Integer(baseline.round() as i64),
                ],
            ),
            Operation::new("Tj", vec![Object::String(bytes, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
        self.cursor_y -= line_height_pt;
    }

    /// A single line centered across the page width.
    fn centered(&mut self, text: &str, face: FontFace, size_pt: f32, field: &str) -> Result<(), ReportError> {
        let bytes = encode_latin1(text, field)?;
        let width = get_metrics(face).width_pt(text, size_pt);
        let x = ((self.config.page_width_pt - width) / 2.0).max(self.config.margin_pt);
        self.line(bytes, face, size_pt, x, self.config.title_line_height_pt);
        Ok(())
    }

    /// Word-wrapped body text at the left margin.
    fn paragraph(&mut self, text: &str, face: FontFace, field: &str) -> Result<(), ReportError> {
        let size = self.config.body_font_size_pt;
        let lines = get_metrics(face).wrap_lines(text, size, self.config.text_width_pt());
        for line in lines {
            let bytes = encode_latin1(&line, field)?;
            self.line(bytes, face, size, self.config.margin_pt, self.config.body_line_height_pt);
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Serialization
// ────────────────────────────────────────────────────────────────────────────

fn serialize(pages: Vec<Vec<Operation>>, config: &PageConfig) -> Result<Bytes, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Regular));
    let bold_id = doc.add_object(font_dictionary(FontFace::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(config.page_width_pt.round() as i64),
                Object::Integer(config.page_height_pt.round() as i64),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(Bytes::from(buffer))
}

fn font_dictionary(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}


#[cfg(test)]
mod tests {
    use super::testing::shown_text;
    use super::*;
    use crate::report::font_metrics::default_page_config;

    fn entry(question: &str, answer: &str, score: u8, feedback: &str) -> ReportEntry {
        ReportEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            score,
            feedback: feedback.to_string(),
        }
    }

    fn page_count(pdf: &[u8]) -> usize {
        Document::load_mem(pdf).unwrap().get_pages().len()
    }

    #[test]
    fn test_report_reproduces_entries_in_order() {
        let entries = vec![
            entry("What is a list comprehension?", "A concise loop.", 8, "Clear."),
            entry("Explain GIL.", "", 0, "No answer provided."),
            entry("Design a rate limiter (token bucket).", "Use a bucket.", 5, "Too brief."),
        ];
        let pdf = build_report("Jane Doe", "jane@example.com", &entries, &default_page_config())
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-1.5"));
        let lines = shown_text(&pdf);
        let expected = vec![
            REPORT_TITLE,
            "Candidate: Jane Doe",
            "Email: jane@example.com",
            "Q1: What is a list comprehension?",
            "Answer: A concise loop.",
            "Score: 8/10",
            "Feedback: Clear.",
            "Q2: Explain GIL.",
            "Answer: No answer provided",
            "Score: 0/10",
            "Feedback: No answer provided.",
            "Q3: Design a rate limiter (token bucket).",
            "Answer: Use a bucket.",
            "Score: 5/10",
            "Feedback: Too brief.",
        ];
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_multiline_feedback_is_kept_line_by_line() {
        let entries = vec![entry("Q", "A", 3, "Partially correct.\n- Mention borrowing.")];
        let pdf = build_report("A", "a@b.c", &entries, &default_page_config()).unwrap();
        let lines = shown_text(&pdf);
        assert!(lines.contains(&"Feedback: Partially correct.".to_string()));
        assert!(lines.contains(&"- Mention borrowing.".to_string()));
    }

    #[test]
    fn test_latin1_accents_are_printable() {
        let pdf = build_report("José Müller", "jose@example.com", &[], &default_page_config())
            .unwrap();
        assert!(shown_text(&pdf).contains(&"Candidate: José Müller".to_string()));
    }

    #[test]
    fn test_non_latin_text_fails_the_report() {
        let entries = vec![entry("Q", "A", 7, "Great work \u{2014} well done")];
        let err = build_report("Jane", "jane@example.com", &entries, &default_page_config())
            .unwrap_err();
        match err {
            ReportError::UnsupportedCharacter { character, field } => {
                assert_eq!(character, '\u{2014}');
                assert_eq!(field, "feedback 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_latin_candidate_name_fails() {
        let err = build_report("山田太郎", "t@example.com", &[], &default_page_config()).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedCharacter { .. }));
    }

    #[test]
    fn test_long_interview_overflows_to_more_pages() {
        let long_answer = "This answer goes on and on about trade-offs. ".repeat(20);
        let entries: Vec<_> = (0..12)
            .map(|i| entry(&format!("Question number {i}"), &long_answer, 6, "Fine."))
            .collect();
        let pdf = build_report("Jane", "jane@example.com", &entries, &default_page_config())
            .unwrap();

        assert!(page_count(&pdf) > 1);
        let lines = shown_text(&pdf);
        assert_eq!(lines.iter().filter(|l| l.as_str() == "Score: 6/10").count(), 12);
        assert_eq!(lines.last().map(String::as_str), Some("Feedback: Fine."));
    }

    #[test]
    fn test_empty_interview_still_has_one_page() {
        let pdf = build_report("Jane", "jane@example.com", &[], &default_page_config()).unwrap();
        assert_eq!(page_count(&pdf), 1);
        assert_eq!(shown_text(&pdf).len(), 3);
    }

    #[test]
    fn test_text_is_extractable_by_a_pdf_reader() {
        let entries = vec![entry("Explain GIL.", "A global lock.", 7, "Good grasp.")];
        let pdf = build_report("Jane Doe", "jane@example.com", &entries, &default_page_config())
            .unwrap();
        let text = pdf_extract::extract_text_from_mem(&pdf).unwrap();
        assert!(text.contains(REPORT_TITLE));
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("7/10"));
    }

    #[test]
    fn test_encode_latin1_boundaries() {
        assert_eq!(encode_latin1("ÿ", "x").unwrap(), vec![0xFF]);
        assert_eq!(encode_latin1("\u{7F}\u{A0}", "x").unwrap(), vec![0x7F, 0xA0]);
        assert!(encode_latin1("Ā", "x").is_err());
    }

    #[test]
    fn test_c1_controls_are_rejected() {
        for c in ['\u{80}', '\u{85}', '\u{9F}'] {
            let err = encode_latin1(&format!("a{c}b"), "answer 2").unwrap_err();
            match err {
                ReportError::UnsupportedCharacter { character, field } => {
                    assert_eq!(character, c);
                    assert_eq!(field, "answer 2");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        let entries = vec![entry("Q", "Cost: \u{80}5", 4, "Ok.")];
        let err = build_report("Jane", "jane@example.com", &entries, &default_page_config())
            .unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedCharacter { character: '\u{80}', .. }));
    }
}
