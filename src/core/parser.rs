//! Turns free-text model output into a `StyleAnalysis`.
//!
//! The grammar is only requested through the prompt, never enforced by the
//! provider, so every deviation degrades to a renderable record instead of an
//! error. Parsing runs in three stages: paragraphs, then lines, then tokens.

use crate::core::prompt::COLOR_SECTION_MARKER;
use crate::domain::model::{ColorEntry, StyleAnalysis};
use std::borrow::Cow;

const PARAGRAPH_BREAK: &str = "\n\n";
const BULLETS: [char; 3] = ['-', '*', '•'];

/// Title and description taken from the first paragraph.
#[derive(Debug, PartialEq, Eq)]
struct StyleBlock<'a> {
    title: &'a str,
    description: &'a str,
}

/// Classification of a single line inside the color paragraph.
#[derive(Debug, PartialEq, Eq)]
enum ColorLine {
    Blank,
    Marker,
    Unparseable,
    Entry(ColorEntry),
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    include_color_analysis: bool,
}

impl ResponseParser {
    /// `include_color_analysis` must match the flag the prompt was built with.
    pub fn new(include_color_analysis: bool) -> Self {
        Self {
            include_color_analysis,
        }
    }

    pub fn parse(&self, raw: &str) -> StyleAnalysis {
        let text = raw.trim();
        let normalized = normalize_line_endings(text);

        let parsed = if self.include_color_analysis {
            parse_style_and_colors(&normalized)
        } else {
            parse_style_only(&normalized)
        };

        match parsed {
            Some(analysis) => {
                tracing::debug!(
                    style_title = analysis.style_title(),
                    colors = analysis.colors().map_or(0, |c| c.len()),
                    "Parsed model response"
                );
                analysis
            }
            None => {
                tracing::warn!(
                    response_len = text.len(),
                    "Model response did not follow the requested format, using fallback"
                );
                StyleAnalysis::fallback(text, self.include_color_analysis)
            }
        }
    }
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn parse_style_and_colors(text: &str) -> Option<StyleAnalysis> {
    let paragraphs: Vec<&str> = text.split(PARAGRAPH_BREAK).collect();
    if paragraphs.len() < 2 {
        return None;
    }

    let style = read_style_block(paragraphs[0])?;

    // The color section is searched for, not assumed to be paragraph 1.
    let colors = paragraphs[1..]
        .iter()
        .find(|paragraph| paragraph.contains(COLOR_SECTION_MARKER))
        .map(|paragraph| read_color_section(paragraph))
        .unwrap_or_default();

    Some(StyleAnalysis::parsed(
        style.title.to_string(),
        style.description.to_string(),
        Some(colors),
    ))
}

fn parse_style_only(text: &str) -> Option<StyleAnalysis> {
    let (title_line, rest) = text.split_once('\n')?;
    Some(StyleAnalysis::parsed(
        title_line.trim().to_string(),
        rest.trim().to_string(),
        None,
    ))
}

fn read_style_block(paragraph: &str) -> Option<StyleBlock<'_>> {
    let mut lines = paragraph.split('\n');
    let title = strip_title_decorations(lines.next()?);
    if title.is_empty() {
        return None;
    }
    let description = lines.next().map(str::trim).unwrap_or("");
    Some(StyleBlock { title, description })
}

/// Removes `**bold**` and `[bracket]` wrapping around a title line.
fn strip_title_decorations(line: &str) -> &str {
    let mut title = line.trim();
    if let Some(inner) = title.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
        title = inner.trim();
    }
    if let Some(inner) = title.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        title = inner.trim();
    }
    title
}

fn read_color_section(paragraph: &str) -> Vec<ColorEntry> {
    paragraph
        .split('\n')
        .filter_map(|line| match classify_color_line(line) {
            ColorLine::Entry(entry) => Some(entry),
            ColorLine::Unparseable => {
                tracing::debug!(line = line.trim(), "Skipping color line without a colon");
                None
            }
            ColorLine::Blank | ColorLine::Marker => None,
        })
        .collect()
}

fn classify_color_line(line: &str) -> ColorLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ColorLine::Blank;
    }
    if trimmed.contains(COLOR_SECTION_MARKER) {
        return ColorLine::Marker;
    }

    let body = trimmed.trim_start_matches(|c: char| BULLETS.contains(&c) || c.is_whitespace());
    match body.split_once(':') {
        Some((hex, name)) => ColorLine::Entry(ColorEntry::new(hex.trim(), name.trim())),
        None => ColorLine::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AnalysisStatus;

    const SCANDINAVIAN: &str = "Scandinavian Calm\nLight wood and soft textiles create a serene, airy space.\n\n[Color Analysis]\n- #F5F5F5: Pure White\n- #D2B48C: Tan";

    #[test]
    fn test_well_formed_response() {
        let record = ResponseParser::new(true).parse(SCANDINAVIAN);

        assert_eq!(record.status(), AnalysisStatus::Ok);
        assert_eq!(record.style_title(), "Scandinavian Calm");
        assert_eq!(
            record.style_description(),
            "Light wood and soft textiles create a serene, airy space."
        );
        assert_eq!(
            record.colors().unwrap(),
            &[
                ColorEntry::new("#F5F5F5", "Pure White"),
                ColorEntry::new("#D2B48C", "Tan"),
            ]
        );
    }

    #[test]
    fn test_single_line_falls_back() {
        let record = ResponseParser::new(true).parse("Just one line, no break");

        assert_eq!(record.status(), AnalysisStatus::ParseFallback);
        assert_eq!(record.style_title(), "Interior Style");
        assert_eq!(record.style_description(), "Just one line, no break");
        assert_eq!(record.colors(), Some(&[][..]));
    }

    #[test]
    fn test_colon_inside_color_name_is_kept() {
        assert_eq!(
            classify_color_line("- #112233: Deep Navy: Accent Wall"),
            ColorLine::Entry(ColorEntry::new("#112233", "Deep Navy: Accent Wall"))
        );
    }

    #[test]
    fn test_classify_color_lines() {
        assert_eq!(classify_color_line("   "), ColorLine::Blank);
        assert_eq!(classify_color_line(" [Color Analysis] "), ColorLine::Marker);
        assert_eq!(classify_color_line("- no colon here"), ColorLine::Unparseable);
        assert_eq!(
            classify_color_line("* #ABCDEF :  Soft   Sage "),
            ColorLine::Entry(ColorEntry::new("#ABCDEF", "Soft   Sage"))
        );
        assert_eq!(
            classify_color_line("• #000000: Black"),
            ColorLine::Entry(ColorEntry::new("#000000", "Black"))
        );
        assert_eq!(
            classify_color_line("-- #E67E22: Burnt Orange"),
            ColorLine::Entry(ColorEntry::new("#E67E22", "Burnt Orange"))
        );
        assert_eq!(
            classify_color_line("- - #E67E22: Burnt Orange"),
            ColorLine::Entry(ColorEntry::new("#E67E22", "Burnt Orange"))
        );
        // Hex syntax is passed through untouched.
        assert_eq!(
            classify_color_line("- teal-ish: Teal"),
            ColorLine::Entry(ColorEntry::new("teal-ish", "Teal"))
        );
    }

    #[test]
    fn test_colorless_lines_are_skipped_in_order() {
        let raw = "Industrial Chic\nExposed brick.\n\n[Color Analysis]\n- #8B4513: Saddle Brown\nsomething odd\n- #2F2F2F: Charcoal\n- still odd\n- #8B4513: Saddle Brown";
        let record = ResponseParser::new(true).parse(raw);

        let names: Vec<&str> = record
            .colors()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Saddle Brown", "Charcoal", "Saddle Brown"]);
    }

    #[test]
    fn test_color_section_found_by_search() {
        let raw = "Coastal Retreat\nBreezy blues and whites.\n\nSome commentary the model added.\n\n[Color Analysis]\n- #1E90FF: Dodger Blue";
        let record = ResponseParser::new(true).parse(raw);

        assert!(record.is_ok());
        assert_eq!(
            record.colors().unwrap(),
            &[ColorEntry::new("#1E90FF", "Dodger Blue")]
        );
    }

    #[test]
    fn test_missing_color_section_gives_empty_colors() {
        let raw = "Warm Rustic\nTimber beams and stone.\n\nNo palette today.";
        let record = ResponseParser::new(true).parse(raw);

        assert_eq!(record.status(), AnalysisStatus::Ok);
        assert_eq!(record.colors(), Some(&[][..]));
    }

    #[test]
    fn test_one_line_style_block_has_empty_description() {
        let raw = "Japandi\n\n[Color Analysis]\n- #EEE8DC: Linen";
        let record = ResponseParser::new(true).parse(raw);

        assert!(record.is_ok());
        assert_eq!(record.style_title(), "Japandi");
        assert_eq!(record.style_description(), "");
        assert_eq!(record.colors().unwrap().len(), 1);
    }

    #[test]
    fn test_title_decorations_are_stripped() {
        assert_eq!(strip_title_decorations("[Mid-Century Modern]"), "Mid-Century Modern");
        assert_eq!(strip_title_decorations("**Art Deco Glam**"), "Art Deco Glam");
        assert_eq!(strip_title_decorations("**[ French Country ]**"), "French Country");
        assert_eq!(strip_title_decorations("  Plain Title  "), "Plain Title");
        assert_eq!(strip_title_decorations("[Unclosed"), "[Unclosed");
    }

    #[test]
    fn test_empty_title_after_stripping_falls_back() {
        let raw = "[]\nA description.\n\n[Color Analysis]\n- #FFFFFF: White";
        let record = ResponseParser::new(true).parse(raw);

        assert_eq!(record.status(), AnalysisStatus::ParseFallback);
        assert_eq!(record.style_description(), raw);
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "Modern Farmhouse\r\nShiplap and black iron.\r\n\r\n[Color Analysis]\r\n- #FFFFFF: White\r\n";
        let record = ResponseParser::new(true).parse(raw);

        assert!(record.is_ok());
        assert_eq!(record.style_title(), "Modern Farmhouse");
        assert_eq!(record.style_description(), "Shiplap and black iron.");
        assert_eq!(record.colors().unwrap(), &[ColorEntry::new("#FFFFFF", "White")]);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_internal_kept() {
        let raw = "  \n  Hollywood   Regency  \n   Velvet,  brass and mirrors.  \n\n[Color Analysis]\n-   #50C878  :   Emerald   Green  \n";
        let record = ResponseParser::new(true).parse(raw);

        assert_eq!(record.style_title(), "Hollywood   Regency");
        assert_eq!(record.style_description(), "Velvet,  brass and mirrors.");
        assert_eq!(
            record.colors().unwrap(),
            &[ColorEntry::new("#50C878", "Emerald   Green")]
        );
    }

    #[test]
    fn test_style_only_variant() {
        let parser = ResponseParser::new(false);

        let record = parser.parse("Scandinavian Calm\nLight wood and soft textiles.");
        assert_eq!(record.status(), AnalysisStatus::Ok);
        assert_eq!(record.style_title(), "Scandinavian Calm");
        assert_eq!(record.style_description(), "Light wood and soft textiles.");
        assert_eq!(record.colors(), None);

        let record = parser.parse("Just one line, no break");
        assert_eq!(record.status(), AnalysisStatus::ParseFallback);
        assert_eq!(record.style_title(), "Interior Style");
        assert_eq!(record.style_description(), "Just one line, no break");
        assert_eq!(record.colors(), None);
    }

    #[test]
    fn test_style_only_title_is_trimmed_line() {
        let parser = ResponseParser::new(false);

        let record = parser.parse("[]\nDesc");
        assert_eq!(record.status(), AnalysisStatus::Ok);
        assert_eq!(record.style_title(), "[]");
        assert_eq!(record.style_description(), "Desc");

        let record = parser.parse("**Art Deco**  \nBold geometry.");
        assert_eq!(record.style_title(), "**Art Deco**");
    }

    #[test]
    fn test_style_only_keeps_rest_of_text() {
        let record = ResponseParser::new(false).parse("Boho\nLine one.\n\nLine two.");
        assert_eq!(record.style_title(), "Boho");
        assert_eq!(record.style_description(), "Line one.\n\nLine two.");
    }

    #[test]
    fn test_empty_input_falls_back() {
        let record = ResponseParser::new(true).parse("   ");
        assert_eq!(record.status(), AnalysisStatus::ParseFallback);
        assert_eq!(record.style_description(), "");
    }
}
