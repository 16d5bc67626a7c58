//! Greedy word wrap against the static metric tables.

use crate::document::font_metrics::FontMetricTable;

/// Breaks `text` into lines no wider than `max_width_pt` at `size_pt`.
///
/// Newlines in the input are hard breaks. A single word wider than the line is
/// split by characters so no line ever overflows. Blank input yields no lines.
pub fn wrap_lines(text: &str, metrics: &FontMetricTable, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let max_width = max_width_pt / size_pt;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in words {
            let word_w = metrics.measure_str(word);

            if word_w > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let (pieces, rest) = split_long_word(word, metrics, max_width);
                lines.extend(pieces);
                current_width = metrics.measure_str(&rest);
                current = rest;
                continue;
            }

            let space_w = if current.is_empty() { 0.0 } else { metrics.space_width };
            if !current.is_empty() && current_width + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Splits an over-wide word into full lines plus the trailing remainder.
fn split_long_word(word: &str, metrics: &FontMetricTable, max_width: f32) -> (Vec<String>, String) {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let w = metrics.measure_str(c.encode_utf8(&mut buf));
        if !current.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    (pieces, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::font_metrics::{get_metrics, FontFace};

    #[test]
    fn test_blank_text_has_no_lines() {
        let metrics = get_metrics(FontFace::Regular);
        assert!(wrap_lines("   \n ", metrics, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Conception et développement d'une plateforme de gestion de flotte \
                    pour un client industriel, avec migration progressive vers le cloud";
        let lines = wrap_lines(text, metrics, 10.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) <= 200.0 + 1e-3, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_newlines_are_hard_breaks() {
        let metrics = get_metrics(FontFace::Regular);
        let lines = wrap_lines("first\nsecond", metrics, 10.0, 500.0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let metrics = get_metrics(FontFace::Regular);
        let url = "https://example.com/a/very/long/path/that/cannot/possibly/fit/on/one/line";
        let lines = wrap_lines(url, metrics, 10.0, 80.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) <= 80.0 + 1e-3);
        }
    }
}
