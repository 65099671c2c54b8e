//! Tolerant parsing of free-text model output

/// Sections of a labeled response. Each section runs from the end of its
/// label to the start of the nearest following label, or to the end of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    /// Scan `text` for the first occurrence of each label.
    /// Missing labels are simply absent; order in the text does not matter.
    pub fn scan(text: &str, labels: &[&str]) -> Self {
        let found: Vec<(&str, usize)> = labels
            .iter()
            .filter_map(|label| text.find(label).map(|pos| (*label, pos)))
            .collect();

        let entries = found
            .iter()
            .map(|(label, pos)| {
                let start = pos + label.len();
                let end = found
                    .iter()
                    .map(|(_, other)| *other)
                    .filter(|other| *other >= start)
                    .min()
                    .unwrap_or(text.len());
                (label.to_string(), text[start..end].trim().to_string())
            })
            .collect();

        Self { entries }
    }

    /// Trimmed body of a section, if its label was present
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, body)| body.as_str())
    }
}

/// Non-empty trimmed lines of a block
pub fn non_empty_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip leading list markers (bullets, numbering, punctuation) from a line
pub fn strip_list_marker(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| {
            c.is_ascii_digit()
                || c.is_whitespace()
                || matches!(c, '-' | '*' | '•' | '.' | ')' | '(' | ':' | '#')
        })
        .trim()
}
