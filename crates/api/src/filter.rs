//! Client-side filtering of fetched notes.

use studyhub_core::Note;

/// Filter over a fetched note list. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Required tag, compared case-insensitively
    pub tag: Option<String>,
    /// Text searched in title and content, case-insensitively
    pub text: Option<String>,
}

impl NoteFilter {
    /// Match notes carrying a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Match notes containing some text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether a note passes the filter.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(tag) = &self.tag {
            if !note.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !note.title.to_lowercase().contains(&needle)
                && !note.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Matching notes, newest first. Notes without a timestamp sort last.
    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        let mut matched: Vec<&Note> = notes.iter().filter(|n| self.matches(n)).collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(title: &str, content: &str, tags: &[&str], day: Option<u32>) -> Note {
        let mut note = Note::new(title, content);
        note.tags = tags.iter().map(|t| t.to_string()).collect();
        note.created_at = day.map(|d| Utc.with_ymd_and_hms(2026, 4, d, 12, 0, 0).unwrap());
        note
    }

    fn notes() -> Vec<Note> {
        vec![
            note("Photosynthesis", "Light reactions", &["Biology"], Some(3)),
            note("Cell division", "Mitosis and meiosis", &["biology", "exam"], Some(9)),
            note("Integrals", "By parts", &["math"], None),
        ]
    }

    #[test]
    fn test_empty_filter_sorts_newest_first() {
        let notes = notes();
        let matched = NoteFilter::default().apply(&notes);
        let titles: Vec<&str> = matched.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Cell division", "Photosynthesis", "Integrals"]);
    }

    #[test]
    fn test_tag_is_case_insensitive() {
        let notes = notes();
        let matched = NoteFilter::default().tag("BIOLOGY").apply(&notes);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_text_and_tag_combined() {
        let notes = notes();
        let matched = NoteFilter::default().tag("biology").text("MITOSIS").apply(&notes);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Cell division");

        assert!(NoteFilter::default().text("calculus").apply(&notes).is_empty());
    }
}
