//! Fixed category/subject enumerations and their fallbacks. Persisted values
//! are reconciled against these tables whenever a draft crosses the boundary
//! in either direction.

pub const CATEGORIES: &[&str] = &[
    "Development",
    "Business",
    "Finance & Accounting",
    "IT & Software",
    "Design",
    "Marketing",
    "Academics",
    "Music",
];

pub const DEFAULT_CATEGORY: &str = "Development";

/// The one category that carries a subject taxonomy.
pub const ACADEMIC_CATEGORY: &str = "Academics";

pub const ACADEMIC_SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "English",
];

pub const FALLBACK_SUBJECT: &str = "Other";

/// Map a raw category to its canonical entry, falling back to the default
/// for anything unrecognized.
pub fn resolve_category(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or("");
    CATEGORIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(raw))
        .copied()
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// Subjects only exist under the academic category; everything else gets the
/// catch-all subject.
pub fn resolve_subject(category: &str, raw: Option<&str>) -> String {
    if category != ACADEMIC_CATEGORY {
        return FALLBACK_SUBJECT.to_string();
    }
    let raw = raw.map(str::trim).unwrap_or("");
    ACADEMIC_SUBJECTS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(raw))
        .copied()
        .unwrap_or(FALLBACK_SUBJECT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_falls_back_to_default() {
        assert_eq!(resolve_category(Some("Underwater Basketweaving")), DEFAULT_CATEGORY);
        assert_eq!(resolve_category(None), DEFAULT_CATEGORY);
        assert_eq!(resolve_category(Some("design")), "Design");
    }

    #[test]
    fn subject_only_resolved_under_academics() {
        assert_eq!(resolve_subject("Academics", Some("physics")), "Physics");
        assert_eq!(resolve_subject("Academics", Some("Alchemy")), FALLBACK_SUBJECT);
        assert_eq!(resolve_subject("Development", Some("Physics")), FALLBACK_SUBJECT);
    }
}
