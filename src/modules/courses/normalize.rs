//! Draft normalizer: reconciles legacy flat-lesson drafts and current
//! section-based drafts into one canonical section list.

use super::draft::{CourseDraft, DraftError, SectionDraft};

/// Title given to the synthetic section wrapping a legacy flat lesson list.
const LEGACY_SECTION_TITLE: &str = "Curriculum";

/// Produce the canonical section list for a draft. Prefers `sections` when
/// present and non-empty; otherwise wraps the legacy `lessons` list. Blank
/// section titles are defaulted by position.
pub fn normalize_sections(draft: &CourseDraft) -> Result<Vec<SectionDraft>, DraftError> {
    let mut sections = match &draft.sections {
        Some(list) if !list.is_empty() => list.clone(),
        _ => vec![SectionDraft {
            title: Some(LEGACY_SECTION_TITLE.to_string()),
            lessons: draft.lessons.clone().unwrap_or_default(),
        }],
    };

    for (index, section) in sections.iter_mut().enumerate() {
        let title = section
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Section {}", index + 1));
        section.title = Some(title);
    }

    if sections.iter().all(|section| section.lessons.is_empty()) {
        return Err(DraftError::EmptyCurriculum);
    }

    Ok(sections)
}
