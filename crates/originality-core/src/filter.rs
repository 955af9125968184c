//! Reject low-information corpus entries before they can act as evidence.
//!
//! Boilerplate repositories, template collections, and placeholder titles
//! often rank high on raw similarity because they mention everything. The
//! filter runs after fusion and before truncation to `k`, so a rejected
//! entry never occupies a neighbor slot.

use crate::models::Project;

/// Type labels that mark collections rather than single projects.
const REJECTED_TYPE_LABELS: &[&str] = &["template", "list", "platform"];

/// Title substrings that mark starter kits and boilerplate.
const BOILERPLATE_TITLE_PARTS: &[&str] = &[
    "starter",
    "boilerplate",
    "template",
    "blueprint",
    "misc",
    "resources",
    "examples",
    "sample",
    "skeleton",
    "kickstart",
];

/// Titles that say nothing about the idea.
const GENERIC_TITLES: &[&str] = &[
    "hackathon",
    "hackathons",
    "hackathon project",
    "hackathon-project",
    "project",
    "projects",
    "1st-hackathon",
];

/// Descriptions shorter than this are checked for filler words.
const SHORT_DESCRIPTION_CHARS: usize = 60;

const FILLER_DESCRIPTION_WORDS: &[&str] = &["hackathon", "repository", "project"];

/// Returns true if `project` may be shown and scored as a neighbor.
pub fn is_admissible(project: &Project) -> bool {
    if let Some(label) = &project.type_label {
        if REJECTED_TYPE_LABELS.contains(&label.to_lowercase().as_str()) {
            return false;
        }
    }

    let title = project.title.trim().to_lowercase();
    if BOILERPLATE_TITLE_PARTS.iter().any(|part| title.contains(part)) {
        return false;
    }
    if GENERIC_TITLES.contains(&title.as_str()) {
        return false;
    }

    let description = project.description.trim().to_lowercase();
    if description.chars().count() < SHORT_DESCRIPTION_CHARS
        && FILLER_DESCRIPTION_WORDS
            .iter()
            .any(|word| description.contains(word))
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;

    fn project(title: &str, description: &str, type_label: Option<&str>) -> Project {
        Project::from(ProjectRecord {
            id: "x".into(),
            title: Some(title.into()),
            description: Some(description.into()),
            type_label: type_label.map(str::to_string),
            ..Default::default()
        })
    }

    const LONG_DESC: &str =
        "Schedules nurse shifts across rural clinics when connectivity drops out.";

    #[test]
    fn test_regular_project_is_admissible() {
        assert!(is_admissible(&project("Clinic Rota", LONG_DESC, None)));
        assert!(is_admissible(&project("Clinic Rota", LONG_DESC, Some("app"))));
    }

    #[test]
    fn test_type_labels_rejected() {
        for label in ["template", "List", "PLATFORM"] {
            assert!(!is_admissible(&project("Clinic Rota", LONG_DESC, Some(label))));
        }
    }

    #[test]
    fn test_boilerplate_titles_rejected() {
        for title in ["React Starter", "my-boilerplate", "ML Examples", "Kickstart kit"] {
            assert!(!is_admissible(&project(title, LONG_DESC, None)), "{title}");
        }
    }

    #[test]
    fn test_generic_title_rejected_regardless_of_description() {
        assert!(!is_admissible(&project("hackathon project", LONG_DESC, None)));
        assert!(!is_admissible(&project("  Projects ", LONG_DESC, None)));
    }

    #[test]
    fn test_short_filler_description_rejected() {
        assert!(!is_admissible(&project("Clinic Rota", "Our hackathon repository", None)));
        assert!(is_admissible(&project("Clinic Rota", "Nurse shift swaps", None)));
    }

    #[test]
    fn test_long_description_mentioning_project_is_fine() {
        let desc = "A project that schedules nurse shifts across rural clinics offline.";
        assert!(desc.len() >= 60);
        assert!(is_admissible(&project("Clinic Rota", desc, None)));
    }
}
