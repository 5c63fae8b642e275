use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::frontmatter::Frontmatter;

/// Which root a skill was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    /// Framework-shipped, under `system/skills/`.
    System,
    /// Authored by the user, under `skills/`. Shadows a system skill
    /// of the same name.
    User,
}

/// A skill definition parsed from a SKILL.md file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub source: SkillSource,
    /// Absolute path to the SKILL.md file.
    pub path: PathBuf,
    /// Auxiliary resource paths declared in frontmatter, relative to
    /// the skill directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// Frontmatter keys a SKILL.md is expected to carry.
const EXPECTED_KEYS: &[&str] = &["name", "description", "resources"];

impl Skill {
    /// Parse SKILL.md content. The record degrades instead of failing:
    /// a missing name falls back to the directory name, missing
    /// description becomes empty, and each such drift is reported in
    /// the returned reasons.
    pub fn parse(
        content: &str,
        skill_md: &Path,
        source: SkillSource,
    ) -> Result<(Self, Vec<String>), String> {
        let (fm, _body) = Frontmatter::parse(content)?;
        let mut reasons = Vec::new();

        let dir_name = skill_md
            .parent()
            .and_then(|d| d.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let name = match fm.get("name") {
            Some(n) if !n.is_empty() => n,
            _ => {
                reasons.push(format!("missing name, using directory name '{dir_name}'"));
                dir_name
            }
        };

        let description = match fm.get("description") {
            Some(d) if !d.is_empty() => d,
            _ => {
                reasons.push("missing description".to_string());
                String::new()
            }
        };

        for key in fm.keys() {
            if !EXPECTED_KEYS.contains(&key) {
                reasons.push(format!("unexpected frontmatter field '{key}'"));
            }
        }

        Ok((
            Self {
                name,
                description,
                source,
                path: skill_md.to_path_buf(),
                resources: fm.get_list("resources"),
            },
            reasons,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_skill() {
        let content = "---\nname: meeting-notes\ndescription: Summarize meeting transcripts\n---\n\nInstructions.";
        let (skill, reasons) = Skill::parse(
            content,
            Path::new("/ws/skills/meeting-notes/SKILL.md"),
            SkillSource::User,
        )
        .unwrap();
        assert_eq!(skill.name, "meeting-notes");
        assert_eq!(skill.description, "Summarize meeting transcripts");
        assert_eq!(skill.source, SkillSource::User);
        assert!(skill.resources.is_empty());
        assert!(reasons.is_empty());
    }

    #[test]
    fn missing_name_falls_back_to_dir() {
        let content = "---\ndescription: d\n---\nBody.";
        let (skill, reasons) = Skill::parse(
            content,
            Path::new("/ws/skills/ad-hoc/SKILL.md"),
            SkillSource::User,
        )
        .unwrap();
        assert_eq!(skill.name, "ad-hoc");
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("missing name"));
    }

    #[test]
    fn missing_description_degrades() {
        let content = "---\nname: bare\n---\nBody.";
        let (skill, reasons) =
            Skill::parse(content, Path::new("/s/bare/SKILL.md"), SkillSource::System).unwrap();
        assert_eq!(skill.description, "");
        assert!(reasons.iter().any(|r| r.contains("missing description")));
    }

    #[test]
    fn extra_fields_reported_not_fatal() {
        let content = "---\nname: n\ndescription: d\nversion: 2\nauthor: someone\n---\nBody.";
        let (_, reasons) =
            Skill::parse(content, Path::new("/s/n/SKILL.md"), SkillSource::System).unwrap();
        assert_eq!(reasons.len(), 2);
        assert!(reasons.iter().any(|r| r.contains("version")));
        assert!(reasons.iter().any(|r| r.contains("author")));
    }

    #[test]
    fn declared_resources_collected() {
        let content =
            "---\nname: n\ndescription: d\nresources: [template.md, data/rates.csv]\n---\nBody.";
        let (skill, reasons) =
            Skill::parse(content, Path::new("/s/n/SKILL.md"), SkillSource::User).unwrap();
        assert_eq!(skill.resources, vec!["template.md", "data/rates.csv"]);
        assert!(reasons.is_empty());
    }

    #[test]
    fn no_frontmatter_is_an_error() {
        assert!(Skill::parse("# Plain\n", Path::new("/s/x/SKILL.md"), SkillSource::User).is_err());
    }
}
