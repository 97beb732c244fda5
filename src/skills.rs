//! Skill discovery from `SKILL.md` files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::types::Skill;

/// File name that marks a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Errors returned when parsing a single skill file.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing opening frontmatter delimiter in {path}")]
    MissingFrontmatter { path: String },
    #[error("empty frontmatter in {path}")]
    EmptyFrontmatter { path: String },
    #[error("skill is missing a name: {path}")]
    MissingName { path: String },
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed frontmatter for a skill file.
#[derive(Debug, Deserialize)]
struct SkillFrontmatter {
    name: Option<String>,
    description: Option<String>,
}

/// Skills discovered on disk, in scan order.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: Vec<Skill>,
}

impl SkillRegistry {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    /// Walk each directory for skill files. Unreadable paths and malformed
    /// files are skipped.
    pub fn scan<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut skills = Vec::new();
        for dir in dirs {
            let dir = dir.as_ref();
            debug!("scanning skills root: {}", dir.display());
            for path in discover_skill_files(dir) {
                match parse_skill_file(&path) {
                    Ok(skill) => skills.push(skill),
                    Err(err) => debug!("skipping skill file (path={}): {}", path.display(), err),
                }
            }
        }
        info!("skills loaded (count={})", skills.len());
        Self { skills }
    }

    /// All discovered skills.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Skills whose name is in `allowlist`; an empty allowlist keeps all.
    pub fn filter(&self, allowlist: &[String]) -> Vec<Skill> {
        if allowlist.is_empty() {
            return self.skills.clone();
        }
        let allowed: HashSet<&str> = allowlist.iter().map(String::as_str).collect();
        self.skills
            .iter()
            .filter(|skill| allowed.contains(skill.name.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Discover SKILL.md files under a root directory.
fn discover_skill_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() == SKILL_FILE_NAME)
        .map(|entry| entry.into_path())
        .collect()
}

/// Read name and description from a skill file's frontmatter.
pub fn parse_skill_file(path: &Path) -> Result<Skill, SkillError> {
    let contents = std::fs::read_to_string(path)?;
    let display = || path.display().to_string();

    let mut lines = contents.lines();
    match lines.next() {
        Some(first) if first.trim() == "---" => {}
        _ => return Err(SkillError::MissingFrontmatter { path: display() }),
    }

    let yaml_lines: Vec<&str> = lines.take_while(|line| line.trim() != "---").collect();
    if yaml_lines.is_empty() {
        return Err(SkillError::EmptyFrontmatter { path: display() });
    }

    let frontmatter: SkillFrontmatter = serde_yaml::from_str(&yaml_lines.join("\n"))?;
    let name = frontmatter
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| SkillError::MissingName { path: display() })?;

    Ok(Skill::new(
        name,
        frontmatter.description.unwrap_or_default(),
        display(),
    ))
}
