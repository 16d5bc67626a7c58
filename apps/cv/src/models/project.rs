//! Internal project model, plus the closed status/category vocabularies and the
//! filter values the project grid accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Status
// ────────────────────────────────────────────────────────────────────────────

/// Project lifecycle stage.
///
/// Parsed once at ingestion. Strings outside the known vocabulary survive as
/// `Unknown` so they sort last and render with the neutral palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Reflecting,
    Started,
    InProgress,
    Completed,
    Archived,
    Unknown(String),
}

/// Sort rank for statuses outside the known vocabulary.
pub const UNKNOWN_STATUS_RANK: u32 = 999;

impl ProjectStatus {
    pub const KNOWN: [ProjectStatus; 5] = [
        ProjectStatus::Reflecting,
        ProjectStatus::Started,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    /// Normalizes a raw status. Accepts the published keys and English aliases.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "enReflexion" | "reflecting" => ProjectStatus::Reflecting,
            "demarre" | "started" => ProjectStatus::Started,
            "enCours" | "in-progress" | "inProgress" => ProjectStatus::InProgress,
            "termine" | "completed" => ProjectStatus::Completed,
            "archive" | "archived" => ProjectStatus::Archived,
            other => ProjectStatus::Unknown(other.to_string()),
        }
    }

    /// The published key, also used to build translation paths.
    pub fn key(&self) -> &str {
        match self {
            ProjectStatus::Reflecting => "enReflexion",
            ProjectStatus::Started => "demarre",
            ProjectStatus::InProgress => "enCours",
            ProjectStatus::Completed => "termine",
            ProjectStatus::Archived => "archive",
            ProjectStatus::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn priority(&self) -> u32 {
        match self {
            ProjectStatus::Reflecting => 1,
            ProjectStatus::Started => 2,
            ProjectStatus::InProgress => 3,
            ProjectStatus::Completed => 4,
            ProjectStatus::Archived => 5,
            ProjectStatus::Unknown(_) => UNKNOWN_STATUS_RANK,
        }
    }

    pub fn label_key(&self) -> String {
        format!("projects.states.{}", self.key())
    }
}

impl From<String> for ProjectStatus {
    fn from(raw: String) -> Self {
        ProjectStatus::parse(&raw)
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        status.key().to_string()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Category
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Informatics,
    Gardening,
    Wood,
    Electronics,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] = [
        ProjectCategory::Informatics,
        ProjectCategory::Gardening,
        ProjectCategory::Wood,
        ProjectCategory::Electronics,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ProjectCategory::Informatics => "informatics",
            ProjectCategory::Gardening => "gardening",
            ProjectCategory::Wood => "wood",
            ProjectCategory::Electronics => "electronics",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn label_key(&self) -> String {
        format!("projects.categories.{}", self.key())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filters
// ────────────────────────────────────────────────────────────────────────────

/// Status filter for the project grid. `"all"` or one status key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: &ProjectStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim() == "all" {
            return Ok(StatusFilter::All);
        }
        match ProjectStatus::parse(s) {
            ProjectStatus::Unknown(raw) => Err(format!("unknown project status filter '{raw}'")),
            known => Ok(StatusFilter::Only(known)),
        }
    }
}

/// Category filter for the project grid. `"all"` or one category key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ProjectCategory),
}

impl CategoryFilter {
    pub fn matches(&self, categories: &[ProjectCategory]) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => categories.contains(wanted),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim() == "all" {
            return Ok(CategoryFilter::All);
        }
        ProjectCategory::parse(s)
            .map(CategoryFilter::Only)
            .ok_or_else(|| format!("unknown project category filter '{s}'"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Project records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Web,
    Mobile,
    Photo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub url: String,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubProject {
    pub id: u32,
    pub name: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
    pub tools: Vec<String>,
    pub updates: Vec<ProjectUpdate>,
    pub images: Vec<ProjectImage>,
}

/// A personal project in its single canonical shape.
///
/// `technologies`, `tools` and `updates` are project-level lists; they only
/// matter when the project has no sub-projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub status: ProjectStatus,
    pub start_date: String,
    /// `None` means ongoing.
    pub end_date: Option<String>,
    pub description: String,
    pub categories: Vec<ProjectCategory>,
    pub sub_projects: Vec<SubProject>,
    pub images: Vec<ProjectImage>,
    pub technologies: Vec<String>,
    pub tools: Vec<String>,
    pub updates: Vec<ProjectUpdate>,
}
