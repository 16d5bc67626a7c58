//! Canonical CV content model.
//!
//! These are the shapes every renderer consumes. Wire-level quirks (French field
//! names, legacy project mirrors, free-form status strings) never reach this
//! module: `content::migrate` normalizes them once at load time.

use serde::{Deserialize, Serialize};

use crate::models::project::Project;

// ────────────────────────────────────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────────────────────────────────────

/// The full set of CV content for one language.
///
/// One instance exists per language, held immutably behind an `Arc` by the
/// content store. Switching language swaps the whole aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvData {
    pub personal_info: PersonalInfo,
    pub experiences: Vec<Experience>,
    pub competence_categories: Vec<CompetenceCategory>,
    pub formations: Vec<Formation>,
    pub projects: Vec<Project>,
    pub recommendations: Vec<Recommendation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    AvailableFree,
    InMissionOpen,
}

impl Availability {
    pub fn label_key(&self) -> &'static str {
        match self {
            Availability::AvailableFree => "availability.availableFree",
            Availability::InMissionOpen => "availability.inMissionOpen",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub location: String,
    pub phone: Option<String>,
    pub email: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub description: String,
    pub interests: Vec<String>,
    pub availability: Availability,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: u32,
    pub mission_name: String,
    /// Client or company the mission was carried out for.
    pub client: String,
    pub location: String,
    pub start_date: String,
    /// Always `None` when `current` is true.
    pub end_date: Option<String>,
    pub current: bool,
    pub team: Option<String>,
    pub technologies: Vec<String>,
    pub tools: Vec<String>,
    pub summary: String,
    pub objectives: Vec<String>,
    pub details: Vec<String>,
    pub end_condition: Option<String>,
    pub logos: Vec<String>,
}

impl Experience {
    /// End-of-mission condition, shown only for missions that are over.
    pub fn visible_end_condition(&self) -> Option<&str> {
        if self.current {
            return None;
        }
        self.end_condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Qualitative skill level. Ordered so that `Junior < Intermediate < Advanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Junior,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Maps the numeric 1–3 scale onto a level. Out-of-range scores yield `None`.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(SkillLevel::Junior),
            2 => Some(SkillLevel::Intermediate),
            3 => Some(SkillLevel::Advanced),
            _ => None,
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "junior" => Some(SkillLevel::Junior),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            _ => None,
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            SkillLevel::Junior => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SkillLevel::Junior => "junior",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competence {
    pub label: String,
    /// `None` when neither the score nor the tag could be interpreted.
    pub level: Option<SkillLevel>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetenceCategory {
    pub title: String,
    pub subtitle: String,
    pub competences: Vec<Competence>,
}

impl CompetenceCategory {
    pub fn display_title(&self) -> String {
        format!("{} {}", self.title.trim(), self.subtitle.trim())
            .trim()
            .to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education & recommendations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub id: u32,
    pub program: String,
    pub school: String,
    pub location: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub diplomas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub author: String,
    pub role: String,
    pub company: String,
    pub link: Option<String>,
    pub text: String,
    pub translated: Option<String>,
    pub logo: Option<String>,
}

impl Recommendation {
    /// The text to display for a language. The French aggregate stores the
    /// French rendition in `translated` when the original was written in English.
    pub fn display_text(&self, language: crate::models::Language) -> &str {
        match language {
            crate::models::Language::Fr => self
                .translated
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&self.text),
            crate::models::Language::En => &self.text,
        }
    }
}
