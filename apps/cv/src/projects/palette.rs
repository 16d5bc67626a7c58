//! Fixed color palettes for status, skill level, category and technology tags.
//!
//! Every lookup is total: values outside the known vocabulary get a neutral
//! swatch instead of an error.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{ProjectCategory, ProjectStatus, SkillLevel};

/// Background and foreground colors as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub background: &'static str,
    pub foreground: &'static str,
}

const fn swatch(background: &'static str, foreground: &'static str) -> Swatch {
    Swatch {
        background,
        foreground,
    }
}

pub const NEUTRAL: Swatch = swatch("#e0e7ff", "#3730a3");

pub fn status_swatch(status: &ProjectStatus) -> Swatch {
    match status {
        ProjectStatus::Completed => swatch("#dcfce7", "#166534"),
        ProjectStatus::InProgress => swatch("#fef3c7", "#92400e"),
        ProjectStatus::Started => swatch("#dbeafe", "#1e40af"),
        ProjectStatus::Archived => swatch("#f3f4f6", "#6b7280"),
        ProjectStatus::Reflecting | ProjectStatus::Unknown(_) => NEUTRAL,
    }
}

/// Bar fill and label color for a skill level. `None` is the gray fallback.
pub fn level_swatch(level: Option<SkillLevel>) -> Swatch {
    match level {
        Some(SkillLevel::Junior) => swatch("#fbbf24", "#92400e"),
        Some(SkillLevel::Intermediate) => swatch("#3b82f6", "#1e40af"),
        Some(SkillLevel::Advanced) => swatch("#10b981", "#065f46"),
        None => swatch("#6b7280", "#374151"),
    }
}

/// Width of a skill bar, in percent.
pub fn skill_percentage(level: Option<SkillLevel>) -> u8 {
    match level {
        Some(SkillLevel::Advanced) => 90,
        Some(SkillLevel::Intermediate) => 70,
        Some(SkillLevel::Junior) => 50,
        None => 60,
    }
}

pub fn category_swatch(category: ProjectCategory) -> Swatch {
    match category {
        ProjectCategory::Informatics => swatch("#dbeafe", "#1e40af"),
        ProjectCategory::Gardening => swatch("#dcfce7", "#166534"),
        ProjectCategory::Wood => swatch("#fef3c7", "#92400e"),
        ProjectCategory::Electronics => swatch("#fef9c3", "#854d0e"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Technology families
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TechFamily {
    Dotnet,
    Angular,
    React,
    Typescript,
    Python,
    Java,
    Javascript,
    Css,
    Html,
    Vue,
    Svelte,
    Tailwind,
    Bootstrap,
    Sass,
    Database,
    Cloud,
    Tools,
    Testing,
    Mobile,
    Devops,
}

/// Families listed first when sorting technology badges.
const PRIORITY: [TechFamily; 7] = [
    TechFamily::Dotnet,
    TechFamily::Angular,
    TechFamily::React,
    TechFamily::Typescript,
    TechFamily::Python,
    TechFamily::Java,
    TechFamily::Javascript,
];

impl TechFamily {
    /// Badge color: base shade for text and bars.
    pub fn color(&self) -> &'static str {
        match self {
            TechFamily::Dotnet => "#a855f7",
            TechFamily::Angular => "#ef4444",
            TechFamily::React => "#3b82f6",
            TechFamily::Typescript => "#22c55e",
            TechFamily::Python => "#eab308",
            TechFamily::Java => "#f97316",
            TechFamily::Javascript => "#fbbf24",
            TechFamily::Css => "#93c5fd",
            TechFamily::Html => "#fdba74",
            TechFamily::Vue => "#34d399",
            TechFamily::Svelte => "#fb923c",
            TechFamily::Tailwind => "#2dd4bf",
            TechFamily::Bootstrap => "#c084fc",
            TechFamily::Sass => "#f472b6",
            TechFamily::Database => "#6366f1",
            TechFamily::Cloud => "#0ea5e9",
            TechFamily::Tools => "#6b7280",
            TechFamily::Testing => "#f87171",
            TechFamily::Mobile => "#16a34a",
            TechFamily::Devops => "#475569",
        }
    }

    /// Light tint for card backgrounds, dark shade for text on it.
    pub fn swatch(&self) -> Swatch {
        match self {
            TechFamily::Dotnet | TechFamily::Bootstrap => swatch("#f3e8ff", "#6b21a8"),
            TechFamily::Angular | TechFamily::Testing => swatch("#fee2e2", "#991b1b"),
            TechFamily::React | TechFamily::Css => swatch("#dbeafe", "#1e40af"),
            TechFamily::Typescript | TechFamily::Mobile => swatch("#dcfce7", "#166534"),
            TechFamily::Python => swatch("#fef9c3", "#854d0e"),
            TechFamily::Java | TechFamily::Html | TechFamily::Svelte => swatch("#ffedd5", "#9a3412"),
            TechFamily::Javascript => swatch("#fef3c7", "#92400e"),
            TechFamily::Vue => swatch("#d1fae5", "#065f46"),
            TechFamily::Tailwind => swatch("#ccfbf1", "#115e59"),
            TechFamily::Sass => swatch("#fce7f3", "#9d174d"),
            TechFamily::Database => swatch("#e0e7ff", "#3730a3"),
            TechFamily::Cloud => swatch("#e0f2fe", "#075985"),
            TechFamily::Tools => swatch("#f3f4f6", "#1f2937"),
            TechFamily::Devops => swatch("#f1f5f9", "#1e293b"),
        }
    }

    fn priority(&self) -> Option<usize> {
        PRIORITY.iter().position(|f| f == self)
    }
}

/// Lowercase technology names to their family. Order matters for substring matching.
const TECHNOLOGIES: &[(&str, TechFamily)] = &[
    (".net", TechFamily::Dotnet),
    ("dotnet", TechFamily::Dotnet),
    ("c#", TechFamily::Dotnet),
    ("csharp", TechFamily::Dotnet),
    ("asp.net", TechFamily::Dotnet),
    ("aspnet", TechFamily::Dotnet),
    ("asp", TechFamily::Dotnet),
    ("wpf", TechFamily::Dotnet),
    ("wcf", TechFamily::Dotnet),
    ("entity framework", TechFamily::Dotnet),
    ("entityframework", TechFamily::Dotnet),
    ("ef", TechFamily::Dotnet),
    ("winforms", TechFamily::Dotnet),
    ("blazor", TechFamily::Dotnet),
    ("xamarin", TechFamily::Dotnet),
    ("maui", TechFamily::Dotnet),
    ("xunit", TechFamily::Dotnet),
    ("nunit", TechFamily::Dotnet),
    ("angular", TechFamily::Angular),
    ("angularjs", TechFamily::Angular),
    ("rxjs", TechFamily::Angular),
    ("ngrx", TechFamily::Angular),
    ("react", TechFamily::React),
    ("reactjs", TechFamily::React),
    ("nextjs", TechFamily::React),
    ("next.js", TechFamily::React),
    ("redux", TechFamily::React),
    ("gatsby", TechFamily::React),
    ("typescript", TechFamily::Typescript),
    ("ts", TechFamily::Typescript),
    ("javascript", TechFamily::Javascript),
    ("js", TechFamily::Javascript),
    ("node.js", TechFamily::Javascript),
    ("nodejs", TechFamily::Javascript),
    ("npm", TechFamily::Javascript),
    ("yarn", TechFamily::Javascript),
    ("webpack", TechFamily::Javascript),
    ("vite", TechFamily::Javascript),
    ("python", TechFamily::Python),
    ("django", TechFamily::Python),
    ("flask", TechFamily::Python),
    ("fastapi", TechFamily::Python),
    ("pandas", TechFamily::Python),
    ("numpy", TechFamily::Python),
    ("matplotlib", TechFamily::Python),
    ("scipy", TechFamily::Python),
    ("sklearn", TechFamily::Python),
    ("java", TechFamily::Java),
    ("spring", TechFamily::Java),
    ("spring boot", TechFamily::Java),
    ("springboot", TechFamily::Java),
    ("hibernate", TechFamily::Java),
    ("maven", TechFamily::Java),
    ("gradle", TechFamily::Java),
    ("css", TechFamily::Css),
    ("html", TechFamily::Html),
    ("tailwind", TechFamily::Tailwind),
    ("tailwindcss", TechFamily::Tailwind),
    ("bootstrap", TechFamily::Bootstrap),
    ("sass", TechFamily::Sass),
    ("scss", TechFamily::Sass),
    ("less", TechFamily::Sass),
    ("vue", TechFamily::Vue),
    ("vuejs", TechFamily::Vue),
    ("nuxt", TechFamily::Vue),
    ("svelte", TechFamily::Svelte),
    ("sveltekit", TechFamily::Svelte),
    ("sql server", TechFamily::Database),
    ("sqlserver", TechFamily::Database),
    ("postgresql", TechFamily::Database),
    ("postgres", TechFamily::Database),
    ("mysql", TechFamily::Database),
    ("mongodb", TechFamily::Database),
    ("redis", TechFamily::Database),
    ("sqlite", TechFamily::Database),
    ("oracle", TechFamily::Database),
    ("azure", TechFamily::Cloud),
    ("aws", TechFamily::Cloud),
    ("google cloud", TechFamily::Cloud),
    ("gcp", TechFamily::Cloud),
    ("firebase", TechFamily::Cloud),
    ("heroku", TechFamily::Cloud),
    ("vercel", TechFamily::Cloud),
    ("netlify", TechFamily::Cloud),
    ("jest", TechFamily::Testing),
    ("cypress", TechFamily::Testing),
    ("selenium", TechFamily::Testing),
    ("mocha", TechFamily::Testing),
    ("chai", TechFamily::Testing),
    ("jasmine", TechFamily::Testing),
    ("react native", TechFamily::Mobile),
    ("flutter", TechFamily::Mobile),
    ("swift", TechFamily::Mobile),
    ("kotlin", TechFamily::Mobile),
    ("ionic", TechFamily::Mobile),
    ("docker", TechFamily::Devops),
    ("kubernetes", TechFamily::Devops),
    ("jenkins", TechFamily::Devops),
    ("github actions", TechFamily::Devops),
    ("git", TechFamily::Tools),
    ("github", TechFamily::Tools),
    ("gitlab", TechFamily::Tools),
    ("bitbucket", TechFamily::Tools),
    ("jira", TechFamily::Tools),
    ("confluence", TechFamily::Tools),
];

fn exact_family(normalized: &str) -> Option<TechFamily> {
    TECHNOLOGIES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, family)| *family)
}

/// Family for coloring: exact name first, then the first table entry contained
/// in the name, else `Tools`.
pub fn technology_family(name: &str) -> TechFamily {
    let normalized = name.trim().to_lowercase();
    exact_family(&normalized)
        .or_else(|| {
            TECHNOLOGIES
                .iter()
                .find(|(key, _)| normalized.contains(key))
                .map(|(_, family)| *family)
        })
        .unwrap_or(TechFamily::Tools)
}

/// Priority families first in their fixed order, then everything else
/// alphabetically. Only exact names count toward priority.
pub fn sort_technologies_by_priority(technologies: &[String]) -> Vec<String> {
    let mut sorted = technologies.to_vec();
    sorted.sort_by(|a, b| {
        let pa = exact_family(&a.to_lowercase()).and_then(|f| f.priority());
        let pb = exact_family(&b.to_lowercase()).and_then(|f| f.priority());
        match (pa, pb) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unknown_status_gets_neutral_swatch() {
        assert_eq!(status_swatch(&ProjectStatus::Unknown("x".to_string())), NEUTRAL);
        assert_eq!(status_swatch(&ProjectStatus::Completed).background, "#dcfce7");
        assert_eq!(status_swatch(&ProjectStatus::InProgress).foreground, "#92400e");
    }

    #[test]
    fn test_skill_percentages() {
        assert_eq!(skill_percentage(Some(SkillLevel::Advanced)), 90);
        assert_eq!(skill_percentage(Some(SkillLevel::Intermediate)), 70);
        assert_eq!(skill_percentage(Some(SkillLevel::Junior)), 50);
        assert_eq!(skill_percentage(None), 60);
        assert_eq!(level_swatch(None).background, "#6b7280");
    }

    #[test]
    fn test_family_exact_then_substring_then_default() {
        assert_eq!(technology_family("C#"), TechFamily::Dotnet);
        assert_eq!(technology_family("  React "), TechFamily::React);
        assert_eq!(technology_family("Angular 17"), TechFamily::Angular);
        assert_eq!(technology_family("Soldering"), TechFamily::Tools);
    }

    #[test]
    fn test_priority_sort() {
        let sorted = sort_technologies_by_priority(&strings(&[
            "Docker", "JavaScript", "Angular", "C#", "Azure", "React",
        ]));
        assert_eq!(
            sorted,
            strings(&["C#", "Angular", "React", "JavaScript", "Azure", "Docker"])
        );
    }
}
