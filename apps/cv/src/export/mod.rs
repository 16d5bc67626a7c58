//! Export: switching the live page into export mode and producing a file.

pub mod export_mode;
pub mod handlers;
pub mod notification;
pub mod orchestrator;
pub mod settle;

use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PersonalInfo;

pub use export_mode::{enter_export_mode, ExportJournal};
pub use notification::{Notification, NotificationKind, Notifier};
pub use orchestrator::{Capture, Captured, ExportOrchestrator, ExportPhase, Renderers};
pub use settle::{FixedDelay, Immediate, SettleSignal};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    Busy,

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("export task failed: {0}")]
    Task(String),
}

/// How the exported file is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStrategy {
    /// The expanded live page, serialized as a print-ready HTML page.
    Print,
    /// The paginated document rendition, as PDF.
    #[default]
    Document,
}

impl ExportStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStrategy::Print => "print",
            ExportStrategy::Document => "document",
        }
    }
}

impl FromStr for ExportStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "print" | "native" => Ok(ExportStrategy::Print),
            "document" | "pdf" => Ok(ExportStrategy::Document),
            other => Err(format!("unknown export strategy '{other}' (expected print or document)")),
        }
    }
}

/// A finished export, ready to be written or sent.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: bytes::Bytes,
}

fn ascii_fold(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'À' | 'Á' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' => 'Y',
        c if c.is_ascii_alphanumeric() || c == '-' => c,
        _ => return None,
    };
    Some(folded)
}

/// Person slug used in file names: `First_Last`, ASCII only.
pub fn person_slug(info: &PersonalInfo) -> String {
    let slug = [info.first_name.as_str(), info.last_name.as_str()]
        .iter()
        .flat_map(|part| part.split_whitespace())
        .map(|word| word.chars().filter_map(ascii_fold).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "CV".to_string()
    } else {
        slug
    }
}

/// `CV_<First>_<Last>_<year>.<extension>`.
pub fn export_filename(info: &PersonalInfo, year: i32, extension: &str) -> String {
    format!("CV_{}_{year}.{extension}", person_slug(info))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::sections::tests::bundled;

    #[test]
    fn test_export_filename_folds_accents() {
        let mut info = bundled(Language::Fr).personal_info.clone();
        info.first_name = "Rémi".to_string();
        info.last_name = "Le Gall".to_string();
        assert_eq!(export_filename(&info, 2025, "pdf"), "CV_Remi_Le_Gall_2025.pdf");

        info.first_name = " ".to_string();
        info.last_name = "!!".to_string();
        assert_eq!(export_filename(&info, 2025, "html"), "CV_CV_2025.html");
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("print".parse::<ExportStrategy>().unwrap(), ExportStrategy::Print);
        assert_eq!("PDF".parse::<ExportStrategy>().unwrap(), ExportStrategy::Document);
        assert!("fax".parse::<ExportStrategy>().is_err());
        assert_eq!(ExportStrategy::default(), ExportStrategy::Document);
    }
}
