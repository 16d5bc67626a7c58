use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::content::migrate::migrate_document;
use crate::content::raw::RawCvData;
use crate::content::ContentError;
use crate::models::{CvData, Language};

const BUNDLED_FR: &str = include_str!("../../data/cv-data-fr.json");
const BUNDLED_EN: &str = include_str!("../../data/cv-data-en.json");

/// Both language aggregates, parsed and migrated once at startup.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    fr: Arc<CvData>,
    en: Arc<CvData>,
}

impl ContentBundle {
    pub fn new(fr: CvData, en: CvData) -> Self {
        Self {
            fr: Arc::new(fr),
            en: Arc::new(en),
        }
    }

    /// The documents compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Ok(Self::new(
            parse_document(BUNDLED_FR, Language::Fr)?,
            parse_document(BUNDLED_EN, Language::En)?,
        ))
    }

    /// Loads `cv-data-<lang>.json` from `dir`, falling back to the bundled
    /// document for each language whose file is missing.
    /// A file that exists but cannot be parsed is an error.
    pub async fn load_dir(dir: &Path) -> Result<Self, ContentError> {
        let fr = load_language(dir, Language::Fr).await?;
        let en = load_language(dir, Language::En).await?;
        Ok(Self::new(fr, en))
    }

    pub fn get(&self, language: Language) -> Arc<CvData> {
        match language {
            Language::Fr => Arc::clone(&self.fr),
            Language::En => Arc::clone(&self.en),
        }
    }
}

fn bundled_source(language: Language) -> &'static str {
    match language {
        Language::Fr => BUNDLED_FR,
        Language::En => BUNDLED_EN,
    }
}

async fn load_language(dir: &Path, language: Language) -> Result<CvData, ContentError> {
    let path = dir.join(format!("cv-data-{}.json", language.code()));
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => {
            info!(%language, path = %path.display(), "loading content override");
            parse_document(&text, language)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(%language, path = %path.display(), "content override missing, using bundled document");
            parse_document(bundled_source(language), language)
        }
        Err(source) => Err(ContentError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Parses and migrates one language document.
pub fn parse_document(text: &str, language: Language) -> Result<CvData, ContentError> {
    let raw: RawCvData = serde_json::from_str(text).map_err(|source| ContentError::Parse {
        language: language.code().to_string(),
        source,
    })?;
    Ok(migrate_document(raw, language))
}
