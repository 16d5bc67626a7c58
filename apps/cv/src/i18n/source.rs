use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::i18n::ResolverError;
use crate::models::Language;

const BUNDLED_FR: &str = include_str!("../../locales/fr.json");
const BUNDLED_EN: &str = include_str!("../../locales/en.json");

/// Supplies one translation tree per language.
#[async_trait]
pub trait LocaleSource: Send + Sync {
    async fn load(&self, language: Language) -> Result<Value, ResolverError>;
}

/// Reads `<dir>/<lang>.json`.
pub struct DirLocaleSource {
    dir: PathBuf,
}

impl DirLocaleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl LocaleSource for DirLocaleSource {
    async fn load(&self, language: Language) -> Result<Value, ResolverError> {
        let path = self.dir.join(format!("{}.json", language.code()));
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolverError::Missing {
                    language,
                    path: path.display().to_string(),
                }
            } else {
                ResolverError::Io {
                    language,
                    message: e.to_string(),
                }
            }
        })?;
        parse_tree(&text, language)
    }
}

/// The trees compiled into the binary.
pub struct BundledLocaleSource;

impl BundledLocaleSource {
    pub fn raw(language: Language) -> &'static str {
        match language {
            Language::Fr => BUNDLED_FR,
            Language::En => BUNDLED_EN,
        }
    }
}

#[async_trait]
impl LocaleSource for BundledLocaleSource {
    async fn load(&self, language: Language) -> Result<Value, ResolverError> {
        parse_tree(Self::raw(language), language)
    }
}

/// A translation tree must be a JSON object at the top level.
pub fn parse_tree(text: &str, language: Language) -> Result<Value, ResolverError> {
    let tree: Value = serde_json::from_str(text).map_err(|e| ResolverError::Parse {
        language,
        message: e.to_string(),
    })?;
    if !tree.is_object() {
        return Err(ResolverError::Parse {
            language,
            message: "top level is not an object".to_string(),
        });
    }
    Ok(tree)
}
