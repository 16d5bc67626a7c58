//! Wire shapes of the per-language content documents.
//!
//! Field names follow the published JSON (`nomDeMission`, `projetsInternes`, ...).
//! Top-level lists stay as raw `Value`s so a single malformed entry can be
//! skipped without rejecting the whole document.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCvData {
    pub personal_info: RawPersonalInfo,
    #[serde(default)]
    pub experiences: Vec<Value>,
    #[serde(default)]
    pub competence_categories: Vec<Value>,
    #[serde(default)]
    pub formations: Vec<Value>,
    #[serde(default)]
    pub projets_internes: Vec<Value>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPersonalInfo {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    pub age: Option<u32>,
    #[serde(default)]
    pub localisation: String,
    pub telephone: Option<String>,
    #[serde(default)]
    pub email: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub passions: Vec<String>,
    pub availability_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExperience {
    pub id: u32,
    #[serde(default)]
    pub nom_de_mission: String,
    #[serde(default)]
    pub localisation: String,
    #[serde(default)]
    pub date_debut: String,
    pub date_fin: Option<String>,
    #[serde(default)]
    pub mission_en_cours: bool,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub outils: Vec<String>,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub details_mission: Vec<String>,
    pub condition_de_fin_de_mission: Option<String>,
    pub equipe: Option<String>,
    pub logo1: Option<String>,
    pub logo2: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompetence {
    pub label: String,
    #[serde(default)]
    pub data: i64,
    pub level: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompetenceCategory {
    #[serde(default)]
    pub title1: String,
    #[serde(default)]
    pub title2: String,
    #[serde(default)]
    pub competences: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormation {
    pub id: u32,
    #[serde(default)]
    pub nom_formation: String,
    #[serde(default)]
    pub nom_ecole: String,
    #[serde(default)]
    pub localisation: String,
    #[serde(default)]
    pub date_debut: String,
    pub date_fin: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub diplomes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendation {
    pub id: u32,
    #[serde(default)]
    pub nom_entreprise: String,
    #[serde(default)]
    pub nom_personne: String,
    #[serde(default)]
    pub metier: String,
    pub liens: Option<String>,
    #[serde(default)]
    pub recommendation: String,
    pub translated: Option<String>,
    pub logo1: Option<String>,
}

/// Images are either a bare URL or `{ "url": ..., "type": "web" | "mobile" | "photo" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    Tagged {
        url: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUpdate {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubProject {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub updates: Vec<RawUpdate>,
    #[serde(default)]
    pub images: Vec<RawImage>,
}

/// A project as published, including the legacy mirror fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    pub id: u32,
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub sub_projects: Vec<Value>,
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<RawImage>,
    // Legacy mirrors.
    pub nom_projet: Option<String>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub outils: Vec<String>,
    #[serde(default)]
    pub updates: Vec<RawUpdate>,
}
