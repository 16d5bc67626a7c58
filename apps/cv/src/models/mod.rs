pub mod cv;
pub mod language;
pub mod project;

pub use cv::{
    Availability, Competence, CompetenceCategory, CvData, Experience, Formation, PersonalInfo,
    Recommendation, SkillLevel,
};
pub use language::Language;
pub use project::{
    CategoryFilter, ImageKind, Project, ProjectCategory, ProjectImage, ProjectStatus,
    ProjectUpdate, StatusFilter, SubProject,
};
