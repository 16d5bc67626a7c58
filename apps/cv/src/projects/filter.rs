use std::cmp::Reverse;

use crate::models::{CategoryFilter, Project, ProjectImage, StatusFilter};

/// Projects matching both filters, ordered by status rank then by id descending.
///
/// Pure: the input slice is left untouched and equal inputs give equal output.
pub fn filter_and_sort<'a>(
    projects: &'a [Project],
    status: &StatusFilter,
    category: &CategoryFilter,
) -> Vec<&'a Project> {
    let mut selected: Vec<&Project> = projects
        .iter()
        .filter(|p| status.matches(&p.status) && category.matches(&p.categories))
        .collect();
    selected.sort_by_key(|p| (p.status.priority(), Reverse(p.id)));
    selected
}

/// Technologies shown for a project, first occurrence wins.
///
/// Sub-project technologies take over entirely when sub-projects exist. Tools
/// are used only when no technology is listed anywhere.
pub fn all_technologies(project: &Project) -> Vec<String> {
    let candidates: Vec<&String> = if !project.sub_projects.is_empty() {
        project
            .sub_projects
            .iter()
            .flat_map(|sp| sp.technologies.iter())
            .collect()
    } else {
        project.technologies.iter().collect()
    };

    let candidates = if candidates.is_empty() {
        project.tools.iter().collect()
    } else {
        candidates
    };

    let mut seen: Vec<String> = Vec::with_capacity(candidates.len());
    for tech in candidates {
        if !seen.contains(tech) {
            seen.push(tech.clone());
        }
    }
    seen
}

/// Project images followed by each sub-project's images, in order.
pub fn all_images(project: &Project) -> Vec<&ProjectImage> {
    project
        .images
        .iter()
        .chain(project.sub_projects.iter().flat_map(|sp| sp.images.iter()))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{ImageKind, ProjectCategory, ProjectStatus, SubProject};

    pub(crate) fn make_project(id: u32, status: ProjectStatus, categories: &[ProjectCategory]) -> Project {
        Project {
            id,
            name: format!("Project {id}"),
            status,
            start_date: "2023-01".to_string(),
            end_date: None,
            description: String::new(),
            categories: categories.to_vec(),
            sub_projects: vec![],
            images: vec![],
            technologies: vec![],
            tools: vec![],
            updates: vec![],
        }
    }

    fn make_sub(id: u32, techs: &[&str]) -> SubProject {
        SubProject {
            id,
            name: format!("Sub {id}"),
            start_date: String::new(),
            end_date: None,
            description: String::new(),
            technologies: techs.iter().map(|t| t.to_string()).collect(),
            tools: vec![],
            updates: vec![],
            images: vec![ProjectImage {
                url: format!("/sub-{id}.png"),
                kind: ImageKind::Photo,
            }],
        }
    }

    fn ids(projects: &[&Project]) -> Vec<u32> {
        projects.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_status_filter_excludes_other_statuses() {
        let projects = vec![make_project(5, ProjectStatus::InProgress, &[ProjectCategory::Informatics])];
        let result = filter_and_sort(
            &projects,
            &StatusFilter::Only(ProjectStatus::Completed),
            &CategoryFilter::All,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_project_included_by_own_status_and_category() {
        let projects = vec![make_project(
            8,
            ProjectStatus::Started,
            &[ProjectCategory::Wood, ProjectCategory::Gardening],
        )];
        let result = filter_and_sort(
            &projects,
            &StatusFilter::Only(ProjectStatus::Started),
            &CategoryFilter::Only(ProjectCategory::Gardening),
        );
        assert_eq!(ids(&result), vec![8]);
    }

    #[test]
    fn test_sort_by_priority_then_id_descending() {
        let projects = vec![
            make_project(1, ProjectStatus::Completed, &[]),
            make_project(2, ProjectStatus::InProgress, &[]),
            make_project(3, ProjectStatus::Unknown("paused".to_string()), &[]),
            make_project(4, ProjectStatus::InProgress, &[]),
            make_project(5, ProjectStatus::Reflecting, &[]),
        ];
        let result = filter_and_sort(&projects, &StatusFilter::All, &CategoryFilter::All);
        assert_eq!(ids(&result), vec![5, 4, 2, 1, 3]);
        assert_eq!(projects[0].id, 1);
    }

    #[test]
    fn test_category_filter_requires_membership() {
        let projects = vec![
            make_project(1, ProjectStatus::Completed, &[ProjectCategory::Electronics]),
            make_project(2, ProjectStatus::Completed, &[]),
        ];
        let result = filter_and_sort(
            &projects,
            &StatusFilter::All,
            &CategoryFilter::Only(ProjectCategory::Electronics),
        );
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_technologies_from_sub_projects_ignore_project_level() {
        let mut project = make_project(1, ProjectStatus::Completed, &[]);
        project.technologies = vec!["Cobol".to_string()];
        project.sub_projects = vec![make_sub(1, &["Rust", "Axum"]), make_sub(2, &["Axum", "SQL"])];
        assert_eq!(all_technologies(&project), vec!["Rust", "Axum", "SQL"]);
    }

    #[test]
    fn test_technologies_fall_back_to_tools() {
        let mut project = make_project(1, ProjectStatus::Completed, &[]);
        project.tools = vec!["Saw".to_string(), "Saw".to_string(), "Drill".to_string()];
        assert_eq!(all_technologies(&project), vec!["Saw", "Drill"]);

        project.technologies = vec!["Arduino".to_string()];
        assert_eq!(all_technologies(&project), vec!["Arduino"]);
    }

    #[test]
    fn test_images_project_first_then_sub_projects() {
        let mut project = make_project(1, ProjectStatus::Completed, &[]);
        project.images = vec![ProjectImage {
            url: "/main.png".to_string(),
            kind: ImageKind::Web,
        }];
        project.sub_projects = vec![make_sub(1, &[]), make_sub(2, &[])];
        let urls: Vec<&str> = all_images(&project).iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["/main.png", "/sub-1.png", "/sub-2.png"]);
    }
}
