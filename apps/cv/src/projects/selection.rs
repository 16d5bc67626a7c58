use crate::models::{Project, ProjectImage};
use crate::projects::filter::all_images;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Detail-modal state: which project is open and which image is enlarged.
/// UI-only; never persisted and never read by the document pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSelection {
    project_id: Option<u32>,
    image_index: Option<usize>,
}

impl ProjectSelection {
    pub fn open(&mut self, project: &Project) {
        self.project_id = Some(project.id);
        self.image_index = None;
    }

    /// Closes the enlarged image if one is shown, otherwise the modal.
    pub fn close(&mut self) {
        if self.image_index.is_some() {
            self.image_index = None;
        } else {
            self.project_id = None;
        }
    }

    pub fn project_id(&self) -> Option<u32> {
        self.project_id
    }

    pub fn image_index(&self) -> Option<usize> {
        self.image_index
    }

    /// Enlarges image `index` of the open project. Out-of-range indices are ignored.
    pub fn select_image(&mut self, project: &Project, index: usize) {
        if self.project_id == Some(project.id) && index < all_images(project).len() {
            self.image_index = Some(index);
        }
    }

    /// Steps through the open project's images, wrapping at both ends.
    pub fn navigate(&mut self, project: &Project, direction: Direction) {
        if self.project_id != Some(project.id) {
            return;
        }
        let total = all_images(project).len();
        if total == 0 {
            return;
        }
        let current = self.image_index.unwrap_or(0).min(total - 1);
        let next = match direction {
            Direction::Prev if current == 0 => total - 1,
            Direction::Prev => current - 1,
            Direction::Next if current == total - 1 => 0,
            Direction::Next => current + 1,
        };
        self.image_index = Some(next);
    }

    pub fn current_image<'a>(&self, project: &'a Project) -> Option<&'a ProjectImage> {
        if self.project_id != Some(project.id) {
            return None;
        }
        self.image_index
            .and_then(|index| all_images(project).get(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageKind, ProjectStatus};
    use crate::projects::filter::tests::make_project;

    fn make_project_with_images(count: usize) -> Project {
        let mut project = make_project(7, ProjectStatus::Completed, &[]);
        project.images = (0..count)
            .map(|i| ProjectImage {
                url: format!("/img-{i}.png"),
                kind: ImageKind::Web,
            })
            .collect();
        project
    }

    #[test]
    fn test_navigation_wraps_both_ways() {
        let project = make_project_with_images(3);
        let mut selection = ProjectSelection::default();
        selection.open(&project);
        selection.select_image(&project, 0);

        selection.navigate(&project, Direction::Prev);
        assert_eq!(selection.image_index(), Some(2));
        selection.navigate(&project, Direction::Next);
        assert_eq!(selection.image_index(), Some(0));
        selection.navigate(&project, Direction::Next);
        assert_eq!(
            selection.current_image(&project).map(|i| i.url.as_str()),
            Some("/img-1.png")
        );
    }

    #[test]
    fn test_close_image_before_modal() {
        let project = make_project_with_images(2);
        let mut selection = ProjectSelection::default();
        selection.open(&project);
        selection.select_image(&project, 1);
        selection.close();
        assert_eq!(selection.project_id(), Some(7));
        assert_eq!(selection.image_index(), None);
        selection.close();
        assert_eq!(selection, ProjectSelection::default());
    }

    #[test]
    fn test_navigation_without_images_is_noop() {
        let project = make_project_with_images(0);
        let mut selection = ProjectSelection::default();
        selection.open(&project);
        selection.navigate(&project, Direction::Next);
        selection.select_image(&project, 0);
        assert_eq!(selection.image_index(), None);
    }
}
