//! Project grid support: filtering and ordering, technology and image
//! aggregation, color palettes, and the detail-modal selection state.

pub mod filter;
pub mod handlers;
pub mod palette;
pub mod selection;

pub use filter::{all_images, all_technologies, filter_and_sort};
pub use palette::{
    category_swatch, level_swatch, skill_percentage, sort_technologies_by_priority, status_swatch,
    technology_family, Swatch, TechFamily,
};
pub use selection::ProjectSelection;
