use bingo_types::{inches, Color, GridSize, PageSize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default document title when none is configured.
pub const DEFAULT_TITLE: &str = "Bingo Cards";

/// Default upper bound on a cell photo's side, in points.
pub const DEFAULT_PHOTO_MAX_SIZE: f32 = 1.4 * bingo_types::POINTS_PER_INCH;

/// What goes into each cell and how the page is set up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub grid_size: GridSize,
    pub show_photo: bool,
    pub show_common_name: bool,
    pub show_scientific_name: bool,
    /// Largest side of a cell photo, in points.
    pub photo_max_size: f32,
    /// Printed above the grid on every page. Empty means no title block.
    pub title: String,
    pub page_size: PageSize,
    /// Page margin on every side, in points.
    pub margin: f32,
    pub grid_line_color: Color,
    #[serde(skip)]
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Five,
            show_photo: true,
            show_common_name: true,
            show_scientific_name: true,
            photo_max_size: DEFAULT_PHOTO_MAX_SIZE,
            title: DEFAULT_TITLE.to_string(),
            page_size: PageSize::default(),
            margin: inches(1.0),
            grid_line_color: Color::gray(128),
            creation_date: None,
        }
    }
}

impl RenderOptions {
    pub fn new(grid_size: GridSize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    pub fn with_photo(mut self, show: bool) -> Self {
        self.show_photo = show;
        self
    }

    pub fn with_common_name(mut self, show: bool) -> Self {
        self.show_common_name = show;
        self
    }

    pub fn with_scientific_name(mut self, show: bool) -> Self {
        self.show_scientific_name = show;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_photo_max_size(mut self, size: f32) -> Self {
        self.photo_max_size = size;
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}
