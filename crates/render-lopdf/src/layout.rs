//! Page and cell geometry.
//!
//! Everything here is pure: positions are computed in page space with a
//! top-left origin and nothing touches the output. The renderer plans every
//! page before writing so a cell that cannot fit aborts the document without
//! emitting a partial PDF.

use crate::error::RenderError;
use crate::fonts::{wrap_text, BuiltinFont};
use crate::options::RenderOptions;
use bingo_types::{Card, GridCell, GridSize, Orientation, Rect, Size, Species, TaxonId};
use std::collections::HashMap;

pub const CELL_PADDING: f32 = 4.0;
pub const GRID_LINE_WIDTH: f32 = 0.75;
/// Smallest photo worth printing (0.25in).
pub const MIN_PHOTO_SIZE: f32 = 18.0;
pub const PHOTO_TEXT_GAP: f32 = 3.0;
pub const LINE_HEIGHT: f32 = 1.2;
pub const TITLE_FONT_SIZE: f32 = 18.0;
pub const TITLE_SPACING: f32 = 14.4;
pub const FREE_LABEL: &str = "FREE";

const FREE_LABEL_SCALE: f32 = 1.6;
const ASCENT: f32 = 0.8;

/// Landscape only for 5x5 grids with photos; everything else is portrait.
pub fn orientation_for(size: GridSize, show_photo: bool) -> Orientation {
    match (size, show_photo) {
        (GridSize::Five, true) => Orientation::Landscape,
        _ => Orientation::Portrait,
    }
}

/// Name font sizes, stepping down as grids get denser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    pub common: f32,
    pub scientific: f32,
}

impl FontScale {
    pub fn for_size(size: GridSize) -> Self {
        let (common, scientific) = match size {
            GridSize::Three => (12.0, 10.0),
            GridSize::Five => (10.0, 8.5),
            GridSize::Seven => (8.0, 7.0),
            GridSize::Nine => (7.0, 6.0),
        };
        Self { common, scientific }
    }

    pub fn free_label(&self) -> f32 {
        self.common * FREE_LABEL_SCALE
    }
}

fn baseline_offset(size: f32) -> f32 {
    size * ((LINE_HEIGHT - 1.0) / 2.0 + ASCENT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: BuiltinFont,
    pub size: f32,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoPlacement {
    pub id: TaxonId,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub photo: Option<PhotoPlacement>,
    pub lines: Vec<TextLine>,
}

/// Card-independent page geometry for one set of options.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub orientation: Orientation,
    pub page: Size,
    pub content: Rect,
    pub title: Vec<TextLine>,
    pub grid: Rect,
    pub cell: Size,
    pub dimension: usize,
}

impl PageGeometry {
    pub fn compute(options: &RenderOptions) -> Result<Self, RenderError> {
        let orientation = orientation_for(options.grid_size, options.show_photo);
        let page = options.page_size.oriented(orientation);
        let content = Rect::new(
            options.margin,
            options.margin,
            page.width - 2.0 * options.margin,
            page.height - 2.0 * options.margin,
        );
        let too_small = RenderError::PageTooSmall {
            width: page.width,
            height: page.height,
        };
        if content.width <= 0.0 || content.height <= 0.0 {
            return Err(too_small);
        }

        let title = layout_title(&options.title, content);
        let title_height = if title.is_empty() {
            0.0
        } else {
            title.len() as f32 * TITLE_FONT_SIZE * LINE_HEIGHT + TITLE_SPACING
        };

        let dimension = options.grid_size.dimension();
        let d = dimension as f32;
        let column_width = content.width / d;
        let available_height = content.height - title_height;
        let row_height = column_width.min(available_height / d);
        if row_height <= 2.0 * CELL_PADDING {
            return Err(too_small);
        }

        let grid_width = column_width * d;
        let grid = Rect::new(
            content.x + (content.width - grid_width) / 2.0,
            content.y + title_height,
            grid_width,
            row_height * d,
        );

        Ok(Self {
            orientation,
            page,
            content,
            title,
            grid,
            cell: Size::new(column_width, row_height),
            dimension,
        })
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.grid.x + col as f32 * self.cell.width,
            self.grid.y + row as f32 * self.cell.height,
            self.cell.width,
            self.cell.height,
        )
    }
}

fn layout_title(title: &str, content: Rect) -> Vec<TextLine> {
    let font = BuiltinFont::HelveticaBold;
    wrap_text(title, font, TITLE_FONT_SIZE, content.width)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let width = font.measure(&text, TITLE_FONT_SIZE);
            let top = content.y + i as f32 * TITLE_FONT_SIZE * LINE_HEIGHT;
            TextLine {
                x: content.x + (content.width - width) / 2.0,
                baseline: top + baseline_offset(TITLE_FONT_SIZE),
                text,
                font,
                size: TITLE_FONT_SIZE,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub cells: Vec<CellLayout>,
}

/// Plans card pages against one [`PageGeometry`].
///
/// `photos` maps each species with usable photo data to the photo's
/// intrinsic size. Species without an entry render text-only.
pub struct LayoutPlanner<'a> {
    options: &'a RenderOptions,
    geometry: &'a PageGeometry,
    photos: &'a HashMap<TaxonId, Size>,
    fonts: FontScale,
}

impl<'a> LayoutPlanner<'a> {
    pub fn new(
        options: &'a RenderOptions,
        geometry: &'a PageGeometry,
        photos: &'a HashMap<TaxonId, Size>,
    ) -> Self {
        Self {
            options,
            geometry,
            photos,
            fonts: FontScale::for_size(options.grid_size),
        }
    }

    /// Lays out the card printed on page `page` (1-based).
    pub fn plan_card(&self, page: usize, card: &Card) -> Result<PageLayout, RenderError> {
        let cells = card
            .grid
            .rows()
            .enumerate()
            .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, cell)| (row, col, cell)))
            .map(|(row, col, cell)| self.plan_cell(page, row, col, cell))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageLayout { cells })
    }

    fn plan_cell(&self, page: usize, row: usize, col: usize, cell: &GridCell) -> Result<CellLayout, RenderError> {
        let rect = self.geometry.cell_rect(row, col);
        match cell {
            GridCell::Free => Ok(self.free_cell(row, col, rect)),
            GridCell::Species(species) => self.species_cell(page, row, col, rect, species),
        }
    }

    fn free_cell(&self, row: usize, col: usize, rect: Rect) -> CellLayout {
        let font = BuiltinFont::HelveticaBold;
        let size = self.fonts.free_label();
        let width = font.measure(FREE_LABEL, size);
        let line = TextLine {
            text: FREE_LABEL.to_string(),
            font,
            size,
            x: rect.x + (rect.width - width) / 2.0,
            baseline: rect.y + rect.height / 2.0 + size * ASCENT / 2.0,
        };
        CellLayout {
            row,
            col,
            rect,
            photo: None,
            lines: vec![line],
        }
    }

    /// Name blocks in print order: common name, then scientific name.
    fn name_blocks<'s>(&self, species: &'s Species) -> Vec<(BuiltinFont, f32, &'s str)> {
        let mut blocks = Vec::with_capacity(2);
        if self.options.show_common_name {
            let fallback = (!self.options.show_scientific_name).then_some(species.scientific_name.as_str());
            if let Some(name) = species.common_name.as_deref().or(fallback) {
                blocks.push((BuiltinFont::HelveticaBold, self.fonts.common, name));
            }
        }
        if self.options.show_scientific_name {
            blocks.push((
                BuiltinFont::HelveticaOblique,
                self.fonts.scientific,
                species.scientific_name.as_str(),
            ));
        }
        blocks
    }

    fn species_cell(
        &self,
        page: usize,
        row: usize,
        col: usize,
        rect: Rect,
        species: &Species,
    ) -> Result<CellLayout, RenderError> {
        let inner = rect.inset(CELL_PADDING);
        let overflow = |needed: f32| RenderError::CellOverflow {
            card: page,
            row,
            col,
            needed,
            available: inner.height,
        };

        let wrapped: Vec<(BuiltinFont, f32, String)> = self
            .name_blocks(species)
            .into_iter()
            .flat_map(|(font, size, text)| {
                wrap_text(text, font, size, inner.width)
                    .into_iter()
                    .map(move |line| (font, size, line))
            })
            .collect();
        let text_height: f32 = wrapped.iter().map(|(_, size, _)| size * LINE_HEIGHT).sum();
        if text_height > inner.height {
            return Err(overflow(text_height));
        }

        let gap = if text_height > 0.0 { PHOTO_TEXT_GAP } else { 0.0 };
        let photo_size = match self.photos.get(&species.id) {
            Some(intrinsic) if self.options.show_photo => {
                let side = self
                    .options
                    .photo_max_size
                    .min(inner.width)
                    .min(inner.height - text_height - gap);
                if side < MIN_PHOTO_SIZE {
                    log::debug!(
                        "Photo for {} dropped on card {}: {:.1}pt left at ({}, {})",
                        species.id,
                        page,
                        side.max(0.0),
                        row,
                        col
                    );
                    None
                } else {
                    Some(intrinsic.fit_within(Size::new(side, side)))
                        .filter(|size| size.width > 0.0 && size.height > 0.0)
                }
            }
            _ => None,
        };

        let block_height = match photo_size {
            Some(size) => size.height + gap + text_height,
            None => text_height,
        };
        let mut top = inner.y + (inner.height - block_height) / 2.0;

        let photo = photo_size.map(|size| {
            let placement = PhotoPlacement {
                id: species.id,
                rect: Rect::new(inner.x + (inner.width - size.width) / 2.0, top, size.width, size.height),
            };
            top += size.height + gap;
            placement
        });

        let lines = wrapped
            .into_iter()
            .map(|(font, size, text)| {
                let width = font.measure(&text, size);
                let line = TextLine {
                    x: inner.x + (inner.width - width) / 2.0,
                    baseline: top + baseline_offset(size),
                    text,
                    font,
                    size,
                };
                top += size * LINE_HEIGHT;
                line
            })
            .collect();

        Ok(CellLayout {
            row,
            col,
            rect,
            photo,
            lines,
        })
    }
}
