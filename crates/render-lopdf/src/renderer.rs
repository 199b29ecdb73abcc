use crate::error::RenderError;
use crate::fonts::{to_win_ansi, BuiltinFont};
use crate::layout::{CellLayout, LayoutPlanner, PageGeometry, PageLayout, TextLine, GRID_LINE_WIDTH};
use crate::options::RenderOptions;
use crate::photo::{prepare_image, PreparedImage};
use crate::writer::PdfWriter;
use bingo_traits::{ImageSource, ResourceError};
use bingo_types::{CardSet, Color, Rect, Size, TaxonId};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Seek, Write};

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = concat!("inat-bingo ", env!("CARGO_PKG_VERSION"));

/// Renders card sets to PDF, one page per card.
#[derive(Debug, Clone, Default)]
pub struct CardRenderer {
    options: RenderOptions,
}

impl CardRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, cards: &CardSet, images: &dyn ImageSource) -> Result<Vec<u8>, RenderError> {
        let cursor = self.render_to(cards, images, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Renders into `writer` and hands it back once the document is complete.
    ///
    /// Every page is laid out before the first byte is written, so a layout
    /// error (dimension mismatch, overflow, page too small) leaves `writer`
    /// untouched. I/O errors can still leave a partial document behind.
    pub fn render_to<W: Write + Seek>(
        &self,
        cards: &CardSet,
        images: &dyn ImageSource,
        writer: W,
    ) -> Result<W, RenderError> {
        self.check_dimensions(cards)?;

        let plan = if cards.is_empty() {
            None
        } else {
            let geometry = PageGeometry::compute(&self.options)?;
            let prepared = self.prepare_images(cards, images);
            let intrinsic: HashMap<TaxonId, Size> =
                prepared.iter().map(|(id, image)| (*id, image.intrinsic)).collect();
            let planner = LayoutPlanner::new(&self.options, &geometry, &intrinsic);
            let pages = cards
                .iter()
                .enumerate()
                .map(|(i, card)| planner.plan_card(i + 1, card))
                .collect::<Result<Vec<_>, _>>()?;
            let placed: HashSet<TaxonId> = pages
                .iter()
                .flat_map(|page| page.cells.iter())
                .filter_map(|cell| cell.photo.as_ref().map(|photo| photo.id))
                .collect();
            let prepared: Vec<_> = prepared.into_iter().filter(|(id, _)| placed.contains(id)).collect();
            Some((geometry, prepared, pages))
        };

        let mut pdf = PdfWriter::new(writer, PDF_VERSION)?;
        for font in BuiltinFont::ALL {
            pdf.add_standard_font(font.resource_name(), font.postscript_name())?;
        }

        if let Some((geometry, prepared, pages)) = plan {
            let mut image_names = HashMap::with_capacity(prepared.len());
            for (n, (id, image)) in prepared.iter().enumerate() {
                let name = format!("Im{}", n + 1);
                pdf.add_jpeg_image(&name, &image.jpeg, image.pixel_width, image.pixel_height)?;
                image_names.insert(*id, name);
            }

            for page in &pages {
                let mut canvas = PageCanvas::new(geometry.page.height, &image_names);
                canvas.draw_page(&geometry, page, self.options.grid_line_color);
                pdf.add_page(canvas.finish(), geometry.page.width, geometry.page.height)?;
            }
            log::info!(
                "Rendered {} page(s), {} embedded photo(s), {:?}",
                pdf.page_count(),
                prepared.len(),
                geometry.orientation
            );
        }

        pdf.set_info(self.info_dictionary());
        Ok(pdf.finish()?)
    }

    fn check_dimensions(&self, cards: &CardSet) -> Result<(), RenderError> {
        let expected = self.options.grid_size;
        match cards.iter().position(|card| card.size() != expected) {
            Some(i) => Err(RenderError::DimensionMismatch {
                card: i + 1,
                expected,
                actual: cards.as_slice()[i].size(),
            }),
            None => Ok(()),
        }
    }

    /// Loads and prepares each distinct photo once, in order of first use.
    ///
    /// Unavailable or undecodable photos are logged and left out; their
    /// cells render text-only.
    fn prepare_images(&self, cards: &CardSet, images: &dyn ImageSource) -> Vec<(TaxonId, PreparedImage)> {
        if !self.options.show_photo {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut prepared = Vec::new();
        let species = cards
            .iter()
            .flat_map(|card| card.grid.cells())
            .filter_map(|cell| cell.species());

        for species in species {
            if !seen.insert(species.id) {
                continue;
            }
            let loaded = images
                .load(species)
                .and_then(|data| {
                    prepare_image(species.id, &data, self.options.photo_max_size).map_err(|e| {
                        ResourceError::LoadFailed {
                            id: species.id,
                            message: e.to_string(),
                        }
                    })
                });
            match loaded {
                Ok(image) => prepared.push((species.id, image)),
                Err(e) => log::warn!(
                    "No photo for {} ({}) from {}: {}",
                    species.display_name(),
                    species.id,
                    images.name(),
                    e
                ),
            }
        }
        prepared
    }

    fn info_dictionary(&self) -> lopdf::Dictionary {
        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        };
        if !self.options.title.trim().is_empty() {
            info.set("Title", Object::String(to_win_ansi(&self.options.title), StringFormat::Literal));
        }
        if let Some(date) = self.options.creation_date {
            let stamp = date.format("D:%Y%m%d%H%M%SZ").to_string();
            info.set("CreationDate", Object::string_literal(stamp));
        }
        info
    }
}

/// Renders `cards` with `options`, pulling photos from `images`.
pub fn render(cards: &CardSet, options: &RenderOptions, images: &dyn ImageSource) -> Result<Vec<u8>, RenderError> {
    CardRenderer::new(options.clone()).render(cards, images)
}

#[derive(Default, Clone, PartialEq)]
struct CanvasState {
    font: Option<(BuiltinFont, f32)>,
    fill_color: Option<Color>,
}

/// Accumulates drawing operations for one page, converting the layout's
/// top-left coordinates into PDF space.
struct PageCanvas<'a> {
    page_height: f32,
    content: Content,
    state: CanvasState,
    image_names: &'a HashMap<TaxonId, String>,
}

impl<'a> PageCanvas<'a> {
    fn new(page_height: f32, image_names: &'a HashMap<TaxonId, String>) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: CanvasState::default(),
            image_names,
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn draw_page(&mut self, geometry: &PageGeometry, page: &PageLayout, line_color: Color) {
        self.draw_text_lines(&geometry.title);
        self.draw_grid(geometry, line_color);
        for cell in &page.cells {
            self.draw_cell(cell);
        }
    }

    fn draw_grid(&mut self, geometry: &PageGeometry, color: Color) {
        let [r, g, b] = color.to_unit();
        self.op("w", vec![GRID_LINE_WIDTH.into()]);
        self.op("RG", vec![r.into(), g.into(), b.into()]);

        let grid = geometry.grid;
        for i in 0..=geometry.dimension {
            let x = grid.x + i as f32 * geometry.cell.width;
            self.line(x, grid.y, x, grid.bottom());
            let y = grid.y + i as f32 * geometry.cell.height;
            self.line(grid.x, y, grid.right(), y);
        }
        self.op("S", vec![]);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (py1, py2) = (self.page_height - y1, self.page_height - y2);
        self.op("m", vec![x1.into(), py1.into()]);
        self.op("l", vec![x2.into(), py2.into()]);
    }

    fn draw_cell(&mut self, cell: &CellLayout) {
        if let Some(photo) = &cell.photo {
            self.draw_image(photo.id, photo.rect);
        }
        self.draw_text_lines(&cell.lines);
    }

    fn draw_image(&mut self, id: TaxonId, rect: Rect) {
        let Some(name) = self.image_names.get(&id) else {
            log::warn!("Photo for taxon {} was planned but never embedded", id);
            return;
        };
        let name = Object::Name(name.as_bytes().to_vec());
        let y = self.page_height - rect.bottom();
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![rect.width.into(), 0.into(), 0.into(), rect.height.into(), rect.x.into(), y.into()],
        );
        self.op("Do", vec![name]);
        self.op("Q", vec![]);
    }

    fn set_font(&mut self, font: BuiltinFont, size: f32) {
        if self.state.font != Some((font, size)) {
            self.op("Tf", vec![Object::Name(font.resource_name().as_bytes().to_vec()), size.into()]);
            self.state.font = Some((font, size));
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_unit();
            self.op("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn draw_text_lines(&mut self, lines: &[TextLine]) {
        if lines.is_empty() {
            return;
        }
        self.op("BT", vec![]);
        self.state.font = None;
        self.set_fill_color(Color::BLACK);
        for line in lines {
            self.set_font(line.font, line.size);
            let y = self.page_height - line.baseline;
            self.op(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), line.x.into(), y.into()],
            );
            self.op("Tj", vec![Object::String(to_win_ansi(&line.text), StringFormat::Literal)]);
        }
        self.op("ET", vec![]);
    }
}
