use crate::error::ConfigurationError;
use crate::species::{Species, TaxonId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on cards per generation request.
pub const MAX_CARDS: usize = 100;

/// Checks a requested card count against `1..=MAX_CARDS`.
pub fn validate_card_count(count: usize) -> Result<usize, ConfigurationError> {
    if (1..=MAX_CARDS).contains(&count) {
        Ok(count)
    } else {
        Err(ConfigurationError::CardCount { count, max: MAX_CARDS })
    }
}

/// Side length of a square bingo grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GridSize {
    Three,
    Five,
    Seven,
    Nine,
}

impl GridSize {
    pub const ALL: [GridSize; 4] = [GridSize::Three, GridSize::Five, GridSize::Seven, GridSize::Nine];

    pub fn dimension(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Five => 5,
            GridSize::Seven => 7,
            GridSize::Nine => 9,
        }
    }

    pub fn cell_count(self) -> usize {
        self.dimension() * self.dimension()
    }

    /// Zero-indexed `(row, col)` of the centre cell.
    pub fn center(self) -> (usize, usize) {
        let c = (self.dimension() - 1) / 2;
        (c, c)
    }

    /// A free cell needs a true centre, which only odd sizes have.
    pub fn supports_free_center(self) -> bool {
        self.dimension() % 2 == 1
    }

    /// Number of species a grid of this size needs.
    pub fn required_cells(self, free_center: bool) -> usize {
        let reserved = usize::from(free_center && self.supports_free_center());
        self.cell_count() - reserved
    }
}

impl TryFrom<u32> for GridSize {
    type Error = ConfigurationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridSize::Three),
            5 => Ok(GridSize::Five),
            7 => Ok(GridSize::Seven),
            9 => Ok(GridSize::Nine),
            other => Err(ConfigurationError::UnsupportedGridSize(other)),
        }
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.dimension() as u32
    }
}

impl FromStr for GridSize {
    type Err = ConfigurationError;

    /// Accepts `"5"` as well as `"5x5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let side = match s.split_once(['x', 'X', '×']) {
            Some((a, b)) if a.trim() == b.trim() => a.trim(),
            Some(_) => {
                return Err(ConfigurationError::Invalid {
                    field: "grid_size",
                    message: format!("'{}' is not square", s),
                });
            }
            None => s,
        };
        let value: u32 = side.parse().map_err(|_| ConfigurationError::Invalid {
            field: "grid_size",
            message: format!("'{}' is not a number", s),
        })?;
        GridSize::try_from(value)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dimension();
        write!(f, "{}x{}", d, d)
    }
}

/// A single square on a card.
#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Species(Arc<Species>),
    Free,
}

impl GridCell {
    pub fn is_free(&self) -> bool {
        matches!(self, GridCell::Free)
    }

    pub fn species(&self) -> Option<&Species> {
        match self {
            GridCell::Species(s) => Some(s),
            GridCell::Free => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("A {size} grid needs {expected} cells, got {actual}")]
    CellCount { size: GridSize, expected: usize, actual: usize },

    #[error("Free cell at ({row}, {col}) is not the grid centre")]
    MisplacedFree { row: usize, col: usize },

    #[error("Species {0} appears more than once in the grid")]
    DuplicateSpecies(TaxonId),
}

/// A square, row-major matrix of cells.
///
/// Construction validates that the only free cell sits at the centre and that
/// no species appears twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<GridCell>,
}

impl Grid {
    pub fn from_cells(size: GridSize, cells: Vec<GridCell>) -> Result<Self, GridError> {
        if cells.len() != size.cell_count() {
            return Err(GridError::CellCount {
                size,
                expected: size.cell_count(),
                actual: cells.len(),
            });
        }

        let d = size.dimension();
        let mut seen = HashSet::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            match cell {
                GridCell::Free => {
                    let pos = (index / d, index % d);
                    if !size.supports_free_center() || pos != size.center() {
                        return Err(GridError::MisplacedFree { row: pos.0, col: pos.1 });
                    }
                }
                GridCell::Species(s) => {
                    if !seen.insert(s.id) {
                        return Err(GridError::DuplicateSpecies(s.id));
                    }
                }
            }
        }

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        let d = self.dimension();
        if row >= d || col >= d {
            return None;
        }
        self.cells.get(row * d + col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.dimension())
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn species_ids(&self) -> impl Iterator<Item = TaxonId> + '_ {
        self.cells.iter().filter_map(|c| c.species().map(|s| s.id))
    }

    pub fn free_cell(&self) -> Option<(usize, usize)> {
        let d = self.dimension();
        self.cells.iter().position(GridCell::is_free).map(|i| (i / d, i % d))
    }
}

/// One bingo card: its grid plus how it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub grid: Grid,
    pub free_center: bool,
    /// The seed this card was drawn with, `None` when seeded from entropy.
    pub seed: Option<u64>,
}

impl Card {
    pub fn size(&self) -> GridSize {
        self.grid.size()
    }
}

/// An ordered batch of cards for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self { cards: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CardSet {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
