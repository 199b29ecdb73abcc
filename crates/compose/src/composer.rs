use crate::error::ComposeError;
use bingo_types::{validate_card_count, Card, CardSet, Grid, GridCell, GridSize, SpeciesPool};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// What to compose: grid size, how many cards, the free centre and an
/// optional base seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRequest {
    pub size: GridSize,
    pub count: usize,
    pub free_center: bool,
    pub seed: Option<u64>,
}

impl CardRequest {
    pub fn new(size: GridSize, count: usize) -> Self {
        Self {
            size,
            count,
            free_center: false,
            seed: None,
        }
    }

    pub fn with_free_center(mut self, free_center: bool) -> Self {
        self.free_center = free_center;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// The free centre only counts when the grid has a true centre cell.
    pub fn has_free_center(&self) -> bool {
        self.free_center && self.size.supports_free_center()
    }

    pub fn required_cells(&self) -> usize {
        self.size.required_cells(self.free_center)
    }

    /// Seed for card `index`, derived from the base seed.
    pub fn card_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|base| base.wrapping_add(index as u64))
    }
}

/// Draws cards from a borrowed pool. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct GridComposer<'a> {
    pool: &'a SpeciesPool,
}

impl<'a> GridComposer<'a> {
    pub fn new(pool: &'a SpeciesPool) -> Self {
        Self { pool }
    }

    /// Composes `request.count` cards.
    ///
    /// Fails before drawing anything when the count is out of range or the
    /// pool cannot fill one card; never returns a partial set.
    pub fn compose(&self, request: &CardRequest) -> Result<CardSet, ComposeError> {
        validate_card_count(request.count)?;
        self.check_pool(request)?;

        log::info!(
            "Composing {} {} card(s) from {} species (free centre: {}, seed: {:?})",
            request.count,
            request.size,
            self.pool.len(),
            request.has_free_center(),
            request.seed
        );

        (0..request.count)
            .map(|index| self.compose_card(request, index))
            .collect()
    }

    /// Composes the card at position `index` of the set described by `request`.
    pub fn compose_card(&self, request: &CardRequest, index: usize) -> Result<Card, ComposeError> {
        self.check_pool(request)?;
        let seed = request.card_seed(index);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let grid = self.draw_grid(&mut rng, request)?;
        log::debug!("Card {} drawn (seed {:?})", index + 1, seed);

        Ok(Card {
            grid,
            free_center: request.has_free_center(),
            seed,
        })
    }

    fn check_pool(&self, request: &CardRequest) -> Result<(), ComposeError> {
        let required = request.required_cells();
        if self.pool.len() < required {
            return Err(ComposeError::InsufficientPool {
                size: request.size,
                required,
                available: self.pool.len(),
            });
        }
        Ok(())
    }

    /// Picks `required_cells` distinct pool entries with a partial Fisher-Yates
    /// shuffle and lays them out row-major around the free centre.
    fn draw_grid<R: Rng + ?Sized>(&self, rng: &mut R, request: &CardRequest) -> Result<Grid, ComposeError> {
        let size = request.size;
        let required = request.required_cells();
        let species = self.pool.as_slice();

        let mut indices: Vec<usize> = (0..species.len()).collect();
        let (drawn, _) = indices.partial_shuffle(rng, required);
        let mut drawn = drawn.iter().map(|&i| Arc::clone(&species[i]));

        let center = request.has_free_center().then(|| size.center());
        let d = size.dimension();
        let mut cells = Vec::with_capacity(size.cell_count());
        for row in 0..d {
            for col in 0..d {
                if center == Some((row, col)) {
                    cells.push(GridCell::Free);
                    continue;
                }
                let next = drawn.next().ok_or(ComposeError::InsufficientPool {
                    size,
                    required,
                    available: species.len(),
                })?;
                cells.push(GridCell::Species(next));
            }
        }

        Ok(Grid::from_cells(size, cells)?)
    }
}

/// Composes `count` cards of `size` from `pool`.
///
/// With `seed`, repeated calls on the same inputs return identical sets.
pub fn compose(
    pool: &SpeciesPool,
    size: GridSize,
    count: usize,
    free_center: bool,
    seed: Option<u64>,
) -> Result<CardSet, ComposeError> {
    let request = CardRequest::new(size, count)
        .with_free_center(free_center)
        .with_seed(seed);
    GridComposer::new(pool).compose(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_types::{ConfigurationError, Species, TaxonId};
    use std::collections::HashSet;

    fn pool(n: u64) -> SpeciesPool {
        SpeciesPool::ranked(
            (1..=n).map(|i| Species::new(i, format!("Taxon {}", i)).with_observation_count(1000 - i)),
            n as usize,
        )
    }

    fn ids(card: &Card) -> Vec<Option<TaxonId>> {
        card.grid.cells().iter().map(|c| c.species().map(|s| s.id)).collect()
    }

    #[test]
    fn test_same_seed_reproduces_card_set() {
        let pool = pool(40);
        let a = compose(&pool, GridSize::Five, 10, true, Some(1234)).unwrap();
        let b = compose(&pool, GridSize::Five, 10, true, Some(1234)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_cards_in_a_set_differ() {
        let pool = pool(40);
        let set = compose(&pool, GridSize::Five, 5, false, Some(7)).unwrap();
        let distinct: HashSet<_> = set.iter().map(ids).collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_card_seeds_follow_base_plus_index() {
        let pool = pool(20);
        let set = compose(&pool, GridSize::Three, 3, false, Some(u64::MAX)).unwrap();
        let seeds: Vec<_> = set.iter().map(|c| c.seed).collect();
        assert_eq!(seeds, vec![Some(u64::MAX), Some(0), Some(1)]);

        let single = GridComposer::new(&pool)
            .compose_card(&CardRequest::new(GridSize::Three, 3).with_seed(Some(u64::MAX)), 2)
            .unwrap();
        assert_eq!(&single, set.get(2).unwrap());
    }

    #[test]
    fn test_no_species_repeats_within_a_grid() {
        let pool = pool(81);
        for size in GridSize::ALL {
            for free in [false, true] {
                let set = compose(&pool, size, 4, free, Some(99)).unwrap();
                for card in &set {
                    let ids: Vec<_> = card.grid.species_ids().collect();
                    let unique: HashSet<_> = ids.iter().collect();
                    assert_eq!(ids.len(), unique.len());
                    assert_eq!(ids.len(), size.required_cells(free));
                }
            }
        }
    }

    #[test]
    fn test_free_centre_is_exact_centre() {
        let pool = pool(30);
        let set = compose(&pool, GridSize::Five, 20, true, Some(3)).unwrap();
        for card in &set {
            assert_eq!(card.grid.free_cell(), Some((2, 2)));
            assert!(card.free_center);
            assert_eq!(card.grid.cells().iter().filter(|c| c.is_free()).count(), 1);
        }

        let nine = compose(&self::pool(90), GridSize::Nine, 1, true, Some(3)).unwrap();
        assert_eq!(nine.get(0).and_then(|c| c.grid.free_cell()), Some((4, 4)));
    }

    #[test]
    fn test_without_free_centre_every_cell_has_species() {
        let set = compose(&pool(9), GridSize::Three, 2, false, Some(5)).unwrap();
        for card in &set {
            assert_eq!(card.grid.free_cell(), None);
            assert_eq!(card.grid.species_ids().count(), 9);
        }
    }

    #[test]
    fn test_insufficient_pool_fails() {
        let result = compose(&pool(8), GridSize::Three, 1, false, Some(1));
        assert_eq!(
            result,
            Err(ComposeError::InsufficientPool {
                size: GridSize::Three,
                required: 9,
                available: 8
            })
        );
    }

    #[test]
    fn test_free_centre_lowers_requirement_by_one() {
        assert!(compose(&pool(24), GridSize::Five, 3, true, Some(1)).is_ok());
        assert!(matches!(
            compose(&pool(24), GridSize::Five, 3, false, Some(1)),
            Err(ComposeError::InsufficientPool { required: 25, .. })
        ));
    }

    #[test]
    fn test_pool_exactly_required_uses_every_species() {
        let pool = pool(9);
        let set = compose(&pool, GridSize::Three, 3, false, None).unwrap();
        for card in &set {
            let used: HashSet<_> = card.grid.species_ids().collect();
            assert_eq!(used.len(), 9);
            assert!(used.iter().all(|id| pool.contains(*id)));
        }
    }

    #[test]
    fn test_entropy_seeding_records_no_seed() {
        let set = compose(&pool(30), GridSize::Five, 2, true, None).unwrap();
        assert!(set.iter().all(|c| c.seed.is_none()));
    }

    #[test]
    fn test_card_count_is_validated() {
        let pool = pool(30);
        assert!(matches!(
            compose(&pool, GridSize::Three, 0, false, None),
            Err(ComposeError::Configuration(ConfigurationError::CardCount { count: 0, .. }))
        ));
        assert!(compose(&pool, GridSize::Three, 101, false, None).is_err());
    }
}
