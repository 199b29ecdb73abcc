//! Grid composition: turns a species pool into a set of bingo cards.
//!
//! Every card draws its own random subset of the pool, so cards in a set
//! differ from each other while no species repeats within a card. With a base
//! seed, card `i` is drawn from `StdRng::seed_from_u64(base + i)`, which makes
//! the whole set reproducible.

mod composer;
mod error;

pub use composer::{compose, CardRequest, GridComposer};
pub use error::ComposeError;
