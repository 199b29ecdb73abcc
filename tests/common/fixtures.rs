use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use inat_bingo::{Card, CardSet, Grid, GridCell, GridSize, Species, SpeciesPool};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

/// Species `1..=n` with short names that never wrap.
pub fn species(n: u64) -> Vec<Species> {
    (1..=n)
        .map(|i| {
            Species::new(i, format!("Genus s{}", i))
                .with_common_name(format!("Bird {}", i))
                .with_observation_count(10_000 - i)
        })
        .collect()
}

pub fn pool(n: u64) -> SpeciesPool {
    SpeciesPool::ranked(species(n), n as usize)
}

/// A card filled row-major with species starting at `first_id`.
pub fn card(size: GridSize, first_id: u64, free_center: bool) -> Card {
    let center = free_center.then(|| size.center());
    let d = size.dimension();
    let mut next = first_id;
    let mut cells = Vec::with_capacity(size.cell_count());
    for row in 0..d {
        for col in 0..d {
            if center == Some((row, col)) {
                cells.push(GridCell::Free);
            } else {
                cells.push(GridCell::Species(Arc::new(
                    Species::new(next, format!("Genus s{}", next)).with_common_name(format!("Bird {}", next)),
                )));
                next += 1;
            }
        }
    }
    Card {
        grid: Grid::from_cells(size, cells).expect("valid grid"),
        free_center,
        seed: None,
    }
}

pub fn card_set(size: GridSize, count: usize, free_center: bool) -> CardSet {
    (0..count)
        .map(|i| card(size, 1 + (i * size.cell_count()) as u64, free_center))
        .collect()
}

/// A saved `/v1/observations/species_counts` response with `n` usable taxa
/// plus entries the filters must drop.
pub fn species_counts_response(n: u64) -> Value {
    let mut results: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "count": 5_000 - i,
                "taxon": {
                    "id": i,
                    "name": format!("Genus s{}", i),
                    "preferred_common_name": format!("Bird {}", i),
                    "rank_level": 10,
                    "default_photo": {
                        "license_code": "cc-by",
                        "square_url": format!("https://static.inaturalist.org/photos/{}/square.jpg", i)
                    }
                }
            })
        })
        .collect();
    results.push(json!({ "count": 9_999, "taxon": { "id": 90_001, "name": "Aves", "rank_level": 50 } }));
    results.push(json!({
        "count": 9_998,
        "taxon": {
            "id": 90_002, "name": "Restricted photo", "rank_level": 10,
            "default_photo": { "license_code": "all-rights-reserved" }
        }
    }));
    results.push(json!({ "count": 9_997 }));
    json!({ "total_results": results.len(), "results": results })
}

/// PNG bytes of a solid image.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 140, 70]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}
