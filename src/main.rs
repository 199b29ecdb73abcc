use clap::Parser;
use inat_bingo::{BingoConfig, BingoError, GridSize, PipelineBuilder};
use std::path::PathBuf;

/// Generate printable species bingo cards from iNaturalist observations.
#[derive(Parser, Debug)]
#[command(name = "inat-bingo", version, about)]
struct Cli {
    /// JSON configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of saved species_counts responses, one per place.
    #[arg(long, conflicts_with = "species_file")]
    species_dir: Option<PathBuf>,

    /// A single saved species_counts response used for every request.
    #[arg(long)]
    species_file: Option<PathBuf>,

    /// Directory of photos named <taxon_id>.jpg, .jpeg or .png.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    #[arg(long)]
    place_id: Option<u64>,

    /// Number of most observed species to draw from (10-100).
    #[arg(long)]
    top_n: Option<usize>,

    /// Grid size: 3, 5, 7 or 9 (also accepts 5x5).
    #[arg(long)]
    grid_size: Option<GridSize>,

    /// Number of cards (1-100).
    #[arg(long)]
    cards: Option<usize>,

    /// Base seed for reproducible cards. 0 seeds from entropy.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    free_center: Option<bool>,

    #[arg(long)]
    no_photos: bool,

    #[arg(long)]
    no_common_names: bool,

    #[arg(long)]
    no_scientific_names: bool,

    #[arg(long)]
    title: Option<String>,

    /// Comma-separated months to restrict observations to, e.g. 4,5,6.
    #[arg(long, value_delimiter = ',')]
    months: Vec<u8>,

    /// Output path. Defaults to the slugified title.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut BingoConfig) {
        if let Some(place_id) = self.place_id {
            config.place_id = Some(place_id);
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(cards) = self.cards {
            config.card_count = cards;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(free_center) = self.free_center {
            config.free_center = free_center;
        }
        config.show_photo &= !self.no_photos;
        config.show_common_name &= !self.no_common_names;
        config.show_scientific_name &= !self.no_scientific_names;
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if !self.months.is_empty() {
            config.months = self.months.clone();
        }
    }
}

fn main() -> Result<(), BingoError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BingoConfig::from_file(path)?,
        None => BingoConfig::default(),
    };
    cli.apply(&mut config);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.output_file_name()));

    let mut builder = PipelineBuilder::new().with_config(config);
    builder = match (&cli.species_dir, &cli.species_file) {
        (Some(dir), _) => builder.with_species_dir(dir),
        (None, Some(file)) => builder.with_species_file(file)?,
        (None, None) => builder.with_species_dir("."),
    };
    if let Some(dir) = &cli.images_dir {
        builder = builder.with_images_dir(dir);
    }

    let pipeline = builder.build()?;
    pipeline.generate_to_file(&output)?;
    println!("Successfully generated {}", output.display());
    Ok(())
}
