use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tunebreed::config::{AppConfig, ConfigManager, ScaleConfig};
use tunebreed::data::JsonFileStore;
use tunebreed::engines::generation::EvolutionEngine;
use tunebreed::engines::rendering::{render_population, write_artifacts, MidiRenderer, Renderer};
use tunebreed::services::{EvolutionSession, Workshop};
use tunebreed::{Individual, Population, Ratings};

#[derive(Parser, Debug)]
#[command(name = "tunebreed")]
#[command(about = "Breed melodies by rating them, one generation at a time")]
struct Args {
    /// Path to config file
    #[arg(short = 'c', long, default_value = "tunebreed.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Population(PopulationCommand),
    /// Print the effective configuration
    Config,
    /// Work with the saved/fresh melody pool
    Pool {
        #[command(subcommand)]
        action: PoolCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PopulationCommand {
    /// Print the current generation
    Show {
        /// Notes to print per melody
        #[arg(long, default_value_t = 32)]
        notes: usize,
    },
    /// Rate the current generation and breed the next one
    Evolve {
        /// Melodies you liked (comma-separated); they score 1, the rest 0
        #[arg(long, value_delimiter = ',', conflicts_with = "scores")]
        select: Vec<usize>,
        /// One score per melody (comma-separated)
        #[arg(long, value_delimiter = ',')]
        scores: Vec<u32>,
        /// Render the new generation afterwards
        #[arg(long)]
        render: bool,
    },
    /// Replace one note with another throughout a melody
    Rewrite {
        #[arg(long)]
        melody: usize,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
        /// Read --from and --to as MIDI pitches instead of scale indices
        #[arg(long)]
        pitches: bool,
    },
    /// Start over from the seed population
    Reset,
    /// Write one MIDI file per melody
    Render {
        /// Output directory (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum PoolCommand {
    /// List saved and fresh melodies
    Show,
    /// Save fresh melodies by index
    Keep {
        #[arg(value_delimiter = ',', required = true)]
        indices: Vec<usize>,
    },
    /// Delete saved melodies by index
    Discard {
        #[arg(value_delimiter = ',', required = true)]
        indices: Vec<usize>,
    },
    /// Breed saved melodies into a new fresh list
    Breed {
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<usize>,
        /// How many fresh melodies to produce
        #[arg(long, default_value_t = 0)]
        count: usize,
    },
    /// Write saved and fresh melodies as MIDI files
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let manager = ConfigManager::new();
    manager
        .load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let config = manager.get();

    match args.command {
        Command::Config => print!("{}", manager.to_toml()?),
        Command::Pool { action } => run_pool(action, &config)?,
        Command::Population(command) => run_population(command, &config)?,
    }
    Ok(())
}

fn run_population(command: PopulationCommand, config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(
        &config.storage.population_path,
        config.shape(),
        config.evolution.seed_voices,
    );
    let session = EvolutionSession::new(store, EvolutionEngine::from_app_config(config)?)?;

    match command {
        PopulationCommand::Show { notes } => {
            let population = session.current()?;
            println!("Generation {}", population.generation);
            print_melodies("", population.individuals(), &config.scale, notes);
        }
        PopulationCommand::Evolve {
            select,
            scores,
            render,
        } => {
            let ratings = if scores.is_empty() {
                Ratings::from_selection(&select, config.evolution.population_size)?
            } else {
                Ratings::from_scores(scores)
            };
            let next = session.evolve(&ratings)?;
            println!("Bred generation {}", next.generation);
            if render {
                render_to(&next, config, &config.render.output_dir)?;
            }
        }
        PopulationCommand::Rewrite {
            melody,
            from,
            to,
            pitches,
        } => {
            let (from, to) = if pitches {
                (pitch_to_index(&config.scale, from)?, pitch_to_index(&config.scale, to)?)
            } else {
                (from, to)
            };
            session.rewrite(melody, from, to)?;
            println!("Melody {}: {} -> {}", melody, from, to);
        }
        PopulationCommand::Reset => {
            let population = session.reset()?;
            println!("Reset to {} seed melodies", population.len());
        }
        PopulationCommand::Render { out } => {
            let population = session.current()?;
            let dir = out.unwrap_or_else(|| config.render.output_dir.clone());
            render_to(&population, config, &dir)?;
        }
    }
    Ok(())
}

fn run_pool(action: PoolCommand, config: &AppConfig) -> anyhow::Result<()> {
    let path = &config.storage.workshop_path;
    let mut workshop = Workshop::load(path, config)?;

    match action {
        PoolCommand::Show => {
            println!("Saved ({})", workshop.saved().len());
            print_melodies("saved", workshop.saved(), &config.scale, 32);
            println!("Fresh ({})", workshop.fresh().len());
            print_melodies("fresh", workshop.fresh(), &config.scale, 32);
            return Ok(());
        }
        PoolCommand::Keep { indices } => {
            let kept = workshop.keep(&indices)?;
            println!("Saved {} melodies", kept);
        }
        PoolCommand::Discard { indices } => {
            let removed = workshop.discard(&indices)?;
            println!("Deleted {} melodies", removed);
        }
        PoolCommand::Breed { select, count } => {
            let mut rng = match config.evolution.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            if !workshop.breed(&select, count, &mut rng)? {
                println!("Select at least two saved melodies to breed");
                return Ok(());
            }
            println!("Bred {} fresh melodies", workshop.fresh().len());
        }
        PoolCommand::Render { out } => {
            let dir = out.unwrap_or_else(|| config.render.output_dir.clone());
            render_to(&Population::new(0, workshop.saved().to_vec()), config, &dir.join("saved"))?;
            render_to(&Population::new(0, workshop.fresh().to_vec()), config, &dir.join("fresh"))?;
            return Ok(());
        }
    }

    workshop.save(path)?;
    Ok(())
}

fn render_to(population: &Population, config: &AppConfig, dir: &Path) -> anyhow::Result<()> {
    let renderer = MidiRenderer::from_app_config(config);
    let extension = renderer.extension();
    let outcomes = render_population(Arc::new(renderer), population, config.render.timeout());

    for failure in outcomes.iter().filter_map(|o| o.failure()) {
        eprintln!("{}", failure);
    }
    let written = write_artifacts(dir, &outcomes, extension)?;
    println!("Rendered {}/{} melodies to {}", written.len(), outcomes.len(), dir.display());
    Ok(())
}

fn pitch_to_index(scale: &ScaleConfig, pitch: usize) -> anyhow::Result<usize> {
    let found = u8::try_from(pitch).ok().and_then(|p| scale.index_of(p));
    match found {
        Some(index) => Ok(usize::from(index)),
        None => bail!("pitch {} is not in the scale {:?}", pitch, scale.notes),
    }
}

fn print_melodies(label: &str, melodies: &[Individual], scale: &ScaleConfig, notes: usize) {
    for (i, melody) in melodies.iter().enumerate() {
        let preview: Vec<String> = melody
            .notes()
            .iter()
            .take(notes)
            .map(|&n| match scale.notes.get(usize::from(n)) {
                Some(pitch) => pitch.to_string(),
                None => "?".to_string(),
            })
            .collect();
        let ellipsis = if melody.len() > notes { ", ..." } else { "" };
        println!("{}{:>3}: {}{}", label, i, preview.join(", "), ellipsis);
    }
}
