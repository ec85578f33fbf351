use clap::Parser;
use phylogen::GenerationError;
use phylogen::config::{OutputFormat, Settings};
use phylogen::model::Tree;
use phylogen::newick::{to_newick, to_sorted_newick};
use phylogen::nexus::NexusWriter;
use phylogen::rng::{RngSession, Seed};
use phylogen::sampling::perturb_sampling_with;
use phylogen::wordlist::to_wordlist;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Generate random phylogenetic trees under a birth-death process.
#[derive(Debug, Parser)]
#[command(name = "phylogen", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file; flags take precedence over its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Birth rate [default: 1.0]
    #[arg(short, long)]
    birth: Option<f64>,

    /// Death rate [default: birth / 2]
    #[arg(short, long)]
    death: Option<f64>,

    /// Maximum simulated time
    #[arg(short = 't', long)]
    max_time: Option<f64>,

    /// Minimum number of extant leaves [default: 10 if no max time is given]
    #[arg(short = 'l', long)]
    min_leaves: Option<usize>,

    /// Leaf labels: enum, human, bio or none [default: human]
    #[arg(short = 'x', long)]
    labels: Option<String>,

    /// Generation method: standard or fast [default: standard]
    #[arg(short, long)]
    method: Option<String>,

    /// Seed for reproducible output
    #[arg(short = 'r', long)]
    seed: Option<String>,

    /// Number of characters to evolve
    #[arg(short, long)]
    num_chars: Option<usize>,

    /// Mutation gamma shape [default: 5.0]
    #[arg(long)]
    k_mut: Option<f64>,

    /// Mutation gamma scale [default: 1.0]
    #[arg(long)]
    th_mut: Option<f64>,

    /// Mutation decay base [default: 1.05]
    #[arg(long)]
    e_mut: Option<f64>,

    /// HGT gamma shape (requires --th-hgt)
    #[arg(long)]
    k_hgt: Option<f64>,

    /// HGT gamma scale (requires --k-hgt)
    #[arg(long)]
    th_hgt: Option<f64>,

    /// Poisson rate of extra children per birth [default: 0.0]
    #[arg(long)]
    lam: Option<f64>,

    /// Remove extinct lineages
    #[arg(long)]
    prune: bool,

    /// Probability of removing each leaf after generation
    #[arg(short, long)]
    sampling: Option<f64>,

    /// Output format: newick, sorted, ascii, nexus or wl [default: newick]
    #[arg(short, long)]
    output: Option<String>,
}

impl Cli {
    /// Collects the flags that were given as settings overrides.
    fn overrides(&self) -> Settings {
        Settings {
            birth: self.birth,
            death: self.death,
            max_time: self.max_time,
            min_leaves: self.min_leaves,
            labels: self.labels.clone(),
            method: self.method.clone(),
            seed: self.seed.as_deref().map(parse_seed),
            num_chars: self.num_chars,
            k_mut: self.k_mut,
            th_mut: self.th_mut,
            e_mut: self.e_mut,
            k_hgt: self.k_hgt,
            th_hgt: self.th_hgt,
            lam: self.lam,
            prune: self.prune.then_some(true),
            sampling: self.sampling,
            output: self.output.clone(),
        }
    }
}

/// Integers become integer seeds, as in configuration files.
fn parse_seed(text: &str) -> Seed {
    match text.parse::<u64>() {
        Ok(value) => Seed::Integer(value),
        Err(_) => Seed::Text(text.to_string()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("phylogen: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), GenerationError> {
    let file_settings = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };
    let settings = file_settings.overlay(cli.overrides());
    debug!(?settings, "Resolved settings");

    // Validate everything before simulating
    let generator = settings.generator()?;
    let character_model = settings.character_model()?;
    let format = settings.output_format()?;

    let mut tree = generator.generate()?;
    info!(
        leaves = tree.num_leaves(),
        extant = tree.num_extant_leaves(),
        height = tree.height(),
        "Generated tree"
    );

    let mut rng = RngSession::new(settings.seed.as_ref());
    if let Some(model) = &character_model {
        model.evolve_with(&mut tree, &mut rng)?;
    }
    perturb_sampling_with(&mut tree, settings.sampling, &mut rng)?;

    write_output(&tree, format)?;
    Ok(())
}

fn write_output(tree: &Tree, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    match format {
        OutputFormat::Newick => writeln!(stdout.lock(), "{}", to_newick(tree)),
        OutputFormat::Sorted => writeln!(stdout.lock(), "{}", to_sorted_newick(tree)),
        OutputFormat::Ascii => write!(stdout.lock(), "{}", tree.to_ascii()),
        OutputFormat::Nexus => {
            let mut writer = NexusWriter::new(stdout.lock());
            writer.write_nexus(tree)
        }
        OutputFormat::Wordlist => write!(stdout.lock(), "{}", to_wordlist(tree)),
    }
}
