//! TOML configuration for the `phylogen` binary.
//!
//! A configuration file holds the same keys as the command line flags, in
//! snake_case and at top level. Every key is optional:
//!
//! ```toml
//! birth = 1.0
//! death = 0.25
//! min_leaves = 20
//! labels = "bio"
//! method = "fast"
//! seed = "myseed"
//! num_chars = 50
//! k_hgt = 2.0
//! th_hgt = 1.1
//! output = "nexus"
//! ```
//!
//! Values are layered: built-in defaults, overridden by the file,
//! overridden by flags (see [`Settings::overlay`]).

use crate::characters::CharacterModel;
use crate::error::GenerationError;
use crate::labels::LabelPolicy;
use crate::rng::Seed;
use crate::simulation::{Strategy, TreeGenerator, TreeGeneratorBuilder};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// Defaults when neither file nor flags give a value
const DEFAULT_BIRTH: f64 = 1.0;
const DEFAULT_MIN_LEAVES: usize = 10;
const DEFAULT_LABELS: &str = "human";
const DEFAULT_METHOD: &str = "standard";
const DEFAULT_K_MUT: f64 = 5.0;
const DEFAULT_TH_MUT: f64 = 1.0;
const DEFAULT_E_MUT: f64 = 1.05;
const DEFAULT_LAMBDA: f64 = 0.0;

/// Output formats of the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Newick in construction order
    #[default]
    Newick,
    /// Canonically sorted Newick
    Sorted,
    /// ASCII drawing
    Ascii,
    /// NEXUS with character matrix
    Nexus,
    /// CSV wordlist of characters
    Wordlist,
}

impl FromStr for OutputFormat {
    type Err = GenerationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "newick" => Ok(OutputFormat::Newick),
            "sorted" => Ok(OutputFormat::Sorted),
            "ascii" => Ok(OutputFormat::Ascii),
            "nexus" => Ok(OutputFormat::Nexus),
            "wl" | "wordlist" => Ok(OutputFormat::Wordlist),
            _ => Err(GenerationError::invalid(
                "output",
                format!("unknown format '{name}' (expected one of: newick, sorted, ascii, nexus, wl)"),
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Newick => "newick",
            OutputFormat::Sorted => "sorted",
            OutputFormat::Ascii => "ascii",
            OutputFormat::Nexus => "nexus",
            OutputFormat::Wordlist => "wl",
        };
        f.write_str(name)
    }
}

// =#========================================================================#=
// SETTINGS
// =#========================================================================#=
/// Partial run settings, as read from a file or collected from flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Birth rate λ
    pub birth: Option<f64>,
    /// Death rate μ (default: half the birth rate)
    pub death: Option<f64>,
    /// Maximum simulated time
    pub max_time: Option<f64>,
    /// Minimum number of extant leaves
    pub min_leaves: Option<usize>,
    /// Label policy: `enum`, `human`, `bio` or `none`
    pub labels: Option<String>,
    /// Generation strategy: `standard` or `fast`
    pub method: Option<String>,
    /// Seed for all random draws
    pub seed: Option<Seed>,
    /// Number of characters to evolve
    pub num_chars: Option<usize>,
    /// Mutation gamma shape
    pub k_mut: Option<f64>,
    /// Mutation gamma scale
    pub th_mut: Option<f64>,
    /// Mutation decay base
    pub e_mut: Option<f64>,
    /// HGT gamma shape
    pub k_hgt: Option<f64>,
    /// HGT gamma scale
    pub th_hgt: Option<f64>,
    /// Poisson rate of extra children per birth
    pub lam: Option<f64>,
    /// Remove extinct lineages
    pub prune: Option<bool>,
    /// Probability of removing each leaf after generation
    pub sampling: Option<f64>,
    /// Output format
    pub output: Option<String>,
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    /// Returns [`GenerationError::Config`] for malformed TOML, unknown keys
    /// or values of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, GenerationError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    /// Returns [`GenerationError::Io`] if the file cannot be read and
    /// [`GenerationError::Config`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenerationError> {
        let text = fs::read_to_string(path)?;
        Settings::from_toml_str(&text)
    }

    /// Returns these settings with every value present in `overrides` replaced.
    pub fn overlay(self, overrides: Settings) -> Settings {
        Settings {
            birth: overrides.birth.or(self.birth),
            death: overrides.death.or(self.death),
            max_time: overrides.max_time.or(self.max_time),
            min_leaves: overrides.min_leaves.or(self.min_leaves),
            labels: overrides.labels.or(self.labels),
            method: overrides.method.or(self.method),
            seed: overrides.seed.or(self.seed),
            num_chars: overrides.num_chars.or(self.num_chars),
            k_mut: overrides.k_mut.or(self.k_mut),
            th_mut: overrides.th_mut.or(self.th_mut),
            e_mut: overrides.e_mut.or(self.e_mut),
            k_hgt: overrides.k_hgt.or(self.k_hgt),
            th_hgt: overrides.th_hgt.or(self.th_hgt),
            lam: overrides.lam.or(self.lam),
            prune: overrides.prune.or(self.prune),
            sampling: overrides.sampling.or(self.sampling),
            output: overrides.output.or(self.output),
        }
    }

    /// Builds the tree generator, filling in defaults.
    ///
    /// Without any stopping criterion, a minimum of 10 leaves is used.
    ///
    /// # Errors
    /// Returns a configuration error for unknown label policies or methods
    /// and for out-of-range values.
    pub fn generator(&self) -> Result<TreeGenerator, GenerationError> {
        let birth = self.birth.unwrap_or(DEFAULT_BIRTH);
        let death = self.death.unwrap_or(birth / 2.0);
        let strategy: Strategy = self.method.as_deref().unwrap_or(DEFAULT_METHOD).parse()?;
        let labels = LabelPolicy::parse_optional(self.labels.as_deref().unwrap_or(DEFAULT_LABELS))?;

        let mut builder = TreeGeneratorBuilder::new(birth, death)
            .with_strategy(strategy)
            .with_polytomy(self.lam.unwrap_or(DEFAULT_LAMBDA));
        builder = match labels {
            Some(policy) => builder.with_labels(policy),
            None => builder.without_labels(),
        };
        match (self.min_leaves, self.max_time) {
            (None, None) => builder = builder.with_min_leaves(DEFAULT_MIN_LEAVES),
            (min_leaves, max_time) => {
                if let Some(min_leaves) = min_leaves {
                    builder = builder.with_min_leaves(min_leaves);
                }
                if let Some(max_time) = max_time {
                    builder = builder.with_max_time(max_time);
                }
            }
        }
        if self.prune.unwrap_or(false) {
            builder = builder.with_pruning();
        }
        if let Some(seed) = &self.seed {
            builder = builder.with_seed(seed.clone());
        }
        builder.build()
    }

    /// Builds the character model, or `None` if no characters are requested.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] if only one of the HGT
    /// parameters is given.
    pub fn character_model(&self) -> Result<Option<CharacterModel>, GenerationError> {
        let Some(num_chars) = self.num_chars else {
            return Ok(None);
        };
        let model = CharacterModel::new(
            num_chars,
            self.k_mut.unwrap_or(DEFAULT_K_MUT),
            self.th_mut.unwrap_or(DEFAULT_TH_MUT),
        )
        .with_decay(self.e_mut.unwrap_or(DEFAULT_E_MUT))
        .with_optional_hgt(self.k_hgt, self.th_hgt)?;
        Ok(Some(model))
    }

    /// Returns the requested output format (default: Newick).
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] for unknown formats.
    pub fn output_format(&self) -> Result<OutputFormat, GenerationError> {
        self.output
            .as_deref()
            .map_or(Ok(OutputFormat::default()), str::parse)
    }
}
