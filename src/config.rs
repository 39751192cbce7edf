//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or `--config <PATH>`)
//! 3. `URLRECON_*` environment variables
//! 4. Command-line flags ([`Config::merge_compare_args`])
//!
//! A config file can define named comparison profiles that add to (or
//! replace) the built-in `strict`, `standard` and `loose` profiles:
//!
//! ```toml
//! default_profile = "seo"
//! batch_size = 500
//!
//! [profile.seo]
//! lower_bound = 85.0
//! upper_bound = 100.0
//! policy = "first-match"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{CompareArgs, OutputFormat};
use crate::recon::{
    ComparisonProfile, MatchPolicy, ProfileError, DEFAULT_BATCH_SIZE, DEFAULT_LENGTH_CUTOFF,
};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "URLRECON_";

/// Name of the profile used when nothing else is selected.
pub const DEFAULT_PROFILE: &str = "strict";

/// Built-in profiles: name, lower bound, upper bound, description.
const BUILTIN_PROFILES: [(&str, f64, f64, &str); 3] = [
    ("strict", 97.0, 100.0, "Near-identical items only"),
    ("standard", 95.0, 100.0, "Small differences such as a trailing slash"),
    ("loose", 70.0, 99.0, "Broad similarity, excludes near-identical items"),
];

const TOP_LEVEL_KEYS: [&str; 8] = [
    "default_profile",
    "batch_size",
    "output",
    "policy",
    "length_cutoff",
    "lower_bound",
    "upper_bound",
    "profile",
];

const PROFILE_KEYS: [&str; 6] = [
    "lower_bound",
    "upper_bound",
    "policy",
    "length_cutoff",
    "batch_size",
    "output",
];

/// Settings a `[profile.<name>]` table may override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Inclusive lower similarity bound (percent)
    pub lower_bound: Option<f64>,
    /// Exclusive upper similarity bound (percent)
    pub upper_bound: Option<f64>,
    /// Partial match policy
    pub policy: Option<MatchPolicy>,
    /// Length-difference cutoff (0 disables)
    pub length_cutoff: Option<usize>,
    /// Items per batch
    pub batch_size: Option<usize>,
    /// Output format
    pub output: Option<OutputFormat>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile used when `--profile` is not given. After loading, the
    /// name of the profile that is actually active.
    pub default_profile: String,
    /// Items of the first list processed per batch
    pub batch_size: usize,
    /// Output format for `compare`
    pub output: OutputFormat,
    /// Partial match policy (overrides the profile's)
    pub policy: Option<MatchPolicy>,
    /// Length-difference cutoff for the distance fast path (0 disables)
    pub length_cutoff: usize,
    /// Lower bound override (percent)
    pub lower_bound: Option<f64>,
    /// Upper bound override (percent)
    pub upper_bound: Option<f64>,
    /// Named profiles from the config file
    pub profile: BTreeMap<String, ProfileConfig>,
    /// Top-level comparison settings as loaded, set aside when a
    /// configured profile overlays them
    #[serde(skip)]
    file_layer: Option<ProfileConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: DEFAULT_PROFILE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            output: OutputFormat::Text,
            policy: None,
            length_cutoff: DEFAULT_LENGTH_CUTOFF,
            lower_bound: None,
            upper_bound: None,
            profile: BTreeMap::new(),
            file_layer: None,
        }
    }
}

/// A profile as listed by `urlrecon profiles`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedProfile {
    /// Profile name
    pub name: String,
    /// Resolved bounds and policy
    pub profile: ComparisonProfile,
    /// Short description
    pub description: String,
    /// Whether the profile comes from the config file
    pub configured: bool,
}

/// Look up a built-in profile by name.
#[must_use]
pub fn builtin_profile(name: &str) -> Option<ComparisonProfile> {
    BUILTIN_PROFILES
        .iter()
        .find(|(n, ..)| *n == name)
        .and_then(|(_, lower, upper, _)| ComparisonProfile::new(*lower, *upper).ok())
}

impl Config {
    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "urlrecon", "urlrecon")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration from `path` (or the default path) and
    /// activate `profile` (or the configured default profile).
    pub fn load(path: Option<&Path>, profile: Option<&str>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path, profile),
            None => {
                log::debug!("No config directory available, using defaults");
                let mut config = Self::extract(Self::figment_base()).unwrap_or_default();
                config.select_profile(profile);
                config
            }
        }
    }

    /// Load the configuration from a specific TOML file.
    ///
    /// Missing files are not an error. A file that cannot be parsed is
    /// reported as a warning and defaults are used.
    pub fn load_from_path(path: PathBuf, profile: Option<&str>) -> Self {
        if path.exists() {
            warn_unknown_keys(&path);
        }

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]));

        let mut config = figment.extract::<Config>().unwrap_or_else(|e| {
            log::warn!(
                "Invalid configuration in {}: {}. Using defaults",
                path.display(),
                e
            );
            Self::extract(Self::figment_base()).unwrap_or_default()
        });
        config.select_profile(profile);
        config
    }

    fn figment_base() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]))
    }

    fn extract(figment: Figment) -> Option<Self> {
        figment
            .extract()
            .map_err(|e| log::debug!("Configuration error: {}", e))
            .ok()
    }

    /// Make `requested` (or `default_profile`) the active profile and apply
    /// its configured overrides. Unknown names fall back to `strict`.
    fn select_profile(&mut self, requested: Option<&str>) {
        let name = requested.unwrap_or(&self.default_profile).to_string();

        if let Some(overrides) = self.profile.get(&name).cloned() {
            log::debug!("Using configured profile '{}'", name);
            self.file_layer = Some(self.top_level_layer());
            self.apply_profile(&overrides);
            self.default_profile = name;
        } else if builtin_profile(&name).is_some() {
            self.default_profile = name;
        } else {
            let known = self.profile_names();
            match suggest(&name, known.iter().map(String::as_str)) {
                Some(s) => log::warn!(
                    "Profile '{}' not found (did you mean '{}'?), using '{}'",
                    name,
                    s,
                    DEFAULT_PROFILE
                ),
                None => log::warn!("Profile '{}' not found, using '{}'", name, DEFAULT_PROFILE),
            }
            self.default_profile = DEFAULT_PROFILE.to_string();
        }
    }

    fn apply_profile(&mut self, overrides: &ProfileConfig) {
        if overrides.lower_bound.is_some() {
            self.lower_bound = overrides.lower_bound;
        }
        if overrides.upper_bound.is_some() {
            self.upper_bound = overrides.upper_bound;
        }
        if overrides.policy.is_some() {
            self.policy = overrides.policy;
        }
        if let Some(cutoff) = overrides.length_cutoff {
            self.length_cutoff = cutoff;
        }
        if let Some(size) = overrides.batch_size {
            self.batch_size = size;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
    }

    /// Apply `compare` flags on top of the loaded settings.
    pub fn merge_compare_args(&mut self, args: &CompareArgs) {
        if args.lower_bound.is_some() {
            self.lower_bound = args.lower_bound;
        }
        if args.upper_bound.is_some() {
            self.upper_bound = args.upper_bound;
        }
        if args.policy.is_some() {
            self.policy = args.policy;
        }
        if let Some(size) = args.batch_size {
            self.batch_size = size;
        }
        if args.no_length_cutoff {
            self.length_cutoff = 0;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
    }

    /// The comparison profile produced by the active profile and overrides.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the resulting bounds are invalid.
    pub fn active_profile(&self) -> Result<ComparisonProfile, ProfileError> {
        resolve_profile(&self.default_profile, &[&self.top_level_layer()])
    }

    fn top_level_layer(&self) -> ProfileConfig {
        ProfileConfig {
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            policy: self.policy,
            length_cutoff: Some(self.length_cutoff),
            ..ProfileConfig::default()
        }
    }

    /// Names of all built-in and configured profiles, sorted.
    #[must_use]
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_PROFILES
            .iter()
            .map(|(name, ..)| (*name).to_string())
            .chain(self.profile.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Every available profile, resolved the way `compare --profile <name>`
    /// would run it. Configured profiles replace built-ins of the same name;
    /// invalid configured profiles are skipped with a warning.
    #[must_use]
    pub fn all_profiles(&self) -> Vec<NamedProfile> {
        let file_layer = self
            .file_layer
            .clone()
            .unwrap_or_else(|| self.top_level_layer());

        self.profile_names()
            .into_iter()
            .filter_map(|name| {
                let configured = self.profile.get(&name);
                let resolved = match configured {
                    Some(overrides) => resolve_profile(&name, &[&file_layer, overrides]),
                    None => resolve_profile(&name, &[&file_layer]),
                };
                let profile = resolved
                    .map_err(|e| log::warn!("Skipping profile '{}': {}", name, e))
                    .ok()?;
                let description = match configured {
                    Some(_) => "From config file",
                    None => BUILTIN_PROFILES
                        .iter()
                        .find(|(n, ..)| *n == name)
                        .map_or("", |(.., description)| *description),
                };
                Some(NamedProfile {
                    name,
                    profile,
                    description: description.to_string(),
                    configured: configured.is_some(),
                })
            })
            .collect()
    }
}

/// The profile `name` runs with: its built-in bounds (strict for other
/// names) overlaid by `layers`, later layers winning.
fn resolve_profile(
    name: &str,
    layers: &[&ProfileConfig],
) -> Result<ComparisonProfile, ProfileError> {
    fn last_set<T>(
        layers: &[&ProfileConfig],
        field: impl Fn(&ProfileConfig) -> Option<T>,
    ) -> Option<T> {
        layers.iter().rev().find_map(|layer| field(*layer))
    }

    let base = builtin_profile(name).unwrap_or_default();
    let profile = ComparisonProfile::new(
        last_set(layers, |l| l.lower_bound).unwrap_or(base.lower_bound()),
        last_set(layers, |l| l.upper_bound).unwrap_or(base.upper_bound()),
    )?;
    let cutoff = last_set(layers, |l| l.length_cutoff)
        .map_or(base.length_cutoff(), |c| (c > 0).then_some(c));
    Ok(profile
        .with_policy(last_set(layers, |l| l.policy).unwrap_or(base.policy()))
        .with_length_cutoff(cutoff))
}

/// Closest candidate to `input`, if any is reasonably similar.
fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (c, strsim::jaro_winkler(input, c)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Warn about keys the configuration does not understand.
fn warn_unknown_keys(path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return;
    };

    for key in unknown_keys(&table) {
        let (scope, name, candidates): (&str, &str, &[&str]) = match key.split_once('.') {
            Some((profile, name)) => (profile, name, &PROFILE_KEYS[..]),
            None => ("", key.as_str(), &TOP_LEVEL_KEYS[..]),
        };
        let location = if scope.is_empty() {
            String::new()
        } else {
            format!(" in [profile.{scope}]")
        };
        match suggest(name, candidates.iter().copied()) {
            Some(s) => log::warn!(
                "Unknown config key '{}'{} (did you mean '{}'?)",
                name,
                location,
                s
            ),
            None => log::warn!("Unknown config key '{}'{}", name, location),
        }
    }
}

/// Unknown keys in a parsed config file. Keys inside a profile table are
/// returned as `<profile>.<key>`.
fn unknown_keys(table: &toml::Table) -> Vec<String> {
    let mut unknown = Vec::new();
    for (key, value) in table {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            unknown.push(key.clone());
            continue;
        }
        if key == "profile" {
            let Some(profiles) = value.as_table() else {
                continue;
            };
            for (profile, settings) in profiles {
                let Some(settings) = settings.as_table() else {
                    continue;
                };
                unknown.extend(
                    settings
                        .keys()
                        .filter(|k| !PROFILE_KEYS.contains(&k.as_str()))
                        .map(|k| format!("{profile}.{k}")),
                );
            }
        }
    }
    unknown
}
