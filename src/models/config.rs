use super::fitness::{BlindSpotThresholds, CoveragePenalties};
use super::grid::GridSpec;
use serde::{Deserialize, Serialize};

/// A configuration value that cannot drive a search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("NonPositive: {parameter} must be greater than 0, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },
    #[error("Negative: {parameter} must not be negative, got {value}")]
    Negative { parameter: &'static str, value: f64 },
    #[error("OutOfRange: {parameter} must be between {min} and {max}, got {value}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error(
        "EliteCountTooLarge: elite_count={elite_count} exceeds population_size={population_size}"
    )]
    EliteCountTooLarge {
        elite_count: usize,
        population_size: usize,
    },
}

impl ConfigError {
    /// Name of the offending parameter, dotted for nested settings.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::NonPositive { parameter, .. }
            | Self::Negative { parameter, .. }
            | Self::OutOfRange { parameter, .. } => parameter,
            Self::EliteCountTooLarge { .. } => "elite_count",
        }
    }

    // NaN fails every comparison, so it is rejected by each check below.

    pub(crate) fn positive(parameter: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::NonPositive { parameter, value })
        }
    }

    pub(crate) fn non_negative(parameter: &'static str, value: f64) -> Result<(), Self> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { parameter, value })
        }
    }

    pub(crate) fn probability(parameter: &'static str, value: f64) -> Result<(), Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                parameter,
                value,
                min: 0.0,
                max: 1.0,
            })
        }
    }
}

/// Gaussian mutation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationSettings {
    /// Chance that a point is perturbed (both coordinates at once).
    pub probability: f64,
    /// Standard deviation of the latitude step, in degrees.
    pub sigma_lat_deg: f64,
    /// Standard deviation of the longitude step, in degrees.
    pub sigma_lon_deg: f64,
}

impl Default for MutationSettings {
    fn default() -> Self {
        Self::new(0.25, 0.0007)
    }
}

impl MutationSettings {
    /// Same standard deviation on both axes.
    pub fn new(probability: f64, sigma_deg: f64) -> Self {
        Self {
            probability,
            sigma_lat_deg: sigma_deg,
            sigma_lon_deg: sigma_deg,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::probability("mutation.probability", self.probability)?;
        ConfigError::non_negative("mutation.sigma_lat_deg", self.sigma_lat_deg)?;
        ConfigError::non_negative("mutation.sigma_lon_deg", self.sigma_lon_deg)?;
        Ok(())
    }
}

fn validate_population(
    population_size: usize,
    generations: usize,
    elite_count: usize,
    tournament_size: usize,
) -> Result<(), ConfigError> {
    ConfigError::positive("population_size", population_size as f64)?;
    ConfigError::positive("generations", generations as f64)?;
    ConfigError::positive("tournament_size", tournament_size as f64)?;
    if elite_count > population_size {
        return Err(ConfigError::EliteCountTooLarge {
            elite_count,
            population_size,
        });
    }
    Ok(())
}

/// Settings for the blind-spot search.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use coverage_ga::models::BlindSpotConfig;
///
/// let config: BlindSpotConfig = serde_json::from_str(r#"{"result_count": 3}"#)?;
/// assert_eq!(config.result_count, 3);
/// assert_eq!(config.population_size, 120);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlindSpotConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Maximum number of blind spots returned.
    pub result_count: usize,
    /// Preferred minimum distance between returned blind spots, in meters.
    pub min_separation_m: f64,
    pub thresholds: BlindSpotThresholds,
    /// Individuals carried over unchanged each generation (at least one always is).
    pub elite_count: usize,
    pub tournament_size: usize,
    pub blend_alpha: f64,
    /// Fraction of the camera bounding box added on each side of the search area.
    pub margin_fraction: f64,
    pub mutation: MutationSettings,
}

impl Default for BlindSpotConfig {
    fn default() -> Self {
        Self {
            population_size: 120,
            generations: 90,
            result_count: 10,
            min_separation_m: 180.0,
            thresholds: BlindSpotThresholds::default(),
            elite_count: 4,
            tournament_size: 4,
            blend_alpha: 0.5,
            margin_fraction: 0.15,
            mutation: MutationSettings::new(0.25, 0.0007),
        }
    }
}

impl BlindSpotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_population(
            self.population_size,
            self.generations,
            self.elite_count,
            self.tournament_size,
        )?;
        ConfigError::non_negative("min_separation_m", self.min_separation_m)?;
        ConfigError::non_negative("blend_alpha", self.blend_alpha)?;
        ConfigError::non_negative("margin_fraction", self.margin_fraction)?;
        self.thresholds.validate()?;
        self.mutation.validate()?;
        Ok(())
    }
}

/// Settings for the coverage improvement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Number of cameras to place; every individual carries exactly this many.
    pub new_camera_count: usize,
    pub coverage_radius_m: f64,
    pub grid: GridSpec,
    pub population_size: usize,
    pub generations: usize,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub blend_alpha: f64,
    pub margin_fraction: f64,
    pub penalties: CoveragePenalties,
    /// Chance that an initial individual starts from the seed points.
    pub seed_probability: f64,
    pub mutation: MutationSettings,
    /// Iteration budget of the spacing repair step.
    pub repair_iterations: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            new_camera_count: 5,
            coverage_radius_m: 120.0,
            grid: GridSpec::default(),
            population_size: 80,
            generations: 80,
            elite_count: 3,
            tournament_size: 4,
            blend_alpha: 0.5,
            margin_fraction: 0.12,
            penalties: CoveragePenalties::default(),
            seed_probability: 0.60,
            mutation: MutationSettings::new(0.35, 0.0007),
            repair_iterations: 35,
        }
    }
}

impl CoverageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("new_camera_count", self.new_camera_count as f64)?;
        ConfigError::non_negative("coverage_radius_m", self.coverage_radius_m)?;
        validate_population(
            self.population_size,
            self.generations,
            self.elite_count,
            self.tournament_size,
        )?;
        ConfigError::non_negative("blend_alpha", self.blend_alpha)?;
        ConfigError::non_negative("margin_fraction", self.margin_fraction)?;
        ConfigError::probability("seed_probability", self.seed_probability)?;
        self.grid.validate()?;
        self.penalties.validate()?;
        self.mutation.validate()?;
        Ok(())
    }
}
