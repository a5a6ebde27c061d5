use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand_distr::{Beta, Binomial, Normal};

use crate::stats::ClusterStats;

mod error;
pub use error::ModelError;

/// Number of Bernoulli trials per binomial and beta-binomial draw.
pub const BINOMIAL_TRIALS: u64 = 100;

/// Cap on rejection attempts per truncated-normal sample.
const MAX_TRUNCATION_ATTEMPTS: usize = 10_000;

/// The six bootstrap resampling strategies.
///
/// Each strategy shares one capability: draw one bootstrap mean given a
/// cluster's observations and estimated parameters (see [`ClusterSampler`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapModel {
    /// `boot_size` draws from Normal(mean, sd), averaged. Unbounded: means
    /// may fall outside [0, 1], and no clamping is performed.
    Normal,
    /// Normal(mean, sd) truncated to [0, 1], averaged.
    NormalTruncated,
    /// Beta(alpha, beta) with method-of-moments shapes, averaged.
    Beta,
    /// Binomial(n=100, p=mean) draws, averaged and rescaled by 1/100.
    Binomial,
    /// Two-stage compound draws: p ~ Beta(alpha, beta), then
    /// Binomial(n=100, p), per element.
    BetaBinomial,
    /// Resample `boot_size` raw VAF values with replacement, averaged.
    /// In weighted mode, each observation's resampling probability is
    /// proportional to its depth.
    NonParametric,
}

impl BootstrapModel {
    pub const NAMES: [&'static str; 6] = [
        "normal", "normal-truncated", "beta", "binomial", "beta-binomial", "non-parametric"
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal          => "normal",
            Self::NormalTruncated => "normal-truncated",
            Self::Beta            => "beta",
            Self::Binomial        => "binomial",
            Self::BetaBinomial    => "beta-binomial",
            Self::NonParametric   => "non-parametric",
        }
    }

    /// Instantiate a per-cluster sampler for this strategy.
    ///
    /// `depths` is only ever inspected by the non-parametric strategy and
    /// should be `Some` in weighted mode only.
    ///
    /// # Errors
    /// - `DegenerateCluster` if a beta-family strategy is requested and the
    ///   cluster's method-of-moments shape parameters are undefined.
    /// - `InvalidDistribution` if the underlying sampler rejects the
    ///   estimated parameters.
    pub fn sampler<'v>(
        &self,
        stats : &ClusterStats,
        vafs  : &'v [f64],
        depths: Option<&[u32]>,
    ) -> Result<ClusterSampler<'v>, ModelError> {
        let sampler = match self {
            Self::Normal          => ClusterSampler::Gaussian(new_normal(stats)?),
            Self::NormalTruncated => ClusterSampler::TruncatedGaussian{dist: new_normal(stats)?, mean: stats.mean, sd: stats.sd},
            Self::Beta            => {
                let (alpha, beta) = stats.shape_parameters()?;
                ClusterSampler::BetaMoments(new_beta(alpha, beta)?)
            },
            Self::Binomial        => ClusterSampler::BinomialDraws(new_binomial(stats.mean)?),
            Self::BetaBinomial    => {
                let (alpha, beta) = stats.shape_parameters()?;
                ClusterSampler::BetaBinomial(new_beta(alpha, beta)?)
            },
            Self::NonParametric   => ClusterSampler::non_parametric(vafs, depths)?,
        };
        Ok(sampler)
    }
}

impl FromStr for BootstrapModel {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "normal"           => Self::Normal,
            "normal-truncated" => Self::NormalTruncated,
            "beta"             => Self::Beta,
            "binomial"         => Self::Binomial,
            "beta-binomial"    => Self::BetaBinomial,
            "non-parametric"   => Self::NonParametric,
            unknown            => return Err(ModelError::UnknownModel(unknown.to_string())),
        })
    }
}

impl Display for BootstrapModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A ready-to-draw sampler for one (cluster, sample column) pair.
/// Construction validates the estimated parameters once; every subsequent
/// [`ClusterSampler::draw_mean`] call yields one bootstrap mean.
#[derive(Debug, Clone)]
pub enum ClusterSampler<'v> {
    Gaussian(Normal<f64>),
    TruncatedGaussian{dist: Normal<f64>, mean: f64, sd: f64},
    BetaMoments(Beta<f64>),
    BinomialDraws(Binomial),
    BetaBinomial(Beta<f64>),
    Empirical{vafs: &'v [f64], weights: Option<WeightedIndex<u32>>},
}

impl<'v> ClusterSampler<'v> {
    /// Build a with-replacement resampler over raw VAF values, optionally
    /// weighted by read depth.
    pub fn non_parametric(vafs: &'v [f64], depths: Option<&[u32]>) -> Result<Self, ModelError> {
        if vafs.is_empty() {
            return Err(ModelError::EmptyObservations)
        }
        let weights = match depths {
            Some(depths) => {
                let index = WeightedIndex::new(depths.iter().copied())
                    .map_err(|err| ModelError::InvalidDistribution{model: "non-parametric", msg: err.to_string()})?;
                Some(index)
            }
            None => None,
        };
        Ok(Self::Empirical{vafs, weights})
    }

    /// Draw one bootstrap mean: `boot_size` i.i.d. samples, averaged.
    pub fn draw_mean<R: Rng>(&self, rng: &mut R, boot_size: usize) -> Result<f64, ModelError> {
        let total: f64 = match self {
            Self::Gaussian(normal) => {
                (0..boot_size).map(|_| normal.sample(rng)).sum()
            }
            Self::TruncatedGaussian{dist, mean, sd} => {
                let mut total = 0.0;
                for _ in 0..boot_size {
                    total += sample_truncated(dist, *mean, *sd, rng)?;
                }
                total
            }
            Self::BetaMoments(beta) => {
                (0..boot_size).map(|_| beta.sample(rng)).sum()
            }
            Self::BinomialDraws(binomial) => {
                (0..boot_size).map(|_| binomial.sample(rng) as f64 / BINOMIAL_TRIALS as f64).sum()
            }
            Self::BetaBinomial(beta) => {
                let mut total = 0.0;
                for _ in 0..boot_size {
                    let p = beta.sample(rng);
                    total += new_binomial(p)?.sample(rng) as f64 / BINOMIAL_TRIALS as f64;
                }
                total
            }
            Self::Empirical{vafs, weights} => {
                match weights {
                    Some(weights) => (0..boot_size).map(|_| vafs[weights.sample(rng)]).sum(),
                    None          => (0..boot_size).map(|_| vafs[rng.gen_range(0..vafs.len())]).sum(),
                }
            }
        };
        Ok(total / boot_size as f64)
    }
}

/// Rejection-sample Normal(mean, sd) into [0, 1]. Zero-dispersion draws
/// collapse to the mean, provided it lies within the bounds.
fn sample_truncated<R: Rng>(dist: &Normal<f64>, mean: f64, sd: f64, rng: &mut R) -> Result<f64, ModelError> {
    if sd == 0.0 {
        return match (0.0..=1.0).contains(&mean) {
            true  => Ok(mean),
            false => Err(ModelError::TruncationOutOfBounds(mean)),
        }
    }
    for _ in 0..MAX_TRUNCATION_ATTEMPTS {
        let draw = dist.sample(rng);
        if (0.0..=1.0).contains(&draw) {
            return Ok(draw)
        }
    }
    Err(ModelError::TruncationExhausted(MAX_TRUNCATION_ATTEMPTS))
}

fn new_normal(stats: &ClusterStats) -> Result<Normal<f64>, ModelError> {
    Normal::new(stats.mean, stats.sd)
        .map_err(|err| ModelError::InvalidDistribution{model: "normal", msg: err.to_string()})
}

fn new_beta(alpha: f64, beta: f64) -> Result<Beta<f64>, ModelError> {
    Beta::new(alpha, beta)
        .map_err(|err| ModelError::InvalidDistribution{model: "beta", msg: err.to_string()})
}

fn new_binomial(p: f64) -> Result<Binomial, ModelError> {
    Binomial::new(BINOMIAL_TRIALS, p)
        .map_err(|err| ModelError::InvalidDistribution{model: "binomial", msg: err.to_string()})
}
