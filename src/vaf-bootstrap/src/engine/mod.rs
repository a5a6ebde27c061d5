use indexmap::IndexMap;
use located_error::prelude::*;
use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::model::{BootstrapModel, ClusterSampler};
use crate::stats::ClusterStats;
use crate::table::VariantTable;

mod error;
pub use error::EngineError;

mod matrix;
pub use matrix::BootstrapMatrix;

/// Default number of bootstrap iterations.
pub const DEFAULT_NUM_BOOTS: usize = 1000;

/// Reserved sub-stream index for the zero-VAF background resampling.
const ZERO_POOL_STREAM: usize = usize::MAX;

/// User-facing resampling configuration.
/// # Fields
/// - `num_boots`  : number of bootstrap iterations per (sample, cluster) pair.
/// - `model`      : the selected resampling strategy.
/// - `weighted`   : whether estimation and non-parametric resampling are
///                  depth-weighted.
/// - `zero_sample`: optional caller-supplied zero-VAF background values. When
///                  set, it takes full precedence over the detected pool.
/// - `seed`       : base seed for the deterministic RNG sub-streams.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    pub num_boots  : usize,
    pub model      : BootstrapModel,
    pub weighted   : bool,
    pub zero_sample: Option<Vec<f64>>,
    pub seed       : u64,
}

impl BootstrapConfig {
    pub fn new(model: BootstrapModel) -> Self {
        Self{num_boots: DEFAULT_NUM_BOOTS, model, weighted: false, zero_sample: None, seed: 0}
    }
}

/// Final artifact of a resampling run: one bootstrap-mean matrix per sample
/// column (caller order), plus the optional zero-VAF background means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResamplingResult {
    matrices  : IndexMap<String, BootstrapMatrix>,
    zero_means: Option<Vec<f64>>,
}

impl ResamplingResult {
    /// Whether the run produced no matrices (no clusters or no sample columns).
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn matrices(&self) -> &IndexMap<String, BootstrapMatrix> {
        &self.matrices
    }

    pub fn matrix(&self, sample: &str) -> Option<&BootstrapMatrix> {
        self.matrices.get(sample)
    }

    /// The zero-VAF background bootstrap means, when a non-empty pool existed.
    pub fn zero_means(&self) -> Option<&[f64]> {
        self.zero_means.as_deref()
    }
}

/// Orchestrates the resampling pass over every (sample column × cluster)
/// pair of a validated [`VariantTable`].
///
/// Sample columns are processed in parallel; determinism is preserved by
/// deriving an independent RNG sub-stream per (sample, cluster) pair from
/// the base seed, so results are invariant to worker scheduling.
pub struct ResamplingEngine<'t> {
    table : &'t VariantTable,
    config: BootstrapConfig,
}

impl<'t> ResamplingEngine<'t> {
    /// Validate the configuration against the table before any resampling work.
    ///
    /// # Errors
    /// - `NullBootCount` if `num_boots` is 0.
    /// - `MissingDepths` if weighted mode is requested on a depth-less table.
    pub fn new(table: &'t VariantTable, config: BootstrapConfig) -> Result<Self, EngineError> {
        if config.num_boots == 0 {
            return Err(EngineError::NullBootCount)
        }
        if config.weighted && table.depth_columns().is_none() {
            return Err(EngineError::MissingDepths)
        }
        Ok(Self{table, config})
    }

    /// Run the full resampling pass and assemble the result.
    ///
    /// # Errors
    /// Aborts on the first degenerate cluster or sampler failure. No partial
    /// result is ever returned.
    pub fn run(&self) -> Result<ResamplingResult> {
        // ---- Boundary: zero clusters or zero sample columns => empty result.
        if self.table.is_empty() {
            info!("Nothing to resample: returning an empty result.");
            return Ok(ResamplingResult::default())
        }

        let partition = self.table.cluster_partition();
        info!(
            "Resampling {} cluster(s) across {} sample column(s) under the '{}' model ({} bootstrap iterations).",
            partition.len(), self.table.vaf_columns().len(), self.config.model, self.config.num_boots
        );

        // ---- Main pass: one bootstrap-mean matrix + one zero-pool
        //      contribution per sample column.
        let columns: Vec<(String, BootstrapMatrix, Vec<f64>)> = self.table.vaf_columns().iter()
            .enumerate()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(sample_idx, (sample, vaf_column))| {
                self.resample_sample_column(sample_idx, sample, vaf_column, &partition)
                    .with_loc(|| format!("While resampling sample column '{sample}'"))
            })
            .collect::<Result<_>>()?;

        // ---- Fold the per-column zero-pools into a single snapshot,
        //      in sample-column order.
        let mut result = ResamplingResult::default();
        let mut detected_pool = Vec::new();
        for (sample, matrix, zero_values) in columns {
            detected_pool.extend(zero_values);
            result.matrices.insert(sample, matrix);
        }

        // ---- A caller-supplied override discards the detected pool entirely.
        let pool: &[f64] = match &self.config.zero_sample {
            Some(overriding) => {
                debug!("Using the caller-supplied zero-VAF sample ({} value(s))", overriding.len());
                overriding
            }
            None => &detected_pool,
        };

        // ---- Background distribution: non-parametric resampling of the pool.
        if !pool.is_empty() {
            info!("Resampling the zero-VAF background pool ({} value(s)).", pool.len());
            result.zero_means = Some(self.resample_zero_pool(pool)
                .loc("While resampling the zero-VAF background pool")?);
        }
        Ok(result)
    }

    /// Fill one bootstrap-mean matrix: for every cluster of this sample
    /// column, estimate statistics, feed the zero-cluster detector, then draw
    /// `num_boots` bootstrap means from the selected strategy.
    fn resample_sample_column(
        &self,
        sample_idx: usize,
        sample    : &str,
        vaf_column: &[f64],
        partition : &IndexMap<&str, Vec<usize>>,
    ) -> Result<(String, BootstrapMatrix, Vec<f64>)> {
        let depth_column = match self.config.weighted {
            true  => self.table.depth_column(sample_idx),
            false => None,
        };

        let mut matrix    = BootstrapMatrix::with_capacity(partition.len());
        let mut zero_pool = Vec::new();
        for (cluster_idx, (label, rows)) in partition.iter().enumerate() {
            let vafs  : Vec<f64>         = rows.iter().map(|&row| vaf_column[row]).collect();
            let depths: Option<Vec<u32>> = depth_column.map(|column| rows.iter().map(|&row| column[row]).collect());

            // ---- (1) Estimate cluster statistics.
            let stats = match &depths {
                Some(depths) => ClusterStats::weighted(&vafs, depths),
                None         => ClusterStats::unweighted(&vafs),
            }.with_loc(|| format!("While estimating the statistics of cluster '{label}'"))?;
            trace!("[{sample}][{label}] mean: {:<9.6} sd: {:<9.6}", stats.mean, stats.sd);

            // ---- (2) Feed the zero-cluster detector.
            if median(&vafs) == 0.0 {
                debug!("[{sample}][{label}] zero-median cluster: pooling {} value(s) into the background", vafs.len());
                zero_pool.extend_from_slice(&vafs);
            }

            // ---- (3) Draw `num_boots` bootstrap means into this cluster's column.
            let sampler = self.config.model.sampler(&stats, &vafs, depths.as_deref())
                .with_loc(|| format!("While building the '{}' sampler for cluster '{label}'", self.config.model))?;
            let mut rng = StdRng::seed_from_u64(derive_seed(self.config.seed, sample_idx, cluster_idx));
            let column  = (0..self.config.num_boots)
                .map(|_| sampler.draw_mean(&mut rng, vafs.len()))
                .collect::<Result<Vec<f64>, _>>()
                .with_loc(|| format!("While drawing bootstrap means for cluster '{label}'"))?;
            matrix.push_column((*label).to_string(), column);
        }
        Ok((sample.to_string(), matrix, zero_pool))
    }

    /// Non-parametric, unweighted resampling of the zero-VAF pool, with
    /// `boot_size` = pool size.
    fn resample_zero_pool(&self, pool: &[f64]) -> Result<Vec<f64>, crate::model::ModelError> {
        let sampler = ClusterSampler::non_parametric(pool, None)?;
        let mut rng = StdRng::seed_from_u64(derive_seed(self.config.seed, ZERO_POOL_STREAM, ZERO_POOL_STREAM));
        (0..self.config.num_boots)
            .map(|_| sampler.draw_mean(&mut rng, pool.len()))
            .collect()
    }
}

/// Derive a deterministic per-(sample, cluster) RNG sub-stream seed.
fn derive_seed(base: u64, sample_idx: usize, cluster_idx: usize) -> u64 {
    base ^ (sample_idx as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
         ^ (cluster_idx as u64).wrapping_add(1).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

/// Median of an unsorted slice. Even-sized inputs take the midpoint of the
/// two central values.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    match n % 2 {
        0 => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
        _ => sorted[n / 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_table(clusters: &[&str], columns: &[(&str, &[f64])]) -> VariantTable {
        VariantTable::new(
            clusters.iter().map(ToString::to_string).collect(),
            columns.iter().map(|(name, values)| (name.to_string(), values.to_vec())).collect(),
            None,
        ).expect("valid mock table")
    }

    fn config(model: BootstrapModel) -> BootstrapConfig {
        BootstrapConfig{seed: 87, ..BootstrapConfig::new(model)}
    }

    #[test]
    fn non_parametric_two_cluster_scenario() -> Result<()> {
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.10, 0.12, 0.11, 0.50, 0.48, 0.52])],
        );
        let result = ResamplingEngine::new(&table, config(BootstrapModel::NonParametric))?.run()?;

        let matrix = result.matrix("s1").expect("missing 's1' matrix");
        assert_eq!((matrix.num_boots(), matrix.num_clusters()), (1000, 2));
        assert_eq!(matrix.labels(), ["A".to_string(), "B".to_string()]);

        for (label, low, high, center) in [("A", 0.10, 0.12, 0.11), ("B", 0.48, 0.52, 0.50)] {
            let column = matrix.column(label).unwrap();
            assert!(column.iter().all(|mean| (low..=high).contains(mean)));
            let average = column.iter().sum::<f64>() / column.len() as f64;
            assert!((average - center).abs() < 0.01, "column '{label}' average strayed: {average}");
        }
        // No cluster has a zero median.
        assert_eq!(result.zero_means(), None);
        Ok(())
    }

    #[test]
    fn every_cell_is_finite_after_a_successful_run() -> Result<()> {
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.10, 0.12, 0.11, 0.50, 0.48, 0.52]), ("s2", &[0.20, 0.22, 0.21, 0.30, 0.28, 0.32])],
        );
        for model in [BootstrapModel::Normal, BootstrapModel::NormalTruncated, BootstrapModel::Binomial, BootstrapModel::NonParametric] {
            let result = ResamplingEngine::new(&table, config(model))?.run()?;
            for (sample, matrix) in result.matrices() {
                assert_eq!((matrix.num_boots(), matrix.num_clusters()), (1000, 2), "[{model}][{sample}]");
                for cluster in 0..matrix.num_clusters() {
                    for boot in 0..matrix.num_boots() {
                        assert!(matrix.get(boot, cluster).unwrap().is_finite(), "[{model}][{sample}]");
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn zero_median_clusters_feed_the_background_pool() -> Result<()> {
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.0, 0.0, 0.0, 0.50, 0.48, 0.52])],
        );
        let result = ResamplingEngine::new(&table, config(BootstrapModel::NonParametric))?.run()?;

        // The pool only holds A's values (all 0.0) => every background mean is 0.0.
        let zero_means = result.zero_means().expect("missing zero-VAF background");
        assert_eq!(zero_means.len(), 1000);
        assert!(zero_means.iter().all(|&mean| mean == 0.0));
        Ok(())
    }

    #[test]
    fn zero_sample_override_takes_full_precedence() -> Result<()> {
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.0, 0.0, 0.0, 0.50, 0.48, 0.52])],
        );
        let mut cfg = config(BootstrapModel::NonParametric);
        cfg.zero_sample = Some(vec![0.33; 4]);
        let result = ResamplingEngine::new(&table, cfg)?.run()?;

        // Cluster A's detected zeroes must never leak into the background means.
        let zero_means = result.zero_means().expect("missing zero-VAF background");
        assert!(zero_means.iter().all(|&mean| mean == 0.33));
        Ok(())
    }

    #[test]
    fn empty_table_yields_an_empty_result() -> Result<()> {
        let table  = mock_table(&[], &[("s1", &[])]);
        let result = ResamplingEngine::new(&table, config(BootstrapModel::Normal))?.run()?;
        assert!(result.is_empty());
        assert_eq!(result.zero_means(), None);
        Ok(())
    }

    #[test]
    fn equal_seeds_reproduce_equal_results() -> Result<()> {
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.10, 0.12, 0.11, 0.50, 0.48, 0.52])],
        );
        let run = |seed: u64| -> Result<ResamplingResult> {
            let cfg = BootstrapConfig{seed, ..BootstrapConfig::new(BootstrapModel::Normal)};
            ResamplingEngine::new(&table, cfg)?.run()
        };
        assert_eq!(run(42)?, run(42)?);
        assert_ne!(run(42)?, run(43)?);
        Ok(())
    }

    #[test]
    fn null_boot_count_is_rejected() {
        let table   = mock_table(&["A", "A"], &[("s1", &[0.1, 0.2])]);
        let mut cfg = config(BootstrapModel::Normal);
        cfg.num_boots = 0;
        let result = ResamplingEngine::new(&table, cfg);
        assert!(matches!(result, Err(EngineError::NullBootCount)));
    }

    #[test]
    fn weighted_mode_requires_depth_columns() {
        let table   = mock_table(&["A", "A"], &[("s1", &[0.1, 0.2])]);
        let mut cfg = config(BootstrapModel::NonParametric);
        cfg.weighted = true;
        let result = ResamplingEngine::new(&table, cfg);
        assert!(matches!(result, Err(EngineError::MissingDepths)));
    }

    #[test]
    fn degenerate_cluster_aborts_the_whole_run() {
        // Cluster A is constant: beta-family shapes are undefined.
        let table = mock_table(
            &["A", "A", "A", "B", "B", "B"],
            &[("s1", &[0.3, 0.3, 0.3, 0.50, 0.48, 0.52])],
        );
        let result = ResamplingEngine::new(&table, config(BootstrapModel::Beta))
            .expect("valid configuration")
            .run();
        assert!(result.is_err());
    }

    #[test]
    fn median_midpoint_rule() {
        assert_eq!(median(&[0.3, 0.1, 0.2]), 0.2);
        assert_eq!(median(&[0.4, 0.1, 0.2, 0.3]), 0.25);
        // A single positive value in the upper half keeps a cluster out of the pool.
        assert_ne!(median(&[0.0, 0.0, 0.1, 0.2]), 0.0);
        assert_eq!(median(&[0.0, 0.0, 0.0, 0.2]), 0.0);
    }
}
