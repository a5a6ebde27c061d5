mod error;
pub use error::StatsError;

/// Central tendency and dispersion of one cluster's VAF values, for one
/// sample column. Obtained through [`ClusterStats::unweighted`] or
/// [`ClusterStats::weighted`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStats {
    pub mean: f64,
    pub sd  : f64,
}

impl ClusterStats {
    /// Arithmetic mean + sample standard deviation (n-1 denominator).
    ///
    /// # Errors
    /// `NonFiniteDispersion` when the sample sd is undefined (single-member cluster).
    pub fn unweighted(vafs: &[f64]) -> Result<Self, StatsError> {
        let n    = vafs.len() as f64;
        let mean = vafs.iter().sum::<f64>() / n;
        let sd   = (vafs.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
        Self::checked(mean, sd)
    }

    /// Depth-weighted mean and standard deviation.
    ///
    /// mean = Σdv / Σd
    /// sd   = sqrt( [Σd / ((Σd)² - Σd²)] · Σd(v - mean)² )
    ///
    /// The variance estimator corrects for unequal weights, and reduces to
    /// the unweighted formula when all depths are equal.
    ///
    /// # Errors
    /// - `NullDepthSum` when the cluster's depths sum to zero.
    /// - `NonFiniteDispersion` when the corrected sd is undefined
    ///   (single-member cluster).
    pub fn weighted(vafs: &[f64], depths: &[u32]) -> Result<Self, StatsError> {
        let depth_sum: f64 = depths.iter().map(|&d| f64::from(d)).sum();
        if depth_sum == 0.0 {
            return Err(StatsError::NullDepthSum)
        }
        let mean = vafs.iter().zip(depths).map(|(v, &d)| v * f64::from(d)).sum::<f64>() / depth_sum;

        let depth_sq_sum: f64 = depths.iter().map(|&d| f64::from(d).powi(2)).sum();
        let correction       = depth_sum / (depth_sum.powi(2) - depth_sq_sum);
        let deviation        = vafs.iter().zip(depths).map(|(v, &d)| f64::from(d) * (v - mean).powi(2)).sum::<f64>();
        Self::checked(mean, (correction * deviation).sqrt())
    }

    fn checked(mean: f64, sd: f64) -> Result<Self, StatsError> {
        if !sd.is_finite() {
            return Err(StatsError::NonFiniteDispersion{mean, sd})
        }
        Ok(Self{mean, sd})
    }

    /// Method-of-moments Beta shape parameters (alpha, beta):
    ///
    /// alpha = mean · ((mean - mean²) / variance - 1)
    /// beta  = (1 - mean) · ((mean - mean²) / variance - 1)
    ///
    /// # Errors
    /// `DegenerateShape` when the mean/variance combination yields
    /// non-positive or non-finite shape parameters (e.g. a null variance, or
    /// variance ≥ mean·(1-mean)).
    pub fn shape_parameters(&self) -> Result<(f64, f64), StatsError> {
        let variance = self.sd * self.sd;
        let common   = (self.mean - self.mean.powi(2)) / variance - 1.0;
        let (alpha, beta) = (self.mean * common, (1.0 - self.mean) * common);
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return Err(StatsError::DegenerateShape{alpha, beta})
        }
        Ok((alpha, beta))
    }
}
