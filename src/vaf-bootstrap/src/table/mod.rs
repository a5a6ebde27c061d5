use indexmap::IndexMap;

mod error;
pub use error::TableError;

/// A validated variant observation table.
/// # Fields
/// - `clusters`: per-variant cluster labels (one entry per row).
/// - `vafs`    : VAF columns, keyed by sample name. Iteration order is the
///               order in which the caller declared the columns.
/// - `depths`  : optional read-depth columns. `depths[i]` is paired with
///               `vafs[i]` (same count and declaration order); name sets are
///               disjoint from the VAF columns.
///
/// All VAF values are proportions within [0, 1]; this is enforced on
/// construction and relied upon downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTable {
    clusters: Vec<String>,
    vafs    : IndexMap<String, Vec<f64>>,
    depths  : Option<IndexMap<String, Vec<u32>>>,
}

impl VariantTable {
    /// Validate and build a table from already-resolved columns.
    ///
    /// # Errors
    /// - `UnevenColumns` if any column's length differs from the cluster column's.
    /// - `DepthCountMismatch` if depth columns are provided, but their count
    ///   differs from the VAF column count.
    /// - `OverlappingColumns` if a column name is declared both as VAF and depth.
    /// - `VafOutOfRange` if any VAF value lies outside [0, 1].
    pub fn new(
        clusters: Vec<String>,
        vafs    : IndexMap<String, Vec<f64>>,
        depths  : Option<IndexMap<String, Vec<u32>>>,
    ) -> Result<Self, TableError> {
        let n_rows = clusters.len();
        for (name, column) in &vafs {
            if column.len() != n_rows {
                return Err(TableError::UnevenColumns{column: name.clone(), found: column.len(), expected: n_rows})
            }
            if let Some(&value) = column.iter().find(|v| !(0.0..=1.0).contains(*v)) {
                return Err(TableError::VafOutOfRange{column: name.clone(), value})
            }
        }

        if let Some(depths) = &depths {
            if depths.len() != vafs.len() {
                return Err(TableError::DepthCountMismatch{found: depths.len(), expected: vafs.len()})
            }
            for (name, column) in depths {
                if vafs.contains_key(name) {
                    return Err(TableError::OverlappingColumns(name.clone()))
                }
                if column.len() != n_rows {
                    return Err(TableError::UnevenColumns{column: name.clone(), found: column.len(), expected: n_rows})
                }
            }
        }
        Ok(Self{clusters, vafs, depths})
    }

    /// Number of variant observations (rows).
    pub fn n_variants(&self) -> usize {
        self.clusters.len()
    }

    /// Whether there is nothing to resample: no rows, or no VAF columns.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() || self.vafs.is_empty()
    }

    pub fn vaf_columns(&self) -> &IndexMap<String, Vec<f64>> {
        &self.vafs
    }

    pub fn depth_columns(&self) -> Option<&IndexMap<String, Vec<u32>>> {
        self.depths.as_ref()
    }

    /// Depth column paired with the `index`-th VAF column.
    pub fn depth_column(&self, index: usize) -> Option<&[u32]> {
        self.depths.as_ref()
            .and_then(|depths| depths.get_index(index))
            .map(|(_, column)| column.as_slice())
    }

    /// Partition row indices by cluster label, in first-encounter order.
    /// Every group is non-empty by construction.
    pub fn cluster_partition(&self) -> IndexMap<&str, Vec<usize>> {
        let mut partition: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (row, label) in self.clusters.iter().enumerate() {
            partition.entry(label.as_str()).or_default().push(row);
        }
        partition
    }
}
