use std::fmt::{self, Display, Formatter};

/// Bootstrap-mean matrix for one sample column.
///
/// Rows are bootstrap iterations (1..=num_boots), columns are cluster labels
/// in first-encounter order. Storage is column-major: `columns[c][b]` holds
/// the mean of bootstrap iteration `b` for cluster `c`. Immutable once
/// filled by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapMatrix {
    labels : Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl BootstrapMatrix {
    pub(crate) fn with_capacity(n_clusters: usize) -> Self {
        Self{labels: Vec::with_capacity(n_clusters), columns: Vec::with_capacity(n_clusters)}
    }

    pub(crate) fn push_column(&mut self, label: String, column: Vec<f64>) {
        self.labels.push(label);
        self.columns.push(column);
    }

    /// Cluster labels, in column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_boots(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn num_clusters(&self) -> usize {
        self.labels.len()
    }

    /// The bootstrap-mean column of a given cluster label.
    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.labels.iter()
            .position(|l| l == label)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Cell lookup by (bootstrap iteration index, cluster column index).
    pub fn get(&self, boot: usize, cluster: usize) -> Option<f64> {
        self.columns.get(cluster).and_then(|column| column.get(boot)).copied()
    }
}

impl Display for BootstrapMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.labels.join("\t"))?;
        for boot in 0..self.num_boots() {
            let row: Vec<String> = self.columns.iter().map(|column| column[boot].to_string()).collect();
            writeln!(f, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_matrix() -> BootstrapMatrix {
        let mut matrix = BootstrapMatrix::with_capacity(2);
        matrix.push_column("c1".to_string(), vec![0.1, 0.2]);
        matrix.push_column("c2".to_string(), vec![0.5, 0.6]);
        matrix
    }

    #[test]
    fn dimensions_and_lookup() {
        let matrix = mock_matrix();
        assert_eq!((matrix.num_boots(), matrix.num_clusters()), (2, 2));
        assert_eq!(matrix.column("c2"), Some(&[0.5, 0.6][..]));
        assert_eq!(matrix.column("c3"), None);
        assert_eq!(matrix.get(1, 0), Some(0.2));
        assert_eq!(matrix.get(2, 0), None);
    }

    #[test]
    fn display_is_row_major_with_header() {
        let expect = "c1\tc2\n0.1\t0.5\n0.2\t0.6\n";
        assert_eq!(mock_matrix().to_string(), expect);
    }
}
