use std::fmt;
use std::path::{Path, PathBuf};

/// Variable every pipeline result file is expected to carry.
pub const SEA_LEVEL_VAR: &str = "sea_level_change";

#[derive(Debug)]
pub enum ReadError {
    NetCdf(netcdf::Error),
    MissingVariable { file: PathBuf, variable: String },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NetCdf(e) => write!(f, "NetCDF error: {}", e),
            ReadError::MissingVariable { file, variable } => write!(
                f,
                "Variable '{}' not found in {}",
                variable,
                file.display()
            ),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<netcdf::Error> for ReadError {
    fn from(err: netcdf::Error) -> ReadError {
        ReadError::NetCdf(err)
    }
}

/// In-memory copy of one result file's sea level change variable.
///
/// `source_file` is stamped at load time and lives only in memory; nothing
/// is ever written back to the file.
#[derive(Debug, Clone)]
pub struct SlcDataset {
    pub values: Vec<f64>,
    pub shape: Vec<usize>,
    pub dims: Vec<String>,
    pub source_file: PathBuf,
}

impl SlcDataset {
    /// Reads the sea level change variable from a NetCDF file. The file
    /// handle is opened, fully read, and dropped before this returns.
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        let file = netcdf::open(path)?;
        let var = file
            .variable(SEA_LEVEL_VAR)
            .ok_or_else(|| ReadError::MissingVariable {
                file: path.to_path_buf(),
                variable: SEA_LEVEL_VAR.to_string(),
            })?;

        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values = var.get_values::<f64, _>(..)?;

        Ok(SlcDataset {
            values,
            shape,
            dims,
            source_file: path.to_path_buf(),
        })
    }
}

impl fmt::Display for SlcDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_value = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .min_by(|a, b| a.partial_cmp(b).unwrap())
            .unwrap_or(&f64::NAN);

        let max_value = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .max_by(|a, b| a.partial_cmp(b).unwrap())
            .unwrap_or(&f64::NAN);

        write!(
            f,
            "shape {:?} ({}), min {}, max {}, from {}",
            self.shape,
            self.dims.join(" x "),
            min_value,
            max_value,
            self.source_file.display()
        )
    }
}

/// Exact element-wise equality over shape and values only. Attached
/// metadata (dimension names, source file) is deliberately ignored, and
/// NaN never equals NaN.
pub fn data_equal(a: &SlcDataset, b: &SlcDataset) -> bool {
    a.shape == b.shape && a.values == b.values
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_nc(path: &Path, dim: (&str, usize), values: &[f64]) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension(dim.0, dim.1).unwrap();
        let mut var = file
            .add_variable::<f64>(SEA_LEVEL_VAR, &[dim.0])
            .unwrap();
        var.put_values(values, ..).unwrap();
    }

    #[test]
    fn test_open_reads_values_shape_and_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed_global_AIS.nc");
        write_nc(&path, ("samples", 4), &[1.0, 2.5, -3.0, 0.0]);

        let ds = SlcDataset::open(&path).unwrap();

        assert_eq!(ds.values, vec![1.0, 2.5, -3.0, 0.0]);
        assert_eq!(ds.shape, vec![4]);
        assert_eq!(ds.dims, vec!["samples".to_string()]);
        assert_eq!(ds.source_file, path);
    }

    #[test]
    fn test_display_summarizes_the_dataset() {
        let ds = SlcDataset {
            values: vec![1.0, f64::NAN, -2.0],
            shape: vec![3],
            dims: vec!["samples".to_string()],
            source_file: PathBuf::from("processed_global_AIS.nc"),
        };

        let summary = ds.to_string();
        assert_eq!(
            summary,
            "shape [3] (samples), min -2, max 1, from processed_global_AIS.nc"
        );
    }

    #[test]
    fn test_open_fails_without_sea_level_variable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.nc");
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("samples", 2).unwrap();
        drop(file);

        let err = SlcDataset::open(&path).unwrap_err();
        assert!(matches!(err, ReadError::MissingVariable { .. }));
    }

    #[test]
    fn test_data_equal_ignores_metadata() {
        let dir = tempdir().unwrap();
        let a_path = dir.path().join("a.nc");
        let b_path = dir.path().join("b.nc");
        write_nc(&a_path, ("samples", 3), &[1.0, 2.0, 3.0]);
        write_nc(&b_path, ("locations", 3), &[1.0, 2.0, 3.0]);

        let a = SlcDataset::open(&a_path).unwrap();
        let b = SlcDataset::open(&b_path).unwrap();

        assert_ne!(a.dims, b.dims);
        assert_ne!(a.source_file, b.source_file);
        assert!(data_equal(&a, &b));
    }

    #[test]
    fn test_data_equal_rejects_differing_values_or_shape() {
        let base = SlcDataset {
            values: vec![1.0, 2.0],
            shape: vec![2],
            dims: vec!["samples".to_string()],
            source_file: PathBuf::from("a.nc"),
        };

        let mut other = base.clone();
        other.values[1] = 2.0001;
        assert!(!data_equal(&base, &other));

        let mut reshaped = base.clone();
        reshaped.shape = vec![1, 2];
        assert!(!data_equal(&base, &reshaped));
    }

    #[test]
    fn test_data_equal_treats_nan_as_unequal() {
        let a = SlcDataset {
            values: vec![f64::NAN],
            shape: vec![1],
            dims: vec!["samples".to_string()],
            source_file: PathBuf::from("a.nc"),
        };
        assert!(!data_equal(&a, &a.clone()));
    }
}
