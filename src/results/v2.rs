use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::{IceSheet, Resolution, classify};
use crate::dataset::SlcDataset;

use super::{LoadError, discover_nc_files, file_name_of};

/// Files bucketed by resolution, then ice sheet. The v2 pipeline writes
/// everything into one flat directory, so there is no stage axis.
pub type V2Groups = BTreeMap<Resolution, BTreeMap<IceSheet, Vec<PathBuf>>>;

/// Result set of a v2 pipeline run: all files named
/// `<results_dir>/<pipeline_id>*.nc`, grouped by (resolution, ice sheet)
/// and loaded eagerly at construction.
#[derive(Debug)]
pub struct V2Results {
    module: String,
    scenario: String,
    results_dir: PathBuf,
    pipeline_id: String,
    ice_sheets: Vec<IceSheet>,
    grouped: V2Groups,
    datasets: BTreeMap<(Resolution, IceSheet), SlcDataset>,
}

impl V2Results {
    /// Builds a result set with the default module ("bamber19"), scenario
    /// ("ssp585"), and ice sheet list (all four).
    pub fn new(results_dir: &Path, pipeline_id: &str) -> Result<Self, LoadError> {
        Self::with_options(
            results_dir,
            pipeline_id,
            "bamber19",
            "ssp585",
            IceSheet::SHEETS.to_vec(),
        )
    }

    pub fn with_options(
        results_dir: &Path,
        pipeline_id: &str,
        module: &str,
        scenario: &str,
        ice_sheets: Vec<IceSheet>,
    ) -> Result<Self, LoadError> {
        let files = discover_nc_files(results_dir, pipeline_id)?;
        let grouped = group_result_files(&files);
        let datasets = materialize(&grouped, &ice_sheets)?;

        Ok(V2Results {
            module: module.to_string(),
            scenario: scenario.to_string(),
            results_dir: results_dir.to_path_buf(),
            pipeline_id: pipeline_id.to_string(),
            ice_sheets,
            grouped,
            datasets,
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn ice_sheets(&self) -> &[IceSheet] {
        &self.ice_sheets
    }

    pub fn grouped_files(&self) -> &V2Groups {
        &self.grouped
    }

    /// Loaded array for a combination, or None if no file matched it.
    pub fn dataset(&self, resolution: Resolution, ice_sheet: IceSheet) -> Option<&SlcDataset> {
        self.datasets.get(&(resolution, ice_sheet))
    }
}

fn group_result_files(files: &[PathBuf]) -> V2Groups {
    let mut grouped = V2Groups::new();

    for file in files {
        let (_, resolution, ice_sheet) = classify(&file_name_of(file));
        grouped
            .entry(resolution)
            .or_default()
            .entry(ice_sheet)
            .or_default()
            .push(file.clone());
    }

    grouped
}

fn materialize(
    grouped: &V2Groups,
    ice_sheets: &[IceSheet],
) -> Result<BTreeMap<(Resolution, IceSheet), SlcDataset>, LoadError> {
    let mut datasets = BTreeMap::new();

    for resolution in Resolution::KNOWN {
        for &ice_sheet in ice_sheets {
            let files = grouped
                .get(&resolution)
                .and_then(|by_sheet| by_sheet.get(&ice_sheet));

            let Some(files) = files else { continue };
            let Some(first) = files.first() else { continue };

            if files.len() > 1 {
                eprintln!(
                    "Warning: {} files found for {}/{}, using {}",
                    files.len(),
                    resolution,
                    ice_sheet,
                    first.display()
                );
            }

            let ds = SlcDataset::open(first)?;
            datasets.insert((resolution, ice_sheet), ds);
        }
    }

    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SEA_LEVEL_VAR;
    use tempfile::tempdir;

    fn write_nc(path: &Path, values: &[f64]) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("samples", values.len()).unwrap();
        let mut var = file
            .add_variable::<f64>(SEA_LEVEL_VAR, &["samples"])
            .unwrap();
        var.put_values(values, ..).unwrap();
    }

    #[test]
    fn test_only_pipeline_prefixed_files_are_loaded() {
        let dir = tempdir().unwrap();
        write_nc(&dir.path().join("run1_global_AIS.nc"), &[1.0, 2.0]);
        write_nc(&dir.path().join("run2_global_AIS.nc"), &[9.0, 9.0]);

        let results = V2Results::new(dir.path(), "run1").unwrap();

        let ds = results.dataset(Resolution::Global, IceSheet::Ais).unwrap();
        assert_eq!(file_name_of(&ds.source_file), "run1_global_AIS.nc");
        assert_eq!(ds.values, vec![1.0, 2.0]);
        assert!(
            results
                .dataset(Resolution::Local, IceSheet::Ais)
                .is_none()
        );
    }

    #[test]
    fn test_materializes_per_resolution_and_sheet() {
        let dir = tempdir().unwrap();
        write_nc(&dir.path().join("run1_global_GIS.nc"), &[1.0]);
        write_nc(&dir.path().join("run1_local_GIS.nc"), &[2.0]);
        write_nc(&dir.path().join("run1_global_WAIS.nc"), &[3.0]);

        let results = V2Results::new(dir.path(), "run1").unwrap();

        assert!(results.dataset(Resolution::Global, IceSheet::Gis).is_some());
        assert!(results.dataset(Resolution::Local, IceSheet::Gis).is_some());
        assert!(
            results
                .dataset(Resolution::Global, IceSheet::Wais)
                .is_some()
        );
        assert!(
            results
                .dataset(Resolution::Local, IceSheet::Wais)
                .is_none()
        );
    }

    #[test]
    fn test_ice_sheet_list_limits_materialization() {
        let dir = tempdir().unwrap();
        write_nc(&dir.path().join("run1_global_AIS.nc"), &[1.0]);
        write_nc(&dir.path().join("run1_global_GIS.nc"), &[2.0]);

        let results = V2Results::with_options(
            dir.path(),
            "run1",
            "bamber19",
            "ssp585",
            vec![IceSheet::Gis],
        )
        .unwrap();

        assert!(results.dataset(Resolution::Global, IceSheet::Gis).is_some());
        assert!(
            results
                .dataset(Resolution::Global, IceSheet::Ais)
                .is_none()
        );
        // the AIS file is still grouped, just never loaded
        let ais_bucket = results
            .grouped_files()
            .get(&Resolution::Global)
            .and_then(|g| g.get(&IceSheet::Ais));
        assert!(ais_bucket.is_some_and(|files| files.len() == 1));
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let results = V2Results::new(dir.path(), "run1").unwrap();

        assert_eq!(results.module(), "bamber19");
        assert_eq!(results.scenario(), "ssp585");
        assert_eq!(results.pipeline_id(), "run1");
        assert_eq!(results.ice_sheets(), &IceSheet::SHEETS[..]);
    }
}
