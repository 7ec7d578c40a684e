use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::{IceSheet, Resolution, Stage, classify};
use crate::dataset::SlcDataset;

use super::{LoadError, discover_nc_files, file_name_of};

/// Files bucketed by stage, then resolution, then ice sheet. Inner levels
/// are default-constructed on first access; discovery order is preserved
/// within a bucket.
pub type V1Groups = BTreeMap<Stage, BTreeMap<Resolution, BTreeMap<IceSheet, Vec<PathBuf>>>>;

/// Result set of a v1 pipeline run, discovered under the experiments tree
/// convention `<gen_dir>/experiments/<module>.<scenario>/<dir_name>/*.nc`.
///
/// All present combinations of {raw, processed} x {local, global} x the
/// four ice sheets are loaded eagerly at construction; combinations with
/// no file are simply absent. Unknown buckets are grouped but never
/// loaded.
#[derive(Debug)]
pub struct V1Results {
    module: String,
    scenario: String,
    grouped: V1Groups,
    datasets: BTreeMap<(Stage, Resolution, IceSheet), SlcDataset>,
}

impl V1Results {
    pub fn new(
        module: &str,
        scenario: &str,
        gen_dir: &Path,
        dir_name: &str,
    ) -> Result<Self, LoadError> {
        let experiment_name = format!("{}.{}", module, scenario);
        let output_dir = gen_dir
            .join("experiments")
            .join(experiment_name)
            .join(dir_name);

        let files = discover_nc_files(&output_dir, "")?;
        let grouped = group_result_files(&files);
        let datasets = materialize(&grouped)?;

        Ok(V1Results {
            module: module.to_string(),
            scenario: scenario.to_string(),
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

    pub fn grouped_files(&self) -> &V1Groups {
        &self.grouped
    }

    /// Loaded array for a combination, or None if no file matched it.
    pub fn dataset(
        &self,
        stage: Stage,
        resolution: Resolution,
        ice_sheet: IceSheet,
    ) -> Option<&SlcDataset> {
        self.datasets.get(&(stage, resolution, ice_sheet))
    }

    /// Shorthand for the processed variant, the one the comparator and
    /// plotter consume.
    pub fn processed(&self, resolution: Resolution, ice_sheet: IceSheet) -> Option<&SlcDataset> {
        self.dataset(Stage::Processed, resolution, ice_sheet)
    }
}

fn group_result_files(files: &[PathBuf]) -> V1Groups {
    let mut grouped = V1Groups::new();

    for file in files {
        let (stage, resolution, ice_sheet) = classify(&file_name_of(file));
        grouped
            .entry(stage)
            .or_default()
            .entry(resolution)
            .or_default()
            .entry(ice_sheet)
            .or_default()
            .push(file.clone());
    }

    grouped
}

fn materialize(
    grouped: &V1Groups,
) -> Result<BTreeMap<(Stage, Resolution, IceSheet), SlcDataset>, LoadError> {
    let mut datasets = BTreeMap::new();

    for stage in Stage::ALL {
        for resolution in Resolution::KNOWN {
            for ice_sheet in IceSheet::SHEETS {
                let files = grouped
                    .get(&stage)
                    .and_then(|by_resolution| by_resolution.get(&resolution))
                    .and_then(|by_sheet| by_sheet.get(&ice_sheet));

                let Some(files) = files else { continue };
                let Some(first) = files.first() else { continue };

                if files.len() > 1 {
                    eprintln!(
                        "Warning: {} files found for {}/{}/{}, using {}",
                        files.len(),
                        stage,
                        resolution,
                        ice_sheet,
                        first.display()
                    );
                }

                let ds = SlcDataset::open(first)?;
                datasets.insert((stage, resolution, ice_sheet), ds);
            }
        }
    }

    Ok(datasets)
}
