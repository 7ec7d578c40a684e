use std::fmt;

use crate::classify::{IceSheet, Resolution};
use crate::dataset::data_equal;
use crate::results::{V1Results, V2Results};

#[derive(Debug)]
pub enum CompareError {
    UnknownIceSheet(IceSheet),
    UnknownResolution(Resolution),
    MissingDataset {
        version: &'static str,
        resolution: Resolution,
        ice_sheet: IceSheet,
    },
    Mismatch {
        resolution: Resolution,
        ice_sheet: IceSheet,
    },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::UnknownIceSheet(ice_sheet) => write!(
                f,
                "Ice sheet {} not recognized. Must be one of AIS, GIS, WAIS, EAIS.",
                ice_sheet
            ),
            CompareError::UnknownResolution(resolution) => write!(
                f,
                "Resolution {} not recognized. Must be one of local, global.",
                resolution
            ),
            CompareError::MissingDataset {
                version,
                resolution,
                ice_sheet,
            } => write!(
                f,
                "No {} {} {} dataset was loaded; check the result directories",
                version, resolution, ice_sheet
            ),
            CompareError::Mismatch {
                resolution,
                ice_sheet,
            } => write!(
                f,
                "The {} {} sea level projections for v1 and v2 do not match!",
                resolution, ice_sheet
            ),
        }
    }
}

impl std::error::Error for CompareError {}

/// Asserts that the v1 (processed) and v2 projections for one
/// (resolution, ice sheet) combination are element-wise identical.
///
/// Arguments are validated before any lookup: the ice sheet must be one of
/// the four contributing regions and the resolution one of local/global.
/// Equality is exact and data-only; attached metadata never influences the
/// outcome. On a match a success line is printed for the operator.
pub fn check_ice_sheet_projections(
    v1: &V1Results,
    v2: &V2Results,
    resolution: Resolution,
    ice_sheet: IceSheet,
) -> Result<(), CompareError> {
    if !IceSheet::SHEETS.contains(&ice_sheet) {
        return Err(CompareError::UnknownIceSheet(ice_sheet));
    }
    if !Resolution::KNOWN.contains(&resolution) {
        return Err(CompareError::UnknownResolution(resolution));
    }

    let v1_ds = v1
        .processed(resolution, ice_sheet)
        .ok_or(CompareError::MissingDataset {
            version: "v1",
            resolution,
            ice_sheet,
        })?;
    let v2_ds = v2
        .dataset(resolution, ice_sheet)
        .ok_or(CompareError::MissingDataset {
            version: "v2",
            resolution,
            ice_sheet,
        })?;

    if !data_equal(v1_ds, v2_ds) {
        return Err(CompareError::Mismatch {
            resolution,
            ice_sheet,
        });
    }

    println!(
        "The {} {} sea level projections for v1 and v2 match!",
        resolution, ice_sheet
    );

    Ok(())
}
