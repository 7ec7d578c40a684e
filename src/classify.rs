use std::fmt;

/// Whether a v1 result file holds unprocessed model output or a
/// post-processed derivative. The v2 pipeline has no stage axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Raw,
    Processed,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Raw, Stage::Processed];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Raw => write!(f, "raw"),
            Stage::Processed => write!(f, "processed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    Local,
    Global,
    Unknown,
}

impl Resolution {
    /// The two resolutions result sets actually materialize.
    pub const KNOWN: [Resolution; 2] = [Resolution::Local, Resolution::Global];
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Local => write!(f, "local"),
            Resolution::Global => write!(f, "global"),
            Resolution::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IceSheet {
    Ais,
    Eais,
    Wais,
    Gis,
    Temperature,
    Unknown,
}

impl IceSheet {
    /// The four contributing regions result sets materialize. Temperature
    /// traces are grouped but never loaded.
    pub const SHEETS: [IceSheet; 4] = [
        IceSheet::Ais,
        IceSheet::Eais,
        IceSheet::Wais,
        IceSheet::Gis,
    ];
}

impl fmt::Display for IceSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IceSheet::Ais => write!(f, "AIS"),
            IceSheet::Eais => write!(f, "EAIS"),
            IceSheet::Wais => write!(f, "WAIS"),
            IceSheet::Gis => write!(f, "GIS"),
            IceSheet::Temperature => write!(f, "temperature"),
            IceSheet::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a result filename into its (stage, resolution, ice sheet)
/// labels.
///
/// Stage: "raw" in the token before the first `_` means raw, anything else
/// is processed. Resolution: case-insensitive "global" wins over "local".
/// Ice sheet: literal substring checks in the order `_GIS`, `_AIS`,
/// `_WAIS`, `_EAIS`, then case-insensitive "temperature". The check order
/// is load-bearing: a name containing both `_GIS` and `_AIS` labels as GIS,
/// and one containing `_AIS` ahead of an `_EAIS`/`_WAIS` token labels as
/// AIS. Existing v1 output trees were bucketed under this ordering, so it
/// is kept as-is rather than corrected.
///
/// Never fails; anything unmatched degrades to the Unknown labels.
pub fn classify(filename: &str) -> (Stage, Resolution, IceSheet) {
    let stem = filename.split('_').next().unwrap_or(filename);
    let stage = if stem.contains("raw") {
        Stage::Raw
    } else {
        Stage::Processed
    };

    let lower = filename.to_lowercase();
    let resolution = if lower.contains("global") {
        Resolution::Global
    } else if lower.contains("local") {
        Resolution::Local
    } else {
        Resolution::Unknown
    };

    let ice_sheet = if filename.contains("_GIS") {
        IceSheet::Gis
    } else if filename.contains("_AIS") {
        IceSheet::Ais
    } else if filename.contains("_WAIS") {
        IceSheet::Wais
    } else if filename.contains("_EAIS") {
        IceSheet::Eais
    } else if lower.contains("temperature") {
        IceSheet::Temperature
    } else {
        IceSheet::Unknown
    };

    (stage, resolution, ice_sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_leading_token() {
        assert_eq!(classify("raw_global_AIS.nc").0, Stage::Raw);
        assert_eq!(classify("rawoutput_local_GIS.nc").0, Stage::Raw);
        assert_eq!(classify("processed_global_AIS.nc").0, Stage::Processed);
        // "raw" after the first underscore does not count
        assert_eq!(classify("output_raw_AIS.nc").0, Stage::Processed);
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        assert_eq!(classify("processed_GLOBAL_AIS.nc").1, Resolution::Global);
        assert_eq!(classify("processed_Local_GIS.nc").1, Resolution::Local);
        assert_eq!(classify("processed_AIS.nc").1, Resolution::Unknown);
    }

    #[test]
    fn test_global_wins_over_local() {
        assert_eq!(
            classify("processed_global_localsl_AIS.nc").1,
            Resolution::Global
        );
    }

    #[test]
    fn test_non_raw_global_names_are_processed_global() {
        for name in [
            "processed_global_AIS.nc",
            "output_global_GIS.nc",
            "totals_Global_WAIS.nc",
        ] {
            let (stage, resolution, _) = classify(name);
            assert_eq!(stage, Stage::Processed);
            assert_eq!(resolution, Resolution::Global);
        }
    }

    #[test]
    fn test_ice_sheet_labels() {
        assert_eq!(classify("processed_global_AIS.nc").2, IceSheet::Ais);
        assert_eq!(classify("processed_global_EAIS.nc").2, IceSheet::Eais);
        assert_eq!(classify("processed_global_WAIS.nc").2, IceSheet::Wais);
        assert_eq!(classify("processed_global_GIS.nc").2, IceSheet::Gis);
        assert_eq!(
            classify("global_temperature.nc").2,
            IceSheet::Temperature
        );
        assert_eq!(classify("something_else.nc").2, IceSheet::Unknown);
    }

    #[test]
    fn test_ice_sheet_check_order_is_preserved() {
        // GIS is checked first, then AIS; a name carrying both labels
        // buckets under the earlier check.
        assert_eq!(classify("totals_GIS_AIS.nc").2, IceSheet::Gis);
        assert_eq!(classify("totals_AIS_EAIS.nc").2, IceSheet::Ais);
        assert_eq!(classify("totals_AIS_WAIS.nc").2, IceSheet::Ais);
    }

    #[test]
    fn test_unmatched_degrades_to_unknown() {
        let (stage, resolution, ice_sheet) = classify("notes.txt");
        assert_eq!(stage, Stage::Processed);
        assert_eq!(resolution, Resolution::Unknown);
        assert_eq!(ice_sheet, IceSheet::Unknown);
    }
}
