mod classify;
mod compare;
mod config;
mod dataset;
mod diff;
mod plot;
mod results;

use std::path::Path;

use classify::{IceSheet, Resolution};
use compare::check_ice_sheet_projections;
use config::Config;
use results::{V1Results, V2Results};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./data/config/compare_config.json".to_string());

    println!("Starting sea level projection comparison...");
    let config = Config::from_file(&config_path)?;

    let v1 = V1Results::new(
        config.module(),
        config.scenario(),
        Path::new(config.v1_dir()),
        config.v1_output_dir_name(),
    )?;
    let v2 = V2Results::with_options(
        Path::new(config.v2_results_dir()),
        config.pipeline_id(),
        config.module(),
        config.scenario(),
        IceSheet::SHEETS.to_vec(),
    )?;

    let mut checked = 0;
    for resolution in Resolution::KNOWN {
        for ice_sheet in IceSheet::SHEETS {
            let (Some(v1_ds), Some(v2_ds)) = (
                v1.processed(resolution, ice_sheet),
                v2.dataset(resolution, ice_sheet),
            ) else {
                println!(
                    "✗ No {} {} output on both sides, skipping",
                    resolution, ice_sheet
                );
                continue;
            };

            println!("  v1: {}", v1_ds);
            println!("  v2: {}", v2_ds);
            check_ice_sheet_projections(&v1, &v2, resolution, ice_sheet)?;
            checked += 1;
        }
    }
    println!("✓ Checked {} resolution/ice sheet combinations", checked);

    if let Some(plot_dir) = config.plot_dir() {
        std::fs::create_dir_all(plot_dir)?;

        for ice_sheet in IceSheet::SHEETS {
            let has_both_resolutions = Resolution::KNOWN.iter().all(|&resolution| {
                v1.processed(resolution, ice_sheet).is_some()
                    && v2.dataset(resolution, ice_sheet).is_some()
            });
            if !has_both_resolutions {
                continue;
            }

            let out_path =
                Path::new(plot_dir).join(format!("diff_{}_{}.png", ice_sheet, config.scenario()));
            plot::plot_diffs_for_ice_sheet(&v1, &v2, ice_sheet, config.scenario(), &out_path)?;
            println!("✓ Saved diagnostic figure to: {}", out_path.display());
        }
    }

    Ok(())
}
