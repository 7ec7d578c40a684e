use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod error;
pub use error::ConfigError;

/// Run configuration for one comparison: where the v1 experiments tree and
/// the v2 flat results directory live, which module/scenario to compare,
/// and optionally where to write diagnostic figures.
#[derive(Debug, Clone)]
pub struct Config {
    v1_dir: String,
    module: String,
    scenario: String,
    v1_output_dir_name: String,
    v2_results_dir: String,
    pipeline_id: String,
    plot_dir: Option<String>,
}

// Deserializes through a helper struct so the name fields can be validated:
// module, scenario, and pipeline id end up inside path patterns and must
// not be empty or carry separators.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            v1_dir: String,
            module: String,
            scenario: String,
            v1_output_dir_name: Option<String>,
            v2_results_dir: String,
            pipeline_id: String,
            plot_dir: Option<String>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let required = [
            ("v1_dir", &helper.v1_dir),
            ("module", &helper.module),
            ("scenario", &helper.scenario),
            ("v2_results_dir", &helper.v2_results_dir),
            ("pipeline_id", &helper.pipeline_id),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(D::Error::custom(ConfigError::EmptyField(field)));
            }
        }

        for (field, value) in [
            ("module", &helper.module),
            ("scenario", &helper.scenario),
            ("pipeline_id", &helper.pipeline_id),
        ] {
            if value.contains('/') || value.contains('\\') {
                return Err(D::Error::custom(ConfigError::InvalidName {
                    field,
                    value: value.clone(),
                }));
            }
        }

        Ok(Config {
            v1_dir: helper.v1_dir,
            module: helper.module,
            scenario: helper.scenario,
            v1_output_dir_name: helper.v1_output_dir_name.unwrap_or_else(|| "output".to_string()),
            v2_results_dir: helper.v2_results_dir,
            pipeline_id: helper.pipeline_id,
            plot_dir: helper.plot_dir,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn v1_dir(&self) -> &str {
        &self.v1_dir
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn v1_output_dir_name(&self) -> &str {
        &self.v1_output_dir_name
    }

    pub fn v2_results_dir(&self) -> &str {
        &self.v2_results_dir
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn plot_dir(&self) -> Option<&str> {
        self.plot_dir.as_deref()
    }
}
