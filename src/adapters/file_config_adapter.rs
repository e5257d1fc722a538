//! INI file configuration adapter.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::config_validation::load_analysis_config;
use crate::domain::error::BarstatError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BarstatError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| BarstatError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BarstatError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BarstatError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// The validated `[analysis]` section.
    pub fn analysis_config(&self) -> Result<AnalysisConfig, BarstatError> {
        load_analysis_config(self)
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
        self.config.getint(section, key)
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String> {
        self.config.getfloat(section, key)
    }
}
