use log::debug;
use std::path::{Path, PathBuf};

use crate::libs::channel_codec::check_node::Algorithm;
use crate::libs::channel_codec::ldpc::DecoderSettings;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Config {
    decoder: DecoderSettings,
}

const CONFIG_FILE_NAME: &str = "ldpc-csc.toml";

pub struct ConfigurationStore {
    config_file_path: Box<Path>,
    config: Config,
}

impl ConfigurationStore {
    pub fn new(config_path: Box<Path>) -> Result<ConfigurationStore, String> {
        let mut config_file_path = PathBuf::new();
        config_file_path.push(config_path);
        config_file_path.push(CONFIG_FILE_NAME);
        debug!("Config file is {:?}", config_file_path);
        let config = if !config_file_path.exists() {
            debug!("Creating config file {:?}", config_file_path);
            let config = Config {
                decoder: DecoderSettings::default(),
            };
            save_configuration(&config_file_path, &config)?;
            config
        } else {
            read_configuration(&config_file_path)?
        };
        Ok(ConfigurationStore {
            config_file_path: config_file_path.into_boxed_path(),
            config,
        })
    }

    pub fn get_config_file_path(&self) -> &Path {
        &self.config_file_path
    }

    pub fn decoder_settings(&self) -> DecoderSettings {
        self.config.decoder
    }

    pub fn get_algorithm(&self) -> Algorithm {
        self.config.decoder.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), String> {
        self.config.decoder.algorithm = algorithm;
        self.save()
    }

    pub fn get_max_iterations(&self) -> usize {
        self.config.decoder.max_iterations
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<(), String> {
        if max_iterations == 0 {
            return Err("The maximum number of iterations must be at least 1".to_string());
        }
        self.config.decoder.max_iterations = max_iterations;
        self.save()
    }

    pub fn get_early_stop(&self) -> bool {
        self.config.decoder.early_stop
    }

    pub fn set_early_stop(&mut self, early_stop: bool) -> Result<(), String> {
        self.config.decoder.early_stop = early_stop;
        self.save()
    }

    pub fn get_llr_clamp(&self) -> f64 {
        self.config.decoder.llr_clamp
    }

    pub fn set_llr_clamp(&mut self, llr_clamp: f64) -> Result<(), String> {
        if !llr_clamp.is_finite() || llr_clamp <= 0.0 {
            return Err(format!("The LLR clamp must be finite and positive, not {}", llr_clamp));
        }
        self.config.decoder.llr_clamp = llr_clamp;
        self.save()
    }

    pub fn get_min_sum_scale(&self) -> f64 {
        self.config.decoder.min_sum_scale
    }

    pub fn set_min_sum_scale(&mut self, min_sum_scale: f64) -> Result<(), String> {
        if !(min_sum_scale > 0.0 && min_sum_scale <= 1.0) {
            return Err(format!("The min-sum scale must be in (0, 1], not {}", min_sum_scale));
        }
        self.config.decoder.min_sum_scale = min_sum_scale;
        self.save()
    }

    fn save(&self) -> Result<(), String> {
        save_configuration(&self.config_file_path, &self.config)
    }
}

fn save_configuration(config_file_path: &Path, config: &Config) -> Result<(), String> {
    let toml = toml::to_string(config)
        .map_err(|err| format!("Could not serialise configuration for {:?}: {}", config_file_path, err))?;
    std::fs::write(config_file_path, toml)
        .map_err(|err| format!("Could not write config file {:?}: {}", config_file_path, err))
}

fn read_configuration(config_file_path: &Path) -> Result<Config, String> {
    let file_contents = std::fs::read_to_string(config_file_path);
    match file_contents {
        Ok(toml) => {
            let x: Result<Config, toml::de::Error> = toml::from_str(&*toml);
            match x {
                Ok(config) => {
                    Ok(config)
                }
                Err(err) => {
                    Err(format!("Could not parse config file {:?}: {}", config_file_path, err))
                }
            }
        }
        Err(e) => { Err(format!("Could not read config file {:?}: {}", config_file_path, e))}
    }
}

#[cfg(test)]
#[path = "./config_file_spec.rs"]
mod config_file_spec;
