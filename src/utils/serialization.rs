//! # Configuration Serialization Utilities
//!
//! Functions for saving and loading optimizer configurations and params bundles.
//! Uses `serde` for serialization and `bincode` as the binary format; the JSON form
//! lives in [`crate::config`].

use crate::config::OptimizerConfig;
use crate::error::OptimError;
use crate::params::OptimizerParams;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Serialization Error (JSON): {0}")]
    Json(#[from] serde_json::Error),
    #[error("Loaded configuration is invalid: {0}")]
    Invalid(#[from] OptimError),
}

fn write_bincode<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), SerializationError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_bincode<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, SerializationError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}

// --- Configurations ---

/// Saves a run configuration to `path` in bincode format.
pub fn save_config<P: AsRef<Path>>(config: &OptimizerConfig, path: P) -> Result<(), SerializationError> {
    write_bincode(config, path)
}

/// Loads a run configuration saved by [`save_config`] and validates it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OptimizerConfig, SerializationError> {
    let config: OptimizerConfig = read_bincode(path)?;
    config.validate()?;
    Ok(config)
}

// --- Params Bundles ---

/// Saves a params bundle. The iteration counter is not part of the saved state.
pub fn save_params<T, P>(params: &T, path: P) -> Result<(), SerializationError>
where
    T: OptimizerParams + Serialize,
    P: AsRef<Path>,
{
    write_bincode(params, path)
}

/// Loads and validates a params bundle; its iteration counter starts at zero.
pub fn load_params<T, P>(path: P) -> Result<T, SerializationError>
where
    T: OptimizerParams + DeserializeOwned,
    P: AsRef<Path>,
{
    let params: T = read_bincode(path)?;
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MethodConfig;
    use crate::params::{AdaDeltaParams, MomentumParams};
    use crate::stepsize::{BacktrackingParams, StepsizeSearchParams};

    #[test]
    fn config_survives_bincode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.bin");

        let mut params = AdaDeltaParams {
            gamma: 0.95,
            phase_switch_iteration: 20,
            ..AdaDeltaParams::default()
        };
        params.base.min_gradient = 1e-3;
        let config = OptimizerConfig::new(MethodConfig::AdaDelta(params))
            .with_stepsize_search(StepsizeSearchParams::Backtracking(BacktrackingParams::default()));

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn params_load_with_counter_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("momentum.bin");

        let mut params = MomentumParams::default();
        params.base.iteration_times = 42;
        save_params(&params, &path).unwrap();

        let loaded: MomentumParams = load_params(&path).unwrap();
        assert_eq!(loaded.base.iteration_times, 0);
        assert_eq!(loaded.beta, params.beta);
    }

    #[test]
    fn invalid_saved_params_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");

        let params = MomentumParams {
            beta: 1.5,
            ..MomentumParams::default()
        };
        save_params(&params, &path).unwrap();

        let err = load_params::<MomentumParams, _>(&path).unwrap_err();
        assert!(matches!(err, SerializationError::Invalid(OptimError::InvalidParameter { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, SerializationError::Io(_)));
    }
}
