//! Saving and restoring trained parameters
use std::path::{Path, PathBuf};
use tch::{nn::VarStore, TchError};
use thiserror::Error;

/// Error saving or restoring a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint {path} does not exist")]
    Missing { path: PathBuf },
    #[error("unable to load checkpoint {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: TchError,
    },
    #[error("unable to save checkpoint {path}")]
    Save {
        path: PathBuf,
        #[source]
        source: TchError,
    },
}

/// Save all variables of a module to a file.
pub fn save_vars<P: AsRef<Path>>(vs: &VarStore, path: P) -> Result<(), CheckpointError> {
    let path = path.as_ref();
    vs.save(path).map_err(|source| CheckpointError::Save {
        path: path.to_owned(),
        source,
    })
}

/// Restore the variables of a module from a file written by [`save_vars`].
///
/// Every variable in `vs` must be present in the file with a matching shape.
/// On error the variables are left in an unspecified state and must not be used.
pub fn load_vars<P: AsRef<Path>>(vs: &mut VarStore, path: P) -> Result<(), CheckpointError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CheckpointError::Missing {
            path: path.to_owned(),
        });
    }
    vs.load(path).map_err(|source| CheckpointError::Load {
        path: path.to_owned(),
        source,
    })
}
