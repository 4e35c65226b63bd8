//! Torch modules
mod activation;
mod mlp;

pub use activation::Activation;
pub use mlp::{Mlp, MlpConfig};

use tch::nn::{Module, Path};

/// Build a [`Module`] mapping `in_dim` features to `out_dim` features.
pub trait BuildModule {
    type Module: Module;

    /// Build a new module instance, registering its variables under `vs`.
    fn build_module(&self, vs: &Path, in_dim: usize, out_dim: usize) -> Self::Module;
}
