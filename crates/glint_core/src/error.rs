use thiserror::Error;

/// Errors raised while assembling scene data.
///
/// Only construction can fail. Once a scene is built, ray queries treat every
/// geometric degeneracy as a miss instead of an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("face references vertex {index} but the mesh has {count} vertices")]
    MissingVertex { index: usize, count: usize },

    #[error("mesh has {normals} normals for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },

    #[error("face repeats vertex {index}")]
    DegenerateFace { index: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;
