//! Render-side geometry for generated worlds: mesh data, scene extraction,
//! and material-keyed static batching.

mod batcher;
mod material;
mod mesh;
mod scene;

pub use batcher::{
    BatchSet, BatchStats, DrawUnit, MergedBatch, PresentationMode, PrimitiveClass, PrimitiveId,
    RenderPrimitive, batch_static,
};
pub use material::MaterialKey;
pub use mesh::{MeshData, Vertex};
pub use scene::extract_scene;
