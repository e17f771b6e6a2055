//! Static geometry batching: merge primitives that share a material into one mesh per key.
//!
//! Static primitives are grouped by [`MaterialKey`] in first-seen order, their
//! transforms are baked into the vertex data, and each group becomes a single
//! [`MergedBatch`]. Water and animated primitives are never merged and stay
//! visible in both presentation modes. Switching modes only flips which
//! representation is drawn; no geometry is rebuilt.

use glam::Mat4;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use tracing::{debug, warn};

use crate::material::MaterialKey;
use crate::mesh::MeshData;

/// Caller-assigned primitive identifier.
pub type PrimitiveId = u32;

/// How a primitive participates in batching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveClass {
    /// Never moves; eligible for merging.
    Static,
    /// Animated surface water; always drawn on its own.
    Water,
    /// Moves or sways at runtime; always drawn on its own.
    Animated,
}

impl PrimitiveClass {
    /// Whether primitives of this class may be merged.
    pub const fn is_mergeable(self) -> bool {
        matches!(self, PrimitiveClass::Static)
    }
}

/// One drawable: local geometry, a world transform, and a material.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPrimitive {
    /// Identifier, unique within one [`BatchSet`].
    pub id: PrimitiveId,
    /// Geometry in local space.
    pub mesh: MeshData,
    /// Local-to-world transform.
    pub transform: Mat4,
    /// Material equivalence key.
    pub material: MaterialKey,
    /// Batching behavior.
    pub class: PrimitiveClass,
}

/// All static primitives of one material, baked into world space and concatenated.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedBatch {
    /// Shared material.
    pub key: MaterialKey,
    /// Combined world-space geometry.
    pub mesh: MeshData,
    /// Source primitives, in input order.
    pub members: Vec<PrimitiveId>,
}

/// Which representation of the static geometry is on display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationMode {
    /// Every primitive drawn individually.
    Original,
    /// Merged batches drawn in place of their members.
    #[default]
    Batched,
}

/// Something the display loop issues one draw for.
#[derive(Clone, Copy, Debug)]
pub enum DrawUnit<'a> {
    /// A single primitive with its own transform.
    Primitive(&'a RenderPrimitive),
    /// A merged batch, already in world space.
    Batch(&'a MergedBatch),
}

impl DrawUnit<'_> {
    /// Vertex count of this draw.
    pub fn vertex_count(&self) -> usize {
        match self {
            DrawUnit::Primitive(p) => p.mesh.vertex_count(),
            DrawUnit::Batch(b) => b.mesh.vertex_count(),
        }
    }

    /// Triangle count of this draw.
    pub fn triangle_count(&self) -> usize {
        match self {
            DrawUnit::Primitive(p) => p.mesh.triangle_count(),
            DrawUnit::Batch(b) => b.mesh.triangle_count(),
        }
    }
}

/// Draw and geometry totals for both presentation modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Primitives handed to [`batch_static`].
    pub primitives: usize,
    /// Primitives folded into a batch.
    pub merged_primitives: usize,
    /// Number of merged batches.
    pub batches: usize,
    /// Draws issued in original mode.
    pub draws_original: usize,
    /// Draws issued in batched mode.
    pub draws_batched: usize,
    /// Vertices drawn in original mode.
    pub vertices_original: usize,
    /// Vertices drawn in batched mode.
    pub vertices_batched: usize,
    /// Triangles drawn in original mode.
    pub triangles_original: usize,
    /// Triangles drawn in batched mode.
    pub triangles_batched: usize,
}

/// Primitives plus their merged batches, switchable between the two presentations.
#[derive(Clone, Debug)]
pub struct BatchSet {
    primitives: Vec<RenderPrimitive>,
    batches: Vec<MergedBatch>,
    /// Batch index per primitive, `None` for primitives that are never merged.
    batch_of: Vec<Option<usize>>,
    index_of: HashMap<PrimitiveId, usize>,
    mode: PresentationMode,
}

/// Merge every static primitive by material key.
///
/// The result starts in [`PresentationMode::Batched`].
pub fn batch_static(primitives: Vec<RenderPrimitive>) -> BatchSet {
    let mut groups: HashMap<MaterialKey, usize> = HashMap::new();
    let mut batches: Vec<MergedBatch> = Vec::new();
    let mut batch_of = Vec::with_capacity(primitives.len());
    let mut index_of = HashMap::with_capacity(primitives.len());

    for (index, primitive) in primitives.iter().enumerate() {
        if index_of.insert(primitive.id, index).is_some() {
            warn!(id = primitive.id, "duplicate primitive id; lookups resolve to the last one");
        }
        if !primitive.class.is_mergeable() {
            batch_of.push(None);
            continue;
        }
        let slot = match groups.entry(primitive.material) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                batches.push(MergedBatch {
                    key: primitive.material,
                    mesh: MeshData::new(),
                    members: Vec::new(),
                });
                *entry.insert(batches.len() - 1)
            }
        };
        let batch = &mut batches[slot];
        batch.mesh.append(&primitive.mesh.baked(&primitive.transform));
        batch.members.push(primitive.id);
        batch_of.push(Some(slot));
    }

    let set = BatchSet {
        primitives,
        batches,
        batch_of,
        index_of,
        mode: PresentationMode::Batched,
    };
    let stats = set.stats();
    debug!(
        primitives = stats.primitives,
        batches = stats.batches,
        draws_original = stats.draws_original,
        draws_batched = stats.draws_batched,
        "static geometry batched"
    );
    set
}

impl BatchSet {
    /// Current presentation.
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Show every primitive individually and hide the batches.
    pub fn show_original(&mut self) {
        self.mode = PresentationMode::Original;
    }

    /// Show the batches and hide their members.
    pub fn show_batched(&mut self) {
        self.mode = PresentationMode::Batched;
    }

    /// Switch to `mode`.
    pub fn set_mode(&mut self, mode: PresentationMode) {
        self.mode = mode;
    }

    /// All primitives in input order.
    pub fn primitives(&self) -> &[RenderPrimitive] {
        &self.primitives
    }

    /// Merged batches in first-seen material order.
    pub fn batches(&self) -> &[MergedBatch] {
        &self.batches
    }

    /// Batch holding the primitive `id`, if it was merged.
    pub fn batch_for(&self, id: PrimitiveId) -> Option<&MergedBatch> {
        let index = *self.index_of.get(&id)?;
        self.batch_of[index].map(|slot| &self.batches[slot])
    }

    fn primitive_visible(&self, index: usize) -> bool {
        match self.mode {
            PresentationMode::Original => true,
            PresentationMode::Batched => self.batch_of[index].is_none(),
        }
    }

    fn batches_visible(&self) -> bool {
        self.mode == PresentationMode::Batched
    }

    /// Whether the primitive `id` itself is drawn right now.
    pub fn is_visible(&self, id: PrimitiveId) -> bool {
        self.index_of
            .get(&id)
            .is_some_and(|&index| self.primitive_visible(index))
    }

    /// How many drawn representations currently cover primitive `id`.
    ///
    /// Always exactly 1 for a known id in either mode; `None` for unknown ids.
    pub fn visible_representations(&self, id: PrimitiveId) -> Option<usize> {
        let index = *self.index_of.get(&id)?;
        let own = usize::from(self.primitive_visible(index));
        let merged = usize::from(self.batch_of[index].is_some() && self.batches_visible());
        Some(own + merged)
    }

    /// Draws for the current mode: batches first, then individually drawn primitives.
    pub fn visible_draw_units(&self) -> Vec<DrawUnit<'_>> {
        let mut units = Vec::new();
        if self.batches_visible() {
            units.extend(self.batches.iter().map(DrawUnit::Batch));
        }
        units.extend(
            self.primitives
                .iter()
                .enumerate()
                .filter(|(index, _)| self.primitive_visible(*index))
                .map(|(_, primitive)| DrawUnit::Primitive(primitive)),
        );
        units
    }

    /// Totals for both modes, independent of the current one.
    pub fn stats(&self) -> BatchStats {
        let loose = self
            .primitives
            .iter()
            .zip(&self.batch_of)
            .filter(|(_, slot)| slot.is_none())
            .map(|(p, _)| p);

        let mut stats = BatchStats {
            primitives: self.primitives.len(),
            merged_primitives: self.batch_of.iter().filter(|slot| slot.is_some()).count(),
            batches: self.batches.len(),
            draws_original: self.primitives.len(),
            ..BatchStats::default()
        };
        for primitive in &self.primitives {
            stats.vertices_original += primitive.mesh.vertex_count();
            stats.triangles_original += primitive.mesh.triangle_count();
        }
        for batch in &self.batches {
            stats.vertices_batched += batch.mesh.vertex_count();
            stats.triangles_batched += batch.mesh.triangle_count();
        }
        for primitive in loose {
            stats.draws_batched += 1;
            stats.vertices_batched += primitive.mesh.vertex_count();
            stats.triangles_batched += primitive.mesh.triangle_count();
        }
        stats.draws_batched += self.batches.len();
        stats
    }
}
