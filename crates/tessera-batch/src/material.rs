//! Material equivalence keys used to decide which primitives may share a merged batch.

/// Surface appearance of a primitive, reduced to the fields that affect merging.
///
/// Two primitives with equal keys render identically once their transforms are
/// baked, so they can be drawn as one. Emissive intensity is stored as raw bits
/// to keep the key `Eq + Hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    /// Base color, packed `0xRRGGBB`.
    pub color: u32,
    /// Emissive color, packed `0xRRGGBB`; zero when not emissive.
    pub emissive: u32,
    emissive_intensity_bits: u32,
    /// Whether the primitive casts shadows.
    pub cast_shadow: bool,
    /// Whether the primitive receives shadows.
    pub receive_shadow: bool,
}

impl MaterialKey {
    /// Non-emissive material with the given shadow flags.
    pub fn solid(color: u32, cast_shadow: bool, receive_shadow: bool) -> Self {
        Self {
            color,
            emissive: 0,
            emissive_intensity_bits: 0.0f32.to_bits(),
            cast_shadow,
            receive_shadow,
        }
    }

    /// Copy of this key that glows with `emissive` at `intensity`.
    ///
    /// Negative and NaN intensities clamp to zero so equal-looking keys compare equal.
    pub fn with_emissive(mut self, emissive: u32, intensity: f32) -> Self {
        let intensity = if intensity > 0.0 { intensity } else { 0.0 };
        self.emissive = emissive;
        self.emissive_intensity_bits = intensity.to_bits();
        self
    }

    /// Emissive intensity; zero for non-emissive materials.
    pub fn emissive_intensity(&self) -> f32 {
        f32::from_bits(self.emissive_intensity_bits)
    }

    /// Whether this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emissive != 0 && self.emissive_intensity() > 0.0
    }
}
