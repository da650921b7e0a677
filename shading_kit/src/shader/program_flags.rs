/// ProgramFlags - the key selecting one material program variant
///
/// Field order is significant: the derived `Ord` compares fields
/// lexicographically in declaration order (false < true), and `bits()` packs
/// them most-significant first so the two orderings agree.

/// Feature switches baked into a material program variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramFlags {
    pub skinned: bool,
    pub instanced: bool,

    /// Blended materials are shaded in the forward pass
    pub forward: bool,
    pub opacity_mask: bool,

    pub dynamic_ar: bool,
    pub albedo_map: bool,
    pub roughness_map: bool,

    pub dynamic_nm: bool,
    pub normal_map: bool,
    pub metalness_map: bool,

    pub dynamic_eo: bool,
    pub emissive_map: bool,
    pub occlusion_map: bool,
}

impl ProgramFlags {
    /// Number of switches
    pub const COUNT: usize = 13;

    fn fields(&self) -> [(bool, &'static str); Self::COUNT] {
        [
            (self.skinned, "IS_SKINNED"),
            (self.instanced, "IS_INSTANCED"),
            (self.forward, "IS_FORWARD"),
            (self.opacity_mask, "HAS_OPACITY_MASK"),
            (self.dynamic_ar, "DYNAMIC_AR"),
            (self.albedo_map, "HAS_ALBEDO_MAP"),
            (self.roughness_map, "HAS_ROUGHNESS_MAP"),
            (self.dynamic_nm, "DYNAMIC_NM"),
            (self.normal_map, "HAS_NORMAL_MAP"),
            (self.metalness_map, "HAS_METALNESS_MAP"),
            (self.dynamic_eo, "DYNAMIC_EO"),
            (self.emissive_map, "HAS_EMISSIVE_MAP"),
            (self.occlusion_map, "HAS_OCCLUSION_MAP"),
        ]
    }

    /// Preprocessor symbols for every set switch, in field order
    pub fn defines(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, name)| *name)
            .collect()
    }

    /// Pack into 13 bits, `skinned` in the most significant position
    pub fn bits(&self) -> u16 {
        self.fields()
            .iter()
            .fold(0u16, |acc, (set, _)| (acc << 1) | (*set as u16))
    }

    /// Inverse of `bits()`; bits above the 13th are ignored
    pub fn from_bits(bits: u16) -> Self {
        let bit = |index: usize| (bits >> (Self::COUNT - 1 - index)) & 1 == 1;
        Self {
            skinned: bit(0),
            instanced: bit(1),
            forward: bit(2),
            opacity_mask: bit(3),
            dynamic_ar: bit(4),
            albedo_map: bit(5),
            roughness_map: bit(6),
            dynamic_nm: bit(7),
            normal_map: bit(8),
            metalness_map: bit(9),
            dynamic_eo: bit(10),
            emissive_map: bit(11),
            occlusion_map: bit(12),
        }
    }
}

#[cfg(test)]
#[path = "program_flags_tests.rs"]
mod tests;
