//! Occupancy template matching.
//!
//! A [`VoxelTemplate`] is a `(pattern, mask)` pair over the 27-bit
//! [`Occupancy`] code: an occupancy matches when it agrees with `pattern` on
//! every bit set in `mask`. Matching is exact; orientation invariance comes
//! only from expanding a template over the 48 cube symmetries when it is
//! added with [`TemplateMatcher::add_template_with_symmetries`].

use crate::core::GridCoord;
use crate::topology::{CubeSymmetry, FULL_MASK, Occupancy};

/// One immutable occupancy pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelTemplate {
    /// Label for logs and diagnostics
    pub name: String,
    /// Required values of the cared-about bits
    pub pattern: u32,
    /// Bits that take part in the comparison
    pub mask: u32,
}

impl VoxelTemplate {
    /// Template caring about every bit.
    pub fn exact(name: impl Into<String>, pattern: Occupancy) -> Self {
        Self::masked(name, pattern, FULL_MASK)
    }

    /// Template caring only about the bits in `mask`.
    ///
    /// # Panics
    /// If `mask` is wider than 27 bits.
    pub fn masked(name: impl Into<String>, pattern: Occupancy, mask: u32) -> Self {
        let mask = Occupancy::new(mask).bits();
        Self {
            name: name.into(),
            pattern: pattern.bits() & mask,
            mask,
        }
    }

    /// Whether `occ` agrees with the pattern on every masked bit.
    #[inline]
    pub fn matches(&self, occ: Occupancy) -> bool {
        occ.bits() & self.mask == self.pattern
    }

    fn transformed(&self, symmetry: &CubeSymmetry) -> Self {
        Self {
            name: self.name.clone(),
            pattern: symmetry.apply_bits(self.pattern),
            mask: symmetry.apply_bits(self.mask),
        }
    }
}

/// A dictionary of templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateMatcher {
    templates: Vec<VoxelTemplate>,
}

impl TemplateMatcher {
    /// Empty matcher (matches nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template as-is.
    pub fn add_template(&mut self, template: VoxelTemplate) {
        self.templates.push(template);
    }

    /// Add a template and all its rotations/reflections; duplicates are
    /// stored once.
    pub fn add_template_with_symmetries(&mut self, template: VoxelTemplate) {
        for symmetry in CubeSymmetry::all() {
            let candidate = template.transformed(&symmetry);
            let duplicate = self
                .templates
                .iter()
                .any(|t| t.pattern == candidate.pattern && t.mask == candidate.mask);
            if !duplicate {
                self.templates.push(candidate);
            }
        }
    }

    /// Whether any template matches.
    pub fn matches(&self, occ: Occupancy) -> bool {
        self.matching_template(occ).is_some()
    }

    /// First matching template, in insertion order.
    pub fn matching_template(&self, occ: Occupancy) -> Option<&VoxelTemplate> {
        self.templates.iter().find(|t| t.matches(occ))
    }

    /// Stored templates.
    pub fn templates(&self) -> &[VoxelTemplate] {
        &self.templates
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if no templates are stored.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Default set used by edge pruning: a spur tip, i.e. the center plus
    /// exactly one face, edge or corner neighbor, in every orientation.
    pub fn pruning_templates() -> Self {
        let mut matcher = Self::new();
        let tips = [
            ("spur_tip_face", GridCoord::new(1, 0, 0)),
            ("spur_tip_edge", GridCoord::new(1, 1, 0)),
            ("spur_tip_corner", GridCoord::new(1, 1, 1)),
        ];
        for (name, offset) in tips {
            let pattern = Occupancy::from_offsets(&[offset]).with_center();
            matcher.add_template_with_symmetries(VoxelTemplate::exact(name, pattern));
        }
        matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::NEIGHBOR_OFFSETS;

    #[test]
    fn test_exact_match_only() {
        let pattern = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0)]).with_center();
        let mut matcher = TemplateMatcher::new();
        matcher.add_template(VoxelTemplate::exact("east", pattern));

        assert!(matcher.matches(pattern));
        // Same shape, other orientation: no symmetry without expansion
        let west = Occupancy::from_offsets(&[GridCoord::new(-1, 0, 0)]).with_center();
        assert!(!matcher.matches(west));
        // Extra occupied cell breaks an exact template
        let extra = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0), GridCoord::new(0, 0, 1)])
            .with_center();
        assert!(!matcher.matches(extra));
    }

    #[test]
    fn test_masked_bits_are_ignored() {
        // Care only about the center and the +x face
        let mask = (1 << 13) | (1 << 14);
        let pattern = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0)]).with_center();
        let template = VoxelTemplate::masked("east_any", pattern, mask);

        let extra = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0), GridCoord::new(0, 0, 1)])
            .with_center();
        assert!(template.matches(extra));
        assert!(!template.matches(Occupancy::CENTER));
    }

    #[test]
    fn test_symmetry_expansion_dedups() {
        let mut matcher = TemplateMatcher::new();
        let pattern = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0)]).with_center();
        matcher.add_template_with_symmetries(VoxelTemplate::exact("face", pattern));
        assert_eq!(matcher.len(), 6);

        // Fully symmetric pattern expands to itself
        let mut full = TemplateMatcher::new();
        full.add_template_with_symmetries(VoxelTemplate::exact("dot", Occupancy::CENTER));
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn test_pruning_templates_cover_every_tip() {
        let matcher = TemplateMatcher::pruning_templates();
        assert_eq!(matcher.len(), 26);
        for offset in NEIGHBOR_OFFSETS {
            let tip = Occupancy::from_offsets(&[offset]).with_center();
            assert!(matcher.matches(tip), "offset {offset:?}");
        }
        let line = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0), GridCoord::new(-1, 0, 0)])
            .with_center();
        assert!(!matcher.matches(line));
        assert!(!matcher.matches(Occupancy::CENTER));
    }

    #[test]
    fn test_matching_template_name() {
        let matcher = TemplateMatcher::pruning_templates();
        let corner = Occupancy::from_offsets(&[GridCoord::new(-1, 1, -1)]).with_center();
        assert_eq!(
            matcher.matching_template(corner).map(|t| t.name.as_str()),
            Some("spur_tip_corner")
        );
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = TemplateMatcher::new();
        assert!(matcher.is_empty());
        assert!(!matcher.matches(Occupancy::CENTER));
    }
}
