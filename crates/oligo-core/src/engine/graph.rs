use super::config::TilingConfig;
use super::error::EngineError;
use super::ids::{OligoId, OverlapId};
use crate::core::catalog::codon::Codon;
use crate::core::sequence::codons::Sequence;
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::ops::Range;

/// The controlled-codon target an oligo variant was built for, within one design group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    pub codon: Codon,
    pub level: usize,
    pub target: usize,
}

/// A fixed-length codon window at one tiling position.
#[derive(Debug, Clone)]
pub struct Oligo {
    position: usize,
    sequence: Sequence,
    /// Design group index to the level this variant carries for it.
    lineage: BTreeMap<usize, Delta>,
    counts: BTreeMap<Codon, usize>,
    leading: Option<OverlapId>,
    trailing: Option<OverlapId>,
}

impl Oligo {
    pub fn new(position: usize, sequence: Sequence) -> Self {
        Self {
            position,
            sequence,
            lineage: BTreeMap::new(),
            counts: BTreeMap::new(),
            leading: None,
            trailing: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn lineage(&self) -> &BTreeMap<usize, Delta> {
        &self.lineage
    }

    pub fn delta(&self, group: usize) -> Option<&Delta> {
        self.lineage.get(&group)
    }

    /// Realized occurrences of each controlled codon, filled in once wildcards are realized.
    pub fn counts(&self) -> &BTreeMap<Codon, usize> {
        &self.counts
    }

    pub fn leading(&self) -> Option<OverlapId> {
        self.leading
    }

    pub fn trailing(&self) -> Option<OverlapId> {
        self.trailing
    }

    /// Two variants are compatible when they agree on every design group both carry.
    pub fn is_compatible_with(&self, other: &Oligo) -> bool {
        self.lineage.iter().all(|(group, delta)| {
            other
                .lineage
                .get(group)
                .is_none_or(|theirs| theirs.level == delta.level)
        })
    }

    pub(crate) fn refresh_counts(&mut self, controlled: &[Codon]) {
        self.counts = controlled
            .iter()
            .map(|codon| (*codon, self.sequence.count(codon)))
            .collect();
    }

    fn derive(&self, group: usize, delta: Delta) -> Self {
        let mut child = self.clone();
        child.lineage.insert(group, delta);
        child
    }
}

/// A boundary window shared by every oligo linked on either side of it.
#[derive(Debug, Clone)]
pub struct Overlap {
    boundary: usize,
    sequence: Sequence,
    preceding: Vec<OligoId>,
    following: Vec<OligoId>,
}

impl Overlap {
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn preceding(&self) -> &[OligoId] {
        &self.preceding
    }

    pub fn following(&self) -> &[OligoId] {
        &self.following
    }
}

/// Arena holding every oligo variant and overlap instance of a library.
///
/// Oligos are grouped by tiling position and overlaps by boundary, both in
/// creation order. Edges between them are stored as ids on both sides.
#[derive(Debug, Clone)]
pub struct OligoGraph {
    tiling: TilingConfig,
    oligos: SlotMap<OligoId, Oligo>,
    overlaps: SlotMap<OverlapId, Overlap>,
    variants: Vec<Vec<OligoId>>,
    boundaries: Vec<Vec<OverlapId>>,
}

impl OligoGraph {
    pub fn new(tiling: TilingConfig, positions: usize) -> Self {
        Self {
            tiling,
            oligos: SlotMap::with_key(),
            overlaps: SlotMap::with_key(),
            variants: vec![Vec::new(); positions],
            boundaries: vec![Vec::new(); positions.saturating_sub(1)],
        }
    }

    pub fn tiling(&self) -> TilingConfig {
        self.tiling
    }

    pub fn positions(&self) -> usize {
        self.variants.len()
    }

    pub fn boundaries(&self) -> usize {
        self.boundaries.len()
    }

    pub fn oligo(&self, id: OligoId) -> Option<&Oligo> {
        self.oligos.get(id)
    }

    pub fn overlap(&self, id: OverlapId) -> Option<&Overlap> {
        self.overlaps.get(id)
    }

    /// Variants at `position` in creation order; empty for an unknown position.
    pub fn variants(&self, position: usize) -> &[OligoId] {
        self.variants.get(position).map_or(&[], Vec::as_slice)
    }

    /// Overlap instances at `boundary` in creation order.
    pub fn overlaps_at(&self, boundary: usize) -> &[OverlapId] {
        self.boundaries.get(boundary).map_or(&[], Vec::as_slice)
    }

    pub fn oligo_count(&self) -> usize {
        self.oligos.len()
    }

    pub fn overlap_count(&self) -> usize {
        self.overlaps.len()
    }

    /// Absolute codon range covered by the oligos at `position`.
    pub fn span(&self, position: usize) -> Range<usize> {
        let start = position * self.tiling.stride();
        start..start + self.tiling.oligo_length
    }

    /// Absolute codon range of the window shared across `boundary`.
    pub fn shared_window(&self, boundary: usize) -> Range<usize> {
        let start = (boundary + 1) * self.tiling.stride();
        start..start + self.tiling.overlap_length
    }

    /// In-oligo offsets at `position` that belong to no shared window.
    pub fn interior(&self, position: usize) -> Range<usize> {
        let overlap = self.tiling.overlap_length;
        let start = if position > 0 { overlap } else { 0 };
        let end = if position + 1 < self.positions() {
            self.tiling.oligo_length - overlap
        } else {
            self.tiling.oligo_length
        };
        start..end
    }

    /// Maps an absolute codon index to every `(position, offset)` holding it.
    ///
    /// Codons inside a shared window are owned by both adjacent positions.
    pub fn owners(&self, absolute: usize) -> Vec<(usize, usize)> {
        let stride = self.tiling.stride();
        let last = self.positions().saturating_sub(1);
        let upper = (absolute / stride).min(last);
        (upper.saturating_sub(1)..=upper)
            .filter(|&position| self.span(position).contains(&absolute))
            .map(|position| (position, absolute - position * stride))
            .collect()
    }

    pub(crate) fn add_oligo(&mut self, oligo: Oligo) -> Result<OligoId, EngineError> {
        let position = oligo.position;
        if oligo.sequence.len() != self.tiling.oligo_length {
            return Err(EngineError::Internal(format!(
                "oligo at position {position} holds {} codons, expected {}",
                oligo.sequence.len(),
                self.tiling.oligo_length
            )));
        }
        let slot = self.variants.get_mut(position).ok_or_else(|| {
            EngineError::Internal(format!("tiling position {position} does not exist"))
        })?;
        let id = self.oligos.insert(oligo);
        slot.push(id);
        Ok(id)
    }

    /// Replaces the variants at `position` with one deep copy per delta of
    /// every existing variant, delta-major, each extending its lineage with
    /// `group`.
    pub(crate) fn expand_variants(
        &mut self,
        position: usize,
        group: usize,
        deltas: &[Delta],
    ) -> Result<(), EngineError> {
        let existing = self.variants.get_mut(position).map(std::mem::take).ok_or_else(|| {
            EngineError::Internal(format!("tiling position {position} does not exist"))
        })?;
        let parents = existing
            .into_iter()
            .map(|id| self.oligos.remove(id).ok_or_else(|| dangling(id)))
            .collect::<Result<Vec<_>, _>>()?;
        if parents.iter().any(|p| p.leading.is_some() || p.trailing.is_some()) {
            return Err(EngineError::Internal(
                "variants cannot be replicated after linking".to_string(),
            ));
        }

        for delta in deltas {
            for parent in &parents {
                let id = self.oligos.insert(parent.derive(group, *delta));
                self.variants[position].push(id);
            }
        }
        Ok(())
    }

    /// Writes `codon` into an oligo outside any linked shared window.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::Internal`] when `offset` lies in a window
    /// already linked to an overlap (such writes must go through
    /// [`OligoGraph::write_overlap`]) and with [`EngineError::Sequence`] when
    /// the amino acid would change.
    pub(crate) fn write_unlinked(
        &mut self,
        id: OligoId,
        offset: usize,
        codon: Codon,
    ) -> Result<Codon, EngineError> {
        let overlap = self.tiling.overlap_length;
        let stride = self.tiling.stride();
        let oligo = self.oligos.get_mut(id).ok_or_else(|| dangling(id))?;
        let in_leading = offset < overlap && oligo.leading.is_some();
        let in_trailing = offset >= stride && oligo.trailing.is_some();
        if in_leading || in_trailing {
            return Err(EngineError::Internal(format!(
                "direct write to linked window at position {}, offset {offset}",
                oligo.position
            )));
        }
        Ok(oligo.sequence.set(offset, codon)?)
    }

    /// Writes `codon` at `offset` of an overlap and fans it out to the
    /// trailing window of every preceding oligo and the leading window of
    /// every following oligo. Returns the previous codon.
    pub(crate) fn write_overlap(
        &mut self,
        id: OverlapId,
        offset: usize,
        codon: Codon,
    ) -> Result<Codon, EngineError> {
        let stride = self.tiling.stride();
        let overlap = self
            .overlaps
            .get_mut(id)
            .ok_or_else(|| EngineError::Internal(format!("dangling overlap id {id:?}")))?;
        let previous = overlap.sequence.set(offset, codon)?;
        let preceding = overlap.preceding.clone();
        let following = overlap.following.clone();

        for oligo_id in preceding {
            let oligo = self.oligos.get_mut(oligo_id).ok_or_else(|| dangling(oligo_id))?;
            oligo.sequence.set(stride + offset, codon)?;
        }
        for oligo_id in following {
            let oligo = self.oligos.get_mut(oligo_id).ok_or_else(|| dangling(oligo_id))?;
            oligo.sequence.set(offset, codon)?;
        }
        Ok(previous)
    }

    /// Links two compatible oligos across `boundary`.
    ///
    /// An overlap already attached to either side is reused; otherwise a new
    /// one is created from the trailing window of `left`.
    ///
    /// # Errors
    ///
    /// [`EngineError::SharedWindow`] when the two windows differ, and
    /// [`EngineError::Internal`] when the oligos are already attached to two
    /// different overlaps.
    pub(crate) fn link(
        &mut self,
        boundary: usize,
        left: OligoId,
        right: OligoId,
    ) -> Result<OverlapId, EngineError> {
        let stride = self.tiling.stride();
        let overlap_length = self.tiling.overlap_length;
        let (left_window, existing_left) = {
            let oligo = self.oligos.get(left).ok_or_else(|| dangling(left))?;
            (oligo.sequence.codons()[stride..].to_vec(), oligo.trailing)
        };
        let (right_window, existing_right) = {
            let oligo = self.oligos.get(right).ok_or_else(|| dangling(right))?;
            (oligo.sequence.codons()[..overlap_length].to_vec(), oligo.leading)
        };
        if left_window != right_window {
            return Err(EngineError::SharedWindow { boundary });
        }

        let id = match (existing_left, existing_right) {
            (Some(a), Some(b)) if a != b => {
                return Err(EngineError::Internal(format!(
                    "oligos at boundary {boundary} are attached to different overlaps"
                )));
            }
            (Some(a), _) | (None, Some(a)) => {
                let overlap = self
                    .overlaps
                    .get(a)
                    .ok_or_else(|| EngineError::Internal(format!("dangling overlap id {a:?}")))?;
                if overlap.sequence.codons() != left_window.as_slice() {
                    return Err(EngineError::SharedWindow { boundary });
                }
                a
            }
            (None, None) => {
                let id = self.overlaps.insert(Overlap {
                    boundary,
                    sequence: Sequence::new(left_window),
                    preceding: Vec::new(),
                    following: Vec::new(),
                });
                self.boundaries
                    .get_mut(boundary)
                    .ok_or_else(|| {
                        EngineError::Internal(format!("boundary {boundary} does not exist"))
                    })?
                    .push(id);
                id
            }
        };

        let overlap = &mut self.overlaps[id];
        if !overlap.preceding.contains(&left) {
            overlap.preceding.push(left);
        }
        if !overlap.following.contains(&right) {
            overlap.following.push(right);
        }
        self.oligos[left].trailing = Some(id);
        self.oligos[right].leading = Some(id);
        Ok(id)
    }

    pub(crate) fn oligos_mut(&mut self) -> impl Iterator<Item = &mut Oligo> {
        self.oligos.values_mut()
    }

    /// Verifies that every overlap matches the trailing window of each
    /// preceding oligo and the leading window of each following oligo, and
    /// that every edge is recorded on both ends.
    pub fn check_consistency(&self) -> Result<(), EngineError> {
        let stride = self.tiling.stride();
        let overlap_length = self.tiling.overlap_length;
        for (id, overlap) in &self.overlaps {
            let window = overlap.sequence.codons();
            let boundary = overlap.boundary;
            for &oligo_id in &overlap.preceding {
                let oligo = self.oligos.get(oligo_id).ok_or_else(|| dangling(oligo_id))?;
                if oligo.trailing != Some(id) || &oligo.sequence.codons()[stride..] != window {
                    return Err(EngineError::SharedWindow { boundary });
                }
            }
            for &oligo_id in &overlap.following {
                let oligo = self.oligos.get(oligo_id).ok_or_else(|| dangling(oligo_id))?;
                if oligo.leading != Some(id) || &oligo.sequence.codons()[..overlap_length] != window
                {
                    return Err(EngineError::SharedWindow { boundary });
                }
            }
        }
        Ok(())
    }
}

fn dangling(id: OligoId) -> EngineError {
    EngineError::Internal(format!("dangling oligo id {id:?}"))
}
