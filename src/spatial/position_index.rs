//! Bounding box index over a population snapshot
//!
//! Rebuilt from scratch every tick with an R-tree bulk load. Each being
//! contributes a square box of half extent `genes.size / 2` centered on
//! its position. The index never changes after construction, so positions
//! it reports may lag behind beings that moved later in the same tick.

use crate::core::geometry;
use crate::core::random::select_random;
use crate::core::types::{BeingId, Position};
use crate::entity::Being;
use rand::Rng;
use rstar::{RTree, RTreeObject, AABB};

/// One being as captured when the index was built
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedBeing {
    pub id: BeingId,
    pub group: String,
    pub position: Position,
    pub half_size: f64,
}

impl IndexedBeing {
    pub fn from_being(being: &Being) -> Self {
        Self {
            id: being.id(),
            group: being.group().to_string(),
            position: being.position(),
            half_size: being.half_size(),
        }
    }
}

impl RTreeObject for IndexedBeing {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        square(self.position, self.half_size)
    }
}

#[inline]
fn square(center: Position, half_size: f64) -> AABB<[f64; 2]> {
    let half = half_size.abs();
    AABB::from_corners(
        [center.x - half, center.y - half],
        [center.x + half, center.y + half],
    )
}

#[derive(Debug, Default)]
pub struct PositionIndex {
    tree: RTree<IndexedBeing>,
}

impl PositionIndex {
    /// Bulk-load an index from the given beings. Beings at non-finite
    /// positions can't be placed and are left out.
    pub fn build<'a>(beings: impl IntoIterator<Item = &'a Being>) -> Self {
        let entries: Vec<IndexedBeing> = beings
            .into_iter()
            .filter(|being| being.position().is_finite())
            .map(IndexedBeing::from_being)
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedBeing> {
        self.tree.iter()
    }

    /// Every other indexed being whose box overlaps `being`'s current box.
    /// The being itself is excluded by id.
    pub fn find_colliding(&self, being: &Being) -> Vec<&IndexedBeing> {
        let envelope = square(being.position(), being.half_size());
        let id = being.id();
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.id != id)
            .collect()
    }

    /// Beings whose box touches the square of half extent `radius` around
    /// `position` and that satisfy `predicate`
    pub fn find_within(
        &self,
        position: Position,
        radius: f64,
        mut predicate: impl FnMut(&IndexedBeing) -> bool,
    ) -> Vec<&IndexedBeing> {
        let envelope = square(position, radius);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| predicate(*entry))
            .collect()
    }

    /// The `find_within` candidate nearest to `position`; the first one
    /// encountered wins a tie
    pub fn find_closest_to(
        &self,
        position: Position,
        radius: f64,
        predicate: impl FnMut(&IndexedBeing) -> bool,
    ) -> Option<&IndexedBeing> {
        let mut closest: Option<(&IndexedBeing, f64)> = None;
        for entry in self.find_within(position, radius, predicate) {
            let dist = geometry::distance(position, entry.position);
            match closest {
                Some((_, best)) if dist >= best => {}
                _ => closest = Some((entry, dist)),
            }
        }
        closest.map(|(entry, _)| entry)
    }

    /// A uniformly chosen `find_within` candidate, not weighted by distance
    pub fn random_near<R: Rng + ?Sized>(
        &self,
        position: Position,
        radius: f64,
        predicate: impl FnMut(&IndexedBeing) -> bool,
        rng: &mut R,
    ) -> Option<&IndexedBeing> {
        let candidates = self.find_within(position, radius, predicate);
        select_random(rng, &candidates).copied()
    }
}
