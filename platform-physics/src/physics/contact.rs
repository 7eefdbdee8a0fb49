// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Contacts between fixtures
//!
//! A [`Contact`] is an unordered pair of fixtures found overlapping during a
//! fixed step. `Contact::new(a, b) == Contact::new(b, a)` and both hash the
//! same, so contact sets from consecutive steps can be diffed directly.

use crate::ecs::EntityId;
use crate::physics::fixture::FixtureTag;
use std::hash::{Hash, Hasher};

/// Lifecycle phase of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactPhase {
    /// The pair overlaps this step but did not the step before
    Begin,
    /// The pair overlapped on both steps
    Continue,
    /// The pair overlapped the step before but not this one
    End,
}

/// Stable reference to a fixture: owning entity, index in the body's
/// fixture list, and the fixture's tag at the time of the step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixtureHandle {
    /// Entity owning the body
    pub entity: EntityId,
    /// Index into the body's fixture list
    pub index: usize,
    /// Tag of the fixture
    pub tag: FixtureTag,
}

impl FixtureHandle {
    /// Create a new handle
    pub fn new(entity: EntityId, index: usize, tag: FixtureTag) -> Self {
        FixtureHandle { entity, index, tag }
    }

    fn key(&self) -> (EntityId, usize) {
        (self.entity, self.index)
    }
}

/// Unordered pair of overlapping fixtures
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    first: FixtureHandle,
    second: FixtureHandle,
}

impl Contact {
    /// Create a contact between two fixtures
    pub fn new(first: FixtureHandle, second: FixtureHandle) -> Self {
        Contact { first, second }
    }

    /// First fixture, in construction order
    pub fn first(&self) -> FixtureHandle {
        self.first
    }

    /// Second fixture, in construction order
    pub fn second(&self) -> FixtureHandle {
        self.second
    }

    /// Unordered tag pair of the contact
    pub fn tag_pair(&self) -> TagPair {
        TagPair::new(self.first.tag, self.second.tag)
    }

    /// Match the contact against two tags in either order
    ///
    /// Returns the fixtures ordered as `(tagged a, tagged b)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_physics::ecs::EntityId;
    /// use platform_physics::physics::{Contact, FixtureHandle, FixtureTag};
    ///
    /// let block = FixtureHandle::new(EntityId::new(1), 0, FixtureTag::Block);
    /// let feet = FixtureHandle::new(EntityId::new(2), 1, FixtureTag::Feet);
    /// let contact = Contact::new(block, feet);
    ///
    /// let (f, b) = contact.matches(FixtureTag::Feet, FixtureTag::Block).unwrap();
    /// assert_eq!(f, feet);
    /// assert_eq!(b, block);
    /// ```
    pub fn matches(&self, a: FixtureTag, b: FixtureTag) -> Option<(FixtureHandle, FixtureHandle)> {
        if self.first.tag == a && self.second.tag == b {
            Some((self.first, self.second))
        } else if self.second.tag == a && self.first.tag == b {
            Some((self.second, self.first))
        } else {
            None
        }
    }

    /// Whether either fixture carries `tag`
    pub fn has_tag(&self, tag: FixtureTag) -> bool {
        self.first.tag == tag || self.second.tag == tag
    }

    /// Whether either fixture belongs to `entity`
    pub fn involves(&self, entity: EntityId) -> bool {
        self.first.entity == entity || self.second.entity == entity
    }

    /// Order-independent identity, also used to sort contacts
    pub(crate) fn ordered_keys(&self) -> ((EntityId, usize), (EntityId, usize)) {
        let (a, b) = (self.first.key(), self.second.key());
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.ordered_keys() == other.ordered_keys()
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered_keys().hash(state);
    }
}

/// Unordered pair of fixture tags, used as a lookup key for contact rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagPair(FixtureTag, FixtureTag);

impl TagPair {
    /// Create a pair; `TagPair::new(a, b) == TagPair::new(b, a)`
    pub fn new(a: FixtureTag, b: FixtureTag) -> Self {
        if a <= b {
            TagPair(a, b)
        } else {
            TagPair(b, a)
        }
    }

    /// Whether the pair contains `tag`
    pub fn contains(&self, tag: FixtureTag) -> bool {
        self.0 == tag || self.1 == tag
    }

    /// The tags in canonical order
    pub fn tags(&self) -> (FixtureTag, FixtureTag) {
        (self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn handle(entity: u64, index: usize, tag: FixtureTag) -> FixtureHandle {
        FixtureHandle::new(EntityId::new(entity), index, tag)
    }

    fn hash_of(contact: &Contact) -> u64 {
        let mut hasher = DefaultHasher::new();
        contact.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_contact_symmetry() {
        let a = handle(1, 0, FixtureTag::Feet);
        let b = handle(2, 0, FixtureTag::Block);

        let ab = Contact::new(a, b);
        let ba = Contact::new(b, a);
        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));
    }

    #[test]
    fn test_contact_set_deduplicates_reversed_pairs() {
        let a = handle(1, 0, FixtureTag::Feet);
        let b = handle(2, 3, FixtureTag::Block);

        let mut set = HashSet::new();
        set.insert(Contact::new(a, b));
        set.insert(Contact::new(b, a));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_distinct_fixtures_same_entity_differ() {
        let block = handle(2, 0, FixtureTag::Block);
        let feet = Contact::new(handle(1, 0, FixtureTag::Feet), block);
        let head = Contact::new(handle(1, 1, FixtureTag::Head), block);
        assert_ne!(feet, head);
    }

    #[test]
    fn test_matches_either_order() {
        let feet = handle(1, 0, FixtureTag::Feet);
        let block = handle(2, 0, FixtureTag::Block);
        let contact = Contact::new(feet, block);

        assert_eq!(
            contact.matches(FixtureTag::Block, FixtureTag::Feet),
            Some((block, feet))
        );
        assert_eq!(
            contact.matches(FixtureTag::Feet, FixtureTag::Block),
            Some((feet, block))
        );
        assert_eq!(contact.matches(FixtureTag::Head, FixtureTag::Block), None);
    }

    #[test]
    fn test_matches_same_tags() {
        let a = handle(1, 0, FixtureTag::Body);
        let b = handle(2, 0, FixtureTag::Body);
        let contact = Contact::new(a, b);
        assert_eq!(
            contact.matches(FixtureTag::Body, FixtureTag::Body),
            Some((a, b))
        );
    }

    #[test]
    fn test_tag_pair_is_unordered() {
        assert_eq!(
            TagPair::new(FixtureTag::Feet, FixtureTag::Block),
            TagPair::new(FixtureTag::Block, FixtureTag::Feet)
        );
        let pair = TagPair::new(FixtureTag::Damager, FixtureTag::Damageable);
        assert!(pair.contains(FixtureTag::Damager));
        assert!(!pair.contains(FixtureTag::Feet));
    }

    #[test]
    fn test_involves() {
        let contact = Contact::new(handle(1, 0, FixtureTag::Feet), handle(2, 0, FixtureTag::Block));
        assert!(contact.involves(EntityId::new(1)));
        assert!(contact.involves(EntityId::new(2)));
        assert!(!contact.involves(EntityId::new(3)));
        assert!(contact.has_tag(FixtureTag::Block));
    }
}
