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
//! Fixtures: tagged collision shapes owned by a physics body
//!
//! A fixture is positioned at its body's center plus a fixed offset after
//! every fixed step. Inactive fixtures are skipped by overlap testing. Each
//! fixture can bind listeners to a `(phase, other tag)` pair; those run
//! before the world's global contact listener and only see the owning body.

use crate::ecs::EntityId;
use crate::error::Result;
use crate::physics::contact::{ContactPhase, FixtureHandle};
use crate::physics::geometry::{Shape, Vector2};
use crate::physics::PhysicsBody;
use std::collections::HashMap;
use std::fmt;

/// Classification label used for contact matching
///
/// The set is closed on purpose: contact rules are written against these
/// variants and matched through [`TagPair`](crate::physics::TagPair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixtureTag {
    /// Whole-body hitbox
    Body,
    /// Ground sensor below the body
    Feet,
    /// Ceiling sensor above the body
    Head,
    /// Wall sensor on the left side
    SideLeft,
    /// Wall sensor on the right side
    SideRight,
    /// Solid terrain
    Block,
    /// Deals damage on touch
    Damager,
    /// Receives damage
    Damageable,
    /// Projectile body
    Projectile,
    /// Reflects projectiles
    Shield,
    /// Scanning area used by AI
    Sensor,
    /// Water volume
    Water,
    /// Climbable ladder
    Ladder,
    /// Instant-kill volume
    Death,
    /// Launch pad, usually carrying an `Impulse` payload
    Spring,
    /// Generic trigger volume
    Trigger,
}

/// Strongly-typed data carried by a fixture
#[derive(Debug, Clone, PartialEq)]
pub enum FixturePayload {
    /// Damage dealt by a `Damager` fixture
    Damage(i32),
    /// Velocity imparted on touch, such as a spring pad
    Impulse(Vector2),
    /// Entities seen by a `Sensor` fixture; listeners fill it, AI reads it
    Scan(Vec<EntityId>),
}

/// Event passed to a per-fixture listener
pub struct FixtureEvent<'a> {
    /// Body owning the fixture the listener is bound to
    pub body: &'a mut PhysicsBody,
    /// The listening fixture
    pub own: FixtureHandle,
    /// The fixture on the other side of the contact
    pub other: FixtureHandle,
    /// Lifecycle phase
    pub phase: ContactPhase,
    /// Frame delta in seconds
    pub delta: f64,
}

/// Per-fixture contact listener
pub type FixtureListener = Box<dyn FnMut(FixtureEvent<'_>) -> Result<()>>;

/// Tagged collision shape owned by a physics body
pub struct Fixture {
    tag: FixtureTag,
    shape: Shape,
    offset: Vector2,
    active: bool,
    payload: Option<FixturePayload>,
    listeners: HashMap<(ContactPhase, FixtureTag), FixtureListener>,
}

impl Fixture {
    /// Create an active fixture with no offset
    pub fn new(tag: FixtureTag, shape: impl Into<Shape>) -> Self {
        Fixture {
            tag,
            shape: shape.into(),
            offset: Vector2::zero(),
            active: true,
            payload: None,
            listeners: HashMap::new(),
        }
    }

    /// Set the offset from the body's center
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Vector2::new(x, y);
        self
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: FixturePayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Bind a listener for contacts with fixtures tagged `other` in `phase`
    ///
    /// Replaces any listener already bound to the same pair.
    pub fn on<F>(mut self, phase: ContactPhase, other: FixtureTag, listener: F) -> Self
    where
        F: FnMut(FixtureEvent<'_>) -> Result<()> + 'static,
    {
        self.listeners.insert((phase, other), Box::new(listener));
        self
    }

    /// Classification tag
    pub fn tag(&self) -> FixtureTag {
        self.tag
    }

    /// Current shape in world space
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Offset from the body's center
    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Change the offset; takes effect at the next fixed step
    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset = Vector2::new(x, y);
    }

    /// Whether the fixture takes part in overlap testing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggle overlap testing for this fixture
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Attached payload
    pub fn payload(&self) -> Option<&FixturePayload> {
        self.payload.as_ref()
    }

    /// Mutable attached payload
    pub fn payload_mut(&mut self) -> Option<&mut FixturePayload> {
        self.payload.as_mut()
    }

    /// Replace the payload
    pub fn set_payload(&mut self, payload: Option<FixturePayload>) {
        self.payload = payload;
    }

    /// Move the shape to `body_center + offset`
    pub fn reposition(&mut self, body_center: Vector2) {
        self.shape.set_center(body_center + self.offset);
    }

    /// Do two active fixtures overlap?
    pub fn overlaps(&self, other: &Fixture) -> bool {
        self.active && other.active && self.shape.overlaps(&other.shape)
    }

    /// Whether a listener is bound for the pair
    pub fn has_listener(&self, phase: ContactPhase, other: FixtureTag) -> bool {
        self.listeners.contains_key(&(phase, other))
    }

    pub(crate) fn take_listener(
        &mut self,
        phase: ContactPhase,
        other: FixtureTag,
    ) -> Option<FixtureListener> {
        self.listeners.remove(&(phase, other))
    }

    pub(crate) fn restore_listener(
        &mut self,
        phase: ContactPhase,
        other: FixtureTag,
        listener: FixtureListener,
    ) {
        self.listeners.insert((phase, other), listener);
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("tag", &self.tag)
            .field("shape", &self.shape)
            .field("offset", &self.offset)
            .field("active", &self.active)
            .field("payload", &self.payload)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::geometry::{Circle, Rect};

    #[test]
    fn test_reposition_applies_offset() {
        let mut fixture =
            Fixture::new(FixtureTag::Feet, Rect::new(0.0, 0.0, 2.0, 1.0)).with_offset(0.0, -3.0);
        fixture.reposition(Vector2::new(10.0, 10.0));
        assert_eq!(fixture.shape().center(), Vector2::new(10.0, 7.0));
    }

    #[test]
    fn test_inactive_fixtures_never_overlap() {
        let a = Fixture::new(FixtureTag::Body, Rect::new(0.0, 0.0, 2.0, 2.0));
        let mut b = Fixture::new(FixtureTag::Block, Rect::new(1.0, 1.0, 2.0, 2.0));
        assert!(a.overlaps(&b));

        b.set_active(false);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_circle_fixture_reposition() {
        let mut fixture = Fixture::new(FixtureTag::Sensor, Circle::new(Vector2::zero(), 5.0))
            .with_offset(1.0, 1.0);
        fixture.reposition(Vector2::new(2.0, 2.0));
        assert_eq!(fixture.shape().center(), Vector2::new(3.0, 3.0));
    }

    #[test]
    fn test_listener_binding() {
        let mut fixture = Fixture::new(FixtureTag::Feet, Rect::new(0.0, 0.0, 1.0, 1.0))
            .on(ContactPhase::Begin, FixtureTag::Block, |_event| Ok(()));

        assert!(fixture.has_listener(ContactPhase::Begin, FixtureTag::Block));
        assert!(!fixture.has_listener(ContactPhase::End, FixtureTag::Block));

        let listener = fixture
            .take_listener(ContactPhase::Begin, FixtureTag::Block)
            .unwrap();
        assert!(!fixture.has_listener(ContactPhase::Begin, FixtureTag::Block));
        fixture.restore_listener(ContactPhase::Begin, FixtureTag::Block, listener);
        assert!(fixture.has_listener(ContactPhase::Begin, FixtureTag::Block));
    }

    #[test]
    fn test_spring_pad_carries_impulse() {
        let pad = Fixture::new(FixtureTag::Spring, Rect::new(0.0, 0.0, 2.0, 0.25))
            .with_payload(FixturePayload::Impulse(Vector2::new(0.0, 25.0)));

        assert_eq!(pad.tag(), FixtureTag::Spring);
        assert_ne!(pad.tag(), FixtureTag::Shield);
        assert_eq!(
            pad.payload(),
            Some(&FixturePayload::Impulse(Vector2::new(0.0, 25.0)))
        );
    }

    #[test]
    fn test_payload() {
        let mut fixture = Fixture::new(FixtureTag::Sensor, Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_payload(FixturePayload::Scan(Vec::new()));

        if let Some(FixturePayload::Scan(seen)) = fixture.payload_mut() {
            seen.push(EntityId::new(3));
        }
        assert_eq!(
            fixture.payload(),
            Some(&FixturePayload::Scan(vec![EntityId::new(3)]))
        );
    }
}
