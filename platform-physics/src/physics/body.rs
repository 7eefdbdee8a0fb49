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
//! Physics body component
//!
//! A body's rectangle is the authoritative transform of its entity. The
//! world system integrates velocity into it every fixed step, pushes it out
//! of static geometry, and moves every owned fixture along with it.
//!
//! # Units
//!
//! Positions are world units, velocities world units per second, gravity
//! world units per second squared. Friction and resistance are
//! dimensionless divisors: each fixed step the velocity is divided by
//! `max(1, resistance)`.

use crate::ecs::Component;
use crate::physics::fixture::{Fixture, FixtureTag};
use crate::physics::geometry::{Rect, Vector2};
use log::warn;
use std::collections::HashSet;
use std::fmt;

/// How a body takes part in penetration resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// Never moved by resolution; may still move under its own velocity
    Static,
    /// Pushed out of static bodies
    Dynamic,
    /// Overlaps freely; generates contacts only
    Abstract,
}

/// Discrete conditions derived from contacts by gameplay listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodySense {
    /// Feet fixture rests on a block
    FeetOnGround,
    /// Head fixture touches a block
    HeadTouchingBlock,
    /// Left side fixture touches a block
    TouchingBlockLeft,
    /// Right side fixture touches a block
    TouchingBlockRight,
    /// Body is inside water
    InWater,
    /// Body overlaps a ladder
    TouchingLadder,
}

/// Per-frame hook on a body, called with the frame delta
pub type BodyHook = Box<dyn FnMut(&mut PhysicsBody, f64)>;

/// Kinematic state of an entity
pub struct PhysicsBody {
    body_type: BodyType,
    rect: Rect,
    prior_rect: Rect,
    velocity: Vector2,
    velocity_clamp: Vector2,
    gravity: f64,
    gravity_on: bool,
    friction: Vector2,
    resistance: Vector2,
    fixtures: Vec<Fixture>,
    senses: HashSet<BodySense>,
    pre_process: Option<BodyHook>,
    post_process: Option<BodyHook>,
}

impl PhysicsBody {
    /// Create a body at rest with no gravity and no fixtures
    pub fn new(body_type: BodyType, rect: Rect) -> Self {
        PhysicsBody {
            body_type,
            rect,
            prior_rect: rect,
            velocity: Vector2::zero(),
            velocity_clamp: Vector2::splat(f64::INFINITY),
            gravity: 0.0,
            gravity_on: false,
            friction: Vector2::zero(),
            resistance: Vector2::splat(1.0),
            fixtures: Vec::new(),
            senses: HashSet::new(),
            pre_process: None,
            post_process: None,
        }
    }

    /// Add a fixture while building the body
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.add_fixture(fixture);
        self
    }

    /// Enable gravity with the given acceleration (negative pulls down)
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self.gravity_on = true;
        self
    }

    /// Set the friction imparted to bodies resting on or pushing against this one
    pub fn with_friction(mut self, x: f64, y: f64) -> Self {
        self.friction = Vector2::new(x, y);
        self
    }

    /// Cap the absolute velocity per axis
    ///
    /// A NaN cap leaves that axis unchanged.
    pub fn with_velocity_clamp(mut self, x: f64, y: f64) -> Self {
        if x.is_nan() || y.is_nan() {
            warn!("Ignoring NaN velocity clamp ({}, {})", x, y);
        }
        if !x.is_nan() {
            self.velocity_clamp.x = x.abs();
        }
        if !y.is_nan() {
            self.velocity_clamp.y = y.abs();
        }
        self
    }

    /// Add a fixture; the fixture list is meant to be fixed once gameplay starts
    pub fn add_fixture(&mut self, mut fixture: Fixture) -> usize {
        fixture.reposition(self.rect.center());
        self.fixtures.push(fixture);
        self.fixtures.len() - 1
    }

    /// Resolution participation
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Change resolution participation
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
    }

    /// Current rectangle
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Mutable rectangle, for teleports and moving platforms
    pub fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }

    /// Rectangle at the start of the latest fixed step
    pub fn prior_rect(&self) -> &Rect {
        &self.prior_rect
    }

    /// Rectangle blended between the prior and current step
    ///
    /// `alpha` is usually [`WorldSystem::alpha`](crate::physics::WorldSystem::alpha).
    pub fn interpolated_rect(&self, alpha: f64) -> Rect {
        let alpha = alpha.clamp(0.0, 1.0);
        let mut rect = self.rect;
        rect.x = self.prior_rect.x + (self.rect.x - self.prior_rect.x) * alpha;
        rect.y = self.prior_rect.y + (self.rect.y - self.prior_rect.y) * alpha;
        rect
    }

    /// Center of the rectangle
    pub fn center(&self) -> Vector2 {
        self.rect.center()
    }

    /// Move the body's bottom-left corner
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.rect.x = x;
        self.rect.y = y;
    }

    /// Move the body's center
    pub fn set_center(&mut self, center: Vector2) {
        self.rect.set_center(center);
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, x: f64, y: f64) {
        self.velocity = Vector2::new(x, y);
    }

    /// Add to the velocity
    pub fn apply_impulse(&mut self, dx: f64, dy: f64) {
        self.velocity.x += dx;
        self.velocity.y += dy;
    }

    /// Absolute per-axis velocity cap
    pub fn velocity_clamp(&self) -> Vector2 {
        self.velocity_clamp
    }

    /// Gravity acceleration
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Set the gravity acceleration
    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }

    /// Whether gravity is applied
    pub fn is_gravity_on(&self) -> bool {
        self.gravity_on
    }

    /// Toggle gravity
    pub fn set_gravity_on(&mut self, on: bool) {
        self.gravity_on = on;
    }

    /// Friction imparted to touching bodies
    pub fn friction(&self) -> Vector2 {
        self.friction
    }

    /// Set the friction imparted to touching bodies
    pub fn set_friction(&mut self, x: f64, y: f64) {
        self.friction = Vector2::new(x, y);
    }

    /// Resistance accumulated for the current fixed step
    pub fn resistance(&self) -> Vector2 {
        self.resistance
    }

    /// Add horizontal resistance for the current fixed step
    pub fn apply_resistance_x(&mut self, amount: f64) {
        self.resistance.x += amount;
    }

    /// Add vertical resistance for the current fixed step
    pub fn apply_resistance_y(&mut self, amount: f64) {
        self.resistance.y += amount;
    }

    pub(crate) fn reset_resistance(&mut self, air_resistance: f64) {
        self.resistance = Vector2::splat(air_resistance);
    }

    pub(crate) fn set_velocity_raw(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    pub(crate) fn begin_step(&mut self) {
        self.prior_rect = self.rect;
    }

    /// Owned fixtures
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Mutable owned fixtures; flags and payloads may change, membership should not
    pub fn fixtures_mut(&mut self) -> &mut [Fixture] {
        &mut self.fixtures
    }

    /// Fixture by index
    pub fn fixture(&self, index: usize) -> Option<&Fixture> {
        self.fixtures.get(index)
    }

    /// Mutable fixture by index
    pub fn fixture_mut(&mut self, index: usize) -> Option<&mut Fixture> {
        self.fixtures.get_mut(index)
    }

    /// Fixtures carrying `tag`
    pub fn fixtures_with_tag(&self, tag: FixtureTag) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().filter(move |f| f.tag() == tag)
    }

    /// Move every fixture to the body's center plus its offset
    pub fn reposition_fixtures(&mut self) {
        let center = self.rect.center();
        for fixture in &mut self.fixtures {
            fixture.reposition(center);
        }
    }

    /// Whether the body currently senses `sense`
    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.senses.contains(&sense)
    }

    /// Set or clear a sense flag
    pub fn set_sensing(&mut self, sense: BodySense, on: bool) {
        if on {
            self.senses.insert(sense);
        } else {
            self.senses.remove(&sense);
        }
    }

    /// Clear every sense flag
    pub fn clear_senses(&mut self) {
        self.senses.clear();
    }

    /// Install the hook run once per frame before the fixed steps
    pub fn set_pre_process<F>(&mut self, hook: F)
    where
        F: FnMut(&mut PhysicsBody, f64) + 'static,
    {
        self.pre_process = Some(Box::new(hook));
    }

    /// Install the hook run once per frame after the fixed steps
    pub fn set_post_process<F>(&mut self, hook: F)
    where
        F: FnMut(&mut PhysicsBody, f64) + 'static,
    {
        self.post_process = Some(Box::new(hook));
    }

    pub(crate) fn run_pre_process(&mut self, delta: f64) {
        if let Some(mut hook) = self.pre_process.take() {
            hook(self, delta);
            if self.pre_process.is_none() {
                self.pre_process = Some(hook);
            }
        }
    }

    pub(crate) fn run_post_process(&mut self, delta: f64) {
        if let Some(mut hook) = self.post_process.take() {
            hook(self, delta);
            if self.post_process.is_none() {
                self.post_process = Some(hook);
            }
        }
    }

    /// Check if the rectangle and velocity are finite
    pub fn is_valid(&self) -> bool {
        self.rect.is_valid() && self.velocity.is_valid()
    }
}

impl Component for PhysicsBody {}

impl fmt::Debug for PhysicsBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsBody")
            .field("body_type", &self.body_type)
            .field("rect", &self.rect)
            .field("velocity", &self.velocity)
            .field("gravity", &self.gravity)
            .field("gravity_on", &self.gravity_on)
            .field("friction", &self.friction)
            .field("resistance", &self.resistance)
            .field("fixtures", &self.fixtures)
            .field("senses", &self.senses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn body() -> PhysicsBody {
        PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 0.0, 2.0, 2.0))
    }

    #[test]
    fn test_impulse_is_additive_and_set_is_absolute() {
        let mut body = body();
        body.apply_impulse(1.0, 2.0);
        body.apply_impulse(1.0, 2.0);
        assert_eq!(body.velocity(), Vector2::new(2.0, 4.0));

        body.set_velocity(-1.0, 0.0);
        assert_eq!(body.velocity(), Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn test_resistance_accumulates_until_reset() {
        let mut body = body();
        body.apply_resistance_x(2.0);
        body.apply_resistance_y(0.5);
        assert_eq!(body.resistance(), Vector2::new(3.0, 1.5));

        body.reset_resistance(1.035);
        assert_eq!(body.resistance(), Vector2::splat(1.035));
    }

    #[test]
    fn test_nan_velocity_clamp_is_ignored() {
        let body = PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_velocity_clamp(f64::NAN, -12.0);
        assert_eq!(body.velocity_clamp().x, f64::INFINITY);
        assert_eq!(body.velocity_clamp().y, 12.0);
    }

    #[test]
    fn test_senses() {
        let mut body = body();
        assert!(!body.is_sensing(BodySense::FeetOnGround));
        body.set_sensing(BodySense::FeetOnGround, true);
        assert!(body.is_sensing(BodySense::FeetOnGround));
        body.set_sensing(BodySense::FeetOnGround, false);
        assert!(!body.is_sensing(BodySense::FeetOnGround));
    }

    #[test]
    fn test_add_fixture_positions_it() {
        let feet =
            Fixture::new(FixtureTag::Feet, Rect::new(0.0, 0.0, 1.0, 0.5)).with_offset(0.0, -1.0);
        let body =
            PhysicsBody::new(BodyType::Dynamic, Rect::new(10.0, 10.0, 2.0, 2.0)).with_fixture(feet);
        assert_eq!(body.fixtures()[0].shape().center(), Vector2::new(11.0, 10.0));
        assert_eq!(body.fixtures_with_tag(FixtureTag::Feet).count(), 1);
    }

    #[test]
    fn test_interpolated_rect() {
        let mut body = body();
        body.begin_step();
        body.rect_mut().translate(4.0, 2.0);

        let halfway = body.interpolated_rect(0.5);
        assert_eq!(halfway.x, 2.0);
        assert_eq!(halfway.y, 1.0);
        assert_eq!(body.interpolated_rect(7.0), *body.rect());
    }

    #[test]
    fn test_hooks_run_and_persist() {
        let calls = Rc::new(Cell::new(0));
        let mut body = body();
        let counter = Rc::clone(&calls);
        body.set_pre_process(move |b, _dt| {
            counter.set(counter.get() + 1);
            b.apply_impulse(1.0, 0.0);
        });

        body.run_pre_process(0.016);
        body.run_pre_process(0.016);
        assert_eq!(calls.get(), 2);
        assert_eq!(body.velocity().x, 2.0);

        // No post hook installed
        body.run_post_process(0.016);
    }
}
