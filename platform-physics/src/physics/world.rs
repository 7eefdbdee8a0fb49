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
//! The world system
//!
//! [`WorldSystem`] is the system that owns simulation time. Every frame it
//! gathers the enabled bodies of its members and runs their pre hooks, then
//! consumes the frame delta in whole fixed steps:
//!
//! 1. Integrate every gathered body
//! 2. Test every pair of active fixtures on distinct bodies for overlap
//! 3. Resolve penetration: exchange friction and push dynamic bodies out of
//!    static ones
//! 4. Diff this step's contacts against the previous step's and report
//!    begin, continue and end events
//!
//! The remainder of the delta carries over to the next frame, and
//! [`WorldSystem::alpha`] tells how far the simulation is into the next step.
//! Post hooks run once all steps are done.
//!
//! # Determinism
//!
//! Bodies are visited in entity id order and contact events are reported
//! sorted by fixture identity, so the same inputs and the same sequence of
//! frame deltas always reproduce the same state and the same events.

use crate::ecs::{ComponentMask, Entities, EntityId, System, SystemBase};
use crate::error::Result;
use crate::physics::body::PhysicsBody;
use crate::physics::config::WorldConfig;
use crate::physics::contact::{Contact, ContactPhase, FixtureHandle};
use crate::physics::fixture::FixtureEvent;
use crate::physics::integrate::integrate_body;
use crate::physics::listener::{ContactDispatcher, ContactListener};
use crate::physics::resolve::resolve_penetration;
use log::{trace, warn};
use std::any::Any;
use std::collections::HashSet;

/// Fraction of a step by which the accumulator may fall short and still run it
///
/// Summing frame deltas in floating point can leave the accumulator a few
/// ulps below a whole number of steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Fixed-step physics simulation over every entity with a [`PhysicsBody`]
///
/// # Examples
///
/// ```
/// use platform_physics::ecs::Manager;
/// use platform_physics::physics::{BodyType, PhysicsBody, Rect, WorldConfig, WorldSystem};
///
/// let mut manager = Manager::new();
/// let world = manager.add_system(WorldSystem::with_config(WorldConfig::default()));
///
/// let ball = manager
///     .create_entity()
///     .with_component(
///         PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 10.0, 1.0, 1.0)).with_gravity(-30.0),
///     );
/// let id = manager.add_entity(ball);
///
/// manager.update_systems(0.1).unwrap();
/// let y = manager.entities().component::<PhysicsBody>(id).unwrap().rect().y;
/// assert!(y < 10.0);
/// assert!(manager.system(world).unwrap().steps_taken() > 0);
/// ```
pub struct WorldSystem<L: ContactListener = ContactDispatcher> {
    base: SystemBase,
    config: WorldConfig,
    listener: L,
    accumulator: f64,
    tracked: Vec<EntityId>,
    prior_contacts: HashSet<Contact>,
    current_contacts: HashSet<Contact>,
    steps_taken: u64,
    dropped_steps: u64,
}

impl WorldSystem<ContactDispatcher> {
    /// Create a world with an empty [`ContactDispatcher`]
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid
    pub fn with_config(config: WorldConfig) -> Self {
        Self::new(config, ContactDispatcher::new())
    }
}

impl<L: ContactListener> WorldSystem<L> {
    /// Create a world reporting contacts to `listener`
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. Use [`WorldSystem::try_new`]
    /// for a non-panicking version.
    pub fn new(config: WorldConfig, listener: L) -> Self {
        match Self::try_new(config, listener) {
            Ok(world) => world,
            Err(err) => panic!("{}", err),
        }
    }

    /// Create a world, returning an error for an invalid configuration
    pub fn try_new(config: WorldConfig, listener: L) -> Result<Self> {
        config.validate()?;
        Ok(WorldSystem {
            base: SystemBase::new(ComponentMask::new().with::<PhysicsBody>()),
            config,
            listener,
            accumulator: 0.0,
            tracked: Vec::new(),
            prior_contacts: HashSet::new(),
            current_contacts: HashSet::new(),
            steps_taken: 0,
            dropped_steps: 0,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The global contact listener
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable global contact listener
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Unconsumed time carried into the next frame, in seconds
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Fraction of a fixed step held in the accumulator, in `[0, 1)`
    ///
    /// Pass to [`PhysicsBody::interpolated_rect`] when rendering.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.config.fixed_time_step
    }

    /// Fixed steps run since creation
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Fixed steps skipped because a frame exceeded the step cap
    pub fn dropped_steps(&self) -> u64 {
        self.dropped_steps
    }

    /// Contacts found by the latest fixed step, sorted by fixture identity
    pub fn contacts(&self) -> Vec<Contact> {
        sorted(self.prior_contacts.iter())
    }

    /// Whether the latest fixed step found the two fixtures overlapping
    pub fn is_touching(&self, a: FixtureHandle, b: FixtureHandle) -> bool {
        self.prior_contacts.contains(&Contact::new(a, b))
    }

    fn advance(&mut self, entities: &mut Entities, delta: f64) -> Result<()> {
        let step = self.config.fixed_time_step;
        let slack = step * STEP_TOLERANCE;
        let mut steps = 0;

        while self.accumulator + slack >= step {
            if steps == self.config.max_steps_per_frame {
                let backlog = ((self.accumulator + slack) / step).floor();
                warn!(
                    "Frame needed more than {} physics steps, dropping {} more",
                    self.config.max_steps_per_frame, backlog
                );
                self.dropped_steps += backlog as u64;
                self.accumulator = (self.accumulator - backlog * step).max(0.0);
                break;
            }

            self.accumulator = (self.accumulator - step).max(0.0);
            self.step(entities, delta)?;
            steps += 1;
        }
        Ok(())
    }

    fn step(&mut self, entities: &mut Entities, delta: f64) -> Result<()> {
        self.simulate(entities);
        self.report_contacts(entities, delta)?;
        self.prior_contacts = std::mem::take(&mut self.current_contacts);
        self.steps_taken += 1;
        Ok(())
    }

    fn simulate(&mut self, entities: &mut Entities) {
        let tracked = &self.tracked;
        let mut bodies: Vec<(EntityId, &mut PhysicsBody)> = entities
            .enabled_components_mut::<PhysicsBody>()
            .into_iter()
            .filter(|(id, _)| tracked.binary_search(id).is_ok())
            .collect();

        for (_, body) in bodies.iter_mut() {
            integrate_body(body, &self.config);
        }

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let ((id_a, a), (id_b, b)) = pair(&mut bodies, i, j);
                find_contacts(*id_a, a, *id_b, b, &mut self.current_contacts);
            }
        }

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let ((_, a), (_, b)) = pair(&mut bodies, i, j);
                resolve_penetration(a, b);
            }
        }
    }

    fn report_contacts(&mut self, entities: &mut Entities, delta: f64) -> Result<()> {
        let mut events =
            Vec::with_capacity(self.current_contacts.len() + self.prior_contacts.len());
        for contact in sorted(self.current_contacts.iter()) {
            if self.prior_contacts.contains(&contact) {
                events.push((ContactPhase::Continue, contact));
            } else {
                events.push((ContactPhase::Begin, contact));
            }
        }
        // Begin before continue, then end
        events.sort_by_key(|(phase, contact)| (*phase, contact.ordered_keys()));
        let ended = self.prior_contacts.difference(&self.current_contacts);
        events.extend(sorted(ended).into_iter().map(|c| (ContactPhase::End, c)));

        for (phase, contact) in events {
            trace!("{:?} contact {:?}", phase, contact);
            notify_fixture(entities, contact.first(), contact.second(), phase, delta)?;
            notify_fixture(entities, contact.second(), contact.first(), phase, delta)?;
            self.listener.dispatch(phase, &contact, entities, delta)?;
        }
        Ok(())
    }
}

impl<L: ContactListener + 'static> System for WorldSystem<L> {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn pre_process(&mut self, _entities: &mut Entities, _delta: f64) -> Result<()> {
        self.tracked.clear();
        Ok(())
    }

    fn process_entity(&mut self, id: EntityId, entities: &mut Entities, delta: f64) -> Result<()> {
        let entity = entities.entity_mut(id)?;
        if !entity.is_component_enabled::<PhysicsBody>() {
            return Ok(());
        }
        entity.get_component_mut::<PhysicsBody>()?.run_pre_process(delta);
        self.tracked.push(id);
        Ok(())
    }

    fn post_process(&mut self, entities: &mut Entities, delta: f64) -> Result<()> {
        let frame_delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            warn!("Ignoring invalid frame delta {}", delta);
            0.0
        };

        self.tracked.sort();
        self.accumulator += frame_delta;
        self.advance(entities, frame_delta)?;

        for id in &self.tracked {
            if let Some(body) = entities
                .get_mut(*id)
                .and_then(|entity| entity.try_component_mut::<PhysicsBody>())
            {
                body.run_post_process(frame_delta);
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn sorted<'a>(contacts: impl Iterator<Item = &'a Contact>) -> Vec<Contact> {
    let mut list: Vec<Contact> = contacts.copied().collect();
    list.sort_by_key(Contact::ordered_keys);
    list
}

/// Two distinct mutable elements, `i < j`
fn pair<'s, T>(items: &'s mut [T], i: usize, j: usize) -> (&'s mut T, &'s mut T) {
    let (left, right) = items.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

fn find_contacts(
    id_a: EntityId,
    a: &PhysicsBody,
    id_b: EntityId,
    b: &PhysicsBody,
    contacts: &mut HashSet<Contact>,
) {
    for (index_a, fixture_a) in a.fixtures().iter().enumerate() {
        for (index_b, fixture_b) in b.fixtures().iter().enumerate() {
            if fixture_a.overlaps(fixture_b) {
                contacts.insert(Contact::new(
                    FixtureHandle::new(id_a, index_a, fixture_a.tag()),
                    FixtureHandle::new(id_b, index_b, fixture_b.tag()),
                ));
            }
        }
    }
}

/// Run the listener `own` has bound for `other`'s tag, if any
///
/// Bodies and fixtures that are gone by now are skipped.
fn notify_fixture(
    entities: &mut Entities,
    own: FixtureHandle,
    other: FixtureHandle,
    phase: ContactPhase,
    delta: f64,
) -> Result<()> {
    let body = match entities
        .get_mut(own.entity)
        .and_then(|entity| entity.try_component_mut::<PhysicsBody>())
    {
        Some(body) => body,
        None => return Ok(()),
    };

    let mut listener = match body
        .fixture_mut(own.index)
        .and_then(|fixture| fixture.take_listener(phase, other.tag))
    {
        Some(listener) => listener,
        None => return Ok(()),
    };

    let result = listener(FixtureEvent {
        body: &mut *body,
        own,
        other,
        phase,
        delta,
    });

    if let Some(fixture) = body.fixture_mut(own.index) {
        fixture.restore_listener(phase, other.tag, listener);
    }
    result
}
