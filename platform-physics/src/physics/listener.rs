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
//! Global contact listeners
//!
//! The world system reports every contact lifecycle event to one
//! [`ContactListener`] after the per-fixture listeners of both fixtures have
//! run. [`ContactDispatcher`] is the stock listener: a table of handlers
//! keyed by an unordered tag pair and a phase.

use crate::ecs::Entities;
use crate::error::Result;
use crate::physics::contact::{Contact, ContactPhase, FixtureHandle, TagPair};
use crate::physics::fixture::FixtureTag;
use log::trace;
use std::collections::HashMap;

/// Receiver of contact lifecycle events
///
/// Every method defaults to doing nothing.
pub trait ContactListener {
    /// A contact appeared this step
    fn begin_contact(
        &mut self,
        _contact: &Contact,
        _entities: &mut Entities,
        _delta: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// A contact persisted from the previous step
    fn continue_contact(
        &mut self,
        _contact: &Contact,
        _entities: &mut Entities,
        _delta: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// A contact from the previous step is gone
    ///
    /// The entities involved may have been removed since.
    fn end_contact(
        &mut self,
        _contact: &Contact,
        _entities: &mut Entities,
        _delta: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Route an event to the method for its phase
    fn dispatch(
        &mut self,
        phase: ContactPhase,
        contact: &Contact,
        entities: &mut Entities,
        delta: f64,
    ) -> Result<()> {
        match phase {
            ContactPhase::Begin => self.begin_contact(contact, entities, delta),
            ContactPhase::Continue => self.continue_contact(contact, entities, delta),
            ContactPhase::End => self.end_contact(contact, entities, delta),
        }
    }
}

/// Handler stored in a [`ContactDispatcher`]
///
/// Receives the two fixtures ordered to the tags it was registered with.
pub type ContactHandler =
    Box<dyn FnMut(FixtureHandle, FixtureHandle, &mut Entities, f64) -> Result<()>>;

struct Rule {
    phase: ContactPhase,
    first: FixtureTag,
    second: FixtureTag,
    handler: ContactHandler,
}

/// Tag-pair routing table for contact events
///
/// # Examples
///
/// ```
/// use platform_physics::physics::{
///     BodySense, ContactDispatcher, ContactPhase, FixtureTag, PhysicsBody,
/// };
///
/// let dispatcher = ContactDispatcher::new().on(
///     ContactPhase::Begin,
///     FixtureTag::Feet,
///     FixtureTag::Block,
///     |feet, _block, entities, _dt| {
///         if let Ok(body) = entities.component_mut::<PhysicsBody>(feet.entity) {
///             body.set_sensing(BodySense::FeetOnGround, true);
///         }
///         Ok(())
///     },
/// );
/// assert_eq!(dispatcher.rule_count(), 1);
/// ```
#[derive(Default)]
pub struct ContactDispatcher {
    rules: HashMap<TagPair, Vec<Rule>>,
}

impl ContactDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for contacts between `first` and `second` in `phase`
    ///
    /// Registration is symmetric: a `Feet`/`Block` handler also fires for
    /// `Block`/`Feet` contacts, with its arguments in `Feet`, `Block` order.
    /// Several handlers may share a pair; they run in registration order.
    pub fn on<F>(
        mut self,
        phase: ContactPhase,
        first: FixtureTag,
        second: FixtureTag,
        handler: F,
    ) -> Self
    where
        F: FnMut(FixtureHandle, FixtureHandle, &mut Entities, f64) -> Result<()> + 'static,
    {
        self.add_handler(phase, first, second, handler);
        self
    }

    /// Register a handler on an existing dispatcher
    pub fn add_handler<F>(
        &mut self,
        phase: ContactPhase,
        first: FixtureTag,
        second: FixtureTag,
        handler: F,
    ) where
        F: FnMut(FixtureHandle, FixtureHandle, &mut Entities, f64) -> Result<()> + 'static,
    {
        self.rules
            .entry(TagPair::new(first, second))
            .or_default()
            .push(Rule {
                phase,
                first,
                second,
                handler: Box::new(handler),
            });
    }

    /// Whether any handler covers the pair in `phase`
    pub fn handles(&self, phase: ContactPhase, a: FixtureTag, b: FixtureTag) -> bool {
        self.rules
            .get(&TagPair::new(a, b))
            .map_or(false, |rules| rules.iter().any(|rule| rule.phase == phase))
    }

    /// Number of registered handlers
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    fn route(
        &mut self,
        phase: ContactPhase,
        contact: &Contact,
        entities: &mut Entities,
        delta: f64,
    ) -> Result<()> {
        let rules = match self.rules.get_mut(&contact.tag_pair()) {
            Some(rules) => rules,
            None => return Ok(()),
        };

        for rule in rules.iter_mut().filter(|rule| rule.phase == phase) {
            if let Some((a, b)) = contact.matches(rule.first, rule.second) {
                trace!("{:?} {:?}/{:?} between {} and {}", phase, a.tag, b.tag, a.entity, b.entity);
                (rule.handler)(a, b, entities, delta)?;
            }
        }
        Ok(())
    }
}

impl ContactListener for ContactDispatcher {
    fn begin_contact(
        &mut self,
        contact: &Contact,
        entities: &mut Entities,
        delta: f64,
    ) -> Result<()> {
        self.route(ContactPhase::Begin, contact, entities, delta)
    }

    fn continue_contact(
        &mut self,
        contact: &Contact,
        entities: &mut Entities,
        delta: f64,
    ) -> Result<()> {
        self.route(ContactPhase::Continue, contact, entities, delta)
    }

    fn end_contact(
        &mut self,
        contact: &Contact,
        entities: &mut Entities,
        delta: f64,
    ) -> Result<()> {
        self.route(ContactPhase::End, contact, entities, delta)
    }
}
