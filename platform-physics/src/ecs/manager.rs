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
//! Entity/system manager
//!
//! The manager owns every entity and every system and drives one update per
//! frame. Systems execute sequentially in registration order, which keeps
//! the frame deterministic with respect to system ordering.
//!
//! # Update order
//!
//! 1. Entities queued during the previous update become live.
//! 2. Every live entity is reconciled: dead entities leave all systems, run
//!    their death hook and are dropped; living entities join or leave
//!    systems according to their component masks.
//! 3. Every enabled system runs its pre-process, per-entity and
//!    post-process stages.

use crate::ecs::{Entities, Entity, EntityId, System, SystemHandle};
use crate::error::Result;
use log::{debug, trace};

/// Owner of all entities and systems
///
/// # Examples
///
/// ```
/// use platform_physics::ecs::Manager;
///
/// let mut manager = Manager::new();
/// let entity = manager.create_entity();
/// let id = manager.add_entity(entity);
/// manager.update_systems(1.0 / 60.0).unwrap();
/// assert!(manager.entities().contains(id));
/// ```
pub struct Manager {
    entities: Entities,
    systems: Vec<Box<dyn System>>,
}

impl Manager {
    /// Create an empty manager
    pub fn new() -> Self {
        Manager {
            entities: Entities::new(),
            systems: Vec::new(),
        }
    }

    /// Create a detached entity with a fresh id
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create_entity()
    }

    /// Add an entity
    ///
    /// Outside an update the entity is live immediately. Systems and hooks
    /// that add entities during an update go through
    /// [`Entities::add_entity`], which queues them for the next update.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.entities.add_entity(entity)
    }

    /// Read access to the entity registry
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Mutable access to the entity registry
    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Register a system and return a typed handle to it
    ///
    /// Systems run in registration order.
    pub fn add_system<S: System>(&mut self, system: S) -> SystemHandle<S> {
        let handle = SystemHandle::new(self.systems.len());
        debug!("Registered system {} at index {}", system.name(), handle.index());
        self.systems.push(Box::new(system));
        handle
    }

    /// Get a registered system through its handle
    pub fn system<S: System>(&self, handle: SystemHandle<S>) -> Option<&S> {
        self.systems
            .get(handle.index())
            .and_then(|system| system.as_any().downcast_ref::<S>())
    }

    /// Get a registered system mutably through its handle
    pub fn system_mut<S: System>(&mut self, handle: SystemHandle<S>) -> Option<&mut S> {
        self.systems
            .get_mut(handle.index())
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Names of the registered systems in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    /// Run one frame
    ///
    /// Errors from systems, listeners and death hooks abort the frame and
    /// are returned to the caller; state touched before the failure is left
    /// as is.
    pub fn update_systems(&mut self, delta: f64) -> Result<()> {
        let flushed = self.entities.flush_pending();
        if flushed > 0 {
            trace!("Flushed {} queued entities", flushed);
        }

        self.entities.set_deferring(true);
        let result = self
            .reconcile_membership()
            .and_then(|()| self.run_systems(delta));
        self.entities.set_deferring(false);
        result
    }

    fn reconcile_membership(&mut self) -> Result<()> {
        for id in self.entities.ids() {
            let dead = match self.entities.get(id) {
                Some(entity) => entity.is_dead(),
                None => continue,
            };

            if dead {
                self.tear_down(id)?;
                continue;
            }

            let entity = match self.entities.get(id) {
                Some(entity) => entity,
                None => continue,
            };
            for system in &mut self.systems {
                let qualifies = system.base().qualifies(entity);
                let member = system.base().contains(id);
                if qualifies && !member {
                    system.base_mut().add_member(id);
                    system.on_member_added(id);
                } else if !qualifies && member {
                    system.base_mut().remove_member(id);
                    system.on_member_removed(id);
                }
            }
        }
        Ok(())
    }

    fn tear_down(&mut self, id: EntityId) -> Result<()> {
        for system in &mut self.systems {
            if system.base_mut().remove_member(id) {
                system.on_member_removed(id);
            }
        }

        let hook = self.entities.get_mut(id).and_then(|entity| entity.take_on_death());
        if let Some(hook) = hook {
            hook(id, &mut self.entities)?;
        }

        self.entities.remove(id);
        debug!("Removed dead {}", id);
        Ok(())
    }

    fn run_systems(&mut self, delta: f64) -> Result<()> {
        for system in &mut self.systems {
            if !system.base().is_enabled() {
                continue;
            }

            system.pre_process(&mut self.entities, delta)?;
            for id in system.base().members() {
                system.process_entity(id, &mut self.entities, delta)?;
            }
            system.post_process(&mut self.entities, delta)?;
        }
        Ok(())
    }

    /// Drop every entity and clear every system's membership
    pub fn purge_all_entities(&mut self) {
        self.entities.clear();
        for system in &mut self.systems {
            system.base_mut().purge();
        }
        debug!("Purged all entities");
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, ComponentMask, SystemBase};
    use std::any::Any;

    struct Marker;
    impl Component for Marker {}

    struct CountingSystem {
        base: SystemBase,
        processed: usize,
        frames: usize,
    }

    impl CountingSystem {
        fn new() -> Self {
            CountingSystem {
                base: SystemBase::new(ComponentMask::new().with::<Marker>()),
                processed: 0,
                frames: 0,
            }
        }
    }

    impl System for CountingSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn process_entity(
            &mut self,
            _id: EntityId,
            _entities: &mut Entities,
            _delta: f64,
        ) -> Result<()> {
            self.processed += 1;
            Ok(())
        }

        fn post_process(&mut self, _entities: &mut Entities, _delta: f64) -> Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_manager_creation() {
        let manager = Manager::new();
        assert_eq!(manager.entity_count(), 0);
        assert_eq!(manager.system_count(), 0);
    }

    #[test]
    fn test_membership_follows_mask() {
        let mut manager = Manager::new();
        let handle = manager.add_system(CountingSystem::new());

        let entity = manager.create_entity().with_component(Marker);
        let id = manager.add_entity(entity);
        manager.update_systems(0.1).unwrap();

        let system = manager.system(handle).unwrap();
        assert!(system.base().contains(id));
        assert_eq!(system.processed, 1);

        manager
            .entities_mut()
            .get_mut(id)
            .unwrap()
            .remove_component::<Marker>();
        manager.update_systems(0.1).unwrap();

        let system = manager.system(handle).unwrap();
        assert!(!system.base().contains(id));
        assert_eq!(system.processed, 1);
    }

    #[test]
    fn test_disabled_system_tracks_but_skips() {
        let mut manager = Manager::new();
        let handle = manager.add_system(CountingSystem::new());
        manager.system_mut(handle).unwrap().base_mut().set_enabled(false);

        let entity = manager.create_entity().with_component(Marker);
        let id = manager.add_entity(entity);
        manager.update_systems(0.1).unwrap();

        let system = manager.system(handle).unwrap();
        assert!(system.base().contains(id));
        assert_eq!(system.processed, 0);
        assert_eq!(system.frames, 0);
    }

    #[test]
    fn test_purge_all_entities() {
        let mut manager = Manager::new();
        let handle = manager.add_system(CountingSystem::new());
        for _ in 0..3 {
            let entity = manager.create_entity().with_component(Marker);
            manager.add_entity(entity);
        }
        manager.update_systems(0.1).unwrap();
        assert_eq!(manager.system(handle).unwrap().base().member_count(), 3);

        manager.purge_all_entities();
        assert_eq!(manager.entity_count(), 0);
        assert_eq!(manager.system(handle).unwrap().base().member_count(), 0);
    }

    #[test]
    fn test_dead_entity_removed() {
        let mut manager = Manager::new();
        let handle = manager.add_system(CountingSystem::new());
        let entity = manager.create_entity().with_component(Marker);
        let id = manager.add_entity(entity);
        manager.update_systems(0.1).unwrap();

        manager.entities_mut().get_mut(id).unwrap().kill();
        manager.update_systems(0.1).unwrap();

        assert!(!manager.entities().contains(id));
        assert!(!manager.system(handle).unwrap().base().contains(id));
    }

    #[test]
    fn test_system_names_in_order() {
        let mut manager = Manager::new();
        manager.add_system(CountingSystem::new());
        let names = manager.system_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("CountingSystem"));
    }
}
