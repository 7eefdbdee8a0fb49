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
//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS runtime:
//! - Entities owning a typed bag of components and a liveness flag
//! - Per-entity component storage with enable flags
//! - Systems bound to a required-component mask
//! - A manager driving membership and the per-frame system lifecycle

mod component;
mod entities;
mod entity;
mod manager;
mod system;

pub use component::{Component, ComponentMask, ComponentStore};
pub use entities::Entities;
pub use entity::{DeathHook, Entity, EntityId};
pub use manager::Manager;
pub use system::{System, SystemBase, SystemHandle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_creation() {
        let manager = Manager::new();
        assert_eq!(manager.entity_count(), 0);
    }

    #[test]
    fn test_entity_creation() {
        let mut manager = Manager::new();
        let entity = manager.create_entity();
        let id = manager.add_entity(entity);
        assert_eq!(manager.entity_count(), 1);
        assert!(manager.entities().contains(id));
    }
}
