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
//! # Platform Physics
//!
//! An ECS (Entity Component System) runtime with a fixed-timestep,
//! axis-aligned physics world for 2D platformers.
//!
//! ## Features
//!
//! - **ECS Runtime**: Entities with typed components, systems with
//!   component masks, deferred entity insertion and death hooks
//! - **Fixed-Step Simulation**: Deterministic accumulator loop with render
//!   interpolation
//! - **Penetration Resolution**: Dynamic bodies are pushed out of static
//!   terrain with friction exchange
//! - **Contact Lifecycle**: Begin, continue and end events per fixture pair,
//!   routed by tag to per-fixture and global listeners
//! - **Extensibility**: Versioned plugins that install systems and entities
//!
//! ## Example
//!
//! ```rust
//! use platform_physics::ecs::Manager;
//! use platform_physics::physics::{
//!     BodyType, Fixture, FixtureTag, PhysicsBody, Rect, WorldConfig, WorldSystem,
//! };
//!
//! let mut manager = Manager::new();
//! manager.add_system(WorldSystem::with_config(WorldConfig::default()));
//!
//! let ground = Rect::new(0.0, 0.0, 100.0, 1.0);
//! let entity = manager.create_entity().with_component(
//!     PhysicsBody::new(BodyType::Static, ground)
//!         .with_fixture(Fixture::new(FixtureTag::Block, ground)),
//! );
//! manager.add_entity(entity);
//!
//! manager.update_systems(1.0 / 60.0).unwrap();
//! ```

#![warn(missing_docs)]

/// Entity Component System runtime
pub mod ecs;

/// Error types
pub mod error;

/// Bodies, fixtures, contacts and the world system
pub mod physics;

/// Plugin system for extensibility
pub mod plugins;

pub use ecs::{Entity, EntityId, Manager};
pub use error::{Error, Result};
