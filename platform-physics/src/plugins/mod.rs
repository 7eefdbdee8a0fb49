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
//! Plugin system for assembling a game from independent parts
//!
//! # Features
//!
//! - **Plugin Trait**: Install systems, contact rules and entities into a manager
//! - **Entity Factories**: Plugins that can spawn their entities at runtime
//! - **Dependency Management**: Automatic dependency resolution with circular dependency detection
//! - **Version Checking**: API version compatibility validation between engine and plugins
//!
//! # Plugin Registration
//!
//! ```rust
//! use platform_physics::ecs::Manager;
//! use platform_physics::plugins::{Plugin, PluginRegistry, WorldPlugin, WORLD_PLUGIN_NAME};
//! use platform_physics::Result;
//! use std::any::Any;
//!
//! struct Level;
//!
//! impl Plugin for Level {
//!     fn name(&self) -> &str { "level" }
//!     fn version(&self) -> &str { "1.0.0" }
//!     fn dependencies(&self) -> Vec<&str> { vec![WORLD_PLUGIN_NAME] }
//!     fn build(&mut self, manager: &mut Manager) -> Result<()> {
//!         let entity = manager.create_entity();
//!         manager.add_entity(entity);
//!         Ok(())
//!     }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(Level)).unwrap();
//! registry.register(Box::new(WorldPlugin::default())).unwrap();
//!
//! let mut manager = Manager::new();
//! registry.build_all(&mut manager).unwrap();
//! assert_eq!(registry.load_order(), &["world", "level"]);
//! ```
//!
//! # Versioning
//!
//! The plugin API follows semantic versioning:
//! - **Major version**: Breaking changes to plugin traits
//! - **Minor version**: Backward-compatible additions (breaking while 0.x)
//! - **Patch version**: Bug fixes only

pub mod api;
pub mod registry;
pub mod world;

pub use api::{EntityFactory, Plugin, PLUGIN_API_VERSION};
pub use registry::PluginRegistry;
pub use world::{WorldPlugin, WORLD_PLUGIN_NAME};
