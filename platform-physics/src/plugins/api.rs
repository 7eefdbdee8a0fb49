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
//! Plugin API traits for game extensions
//!
//! A plugin installs systems and entities into a [`Manager`] once, in
//! dependency order. Gameplay features (enemies, pickups, level geometry)
//! are packaged this way so a game can be assembled from independent parts.
//!
//! # Contracts
//!
//! Plugins must:
//! - Report a name that is unique within a registry
//! - Declare every plugin whose systems or entities they rely on
//! - Not create circular dependencies with other plugins

use crate::ecs::{EntityId, Manager};
use crate::error::Result;
use std::any::Any;

/// Version of the plugin API
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning. See
/// [`PluginRegistry`](crate::plugins::PluginRegistry) for the compatibility rules.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

/// A unit of game setup
pub trait Plugin {
    /// Get the name of this plugin
    ///
    /// Must be unique across all registered plugins.
    fn name(&self) -> &str;

    /// Get the version of this plugin
    ///
    /// Should follow semantic versioning (MAJOR.MINOR.PATCH).
    fn version(&self) -> &str;

    /// Get the plugin API version this plugin was built against
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Names of the plugins that must be built before this one
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Install systems and entities into the manager
    ///
    /// Called exactly once, after every dependency has been built.
    fn build(&mut self, manager: &mut Manager) -> Result<()>;

    /// Allow downcasting to concrete plugin types
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to concrete plugin types
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Plugin that can spawn more of its entities after setup
///
/// Useful for respawning enemies or dropping pickups at runtime.
///
/// # Example
///
/// ```rust
/// use platform_physics::ecs::{EntityId, Manager};
/// use platform_physics::physics::{BodyType, PhysicsBody, Rect};
/// use platform_physics::plugins::{EntityFactory, Plugin};
/// use platform_physics::Result;
/// use std::any::Any;
///
/// struct Crates;
///
/// impl Plugin for Crates {
///     fn name(&self) -> &str { "crates" }
///     fn version(&self) -> &str { "1.0.0" }
///     fn build(&mut self, _manager: &mut Manager) -> Result<()> { Ok(()) }
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
///
/// impl EntityFactory for Crates {
///     fn spawn(&self, manager: &mut Manager, x: f64, y: f64) -> Result<EntityId> {
///         let body = PhysicsBody::new(BodyType::Dynamic, Rect::new(x, y, 1.0, 1.0));
///         let entity = manager.create_entity().with_component(body);
///         Ok(manager.add_entity(entity))
///     }
/// }
///
/// let mut manager = Manager::new();
/// let id = Crates.spawn(&mut manager, 3.0, 4.0).unwrap();
/// assert!(manager.entities().contains(id));
/// ```
pub trait EntityFactory: Plugin {
    /// Create an entity positioned with its bottom-left corner at `(x, y)`
    ///
    /// Entities added while the manager is updating become live on the
    /// next update.
    fn spawn(&self, manager: &mut Manager, x: f64, y: f64) -> Result<EntityId>;
}
