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
//! Built-in plugin installing the physics world
//!
//! Other plugins that add bodies or contact rules list [`WORLD_PLUGIN_NAME`]
//! as a dependency so the world system is registered first.

use crate::ecs::{Manager, SystemHandle};
use crate::error::Result;
use crate::physics::{ContactDispatcher, WorldConfig, WorldSystem};
use crate::plugins::Plugin;
use std::any::Any;

/// Name the world plugin registers under
pub const WORLD_PLUGIN_NAME: &str = "world";

/// Plugin that registers a [`WorldSystem`] with a [`ContactDispatcher`]
///
/// # Example
///
/// ```rust
/// use platform_physics::ecs::Manager;
/// use platform_physics::physics::{ContactDispatcher, ContactPhase, FixtureTag, WorldConfig};
/// use platform_physics::plugins::{Plugin, WorldPlugin};
///
/// let rules = ContactDispatcher::new().on(
///     ContactPhase::Begin,
///     FixtureTag::Body,
///     FixtureTag::Death,
///     |body, _death, entities, _dt| {
///         if let Some(entity) = entities.get_mut(body.entity) {
///             entity.kill();
///         }
///         Ok(())
///     },
/// );
///
/// let mut plugin = WorldPlugin::new(WorldConfig::default()).with_dispatcher(rules);
/// let mut manager = Manager::new();
/// plugin.build(&mut manager).unwrap();
/// assert!(plugin.handle().is_some());
/// ```
pub struct WorldPlugin {
    config: WorldConfig,
    dispatcher: Option<ContactDispatcher>,
    handle: Option<SystemHandle<WorldSystem>>,
}

impl WorldPlugin {
    /// Create a plugin with the given configuration and no contact rules
    pub fn new(config: WorldConfig) -> Self {
        WorldPlugin {
            config,
            dispatcher: None,
            handle: None,
        }
    }

    /// Use `dispatcher` as the world's global contact listener
    pub fn with_dispatcher(mut self, dispatcher: ContactDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Configuration the world is built with
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Handle to the registered world system, once built
    pub fn handle(&self) -> Option<SystemHandle<WorldSystem>> {
        self.handle
    }
}

impl Default for WorldPlugin {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl Plugin for WorldPlugin {
    fn name(&self) -> &str {
        WORLD_PLUGIN_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn build(&mut self, manager: &mut Manager) -> Result<()> {
        let dispatcher = self.dispatcher.take().unwrap_or_default();
        let world = WorldSystem::try_new(self.config.clone(), dispatcher)?;
        self.handle = Some(manager.add_system(world));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
