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
//! Error types shared by the ECS runtime, the physics world and plugins

use crate::ecs::EntityId;
use thiserror::Error;

/// Errors raised by the engine
///
/// Missing components and unknown entities are programmer errors: they are
/// returned instead of panicking so the host loop decides how to fail, but
/// callers are not expected to recover mid-frame.
#[derive(Debug, Error)]
pub enum Error {
    /// `get_component` was called for a type the entity does not own
    #[error("{entity} has no component of type `{component}`")]
    MissingComponent {
        /// Entity that was queried
        entity: EntityId,
        /// Type name of the requested component
        component: &'static str,
    },

    /// The entity is not in the live registry
    #[error("{0} is not a live entity")]
    UnknownEntity(EntityId),

    /// Invalid world configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A gameplay listener or system reported a failure
    #[error("listener failed: {0}")]
    Listener(String),

    /// A plugin with the same name is already registered
    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    /// The plugin was built against an incompatible API version
    #[error("plugin '{name}' API {plugin_api} is incompatible with engine API {engine_api}")]
    IncompatiblePlugin {
        /// Plugin name
        name: String,
        /// API version reported by the plugin
        plugin_api: String,
        /// API version of this engine
        engine_api: String,
    },

    /// A plugin depends on a plugin that is not registered
    #[error("plugin '{plugin}' depends on '{dependency}' which is not registered")]
    MissingDependency {
        /// Dependent plugin
        plugin: String,
        /// Name of the missing dependency
        dependency: String,
    },

    /// The plugin dependency graph has a cycle
    #[error("circular dependency detected in plugin dependencies")]
    CircularDependency,

    /// The registry was changed or built again after `build_all`
    #[error("plugins have already been built")]
    PluginsAlreadyBuilt,

    /// A plugin failed while installing itself into the manager
    #[error("failed to build plugin '{name}': {source}")]
    PluginBuild {
        /// Plugin name
        name: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
