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
//! Plugin registry and loader
//!
//! This module provides the registry for managing plugins, including:
//! - Registration with duplicate and API version checks
//! - Dependency resolution and circular dependency detection
//! - One-shot building into a [`Manager`] in dependency order

use crate::ecs::Manager;
use crate::error::{Error, Result};
use crate::plugins::api::{Plugin, PLUGIN_API_VERSION};
use log::{debug, info};
use semver::Version;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Registry that builds plugins into a manager
///
/// Plugins without a dependency relation between them are built in name
/// order, so the resulting system registration order is reproducible.
///
/// # Example
///
/// ```rust
/// use platform_physics::ecs::Manager;
/// use platform_physics::plugins::{PluginRegistry, WorldPlugin};
///
/// let mut registry = PluginRegistry::new();
/// registry.register(Box::new(WorldPlugin::default())).unwrap();
///
/// let mut manager = Manager::new();
/// registry.build_all(&mut manager).unwrap();
/// assert_eq!(manager.system_count(), 1);
/// ```
pub struct PluginRegistry {
    /// Registered plugins indexed by name
    plugins: HashMap<String, Box<dyn Plugin>>,
    /// Build order (topologically sorted by dependencies)
    load_order: Vec<String>,
    /// Whether `build_all` has succeeded
    built: bool,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        PluginRegistry {
            plugins: HashMap::new(),
            load_order: Vec::new(),
            built: false,
        }
    }

    /// Register a plugin
    ///
    /// # Errors
    ///
    /// - A plugin with the same name is already registered
    /// - The plugin API version is incompatible
    /// - The registry has already been built
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        if self.built {
            return Err(Error::PluginsAlreadyBuilt);
        }

        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(Error::DuplicatePlugin(name));
        }

        let plugin_api = plugin.api_version();
        if !is_version_compatible(plugin_api, PLUGIN_API_VERSION) {
            return Err(Error::IncompatiblePlugin {
                name,
                plugin_api: plugin_api.to_string(),
                engine_api: PLUGIN_API_VERSION.to_string(),
            });
        }

        debug!("Registered plugin '{}' version {}", name, plugin.version());
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Build every plugin into the manager in dependency order
    ///
    /// # Errors
    ///
    /// - Missing dependencies
    /// - Circular dependencies detected
    /// - Plugin build failure, wrapped in [`Error::PluginBuild`]
    /// - The registry has already been built
    pub fn build_all(&mut self, manager: &mut Manager) -> Result<()> {
        if self.built {
            return Err(Error::PluginsAlreadyBuilt);
        }

        let mut dependencies: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, plugin) in &self.plugins {
            let deps: Vec<String> = plugin.dependencies().iter().map(|s| s.to_string()).collect();

            for dep in &deps {
                if !self.plugins.contains_key(dep) {
                    return Err(Error::MissingDependency {
                        plugin: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }

            dependencies.insert(name.clone(), deps);
        }

        self.load_order = topological_sort(&dependencies)?;

        for name in &self.load_order {
            if let Some(plugin) = self.plugins.get_mut(name) {
                plugin.build(manager).map_err(|e| Error::PluginBuild {
                    name: name.clone(),
                    source: Box::new(e),
                })?;
                info!("Built plugin '{}'", name);
            }
        }

        self.built = true;
        Ok(())
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    /// Get a mutable plugin by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Plugin + '_)> {
        self.plugins.get_mut(name).map(|p| &mut **p as &mut (dyn Plugin + '_))
    }

    /// Get a plugin by name, downcast to its concrete type
    pub fn get_as<P: Plugin + 'static>(&self, name: &str) -> Option<&P> {
        self.get(name).and_then(|p| p.as_any().downcast_ref::<P>())
    }

    /// Get the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the plugins have been built
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Names of the plugins in the order they were built
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (plugin_ver, engine_ver) =
        match (Version::parse(plugin_version), Version::parse(engine_version)) {
            (Ok(p), Ok(e)) => (p, e),
            _ => return false,
        };

    if plugin_ver.major != engine_ver.major {
        return false;
    }

    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}

/// Kahn's algorithm over the dependency graph
///
/// Nodes that become ready together are queued in name order. Returns the sorted names, or
/// [`Error::CircularDependency`] if a cycle is left over.
fn topological_sort(dependencies: &BTreeMap<String, Vec<String>>) -> Result<Vec<String>> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for name in dependencies.keys() {
        in_degree.entry(name.as_str()).or_insert(0);
    }

    for (dependent, deps) in dependencies {
        for dep in deps {
            dependents.entry(dep.as_str()).or_default().push(dependent.as_str());
            *in_degree.entry(dependent.as_str()).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut sorted = Vec::with_capacity(dependencies.len());

    while let Some(node) = queue.pop_front() {
        sorted.push(node.to_string());

        if let Some(next) = dependents.get(node) {
            let mut ready: Vec<&str> = Vec::new();
            for dependent in next {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(*dependent);
                    }
                }
            }
            ready.sort_unstable();
            queue.extend(ready);
        }
    }

    if sorted.len() != dependencies.len() {
        return Err(Error::CircularDependency);
    }

    Ok(sorted)
}
