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
//! Axis-aligned platformer physics
//!
//! Bodies are rectangles in a y-up world. Each owns tagged fixtures used
//! for contact detection; the [`WorldSystem`] steps them at a fixed rate
//! and reports contact begin, continue and end events.

mod body;
mod config;
mod contact;
mod fixture;
mod geometry;
mod integrate;
mod listener;
mod resolve;
mod world;

pub use body::{BodyHook, BodySense, BodyType, PhysicsBody};
pub use config::WorldConfig;
pub use contact::{Contact, ContactPhase, FixtureHandle, TagPair};
pub use fixture::{Fixture, FixtureEvent, FixtureListener, FixturePayload, FixtureTag};
pub use geometry::{Circle, Rect, Shape, Vector2};
pub use integrate::integrate_body;
pub use listener::{ContactDispatcher, ContactHandler, ContactListener};
pub use resolve::{resolve_penetration, ResolutionAxis};
pub use world::WorldSystem;
