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
//! Scripted platformer level
//!
//! A player runs right across a floor, jumps whenever grounded, bounces off
//! a spring pad, collects coins and stops against a wall. Contact rules set
//! the player's sense flags; the body's pre-process hook plays the role of
//! input handling.
//!
//! Run with `RUST_LOG=debug cargo run --example platformer` to see the
//! engine's log output.

use platform_physics::ecs::{Entities, EntityId, Manager};
use platform_physics::physics::{
    BodySense, BodyType, ContactDispatcher, ContactPhase, Fixture, FixturePayload, FixtureTag,
    PhysicsBody, Rect, Vector2, WorldConfig,
};
use platform_physics::plugins::{Plugin, PluginRegistry, WorldPlugin, WORLD_PLUGIN_NAME};
use platform_physics::Result;
use std::any::Any;

const RUN_SPEED: f64 = 6.0;
const JUMP_SPEED: f64 = 14.0;

fn set_sense(entities: &mut Entities, id: EntityId, sense: BodySense, on: bool) {
    if let Ok(body) = entities.component_mut::<PhysicsBody>(id) {
        body.set_sensing(sense, on);
    }
}

fn contact_rules() -> ContactDispatcher {
    ContactDispatcher::new()
        .on(ContactPhase::Begin, FixtureTag::Feet, FixtureTag::Block, |feet, _, entities, _| {
            set_sense(entities, feet.entity, BodySense::FeetOnGround, true);
            Ok(())
        })
        .on(ContactPhase::End, FixtureTag::Feet, FixtureTag::Block, |feet, _, entities, _| {
            set_sense(entities, feet.entity, BodySense::FeetOnGround, false);
            Ok(())
        })
        .on(ContactPhase::Begin, FixtureTag::SideRight, FixtureTag::Block, |side, _, entities, _| {
            set_sense(entities, side.entity, BodySense::TouchingBlockRight, true);
            Ok(())
        })
        .on(ContactPhase::End, FixtureTag::SideRight, FixtureTag::Block, |side, _, entities, _| {
            set_sense(entities, side.entity, BodySense::TouchingBlockRight, false);
            Ok(())
        })
        .on(
            ContactPhase::Begin,
            FixtureTag::Body,
            FixtureTag::Trigger,
            |player, coin, entities, _| {
                if let Some(entity) = entities.get_mut(coin.entity) {
                    entity.kill();
                }
                println!("  {} picked up a coin", player.entity);
                Ok(())
            },
        )
        .on(ContactPhase::Begin, FixtureTag::Feet, FixtureTag::Spring, |feet, pad, entities, _| {
            let impulse = entities
                .component::<PhysicsBody>(pad.entity)?
                .fixture(pad.index)
                .and_then(|fixture| match fixture.payload() {
                    Some(FixturePayload::Impulse(v)) => Some(*v),
                    _ => None,
                });
            if let Some(v) = impulse {
                entities.component_mut::<PhysicsBody>(feet.entity)?.set_velocity(v.x, v.y);
                println!("  {} hit the spring", feet.entity);
            }
            Ok(())
        })
}

fn block(manager: &mut Manager, rect: Rect) {
    let body = PhysicsBody::new(BodyType::Static, rect)
        .with_friction(0.2, 0.0)
        .with_fixture(Fixture::new(FixtureTag::Block, rect));
    let entity = manager.create_entity().with_component(body);
    manager.add_entity(entity);
}

struct Level {
    player: Option<EntityId>,
}

impl Plugin for Level {
    fn name(&self) -> &str {
        "level"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![WORLD_PLUGIN_NAME]
    }

    fn build(&mut self, manager: &mut Manager) -> Result<()> {
        block(manager, Rect::new(-5.0, 0.0, 60.0, 1.0));
        block(manager, Rect::new(40.0, 1.0, 1.0, 10.0));

        let pad = Rect::new(20.0, 1.0, 2.0, 0.25);
        let spring = PhysicsBody::new(BodyType::Abstract, pad).with_fixture(
            Fixture::new(FixtureTag::Spring, pad)
                .with_payload(FixturePayload::Impulse(Vector2::new(RUN_SPEED, 25.0))),
        );
        let entity = manager.create_entity().with_component(spring);
        manager.add_entity(entity);

        for x in [8.0, 16.0, 30.0] {
            let rect = Rect::new(x, 1.5, 0.5, 0.5);
            let coin = PhysicsBody::new(BodyType::Abstract, rect)
                .with_fixture(Fixture::new(FixtureTag::Trigger, rect));
            let entity = manager.create_entity().with_component(coin);
            manager.add_entity(entity);
        }

        let mut body = PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 1.0, 1.0, 2.0))
            .with_gravity(-40.0)
            .with_velocity_clamp(20.0, 30.0)
            .with_fixture(Fixture::new(FixtureTag::Body, Rect::new(0.0, 0.0, 1.0, 2.0)))
            .with_fixture(
                Fixture::new(FixtureTag::Feet, Rect::new(0.0, 0.0, 0.8, 0.2))
                    .with_offset(0.0, -1.0),
            )
            .with_fixture(
                Fixture::new(FixtureTag::SideRight, Rect::new(0.0, 0.0, 0.2, 1.6))
                    .with_offset(0.5, 0.0),
            );
        body.set_pre_process(|body, _dt| {
            let vy = body.velocity().y;
            if body.is_sensing(BodySense::TouchingBlockRight) {
                body.set_velocity(0.0, vy);
            } else if body.is_sensing(BodySense::FeetOnGround) {
                body.set_velocity(RUN_SPEED, JUMP_SPEED);
            } else {
                body.set_velocity(RUN_SPEED, vy);
            }
        });
        let entity = manager.create_entity().with_component(body);
        self.player = Some(manager.add_entity(entity));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Platform Physics - Scripted Platformer");
    println!("======================================\n");

    let mut registry = PluginRegistry::new();
    let world_plugin = WorldPlugin::new(WorldConfig::default()).with_dispatcher(contact_rules());
    registry.register(Box::new(world_plugin))?;
    registry.register(Box::new(Level { player: None }))?;

    let mut manager = Manager::new();
    registry.build_all(&mut manager)?;
    println!("Built plugins in order: {:?}", registry.load_order());
    println!("Entities: {}\n", manager.entity_count());

    let world = registry
        .get_as::<WorldPlugin>(WORLD_PLUGIN_NAME)
        .and_then(|plugin| plugin.handle());
    let player = registry.get_as::<Level>("level").and_then(|level| level.player);
    let (world, player) = match (world, player) {
        (Some(world), Some(player)) => (world, player),
        _ => {
            eprintln!("Level did not build a world and a player");
            return Ok(());
        }
    };

    let frame = 1.0 / 60.0;
    for tick in 0..600 {
        manager.update_systems(frame)?;

        if tick % 60 == 0 {
            let alpha = manager.system(world).map_or(0.0, |w| w.alpha());
            let body = manager.entities().component::<PhysicsBody>(player)?;
            let shown = body.interpolated_rect(alpha);
            println!(
                "t={:>4.1}s  pos=({:>6.2}, {:>5.2})  vel=({:>5.2}, {:>6.2})  grounded={}",
                tick as f64 * frame,
                shown.x,
                shown.y,
                body.velocity().x,
                body.velocity().y,
                body.is_sensing(BodySense::FeetOnGround)
            );
        }
    }

    if let Some(world) = manager.system(world) {
        println!("\nSteps: {}  dropped: {}", world.steps_taken(), world.dropped_steps());
    }
    println!("Entities left: {}", manager.entity_count());
    Ok(())
}
