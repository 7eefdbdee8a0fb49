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
//! End-to-end tests for the world system
//!
//! Covers the contact lifecycle, fixed-step determinism, grounded velocity
//! clamping and penetration resolution through full manager updates.

use platform_physics::ecs::{Entities, EntityId, Manager, SystemHandle};
use platform_physics::physics::{
    BodySense, BodyType, ContactDispatcher, ContactPhase, Fixture, FixtureHandle, FixtureTag,
    PhysicsBody, Rect, WorldConfig, WorldSystem,
};
use std::cell::RefCell;
use std::rc::Rc;

type EventLog = Rc<RefCell<Vec<String>>>;

fn config() -> WorldConfig {
    WorldConfig::default()
        .with_fixed_time_step(0.01)
        .with_air_resistance(1.0)
}

fn add_body(manager: &mut Manager, body: PhysicsBody) -> EntityId {
    let entity = manager.create_entity().with_component(body);
    manager.add_entity(entity)
}

fn ground(manager: &mut Manager) -> EntityId {
    let rect = Rect::new(-50.0, 0.0, 100.0, 1.0);
    add_body(
        manager,
        PhysicsBody::new(BodyType::Static, rect)
            .with_friction(0.5, 0.0)
            .with_fixture(Fixture::new(FixtureTag::Block, rect)),
    )
}

fn record(
    log: &EventLog,
    label: &'static str,
) -> impl FnMut(FixtureHandle, FixtureHandle, &mut Entities, f64) -> platform_physics::Result<()> {
    let log = Rc::clone(log);
    move |_, _, _, _| {
        log.borrow_mut().push(label.to_string());
        Ok(())
    }
}

fn trigger_world(log: &EventLog) -> (Manager, SystemHandle<WorldSystem>) {
    let dispatcher = ContactDispatcher::new()
        .on(ContactPhase::Begin, FixtureTag::Body, FixtureTag::Trigger, record(log, "begin"))
        .on(ContactPhase::Continue, FixtureTag::Body, FixtureTag::Trigger, record(log, "continue"))
        .on(ContactPhase::End, FixtureTag::Body, FixtureTag::Trigger, record(log, "end"));

    let mut manager = Manager::new();
    let world = manager.add_system(WorldSystem::new(config(), dispatcher));

    let zone = Rect::new(3.5, 0.0, 3.0, 1.0);
    add_body(
        &mut manager,
        PhysicsBody::new(BodyType::Abstract, zone)
            .with_fixture(Fixture::new(FixtureTag::Trigger, zone)),
    );

    (manager, world)
}

#[test]
fn test_contact_lifecycle_is_complete_and_ordered() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, world) = trigger_world(&log);

    // One unit per step through a trigger spanning x in (3.5, 6.5)
    let fixture_log = Rc::clone(&log);
    let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
    let body_fixture = Fixture::new(FixtureTag::Body, rect).on(
        ContactPhase::Begin,
        FixtureTag::Trigger,
        move |event| {
            assert_eq!(event.own.tag, FixtureTag::Body);
            assert_eq!(event.other.tag, FixtureTag::Trigger);
            fixture_log.borrow_mut().push("fixture-begin".to_string());
            Ok(())
        },
    );
    let mut runner = PhysicsBody::new(BodyType::Dynamic, rect).with_fixture(body_fixture);
    runner.set_velocity(100.0, 0.0);
    add_body(&mut manager, runner);

    for _ in 0..12 {
        manager.update_systems(0.01).unwrap();
    }

    assert_eq!(
        *log.borrow(),
        vec!["fixture-begin", "begin", "continue", "continue", "continue", "end"]
    );
    assert!(manager.system(world).unwrap().contacts().is_empty());
}

#[test]
fn test_end_fires_for_removed_entity() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, _world) = trigger_world(&log);

    let rect = Rect::new(4.0, 0.0, 1.0, 1.0);
    let id = add_body(
        &mut manager,
        PhysicsBody::new(BodyType::Dynamic, rect)
            .with_fixture(Fixture::new(FixtureTag::Body, rect)),
    );

    manager.update_systems(0.01).unwrap();
    manager.update_systems(0.01).unwrap();
    assert_eq!(*log.borrow(), vec!["begin", "continue"]);

    manager.entities_mut().entity_mut(id).unwrap().kill();
    manager.update_systems(0.01).unwrap();
    assert!(!manager.entities().contains(id));
    assert_eq!(*log.borrow(), vec!["begin", "continue", "end"]);
}

fn falling_box(manager: &mut Manager) -> EntityId {
    let mut body =
        PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 3.0, 1.0, 1.0)).with_gravity(-50.0);
    body.set_velocity(2.0, 0.0);
    add_body(manager, body)
}

#[test]
fn test_fixed_step_determinism() {
    let mut split = Manager::new();
    let split_world = split.add_system(WorldSystem::with_config(config()));
    let a = falling_box(&mut split);
    for delta in [0.01, 0.02, 0.005] {
        split.update_systems(delta).unwrap();
    }

    let mut whole = Manager::new();
    let whole_world = whole.add_system(WorldSystem::with_config(config()));
    let b = falling_box(&mut whole);
    whole.update_systems(0.035).unwrap();

    let split_system = split.system(split_world).unwrap();
    let whole_system = whole.system(whole_world).unwrap();
    assert_eq!(split_system.steps_taken(), 3);
    assert_eq!(whole_system.steps_taken(), 3);
    assert!((split_system.accumulator() - 0.005).abs() < 1e-9);
    assert!((whole_system.accumulator() - 0.005).abs() < 1e-9);

    let body_a = split.entities().component::<PhysicsBody>(a).unwrap();
    let body_b = whole.entities().component::<PhysicsBody>(b).unwrap();
    assert_eq!(body_a.rect(), body_b.rect());
    assert_eq!(body_a.velocity(), body_b.velocity());
}

#[test]
fn test_whole_frame_matches_equal_frames() {
    let run = |deltas: &[f64]| {
        let mut manager = Manager::new();
        let world = manager.add_system(WorldSystem::with_config(config()));
        let id = falling_box(&mut manager);
        for delta in deltas {
            manager.update_systems(*delta).unwrap();
        }
        let steps = manager.system(world).unwrap().steps_taken();
        let body = manager.entities().component::<PhysicsBody>(id).unwrap();
        (steps, *body.rect(), body.velocity())
    };

    let (whole_steps, whole_rect, whole_velocity) = run(&[0.03]);
    let (split_steps, split_rect, split_velocity) = run(&[0.01, 0.01, 0.01]);
    assert_eq!(whole_steps, 3);
    assert_eq!(split_steps, 3);
    assert!((whole_rect.x - split_rect.x).abs() < 1e-9);
    assert!((whole_rect.y - split_rect.y).abs() < 1e-9);
    assert!((whole_velocity.y - split_velocity.y).abs() < 1e-9);
}

fn feet_rules() -> ContactDispatcher {
    ContactDispatcher::new()
        .on(ContactPhase::Begin, FixtureTag::Feet, FixtureTag::Block, |feet, _, entities, _| {
            if let Ok(body) = entities.component_mut::<PhysicsBody>(feet.entity) {
                body.set_sensing(BodySense::FeetOnGround, true);
            }
            Ok(())
        })
        .on(ContactPhase::End, FixtureTag::Feet, FixtureTag::Block, |feet, _, entities, _| {
            if let Ok(body) = entities.component_mut::<PhysicsBody>(feet.entity) {
                body.set_sensing(BodySense::FeetOnGround, false);
            }
            Ok(())
        })
}

fn player(x: f64, y: f64) -> PhysicsBody {
    PhysicsBody::new(BodyType::Dynamic, Rect::new(x, y, 1.0, 2.0))
        .with_gravity(-100.0)
        .with_fixture(
            Fixture::new(FixtureTag::Feet, Rect::new(0.0, 0.0, 0.8, 0.2)).with_offset(0.0, -1.0),
        )
}

#[test]
fn test_ground_clamp_and_landing() {
    let mut manager = Manager::new();
    manager.add_system(WorldSystem::new(config(), feet_rules()));
    ground(&mut manager);
    let id = add_body(&mut manager, player(0.0, 3.0));

    let mut grounded_frames = 0;
    for _ in 0..200 {
        let was_grounded = manager
            .entities()
            .component::<PhysicsBody>(id)
            .unwrap()
            .is_sensing(BodySense::FeetOnGround);

        manager.update_systems(0.01).unwrap();

        let body = manager.entities().component::<PhysicsBody>(id).unwrap();
        if was_grounded {
            grounded_frames += 1;
            assert!(body.velocity().y >= -5.0, "grounded body fell at {}", body.velocity().y);
        }
    }

    let body = manager.entities().component::<PhysicsBody>(id).unwrap();
    assert!(grounded_frames > 100);
    assert!(body.is_sensing(BodySense::FeetOnGround));
    assert!((body.rect().y - 1.0).abs() < 0.1, "resting at {}", body.rect().y);
}

#[test]
fn test_static_terrain_never_moves() {
    let mut manager = Manager::new();
    manager.add_system(WorldSystem::new(config(), feet_rules()));
    let floor = ground(&mut manager);

    let wall_rect = Rect::new(3.0, 1.0, 1.0, 10.0);
    let wall = add_body(
        &mut manager,
        PhysicsBody::new(BodyType::Static, wall_rect)
            .with_fixture(Fixture::new(FixtureTag::Block, wall_rect)),
    );

    let mut runner = player(0.0, 1.0);
    runner.set_velocity(8.0, 0.0);
    runner.set_pre_process(|body, _| {
        let vy = body.velocity().y;
        body.set_velocity(8.0, vy);
    });
    let runner = add_body(&mut manager, runner);

    let floor_before = *manager.entities().component::<PhysicsBody>(floor).unwrap().rect();
    for _ in 0..100 {
        manager.update_systems(0.01).unwrap();
    }

    let entities = manager.entities();
    let floor_rect = entities.component::<PhysicsBody>(floor).unwrap().rect();
    let wall_after = entities.component::<PhysicsBody>(wall).unwrap().rect();
    assert_eq!(floor_rect.x.to_bits(), floor_before.x.to_bits());
    assert_eq!(floor_rect.y.to_bits(), floor_before.y.to_bits());
    assert_eq!(wall_after.x.to_bits(), wall_rect.x.to_bits());
    assert_eq!(wall_after.y.to_bits(), wall_rect.y.to_bits());

    // Pushed back along X every step, so it ends flush against the wall
    let runner_rect = entities.component::<PhysicsBody>(runner).unwrap().rect();
    assert!(runner_rect.max_x() <= 3.0 + 1e-9, "runner at {}", runner_rect.x);
    assert!(runner_rect.max_x() > 2.8);
}

#[test]
fn test_interpolation_tracks_remainder() {
    let mut manager = Manager::new();
    let world = manager.add_system(WorldSystem::with_config(config()));
    let mut body = PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 0.0, 1.0, 1.0));
    body.set_velocity(100.0, 0.0);
    let id = add_body(&mut manager, body);

    manager.update_systems(0.015).unwrap();

    let alpha = manager.system(world).unwrap().alpha();
    assert!((alpha - 0.5).abs() < 1e-6);
    let body = manager.entities().component::<PhysicsBody>(id).unwrap();
    let shown = body.interpolated_rect(alpha);
    assert!((shown.x - 0.5).abs() < 1e-6);
}
