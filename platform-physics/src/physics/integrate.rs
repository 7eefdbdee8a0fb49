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
//! Fixed-step body integration
//!
//! One call advances one body by one fixed step:
//!
//! 1. Snap near-zero velocity components to zero
//! 2. Divide velocity by `max(1, resistance)` per axis
//! 3. Reset resistance to the air-resistance constant
//! 4. Apply gravity, flooring downward speed while grounded
//! 5. Clamp velocity to the body's per-axis cap
//! 6. Translate the rectangle by `velocity * step` and move the fixtures
//!
//! Semi-implicit Euler: position uses the velocity updated in this step.

use crate::physics::body::{BodySense, PhysicsBody};
use crate::physics::config::WorldConfig;
use crate::physics::geometry::Vector2;
use log::warn;

/// Advance a body by one fixed step
pub fn integrate_body(body: &mut PhysicsBody, config: &WorldConfig) {
    let step = config.fixed_time_step;
    let mut velocity = body.velocity();

    if velocity.x.abs() < config.velocity_snap_threshold {
        velocity.x = 0.0;
    }
    if velocity.y.abs() < config.velocity_snap_threshold {
        velocity.y = 0.0;
    }

    let resistance = body.resistance();
    velocity.x *= 1.0 / resistance.x.max(1.0);
    velocity.y *= 1.0 / resistance.y.max(1.0);
    body.reset_resistance(config.air_resistance);

    if body.is_gravity_on() {
        velocity.y += body.gravity() * step;
        if body.is_sensing(BodySense::FeetOnGround) && velocity.y < config.ground_velocity_clamp {
            velocity.y = config.ground_velocity_clamp;
        }
    }

    let cap = body.velocity_clamp();
    velocity = Vector2::new(
        velocity.x.clamp(-cap.x, cap.x),
        velocity.y.clamp(-cap.y, cap.y),
    );

    if !velocity.is_valid() {
        warn!("Discarding non-finite velocity {:?}", velocity);
        velocity = Vector2::zero();
    }

    body.set_velocity_raw(velocity);
    body.begin_step();
    body.rect_mut().translate(velocity.x * step, velocity.y * step);
    body.reposition_fixtures();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyType;
    use crate::physics::fixture::{Fixture, FixtureTag};
    use crate::physics::geometry::Rect;

    fn config() -> WorldConfig {
        WorldConfig::default()
            .with_fixed_time_step(0.01)
            .with_air_resistance(1.0)
    }

    fn body() -> PhysicsBody {
        PhysicsBody::new(BodyType::Dynamic, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn test_translate_by_velocity() {
        let mut body = body();
        body.set_velocity(100.0, -50.0);
        integrate_body(&mut body, &config());

        assert!((body.rect().x - 1.0).abs() < 1e-12);
        assert!((body.rect().y + 0.5).abs() < 1e-12);
        assert_eq!(body.prior_rect().x, 0.0);
    }

    #[test]
    fn test_small_velocity_snaps_to_zero() {
        let mut body = body();
        body.set_velocity(0.2, -0.24);
        integrate_body(&mut body, &config());

        assert_eq!(body.velocity(), Vector2::zero());
        assert_eq!(body.rect().x, 0.0);
    }

    #[test]
    fn test_resistance_divides_and_resets() {
        let mut body = body();
        body.set_velocity(10.0, 10.0);
        body.apply_resistance_x(3.0);
        integrate_body(&mut body, &config());

        assert_eq!(body.velocity(), Vector2::new(2.5, 10.0));
        assert_eq!(body.resistance(), Vector2::splat(1.0));
    }

    #[test]
    fn test_resistance_below_one_never_amplifies() {
        let mut body = body();
        body.set_velocity(10.0, 0.0);
        body.reset_resistance(0.5);
        integrate_body(&mut body, &config());
        assert_eq!(body.velocity().x, 10.0);
    }

    #[test]
    fn test_nan_clamp_leaves_axis_uncapped() {
        let mut body = body().with_velocity_clamp(f64::NAN, 5.0);
        body.set_velocity(300.0, 300.0);
        integrate_body(&mut body, &config());
        assert_eq!(body.velocity(), Vector2::new(300.0, 5.0));
    }

    #[test]
    fn test_gravity_impulse_scaled_by_step() {
        let mut body = body().with_gravity(-100.0);
        integrate_body(&mut body, &config());
        assert!((body.velocity().y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ground_clamp_floors_downward_velocity() {
        for prior in [0.0, -4.0, -5.0, -80.0, -10_000.0] {
            let mut body = body().with_gravity(-100.0);
            body.set_sensing(BodySense::FeetOnGround, true);
            body.set_velocity(0.0, prior);
            integrate_body(&mut body, &config());
            assert!(
                body.velocity().y >= -5.0,
                "prior {} ended at {}",
                prior,
                body.velocity().y
            );
        }
    }

    #[test]
    fn test_ground_clamp_keeps_upward_velocity() {
        let mut body = body().with_gravity(-100.0);
        body.set_sensing(BodySense::FeetOnGround, true);
        body.set_velocity(0.0, 30.0);
        integrate_body(&mut body, &config());
        assert!((body.velocity().y - 29.0).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_clamp() {
        let mut body = body().with_velocity_clamp(5.0, 5.0);
        body.set_velocity(100.0, -100.0);
        integrate_body(&mut body, &config());
        assert_eq!(body.velocity(), Vector2::new(5.0, -5.0));
    }

    #[test]
    fn test_fixtures_follow_body() {
        let mut body = body().with_fixture(
            Fixture::new(FixtureTag::Head, Rect::new(0.0, 0.0, 1.0, 0.2)).with_offset(0.0, 0.5),
        );
        body.set_velocity(100.0, 0.0);
        integrate_body(&mut body, &config());

        let center = body.fixtures()[0].shape().center();
        assert!((center.x - 1.5).abs() < 1e-12);
        assert!((center.y - 1.0).abs() < 1e-12);
    }
}
