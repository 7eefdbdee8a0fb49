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
//! Penetration resolution between body rectangles
//!
//! Every overlapping pair of non-abstract bodies is examined. The overlap
//! rectangle picks the axis: wider than tall resolves along Y, otherwise
//! along X.
//!
//! Friction is exchanged on the Y axis only, for any pair. The upper body
//! (by rectangle `y`) takes the lower body's X friction as resistance while
//! falling onto it, and the lower body takes the upper body's X friction
//! while rising into it. The X axis has no friction exchange, so walls do
//! not slow sliding bodies.
//!
//! Only a dynamic body overlapping a static body is translated, by the
//! overlap depth; the static body is never touched. Dynamic/dynamic and
//! static/static pairs are not moved.

use crate::physics::body::{BodyType, PhysicsBody};
use crate::physics::geometry::Rect;

/// Axis along which a pair was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionAxis {
    /// Resolved horizontally
    X,
    /// Resolved vertically
    Y,
}

/// Resolve an overlapping pair of bodies
///
/// Returns the axis used, or `None` when the rectangles do not overlap or
/// either body is abstract. A dynamic/static pair is pushed apart; other
/// pairs only exchange friction.
pub fn resolve_penetration(a: &mut PhysicsBody, b: &mut PhysicsBody) -> Option<ResolutionAxis> {
    if a.body_type() == BodyType::Abstract || b.body_type() == BodyType::Abstract {
        return None;
    }
    let overlap = a.rect().intersection(b.rect())?;
    let translate = is_translatable(a.body_type(), b.body_type());

    if overlap.width > overlap.height {
        resolve_y(a, b, &overlap, translate);
        Some(ResolutionAxis::Y)
    } else {
        if translate {
            resolve_x(a, b, &overlap);
        }
        Some(ResolutionAxis::X)
    }
}

fn is_translatable(a: BodyType, b: BodyType) -> bool {
    matches!(
        (a, b),
        (BodyType::Dynamic, BodyType::Static) | (BodyType::Static, BodyType::Dynamic)
    )
}

fn resolve_y(a: &mut PhysicsBody, b: &mut PhysicsBody, overlap: &Rect, translate: bool) {
    let (upper, lower) = if a.rect().y > b.rect().y { (a, b) } else { (b, a) };

    if upper.velocity().y.ceil() < -1.0 {
        upper.apply_resistance_x(lower.friction().x);
    }
    if lower.velocity().y.floor() > 1.0 {
        lower.apply_resistance_x(upper.friction().x);
    }

    if !translate {
        return;
    }
    if upper.body_type() == BodyType::Dynamic {
        upper.rect_mut().y += overlap.height;
    } else {
        lower.rect_mut().y -= overlap.height;
    }
}

fn resolve_x(a: &mut PhysicsBody, b: &mut PhysicsBody, overlap: &Rect) {
    let (right, left) = if a.rect().x > b.rect().x { (a, b) } else { (b, a) };

    if right.body_type() == BodyType::Dynamic {
        right.rect_mut().x += overlap.width;
    } else {
        left.rect_mut().x -= overlap.width;
    }
}
