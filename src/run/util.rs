// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! Heading conventions.
//!
//! Screen space has `y` growing downwards. A heading of `0` degrees points up the screen and
//! positive headings turn clockwise.

use glam::Vec2;

/// The unit vector pointing up the screen.
pub const UP: Vec2 = Vec2::NEG_Y;

/// The heading pointing down the screen.
pub const DOWN: f32 = 180.;

/// Headings closer than this to their target are considered to have arrived.
pub const ARRIVAL_DISTANCE: f32 = 0.2;

/// Rotate a vector clockwise (on screen) by a number of degrees.
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// The unit vector for a heading.
pub fn heading(degrees: f32) -> Vec2 {
    rotate(UP, degrees)
}

/// The velocity for moving at `speed` along a heading.
pub fn velocity(degrees: f32, speed: f32) -> Vec2 {
    heading(degrees) * speed
}

/// The heading of a direction vector.
///
/// The result is in `(-180, 180]`.
pub fn heading_of(direction: Vec2) -> f32 {
    direction.x.atan2(-direction.y).to_degrees()
}

/// Normalize a heading into `[0, 360)`.
pub fn wrap(degrees: f32) -> f32 {
    degrees.rem_euclid(360.)
}

#[cfg(test)]
mod test {
    use glam::Vec2;

    use crate::run::util;

    fn assert_near(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-5,
            "{:?} != {:?}",
            actual,
            expected,
        );
    }

    #[test]
    fn test_heading_up() {
        assert_near(util::heading(0.), Vec2::new(0., -1.));
    }

    #[test]
    fn test_heading_clockwise() {
        assert_near(util::heading(90.), Vec2::new(1., 0.));
        assert_near(util::heading(180.), Vec2::new(0., 1.));
        assert_near(util::heading(-90.), Vec2::new(-1., 0.));
    }

    #[test]
    fn test_velocity_scales() {
        assert_near(util::velocity(0., 3.), Vec2::new(0., -3.));
        assert_near(util::velocity(90., 2.), Vec2::new(2., 0.));
    }

    #[test]
    fn test_heading_of_inverts_heading() {
        for degrees in &[0., 45., 90., 135., 180., -45., -135.] {
            let back = util::heading_of(util::heading(*degrees));
            assert!((util::wrap(back) - util::wrap(*degrees)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(util::wrap(370.), 10.);
        assert_eq!(util::wrap(-10.), 350.);
        assert_eq!(util::wrap(0.), 0.);
    }
}
