//! Per-frame behaviors attached to nodes.
//!
//! A [`Controller`] is called once per frame by [`Scene::update`] with a
//! [`NodeMut`] for the node it is attached to. Input arrives through
//! [`NodeMut::input`], which is the snapshot the scene was given for the frame.
//!
//! [`Scene::update`]: crate::Scene::update

use orrery_math::{Quaternion, Vector2, Vector3, angle};
use tracing::trace;

use crate::node::NodeId;
use crate::scene::NodeMut;

/// Behavior hook invoked every frame for the node that owns it.
pub trait Controller {
    fn update(&mut self, node: &mut NodeMut<'_>, delta_t: f64);
}

impl<F> Controller for F
where
    F: FnMut(&mut NodeMut<'_>, f64),
{
    fn update(&mut self, node: &mut NodeMut<'_>, delta_t: f64) {
        self(node, delta_t)
    }
}

/// Largest rotation one frame of mouse look may apply, in radians.
const MAX_LOOK_STEP: f64 = 0.4;

/// Free-fly first-person controller.
///
/// Cursor motion turns the node (yaw about world Y, pitch about local X,
/// pitch held within ±89°). Movement input moves it in its own basis:
/// x strafes along right, y moves along forward, z lifts along up.
#[derive(Clone, Debug)]
pub struct FpsController {
    move_speed: f64,
    look_speed: f64,
    yaw: f64,
    pitch: f64,
}

impl FpsController {
    /// `move_speed` in units per second, `look_speed_deg` in degrees per unit
    /// of cursor motion.
    pub fn new(move_speed: f64, look_speed_deg: f64) -> Self {
        Self {
            move_speed,
            look_speed: angle::to_radians(look_speed_deg),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Start looking in the direction of `rotation`.
    pub fn with_orientation(mut self, rotation: Quaternion) -> Self {
        let euler = rotation.to_euler();
        self.pitch = euler.x;
        self.yaw = euler.y;
        self
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }
}

impl Controller for FpsController {
    fn update(&mut self, node: &mut NodeMut<'_>, delta_t: f64) {
        let input = node.input();

        let max_pitch = angle::to_radians(89.0);
        let pitch_step = angle::clamp(
            -input.cursor_delta.y * self.look_speed,
            -MAX_LOOK_STEP,
            MAX_LOOK_STEP,
        );
        let yaw_step = angle::clamp(
            -input.cursor_delta.x * self.look_speed,
            -MAX_LOOK_STEP,
            MAX_LOOK_STEP,
        );
        self.pitch = angle::clamp(self.pitch + pitch_step, -max_pitch, max_pitch);
        self.yaw = angle::wrap_radians(self.yaw + yaw_step);
        node.set_rotation_euler(Vector3::new(self.pitch, self.yaw, 0.0));

        let local = input.movement;
        if local.magnitude_squared() == 0.0 {
            return;
        }
        let local = local.normalized();
        let basis = node.local_transform();
        let step = (basis.right() * local.x + basis.forward() * local.y + basis.up() * local.z)
            * self.move_speed
            * delta_t;
        let position = node.position() + step;
        node.set_position(position);
    }
}

/// Pins a node to another node's global transform.
///
/// `offset` is expressed in the anchor's local space. Meant for root nodes:
/// the result is written as the follower's local position and rotation.
#[derive(Clone, Debug)]
pub struct FollowController {
    anchor: NodeId,
    offset: Vector3,
}

impl FollowController {
    pub fn new(anchor: NodeId, offset: Vector3) -> Self {
        Self { anchor, offset }
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }
}

impl Controller for FollowController {
    fn update(&mut self, node: &mut NodeMut<'_>, _delta_t: f64) {
        let Some(mut anchor) = node.scene().global_transform(self.anchor) else {
            trace!("Follow anchor {} is gone", self.anchor);
            return;
        };
        anchor.translate(self.offset);
        node.set_position(anchor.translation());
        node.set_rotation(anchor.rotation());
    }
}

/// Vehicle-style flight: steer with the cursor, throttle with forward input.
///
/// Forward speed eases towards `base_speed + thrust * (max_speed - base_speed)`
/// by at most `accel_rate * dt` per frame, and sideways drift decays by
/// `exp(-strafe_damping * dt)`. Writes velocity only; the scene integrates it.
#[derive(Clone, Debug)]
pub struct ThrustController {
    pub base_speed: f64,
    pub max_speed: f64,
    pub accel_rate: f64,
    pub strafe_damping: f64,
    pub turn_speed: f64,
    yaw: f64,
    pitch: f64,
}

impl Default for ThrustController {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            max_speed: 25.0,
            accel_rate: 20.0,
            strafe_damping: 16.0,
            turn_speed: 0.25,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl ThrustController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for ThrustController {
    fn update(&mut self, node: &mut NodeMut<'_>, delta_t: f64) {
        let input = node.input();

        self.yaw -= input.cursor_delta.x * self.turn_speed * delta_t;
        self.pitch -= input.cursor_delta.y * self.turn_speed * delta_t;
        node.set_rotation_euler(Vector3::new(self.pitch, self.yaw, 0.0));

        let forward = node.local_transform().forward();
        let velocity = node.velocity();

        let mut forward_speed = velocity.dot(forward);
        let lateral = velocity - forward * forward_speed;

        let thrust = angle::clamp(input.movement.y, 0.0, 1.0);
        let target_speed = self.base_speed + thrust * (self.max_speed - self.base_speed);
        let max_delta = self.accel_rate * delta_t;
        forward_speed += angle::clamp(target_speed - forward_speed, -max_delta, max_delta);

        let lateral = lateral * (-self.strafe_damping * delta_t).exp();
        node.set_velocity(forward * forward_speed + lateral);
    }
}

/// Visual banking for a mesh under a steered parent.
///
/// Low-pass filters the cursor and slerps the node's local rotation towards a
/// pitch/roll tilt proportional to it, clamped to `max_pitch_deg` and
/// `max_roll_deg`.
#[derive(Clone, Debug)]
pub struct SmoothTiltController {
    pub input_smoothing: f64,
    pub follow_speed: f64,
    pub max_pitch_deg: f64,
    pub max_roll_deg: f64,
    smoothed_cursor: Vector2,
}

impl Default for SmoothTiltController {
    fn default() -> Self {
        Self {
            input_smoothing: 10.0,
            follow_speed: 2.0,
            max_pitch_deg: 15.0,
            max_roll_deg: 55.0,
            smoothed_cursor: Vector2::ZERO,
        }
    }
}

impl SmoothTiltController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smoothed_cursor(&self) -> Vector2 {
        self.smoothed_cursor
    }
}

impl Controller for SmoothTiltController {
    fn update(&mut self, node: &mut NodeMut<'_>, delta_t: f64) {
        let raw = node.input().cursor_delta;
        let alpha = 1.0 - (-self.input_smoothing * delta_t).exp();
        self.smoothed_cursor += (raw - self.smoothed_cursor) * alpha;

        let max_pitch = angle::to_radians(self.max_pitch_deg);
        let max_roll = angle::to_radians(self.max_roll_deg);
        let pitch = angle::clamp(-self.smoothed_cursor.y * max_pitch, -max_pitch, max_pitch);
        let roll = angle::clamp(-self.smoothed_cursor.x * max_roll, -max_roll, max_roll);
        let target = Quaternion::from_euler(Vector3::new(pitch, 0.0, roll));

        let weight = 1.0 - (-self.follow_speed * delta_t).exp();
        let rotation = node.rotation().slerp(target, weight);
        node.set_rotation(rotation);
    }
}
