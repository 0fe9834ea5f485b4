#![forbid(unsafe_code)]

//! Render tick: per-frame smoothing and the signals handed to the renderer.
//!
//! The 3D backdrop owns no section-aware state. Once per display frame the
//! deck smooths the drone position and the barrier angle toward their
//! targets with a single delta-time sample, then hands a [`RenderSignals`]
//! snapshot to the [`PassiveRenderer`].

use std::f64::consts::FRAC_PI_2;

use crate::animation::approach;
use crate::transition::OverlayState;

/// Z of the truck column on the right shoulder.
pub const SHOULDER_Z: f64 = 5.2;
/// Camera rig height above the road.
pub const CAMERA_HEIGHT: f64 = 8.2;
/// Camera rig offset from the shoulder, toward the viewer.
pub const CAMERA_Z_OFFSET: f64 = -10.3;
/// Fixed camera rotation (pitch, yaw, roll) looking along the column.
pub const CAMERA_ROTATION: [f64; 3] = [0.3, FRAC_PI_2, 0.0];

/// Camera position and rotation for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

impl CameraPose {
    /// Pose of the drone rig at `drone_x`.
    #[must_use]
    pub fn at(drone_x: f64) -> Self {
        Self {
            position: [drone_x, CAMERA_HEIGHT, SHOULDER_Z + CAMERA_Z_OFFSET],
            rotation: CAMERA_ROTATION,
        }
    }
}

/// Smoothing rates (per second) for the render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub drone_rate: f64,
    pub barrier_rate: f64,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            drone_rate: 4.0,
            barrier_rate: 6.0,
        }
    }
}

/// Continuously smoothed backdrop state.
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    drone_x: f64,
    drone_target_x: f64,
    barrier_angle: f64,
    barrier_target_angle: f64,
}

impl Backdrop {
    /// Drone parked at `start_x`, barrier closed.
    #[must_use]
    pub fn new(start_x: f64) -> Self {
        Self {
            drone_x: start_x,
            drone_target_x: start_x,
            barrier_angle: 0.0,
            barrier_target_angle: 0.0,
        }
    }

    pub fn set_drone_target(&mut self, x: f64) {
        self.drone_target_x = x;
    }

    pub fn set_barrier_target(&mut self, angle: f64) {
        self.barrier_target_angle = angle;
    }

    #[inline]
    #[must_use]
    pub fn drone_x(&self) -> f64 {
        self.drone_x
    }

    #[inline]
    #[must_use]
    pub fn drone_target_x(&self) -> f64 {
        self.drone_target_x
    }

    #[inline]
    #[must_use]
    pub fn barrier_angle(&self) -> f64 {
        self.barrier_angle
    }

    #[inline]
    #[must_use]
    pub fn barrier_target_angle(&self) -> f64 {
        self.barrier_target_angle
    }

    /// Smooth both channels with the same `dt_secs` sample.
    pub fn tick(&mut self, dt_secs: f64, smoothing: Smoothing) {
        self.drone_x = approach(self.drone_x, self.drone_target_x, dt_secs, smoothing.drone_rate);
        self.barrier_angle = approach(
            self.barrier_angle,
            self.barrier_target_angle,
            dt_secs,
            smoothing.barrier_rate,
        );
    }
}

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSignals {
    pub barrier_angle: f64,
    pub barrier_target_angle: f64,
    pub drone_x: f64,
    pub drone_target_x: f64,
    pub camera: CameraPose,
    pub overlay: OverlayState,
}

impl RenderSignals {
    #[must_use]
    pub fn capture(backdrop: &Backdrop, overlay: OverlayState) -> Self {
        Self {
            barrier_angle: backdrop.barrier_angle(),
            barrier_target_angle: backdrop.barrier_target_angle(),
            drone_x: backdrop.drone_x(),
            drone_target_x: backdrop.drone_target_x(),
            camera: CameraPose::at(backdrop.drone_x()),
            overlay,
        }
    }

    /// Flat layout for hosts that prefer typed arrays:
    /// `[barrier_angle, drone_x, cam_x, cam_y, cam_z, rot_x, rot_y, rot_z,
    ///   overlay_visible, overlay_rotation_y, overlay_alpha]`.
    #[must_use]
    pub fn to_flat(&self) -> [f32; 11] {
        let [cx, cy, cz] = self.camera.position;
        let [rx, ry, rz] = self.camera.rotation;
        [
            self.barrier_angle as f32,
            self.drone_x as f32,
            cx as f32,
            cy as f32,
            cz as f32,
            rx as f32,
            ry as f32,
            rz as f32,
            if self.overlay.visible { 1.0 } else { 0.0 },
            self.overlay.rotation_y as f32,
            self.overlay.alpha as f32,
        ]
    }
}

/// The decorative 3D world. Consumes signals once per tick and holds no
/// section-aware state of its own.
pub trait PassiveRenderer {
    fn render(&mut self, signals: &RenderSignals);
}

/// Renderer that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl PassiveRenderer for NullRenderer {
    fn render(&mut self, _signals: &RenderSignals) {}
}
