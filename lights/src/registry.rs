//! Light Registry

use crate::handle::*;
use crate::quad::*;
use pbrt_core::geometry::*;

/// Interface to the scene's lights. Handles may be invalidated between calls.
pub trait LightRegistry {
    /// Returns the light for a handle or `None` if the handle is not valid.
    ///
    /// * `handle` - The light handle.
    fn light(&self, handle: LightHandle) -> Option<&QuadLight>;

    /// Returns whether the handle still refers to a light.
    ///
    /// * `handle` - The light handle.
    fn is_valid(&self, handle: LightHandle) -> bool {
        self.light(handle).is_some()
    }

    /// Returns the camera position.
    fn camera_position(&self) -> Point3f;
}

/// An in-memory `LightRegistry`. Removed lights leave a hole so the handles
/// of the remaining lights stay stable.
#[derive(Clone, Debug, Default)]
pub struct SceneLights {
    lights: Vec<Option<QuadLight>>,
    camera: Point3f,
}

impl SceneLights {
    /// Returns an empty registry with the camera at `camera`.
    ///
    /// * `camera` - The camera position.
    pub fn new(camera: Point3f) -> Self {
        Self {
            lights: Vec::new(),
            camera,
        }
    }

    /// Adds a light and returns its handle.
    ///
    /// * `light` - The light.
    pub fn add(&mut self, light: QuadLight) -> LightHandle {
        self.lights.push(Some(light));
        LightHandle((self.lights.len() - 1) as i32)
    }

    /// Removes a light. Returns `false` if the handle was not valid.
    ///
    /// * `handle` - The light handle.
    pub fn remove(&mut self, handle: LightHandle) -> bool {
        match handle.index().and_then(|i| self.lights.get_mut(i)) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                debug!("Removed {}", handle);
                true
            }
            _ => false,
        }
    }

    /// Moves the camera.
    ///
    /// * `camera` - The camera position.
    pub fn set_camera(&mut self, camera: Point3f) {
        self.camera = camera;
    }

    /// Returns the handles of all lights currently present.
    pub fn handles(&self) -> Vec<LightHandle> {
        self.lights
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_some())
            .map(|(i, _)| LightHandle(i as i32))
            .collect()
    }
}

impl LightRegistry for SceneLights {
    fn light(&self, handle: LightHandle) -> Option<&QuadLight> {
        handle.index().and_then(|i| self.lights.get(i)).and_then(|l| l.as_ref())
    }

    fn camera_position(&self) -> Point3f {
        self.camera
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> QuadLight {
        QuadLight::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.5, 0.0, 0.0),
            1.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn handles_stay_stable_after_removal() {
        let mut scene = SceneLights::new(Point3f::new(0.0, -3.0, 1.0));
        let a = scene.add(light());
        let b = scene.add(light());
        assert!(scene.is_valid(a) && scene.is_valid(b));

        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert!(!scene.is_valid(a));
        assert!(scene.is_valid(b));
        assert_eq!(scene.handles(), vec![b]);
    }

    #[test]
    fn negative_and_unknown_handles_are_invalid() {
        let scene = SceneLights::new(Point3f::ORIGIN);
        assert!(!scene.is_valid(LightHandle::INVALID));
        assert!(!scene.is_valid(LightHandle(7)));
        assert_eq!(LightHandle::default(), LightHandle::INVALID);
        assert!(scene.camera_position() == Point3f::ORIGIN);
    }
}
