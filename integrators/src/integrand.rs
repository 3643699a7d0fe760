//! Integrand

use crate::config::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::microfacet::*;

/// Position, normal and view direction of the point being shaded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadingPoint {
    /// Position.
    pub position: Point3f,

    /// Unit surface normal.
    pub normal: Vector3f,

    /// Unit direction towards the viewer.
    pub view: Vector3f,
}

impl ShadingPoint {
    /// Create a new `ShadingPoint` viewed from `camera`. A camera at the
    /// shading point looks along the normal.
    ///
    /// * `position` - Position.
    /// * `normal`   - Surface normal; normalized here.
    /// * `camera`   - The camera position.
    pub fn new(position: Point3f, normal: Vector3f, camera: &Point3f) -> Self {
        let normal = normal.normalize();
        let to_camera = *camera - position;
        let view = if to_camera.length_squared() > 0.0 {
            to_camera.normalize()
        } else {
            normal
        };
        Self {
            position,
            normal,
            view,
        }
    }

    /// Returns the mirror direction of the view about the normal.
    pub fn reflected_view(&self) -> Vector3f {
        self.normal * (2.0 * self.view.dot(&self.normal)) - self.view
    }
}

/// The function `L · ρ(d)` integrated over a light's solid angle.
#[derive(Copy, Clone, Debug)]
pub struct Integrand {
    shading: ShadingPoint,
    radiance: Float,
    brdf: Brdf,
    ggx: TrowbridgeReitz,
}

impl Integrand {
    /// Create a new `Integrand`.
    ///
    /// * `shading`   - The shading point.
    /// * `radiance`  - Emitted radiance of the light.
    /// * `brdf`      - BRDF lobes to include.
    /// * `roughness` - GGX roughness.
    pub fn new(shading: &ShadingPoint, radiance: Float, brdf: Brdf, roughness: Float) -> Self {
        Self {
            shading: *shading,
            radiance,
            brdf,
            ggx: TrowbridgeReitz::from_roughness(roughness),
        }
    }

    /// Returns the cosine weighted BRDF `ρ(d)`; 1 for the empty BRDF set.
    ///
    /// * `d` - Unit incident direction.
    pub fn brdf(&self, d: &Vector3f) -> Float {
        if self.brdf.is_empty() {
            return 1.0;
        }
        let n = &self.shading.normal;
        let cos_theta = max(0.0, n.dot(d));
        let mut rho = 0.0;
        if self.brdf.contains(Brdf::DIFFUSE) {
            rho += cos_theta * INV_PI;
        }
        if self.brdf.contains(Brdf::GGX) {
            rho += self.ggx.f(n, &self.shading.view, d) * cos_theta;
        }
        rho
    }

    /// Returns `L · ρ(d)`.
    ///
    /// * `d` - Unit incident direction.
    pub fn evaluate(&self, d: &Vector3f) -> Float {
        self.radiance * self.brdf(d)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
