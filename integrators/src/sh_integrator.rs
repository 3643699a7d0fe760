//! SH Area Light Integrator

use crate::config::*;
use crate::integrand::*;
use crate::visualization::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::ltc::*;
use pbrt_core::rng::*;
use pbrt_core::sh::*;
use pbrt_core::spherical::*;
use lights::*;
use shapes::*;

/// Projects the light arriving at a shading point from a set of quad lights
/// onto spherical harmonics.
///
/// Each light is integrated into its own coefficient buffer which is added to
/// a running total together with the light's scalar integration weight
/// `∫ L ρ dω`. The total is finally scaled by the sum of the weights divided
/// by the number of lights visited, culled lights included.
pub struct ShIntegrator {
    /// The SH basis evaluator.
    basis: ArcShBasis,

    /// LTC fit used by the analytic method.
    ltc: LtcTable,

    /// Receives the coefficients after every `recompute`.
    sink: Option<Box<dyn VisualizationSink>>,

    /// Coefficients of the last `recompute`.
    coefficients: Vec<Float>,
}

impl ShIntegrator {
    /// Create a new `ShIntegrator`.
    ///
    /// * `basis` - The SH basis evaluator.
    /// * `ltc`   - LTC fit used by the analytic method.
    pub fn new(basis: ArcShBasis, ltc: LtcTable) -> Self {
        Self {
            basis,
            ltc,
            sink: None,
            coefficients: Vec::new(),
        }
    }

    /// Sets the visualization sink.
    ///
    /// * `sink` - The sink.
    pub fn with_sink(mut self, sink: Box<dyn VisualizationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Returns the coefficients of the last `recompute`.
    pub fn coefficients(&self) -> &[Float] {
        &self.coefficients
    }

    /// Integrates, stores the coefficients and forwards them to the
    /// visualization sink. Sink failures are logged and otherwise ignored.
    ///
    /// * `registry` - The scene's lights.
    /// * `handles`  - Active light handles.
    /// * `shading`  - The shading point.
    /// * `config`   - Integration settings.
    pub fn recompute<R: LightRegistry + ?Sized>(
        &mut self,
        registry: &R,
        handles: &[LightHandle],
        shading: &ShadingPoint,
        config: &ShIntegrationConfig,
    ) -> &[Float] {
        self.coefficients = self.integrate(registry, handles, shading, config);
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.rebuild(&self.coefficients, config.bands, config.normalize) {
                error!("Visualization rebuild failed: {}", err);
            }
        }
        &self.coefficients
    }

    /// Returns the SH coefficients of the light arriving at `shading`. Calls
    /// with identical inputs return identical results.
    ///
    /// * `registry` - The scene's lights.
    /// * `handles`  - Active light handles.
    /// * `shading`  - The shading point.
    /// * `config`   - Integration settings.
    pub fn integrate<R: LightRegistry + ?Sized>(
        &self,
        registry: &R,
        handles: &[LightHandle],
        shading: &ShadingPoint,
        config: &ShIntegrationConfig,
    ) -> Vec<Float> {
        let terms = sh_terms(config.bands);
        let mut total = vec![0.0; terms];
        let mut weight_sum = 0.0;
        let mut light_count = 0_usize;
        let mut rng = RNG::new(config.seed);

        for handle in handles.iter() {
            let light = match registry.light(*handle) {
                Some(light) => light,
                None => {
                    debug!("Skipping invalid {}", handle);
                    continue;
                }
            };
            light_count += 1;

            if is_culled(light, shading, config.brdf) {
                debug!("Culled {}", handle);
                continue;
            }

            let mut coeffs = vec![0.0; terms];
            match self.integrate_light(light, shading, config, &mut rng, &mut coeffs) {
                Ok(weight) => {
                    weight_sum += weight;
                    for (t, c) in total.iter_mut().zip(coeffs.iter()) {
                        *t += c;
                    }
                }
                Err(err) => error!("{} contributes nothing: {}", handle, err),
            }
        }

        if light_count > 0 {
            let scale = weight_sum / light_count as Float;
            for t in total.iter_mut() {
                *t *= scale;
            }
        }
        debug!(
            "Integrated {} lights with {}; weight sum {}",
            light_count, config.method, weight_sum
        );
        total
    }

    /// Integrates one light into `coeffs` and returns its integration weight.
    ///
    /// * `light`   - The light.
    /// * `shading` - The shading point.
    /// * `config`  - Integration settings.
    /// * `rng`     - Random number generator.
    /// * `coeffs`  - Coefficients to add to.
    fn integrate_light(
        &self,
        light: &QuadLight,
        shading: &ShadingPoint,
        config: &ShIntegrationConfig,
        rng: &mut RNG,
        coeffs: &mut [Float],
    ) -> Result<Float, String> {
        let integrand = Integrand::new(shading, light.radiance, config.brdf, config.roughness);
        let f = |d: &Vector3f| integrand.evaluate(d);
        let basis = self.basis.as_ref();
        let bands = config.bands;
        let p = &shading.position;
        let corners = light.corners();
        let n = config.samples;

        let weight = match config.method {
            IntegrationMethod::MonteCarloUnit => {
                let q: Vec<Vector3f> = corners.iter().map(|c| *c - *p).collect();
                let triangles: Vec<Triangle> = [
                    Triangle::unit(&q[0], &q[1], &q[2]),
                    Triangle::unit(&q[0], &q[2], &q[3]),
                ]
                .iter()
                .flat_map(|t| {
                    t.subdivide_until(&Point3f::ORIGIN, config.subdivision_threshold, config.max_subdivision_depth)
                })
                .collect();
                integrate_triangles(&triangles, p, n, rng, &f, basis, bands, coeffs)
            }
            IntegrationMethod::MonteCarloWorld => {
                let triangles = [
                    Triangle::world(&corners[0], &corners[1], &corners[2]),
                    Triangle::world(&corners[0], &corners[2], &corners[3]),
                ];
                integrate_triangles(&triangles, p, n, rng, &f, basis, bands, coeffs)
            }
            IntegrationMethod::AngularStratification => {
                light.rectangle().integrate_angular(p, n, f, basis, bands, coeffs)
            }
            IntegrationMethod::SphericalRectangle => {
                let (c, u, v) = (light.center, light.half_u, light.half_v);
                match SphericalRectangle::new(p, &(c - u - v), &(u * 2.0), &(v * 2.0)) {
                    Some(sr) => sr.integrate(n, rng, f, basis, bands, coeffs),
                    None => 0.0,
                }
            }
            IntegrationMethod::FivePoint => light.rectangle().integrate_structured(p, f, basis, bands, coeffs),
            IntegrationMethod::RepresentativePoint => {
                let axis = if config.brdf.contains(Brdf::GGX) {
                    shading.reflected_view()
                } else if config.brdf.contains(Brdf::DIFFUSE) {
                    shading.normal
                } else {
                    (light.center - *p).normalize()
                };
                light.rectangle().integrate_mrp(p, &axis, f, basis, bands, coeffs)
            }
            IntegrationMethod::PlanarBary => match PlanarRectangle::init_bary(p, &corners) {
                Some(pr) => pr.integrate(n, rng, f, basis, bands, coeffs),
                None => 0.0,
            },
            IntegrationMethod::PlanarUnit => match PlanarRectangle::init_unit(p, &corners) {
                Some(pr) => pr.integrate(n, rng, f, basis, bands, coeffs),
                None => 0.0,
            },
            IntegrationMethod::Ltc => self.integrate_ltc(light, shading, config, coeffs)?,
            IntegrationMethod::ZonalAnalytic => {
                if !config.brdf.is_empty() {
                    return Err(format!(
                        "zonal projection integrates radiance only but BRDF '{}' was selected",
                        config.brdf
                    ));
                }
                let polygon = SphericalPolygon::from_points(p, &corners);
                let projection = project_polygon(&polygon, bands, basis);
                for (c, v) in coeffs.iter_mut().zip(projection.iter()) {
                    *c += light.radiance * v;
                }
                light.radiance * polygon.solid_angle()
            }
        };
        Ok(weight)
    }

    /// Evaluates the selected lobes analytically and projects the result
    /// along the direction to the light's centroid.
    ///
    /// * `light`   - The light.
    /// * `shading` - The shading point.
    /// * `config`  - Integration settings.
    /// * `coeffs`  - Coefficients to add to.
    fn integrate_ltc(
        &self,
        light: &QuadLight,
        shading: &ShadingPoint,
        config: &ShIntegrationConfig,
        coeffs: &mut [Float],
    ) -> Result<Float, String> {
        if config.brdf.is_empty() {
            return Err("LTC integration needs a diffuse or GGX BRDF".to_string());
        }

        let (n, v, p) = (&shading.normal, &shading.view, &shading.position);
        let corners = light.corners();
        let mut response = 0.0;
        if config.brdf.contains(Brdf::DIFFUSE) {
            response += ltc_evaluate(n, v, p, &IDENTITY_MATRIX3, &corners, light.two_sided);
        }
        if config.brdf.contains(Brdf::GGX) {
            let coords = LtcTable::ltc_coords(n.dot(v), config.roughness);
            let minv = self.ltc.ltc_matrix(&coords);
            let (norm, _fresnel) = self.ltc.ltc_amplitude(&coords);
            response += ltc_evaluate(n, v, p, &minv, &corners, light.two_sided) * norm;
        }

        let weight = light.radiance * response;
        let centroid = Point3f::centroid(&corners);
        let d = (centroid - *p).normalize();
        let y = self.basis.evaluate(config.bands, &d);
        for (c, y) in coeffs.iter_mut().zip(y.iter()) {
            *c += weight * y;
        }
        Ok(weight)
    }
}

/// Returns whether a light cannot contribute at the shading point: one sided
/// lights seen from behind, or lights entirely below the tangent plane when
/// a BRDF is applied.
///
/// * `light`   - The light.
/// * `shading` - The shading point.
/// * `brdf`    - Selected BRDF lobes.
pub fn is_culled(light: &QuadLight, shading: &ShadingPoint, brdf: Brdf) -> bool {
    if !light.illuminates(&shading.position) {
        return true;
    }
    !brdf.is_empty()
        && light
            .corners()
            .iter()
            .all(|c| shading.normal.dot(&(*c - shading.position)) <= 0.0)
}

/// Splits `n_samples` over triangles in proportion to their area and
/// integrates each.
#[allow(clippy::too_many_arguments)]
fn integrate_triangles<F>(
    triangles: &[Triangle],
    origin: &Point3f,
    n_samples: usize,
    rng: &mut RNG,
    f: &F,
    basis: &dyn ShBasis,
    bands: usize,
    coeffs: &mut [Float],
) -> Float
where
    F: Fn(&Vector3f) -> Float,
{
    let total_area: Float = triangles.iter().map(|t| t.flat_area()).sum();
    if total_area <= 0.0 {
        return 0.0;
    }
    triangles
        .iter()
        .map(|t| {
            let share = (n_samples as Float * t.flat_area() / total_area).round() as usize;
            t.integrate(origin, max(share, 1), rng, f, basis, bands, coeffs)
        })
        .sum()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use std::sync::Arc;

    fn light(two_sided: bool) -> QuadLight {
        QuadLight::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.5, 0.0, 0.0),
            1.0,
            two_sided,
        )
        .unwrap()
    }

    fn shading() -> ShadingPoint {
        ShadingPoint::new(Point3f::ORIGIN, Vector3f::Z_AXIS, &Point3f::new(0.0, -1.0, 1.0))
    }

    #[test]
    fn culling_rules() {
        let s = shading();
        assert!(!is_culled(&light(false), &s, Brdf::DIFFUSE));

        let above = ShadingPoint::new(Point3f::new(0.0, 0.0, 2.0), Vector3f::Z_AXIS, &Point3f::ORIGIN);
        assert!(is_culled(&light(false), &above, Brdf::empty()));
        assert!(is_culled(&light(true), &above, Brdf::DIFFUSE));
        assert!(!is_culled(&light(true), &above, Brdf::empty()));
    }

    #[test]
    fn single_light_scaled_by_its_weight() {
        let integrator = ShIntegrator::new(Arc::new(RealSphericalHarmonics::new()), LtcTable::identity());
        let mut scene = SceneLights::new(Point3f::new(0.0, -1.0, 1.0));
        let h = scene.add(light(false));
        let config = ShIntegrationConfig {
            method: IntegrationMethod::AngularStratification,
            bands: 2,
            samples: 256,
            ..Default::default()
        };

        let mut raw = vec![0.0; 4];
        let integrand = Integrand::new(&shading(), 1.0, config.brdf, config.roughness);
        let weight = light(false).rectangle().integrate_angular(
            &Point3f::ORIGIN,
            256,
            |d: &Vector3f| integrand.evaluate(d),
            &RealSphericalHarmonics::new(),
            2,
            &mut raw,
        );

        let c = integrator.integrate(&scene, &[h], &shading(), &config);
        for (a, b) in c.iter().zip(raw.iter()) {
            assert!(approx_eq!(Float, *a, b * weight, epsilon = 1e-6));
        }
    }

    #[test]
    fn ltc_without_brdf_contributes_nothing() {
        let integrator = ShIntegrator::new(Arc::new(RealSphericalHarmonics::new()), LtcTable::identity());
        let mut scene = SceneLights::new(Point3f::ORIGIN);
        let h = scene.add(light(false));
        let config = ShIntegrationConfig {
            method: IntegrationMethod::Ltc,
            brdf: Brdf::empty(),
            ..Default::default()
        };
        let c = integrator.integrate(&scene, &[h], &shading(), &config);
        assert!(c.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn ltc_diffuse_weight_is_irradiance() {
        let integrator = ShIntegrator::new(Arc::new(RealSphericalHarmonics::new()), LtcTable::identity());
        let config = ShIntegrationConfig {
            method: IntegrationMethod::Ltc,
            brdf: Brdf::DIFFUSE,
            bands: 2,
            ..Default::default()
        };
        let mut coeffs = vec![0.0; 4];
        let mut rng = RNG::new(0);
        let weight = integrator
            .integrate_light(&light(false), &shading(), &config, &mut rng, &mut coeffs)
            .unwrap();

        let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &light(false).corners());
        let expected = polygon.axial_moment(&Vector3f::Z_AXIS, 1)[1] * INV_PI;
        assert!(approx_eq!(Float, weight, expected, epsilon = 1e-4));
        // Projected along the centroid direction, which is +z.
        assert!(approx_eq!(Float, coeffs[1], 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, coeffs[3], 0.0, epsilon = 1e-6));
        assert!(coeffs[2] > 0.0);
    }

    #[test]
    fn zonal_matches_angular_for_radiance() {
        let integrator = ShIntegrator::new(Arc::new(RealSphericalHarmonics::new()), LtcTable::identity());
        let mut zonal = vec![0.0; 9];
        let mut angular = vec![0.0; 9];
        let mut rng = RNG::new(0);
        let base = ShIntegrationConfig {
            brdf: Brdf::empty(),
            bands: 3,
            samples: 4096,
            ..Default::default()
        };
        let wz = integrator
            .integrate_light(
                &light(false),
                &shading(),
                &ShIntegrationConfig {
                    method: IntegrationMethod::ZonalAnalytic,
                    ..base
                },
                &mut rng,
                &mut zonal,
            )
            .unwrap();
        let wa = integrator
            .integrate_light(
                &light(false),
                &shading(),
                &ShIntegrationConfig {
                    method: IntegrationMethod::AngularStratification,
                    ..base
                },
                &mut rng,
                &mut angular,
            )
            .unwrap();
        assert!(approx_eq!(Float, wz, wa, epsilon = 1e-3));
        for (z, a) in zonal.iter().zip(angular.iter()) {
            assert!(abs(z - a) < 1e-3, "{} vs {}", z, a);
        }

        let err = integrator.integrate_light(
            &light(false),
            &shading(),
            &ShIntegrationConfig {
                method: IntegrationMethod::ZonalAnalytic,
                brdf: Brdf::DIFFUSE,
                ..base
            },
            &mut rng,
            &mut zonal,
        );
        assert!(err.is_err());
    }
}
