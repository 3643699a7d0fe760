//! Integration Configuration

use bitflags::bitflags;
use pbrt_core::base::*;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// BRDF lobes included in the integrand. The empty set projects incident
    /// radiance only.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Brdf: u8 {
        const DIFFUSE = 1;
        const GGX = 2;
        const BOTH = Self::DIFFUSE.bits() | Self::GGX.bits();
    }
}

impl FromStr for Brdf {
    type Err = String;

    /// Parses `none`, `diffuse`, `ggx` or `both`.
    ///
    /// * `s` - The name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "radiance" => Ok(Self::empty()),
            "diffuse" => Ok(Self::DIFFUSE),
            "ggx" => Ok(Self::GGX),
            "both" => Ok(Self::BOTH),
            _ => Err(format!("Unknown BRDF '{}'. Expected none, diffuse, ggx or both.", s)),
        }
    }
}

impl fmt::Display for Brdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if *self == Self::BOTH {
            "both"
        } else if *self == Self::DIFFUSE {
            "diffuse"
        } else if *self == Self::GGX {
            "ggx"
        } else {
            "none"
        };
        write!(f, "{}", name)
    }
}

/// Strategy used to integrate one light.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IntegrationMethod {
    /// Monte Carlo sampling of the quad's unit sphere projection split into
    /// triangles that are subdivided near the shading point.
    MonteCarloUnit,

    /// Monte Carlo sampling of the quad's two world space triangles.
    MonteCarloWorld,

    /// Deterministic equi-angular stratification of the quad.
    AngularStratification,

    /// Uniform solid angle sampling of the spherical rectangle.
    SphericalRectangle,

    /// Analytic linearly transformed cosines, projected along the light's
    /// centroid direction.
    Ltc,

    /// Corners and center weighted by the solid angle.
    FivePoint,

    /// Single most representative point along the BRDF lobe axis.
    RepresentativePoint,

    /// Area sampling of the quad projected onto the plane facing its
    /// barycenter.
    PlanarBary,

    /// Area sampling of the quad projected onto the unit sphere tangent plane
    /// at its mean direction.
    PlanarUnit,

    /// Analytic projection of the light's solid angle through zonal
    /// harmonics; radiance only.
    ZonalAnalytic,
}

impl IntegrationMethod {
    /// All methods in declaration order.
    pub const ALL: [Self; 10] = [
        Self::MonteCarloUnit,
        Self::MonteCarloWorld,
        Self::AngularStratification,
        Self::SphericalRectangle,
        Self::Ltc,
        Self::FivePoint,
        Self::RepresentativePoint,
        Self::PlanarBary,
        Self::PlanarUnit,
        Self::ZonalAnalytic,
    ];

    /// Returns the name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MonteCarloUnit => "mc-unit",
            Self::MonteCarloWorld => "mc-world",
            Self::AngularStratification => "angular",
            Self::SphericalRectangle => "spherical-rect",
            Self::Ltc => "ltc",
            Self::FivePoint => "five-point",
            Self::RepresentativePoint => "mrp",
            Self::PlanarBary => "planar-bary",
            Self::PlanarUnit => "planar-unit",
            Self::ZonalAnalytic => "zonal",
        }
    }

    /// Returns whether the method draws random numbers.
    pub fn is_stochastic(&self) -> bool {
        matches!(
            self,
            Self::MonteCarloUnit | Self::MonteCarloWorld | Self::SphericalRectangle | Self::PlanarBary | Self::PlanarUnit
        )
    }
}

impl FromStr for IntegrationMethod {
    type Err = String;

    /// Parses a method from its command line name.
    ///
    /// * `s` - The name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        Self::ALL.iter().find(|m| m.name() == s).copied().ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|m| m.name()).collect();
            format!("Unknown integration method '{}'. Expected one of {}.", s, names.join(", "))
        })
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Settings for one integration call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShIntegrationConfig {
    /// Integration strategy.
    pub method: IntegrationMethod,

    /// BRDF lobes in the integrand.
    pub brdf: Brdf,

    /// Samples per light for sampling strategies.
    pub samples: usize,

    /// GGX roughness in [0, 1].
    pub roughness: Float,

    /// Number of SH bands.
    pub bands: usize,

    /// Whether the visualization normalizes the plotted radius.
    pub normalize: bool,

    /// Random number generator seed.
    pub seed: u64,

    /// Unit triangles whose plane passes closer than this to the shading point
    /// are subdivided.
    pub subdivision_threshold: Float,

    /// Maximum levels of unit triangle subdivision.
    pub max_subdivision_depth: usize,
}

impl Default for ShIntegrationConfig {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::AngularStratification,
            brdf: Brdf::DIFFUSE,
            samples: 1024,
            roughness: 0.5,
            bands: 3,
            normalize: false,
            seed: 0,
            subdivision_threshold: 0.5,
            max_subdivision_depth: 4,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
