//! The zeroth-order derivation pipeline: radial wavefunctions, orbital and
//! configuration densities, the plane-wave form-factor transform, and the
//! effective-charge energy sums built on the same exact radial data.

pub mod angular;
pub mod density;
pub mod energy;
pub mod radial;
pub mod scattering;
pub mod slater;

pub use angular::angular_density_polynomial;
pub use density::{DensityMap, rho_h_l, rho_h_l_p};
pub use energy::{
    e_0th, hydrogenic_energy_sum, three_j_prod_direct, three_j_prod_exchange, v_direct,
    v_direct_total, v_exchange, v_exchange_total, v_total, z_star_0th, z_star_and_e_0th,
};
pub use radial::{RadialDensity, RadialWavefunction, h_l_rnl};
pub use scattering::{FormFactor, ScatteringError, asf_h_l, rho_h_l_fourier};
pub use slater::{SlaterError, i_direct, i_exchange};
