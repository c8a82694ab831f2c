//! Zeroth-order effective charge and energy of a configuration.
//!
//! The electron-electron interaction expectation value splits into direct
//! and exchange sums over orbital pairs; the radial parts are the exact
//! Slater integrals and the angular parts are products of Wigner 3j
//! symbols. Energies are in Hartree atomic units.

use crate::domain::{OccNum, QuantumNumberError, validate_quantum_numbers};
use crate::numerics::wigner_3j;
use crate::zeroth_order::slater::{SlaterError, i_direct, i_exchange};

/// Angular factor of the direct pair interaction for multipole `k`.
pub fn three_j_prod_direct(l: i32, m: i32, l1: i32, m1: i32, k: i32) -> f64 {
    let sign = if (m + m1) % 2 == 0 { 1.0 } else { -1.0 };
    let prefactor = sign * ((2 * l + 1) * (2 * l1 + 1)) as f64;
    prefactor
        * wigner_3j(l, l, k, 0, 0, 0)
        * wigner_3j(l, l, k, m, -m, 0)
        * wigner_3j(l1, l1, k, 0, 0, 0)
        * wigner_3j(l1, l1, k, m1, -m1, 0)
}

/// Angular factor of the exchange pair interaction for multipole `k`.
pub fn three_j_prod_exchange(l: i32, m: i32, l1: i32, m1: i32, k: i32) -> f64 {
    let transfer = m1 - m;
    if transfer.abs() > k {
        return 0.0;
    }
    let sign = if (l + l1 + k) % 2 == 0 { 1.0 } else { -1.0 };
    let prefactor = sign * ((2 * l + 1) * (2 * l1 + 1)) as f64;
    let parallel = wigner_3j(l1, l, k, 0, 0, 0);
    let transferred = wigner_3j(l1, l, k, -m1, m, transfer);
    prefactor * parallel * parallel * transferred * transferred
}

/// Direct interaction of one orbital pair.
pub fn v_direct(n: i32, l: i32, m: i32, n1: i32, l1: i32, m1: i32) -> Result<f64, SlaterError> {
    validate_quantum_numbers(n, l, m)?;
    validate_quantum_numbers(n1, l1, m1)?;
    let mut total = 0.0;
    for k in 0..=l.min(l1) {
        total += 0.5
            * i_direct(n, l, n1, l1, 2 * k)?.to_f64()
            * three_j_prod_direct(l, m, l1, m1, 2 * k);
    }
    Ok(total)
}

/// Exchange interaction of one orbital pair.
pub fn v_exchange(n: i32, l: i32, m: i32, n1: i32, l1: i32, m1: i32) -> Result<f64, SlaterError> {
    validate_quantum_numbers(n, l, m)?;
    validate_quantum_numbers(n1, l1, m1)?;
    let mut total = 0.0;
    for k in (l - l1).abs()..=(l + l1) {
        total += 0.5
            * i_exchange(n, l, n1, l1, k)?.to_f64()
            * three_j_prod_exchange(l, m, l1, m1, k);
    }
    Ok(total)
}

pub fn v_direct_total(occ_nums: &[OccNum]) -> Result<f64, SlaterError> {
    validate_all(occ_nums)?;
    let mut total = 0.0;
    for first in occ_nums {
        for second in occ_nums {
            total += v_direct(first.n, first.l, first.m, second.n, second.l, second.m)?;
        }
    }
    Ok(total)
}

/// Exchange acts only between equal spin projections; the diagonal terms
/// cancel the diagonal of the direct sum.
pub fn v_exchange_total(occ_nums: &[OccNum]) -> Result<f64, SlaterError> {
    validate_all(occ_nums)?;
    let mut total = 0.0;
    for first in occ_nums {
        for second in occ_nums {
            if first.ms != second.ms {
                continue;
            }
            total += v_exchange(first.n, first.l, first.m, second.n, second.l, second.m)?;
        }
    }
    Ok(total)
}

pub fn v_total(occ_nums: &[OccNum]) -> Result<f64, SlaterError> {
    Ok(v_direct_total(occ_nums)? - v_exchange_total(occ_nums)?)
}

/// `a(g) = sum_i 1/(2 n_i^2)`, the hydrogenic binding coefficient.
pub fn hydrogenic_energy_sum(occ_nums: &[OccNum]) -> f64 {
    occ_nums
        .iter()
        .map(|occ_num| 1.0 / (2.0 * (occ_num.n as f64).powi(2)))
        .sum()
}

/// Zeroth-order effective charge `z* = z - v(g) / (2 a(g))`.
pub fn z_star_0th(z: f64, occ_nums: &[OccNum]) -> Result<f64, SlaterError> {
    Ok(z - v_total(occ_nums)? / (2.0 * hydrogenic_energy_sum(occ_nums)))
}

/// Zeroth-order energy `E = -a(g) * z*^2` in Hartree.
pub fn e_0th(z: f64, occ_nums: &[OccNum]) -> Result<f64, SlaterError> {
    let effective_charge = z_star_0th(z, occ_nums)?;
    Ok(-hydrogenic_energy_sum(occ_nums) * effective_charge * effective_charge)
}

pub fn z_star_and_e_0th(z: f64, occ_nums: &[OccNum]) -> Result<(f64, f64), SlaterError> {
    let effective_charge = z_star_0th(z, occ_nums)?;
    let energy = -hydrogenic_energy_sum(occ_nums) * effective_charge * effective_charge;
    Ok((effective_charge, energy))
}

fn validate_all(occ_nums: &[OccNum]) -> Result<(), QuantumNumberError> {
    for occ_num in occ_nums {
        occ_num.validate()?;
    }
    Ok(())
}
