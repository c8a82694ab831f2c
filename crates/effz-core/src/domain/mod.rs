//! Occupation numbers and their validation rules.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Largest supported principal quantum number. Matches the input domain of
/// the occupation-number parser and keeps every factorial the exact kernels
/// evaluate inside `i128` range.
pub const MAX_PRINCIPAL: i32 = 7;

/// One occupied spin orbital: principal, orbital, magnetic quantum numbers
/// and the spin projection (`-1` or `+1`). A configuration lists one entry
/// per electron, so spin-paired orbitals appear twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OccNum {
    pub n: i32,
    pub l: i32,
    pub m: i32,
    pub ms: i32,
}

pub type OccNums = Vec<OccNum>;

impl OccNum {
    pub fn new(n: i32, l: i32, m: i32, ms: i32) -> Result<Self, QuantumNumberError> {
        let occ_num = Self { n, l, m, ms };
        occ_num.validate()?;
        Ok(occ_num)
    }

    pub fn validate(&self) -> Result<(), QuantumNumberError> {
        validate_quantum_numbers(self.n, self.l, self.m)?;
        if self.ms != 1 && self.ms != -1 {
            return Err(QuantumNumberError::SpinOutOfRange { ms: self.ms });
        }
        Ok(())
    }

    /// Spectroscopic subshell label, e.g. `2p`.
    pub fn subshell(&self) -> String {
        let letter = match self.l {
            0 => 's',
            1 => 'p',
            2 => 'd',
            3 => 'f',
            4 => 'g',
            5 => 'h',
            _ => 'i',
        };
        format!("{}{letter}", self.n)
    }
}

impl Display for OccNum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, {}, {}, {}}}", self.n, self.l, self.m, self.ms)
    }
}

/// Validates the spatial quantum numbers shared by every pipeline stage.
pub fn validate_quantum_numbers(n: i32, l: i32, m: i32) -> Result<(), QuantumNumberError> {
    if n < 1 || n > MAX_PRINCIPAL {
        return Err(QuantumNumberError::PrincipalOutOfRange { n });
    }
    if l < 0 || l > n - 1 {
        return Err(QuantumNumberError::OrbitalOutOfRange { n, l });
    }
    if m < -l || m > l {
        return Err(QuantumNumberError::MagneticOutOfRange { l, m });
    }
    Ok(())
}

pub fn validate_configuration(occ_nums: &[OccNum]) -> Result<(), QuantumNumberError> {
    for occ_num in occ_nums {
        occ_num.validate()?;
    }
    Ok(())
}

pub fn electron_count(occ_nums: &[OccNum]) -> usize {
    occ_nums.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuantumNumberError {
    #[error("principal quantum number must be in 1..={MAX_PRINCIPAL}, got n={n}")]
    PrincipalOutOfRange { n: i32 },
    #[error("orbital quantum number must satisfy 0 <= l <= n-1, got l={l} for n={n}")]
    OrbitalOutOfRange { n: i32, l: i32 },
    #[error("angular momentum degree must be >= 0, got l={l}")]
    DegreeOutOfRange { l: i32 },
    #[error("magnetic quantum number must satisfy -l <= m <= l, got m={m} for l={l}")]
    MagneticOutOfRange { l: i32, m: i32 },
    #[error("spin projection must be -1 or +1, got ms={ms}")]
    SpinOutOfRange { ms: i32 },
}
