//! Calculation reports: computed results bundled with their banner
//! rendering and serializable for machine consumption.

use crate::common::constants::HARTREE_EV;
use crate::domain::{OccNum, QuantumNumberError};
use crate::input::{InputError, parse_format_strings};
use crate::symbolic::Expr;
use crate::zeroth_order::density::rho_h_l;
use crate::zeroth_order::energy::z_star_and_e_0th;
use crate::zeroth_order::scattering::{ScatteringError, asf_h_l};
use crate::zeroth_order::slater::SlaterError;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Slater(#[from] SlaterError),
    #[error(transparent)]
    Scattering(#[from] ScatteringError),
    #[error(transparent)]
    QuantumNumbers(#[from] QuantumNumberError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculation {
    Energy,
    Density,
    ScatteringFactor,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergyReport {
    pub name: String,
    pub z: i32,
    pub z_star: f64,
    pub energy: f64,
    pub energy_ev: f64,
    pub occ_nums: Vec<OccNum>,
}

impl EnergyReport {
    pub fn compute(name: &str, z: i32, occ_nums: &[OccNum]) -> Result<Self, SlaterError> {
        let (z_star, energy) = z_star_and_e_0th(z as f64, occ_nums)?;
        Ok(Self {
            name: name.to_string(),
            z,
            z_star,
            energy,
            energy_ev: energy * HARTREE_EV,
            occ_nums: occ_nums.to_vec(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = banner_header(&self.name, self.z);
        let _ = writeln!(out, "*** z_star = {} ***", self.z_star);
        let _ = writeln!(out, "*** energy = {} ***", self.energy);
        let _ = writeln!(out, "*** energy_ev = {} ***", self.energy_ev);
        push_occ_nums(&mut out, &self.occ_nums);
        out.push_str("*************************************\n");
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DensityReport {
    pub name: String,
    pub z: i32,
    pub density: String,
    pub density_latex: String,
    pub occ_nums: Vec<OccNum>,
}

impl DensityReport {
    /// The density is reported symbolically in `z`, `r` and `theta`; the
    /// numeric charge is recorded alongside for context.
    pub fn compute(name: &str, z: i32, occ_nums: &[OccNum]) -> Result<Self, QuantumNumberError> {
        let expression = rho_h_l(
            &Expr::symbol("z"),
            occ_nums,
            &Expr::symbol("r"),
            &Expr::symbol("theta"),
            &Expr::symbol("phi"),
        )?;
        Ok(Self {
            name: name.to_string(),
            z,
            density: expression.to_string(),
            density_latex: expression.latex(),
            occ_nums: occ_nums.to_vec(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = banner_header(&self.name, self.z);
        out.push_str("*** density start *******************\n");
        let _ = writeln!(out, "{}", self.density);
        out.push_str("*** density end *********************\n");
        out.push_str("*** density latex start *************\n");
        let _ = writeln!(out, "{}", self.density_latex);
        out.push_str("*** density latex end ***************\n");
        push_occ_nums(&mut out, &self.occ_nums);
        out.push_str("*************************************\n");
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AsfReport {
    pub name: String,
    pub z: i32,
    pub asf: String,
    pub asf_latex: String,
    pub occ_nums: Vec<OccNum>,
}

impl AsfReport {
    pub fn compute(name: &str, z: i32, occ_nums: &[OccNum]) -> Result<Self, ScatteringError> {
        let expression = asf_h_l(&Expr::symbol("z"), occ_nums, &Expr::symbol("s"))?;
        Ok(Self {
            name: name.to_string(),
            z,
            asf: expression.to_string(),
            asf_latex: expression.latex(),
            occ_nums: occ_nums.to_vec(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = banner_header(&self.name, self.z);
        out.push_str("*** asf start ***********************\n");
        let _ = writeln!(out, "{}", self.asf);
        out.push_str("*** asf end *************************\n");
        out.push_str("*** asf latex start *****************\n");
        let _ = writeln!(out, "{}", self.asf_latex);
        out.push_str("*** asf latex end *******************\n");
        push_occ_nums(&mut out, &self.occ_nums);
        out.push_str("*************************************\n");
        out
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Energy(EnergyReport),
    Density(DensityReport),
    Asf(AsfReport),
}

impl Report {
    pub fn render(&self) -> String {
        match self {
            Self::Energy(report) => report.render(),
            Self::Density(report) => report.render(),
            Self::Asf(report) => report.render(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("reports serialize")
    }
}

/// Reports computed from one format string, with its optional `-o` target.
#[derive(Debug, Clone)]
pub struct ReportBatch {
    pub reports: Vec<Report>,
    pub output_path: Option<PathBuf>,
}

/// Parses format strings and computes the requested calculation for every
/// charge and configuration they name.
pub fn parse_and_compute(
    calculation: Calculation,
    input: &str,
) -> Result<Vec<ReportBatch>, ReportError> {
    let mut batches = Vec::new();
    for ast in parse_format_strings(input)? {
        let mut reports = Vec::new();
        for z in &ast.charges {
            for entry in &ast.occ_nums.entries {
                let report = match calculation {
                    Calculation::Energy => {
                        Report::Energy(EnergyReport::compute(&entry.label, *z, &entry.occ_nums)?)
                    }
                    Calculation::Density => Report::Density(DensityReport::compute(
                        &entry.label,
                        *z,
                        &entry.occ_nums,
                    )?),
                    Calculation::ScatteringFactor => {
                        Report::Asf(AsfReport::compute(&entry.label, *z, &entry.occ_nums)?)
                    }
                };
                reports.push(report);
            }
        }
        batches.push(ReportBatch {
            reports,
            output_path: ast.output_path.clone(),
        });
    }
    Ok(batches)
}

fn banner_header(name: &str, z: i32) -> String {
    let mut out = String::new();
    out.push_str("*************************************\n");
    out.push_str("*****The calculation result is:******\n");
    let _ = writeln!(out, "*** \"{name}\" ***");
    let _ = writeln!(out, "*** z = {z} ***");
    out
}

fn push_occ_nums(out: &mut String, occ_nums: &[OccNum]) {
    out.push_str("*** occupation numbers start ********\n");
    for occ_num in occ_nums {
        let _ = writeln!(out, "  {occ_num}");
    }
    out.push_str("*** occupation numbers end **********\n");
}
