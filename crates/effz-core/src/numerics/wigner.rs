//! Wigner 3j symbols for integer angular momenta.
//!
//! Evaluated through the Racah single-sum formula with cached logarithmic
//! factorials; selection-rule violations short-circuit to zero before any
//! floating-point work happens.

/// Computes the Wigner 3j coefficient `(j1 j2 j3; m1 m2 m3)` for integer
/// angular momenta.
pub fn wigner_3j(j1: i32, j2: i32, j3: i32, m1: i32, m2: i32, m3: i32) -> f64 {
    if j1 < 0 || j2 < 0 || j3 < 0 {
        return 0.0;
    }
    if m1 + m2 + m3 != 0 {
        return 0.0;
    }
    if m1.abs() > j1 || m2.abs() > j2 || m3.abs() > j3 {
        return 0.0;
    }
    if j3 < (j1 - j2).abs() || j3 > j1 + j2 {
        return 0.0;
    }

    let term_min = 0.max(j2 - j3 - m1).max(j1 - j3 + m2);
    let term_max = (j1 + j2 - j3).min(j1 - m1).min(j2 + m2);
    if term_min > term_max {
        return 0.0;
    }

    let mut log_factorial = LogFactorial::new();
    let mut prefactor_log = log_factorial.value(j1 + j2 - j3)
        + log_factorial.value(j1 - j2 + j3)
        + log_factorial.value(-j1 + j2 + j3)
        - log_factorial.value(j1 + j2 + j3 + 1)
        + log_factorial.value(j1 + m1)
        + log_factorial.value(j1 - m1)
        + log_factorial.value(j2 + m2)
        + log_factorial.value(j2 - m2)
        + log_factorial.value(j3 + m3)
        + log_factorial.value(j3 - m3);
    prefactor_log *= 0.5;

    let mut total = 0.0;
    for term in term_min..=term_max {
        let denominator_log = log_factorial.value(term)
            + log_factorial.value(j1 + j2 - j3 - term)
            + log_factorial.value(j1 - m1 - term)
            + log_factorial.value(j2 + m2 - term)
            + log_factorial.value(j3 - j2 + m1 + term)
            + log_factorial.value(j3 - j1 - m2 + term);
        let magnitude = (prefactor_log - denominator_log).exp();
        if term % 2 == 0 {
            total += magnitude;
        } else {
            total -= magnitude;
        }
    }

    if (j1 - j2 - m3).rem_euclid(2) != 0 {
        total = -total;
    }
    total
}

/// Incrementally extended table of `ln(n!)`.
struct LogFactorial {
    values: Vec<f64>,
}

impl LogFactorial {
    fn new() -> Self {
        Self { values: vec![0.0] }
    }

    fn value(&mut self, argument: i32) -> f64 {
        assert!(argument >= 0, "log factorial of a negative argument");
        let argument = argument as usize;
        while self.values.len() <= argument {
            let next = self.values.len();
            let extended = self.values[next - 1] + (next as f64).ln();
            self.values.push(extended);
        }
        self.values[argument]
    }
}

#[cfg(test)]
mod tests {
    use super::wigner_3j;

    #[test]
    fn selection_rule_violations_return_zero() {
        // m1 + m2 + m3 != 0
        assert_eq!(wigner_3j(1, 1, 0, 0, 0, 1), 0.0);
        // triangle inequality violation
        assert_eq!(wigner_3j(1, 1, 4, 0, 0, 0), 0.0);
        // |m| > j
        assert_eq!(wigner_3j(1, 1, 0, 2, -2, 0), 0.0);
    }

    #[test]
    fn stretched_configuration_matches_closed_form() {
        // (j1 j2 j1+j2; j1 j2 -(j1+j2)) has magnitude sqrt((2j1)!(2j2)!/(2J+1)!)
        let actual = wigner_3j(1, 2, 3, 1, 2, -3);
        let expected = (2.0 * 24.0 / 5040.0_f64).sqrt();
        assert!((actual - expected).abs() <= 1.0e-14);
    }

    #[test]
    fn matches_tabulated_reference_values() {
        let cases = [
            ("(0,0,0;0,0,0)", wigner_3j(0, 0, 0, 0, 0, 0), 1.0),
            (
                "(1,1,0;0,0,0)",
                wigner_3j(1, 1, 0, 0, 0, 0),
                -1.0 / 3.0_f64.sqrt(),
            ),
            (
                "(1,1,2;0,0,0)",
                wigner_3j(1, 1, 2, 0, 0, 0),
                (2.0_f64 / 15.0).sqrt(),
            ),
            (
                "(2,2,0;0,0,0)",
                wigner_3j(2, 2, 0, 0, 0, 0),
                1.0 / 5.0_f64.sqrt(),
            ),
            (
                "(1,1,2;1,-1,0)",
                wigner_3j(1, 1, 2, 1, -1, 0),
                1.0 / 30.0_f64.sqrt(),
            ),
            (
                "(2,1,1;0,0,0)",
                wigner_3j(2, 1, 1, 0, 0, 0),
                (2.0_f64 / 15.0).sqrt(),
            ),
        ];
        for (label, actual, expected) in cases {
            assert!(
                (actual - expected).abs() <= 1.0e-14,
                "{label} expected={expected:.15e} actual={actual:.15e}",
            );
        }
    }

    #[test]
    fn respects_column_swap_symmetry() {
        // odd permutation of columns multiplies by (-1)^(j1+j2+j3)
        for (j1, j2, j3, m1, m2, m3) in [(2, 1, 1, 1, -1, 0), (3, 2, 1, 1, 0, -1)] {
            let direct = wigner_3j(j1, j2, j3, m1, m2, m3);
            let swapped = wigner_3j(j2, j1, j3, m2, m1, m3);
            let phase = if (j1 + j2 + j3) % 2 == 0 { 1.0 } else { -1.0 };
            assert!(
                (direct - phase * swapped).abs() <= 1.0e-14,
                "column swap symmetry broken for ({j1},{j2},{j3})",
            );
        }
    }
}
