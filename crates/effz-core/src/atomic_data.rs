//! Ground-state occupation data for the first ten elements.
//!
//! Subshells fill in the order 1s, 2s, 2p; within a subshell the magnetic
//! quantum number runs from `-l` to `l` and the spin projection from `-1`
//! to `+1`. Because the filling order is cumulative, the configuration of
//! element `Z` is simply the first `Z` entries of the neon table.

use crate::domain::OccNum;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MAX_TABULATED_Z: i32 = 10;

const NEON: [OccNum; 10] = [
    OccNum { n: 1, l: 0, m: 0, ms: -1 },
    OccNum { n: 1, l: 0, m: 0, ms: 1 },
    OccNum { n: 2, l: 0, m: 0, ms: -1 },
    OccNum { n: 2, l: 0, m: 0, ms: 1 },
    OccNum { n: 2, l: 1, m: -1, ms: -1 },
    OccNum { n: 2, l: 1, m: -1, ms: 1 },
    OccNum { n: 2, l: 1, m: 0, ms: -1 },
    OccNum { n: 2, l: 1, m: 0, ms: 1 },
    OccNum { n: 2, l: 1, m: 1, ms: -1 },
    OccNum { n: 2, l: 1, m: 1, ms: 1 },
];

/// Ground-state occupation numbers of element `z`, or `None` beyond the
/// tabulated range.
pub fn ground_state(z: i32) -> Option<&'static [OccNum]> {
    if z < 1 || z > MAX_TABULATED_Z {
        return None;
    }
    Some(&NEON[..z as usize])
}

pub static ELEMENT_NUMBERS: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| {
    HashMap::from([
        ("H", 1),
        ("He", 2),
        ("Li", 3),
        ("Be", 4),
        ("B", 5),
        ("C", 6),
        ("N", 7),
        ("O", 8),
        ("F", 9),
        ("Ne", 10),
    ])
});

pub fn element_number(name: &str) -> Option<i32> {
    ELEMENT_NUMBERS.get(name).copied()
}
