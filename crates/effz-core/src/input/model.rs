use crate::domain::OccNums;
use std::path::PathBuf;

/// The five textual formats occupation numbers arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccNumsFormat {
    /// `"5"` — element numbers, ground-state configurations.
    ElementNumbers,
    /// `"He, Li"` — element names.
    ElementNames,
    /// `"Ne II"` — element name plus Roman ionization degree.
    Ions,
    /// `"{{1,0,0,1},{1,0,0,-1}}"` — explicit occupation tuples.
    Tuples,
    /// `"B {{2,1,1,-1}}"` — element ground state plus appended tuples.
    NamedTuples,
}

impl OccNumsFormat {
    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'n' => Some(Self::ElementNumbers),
            'N' => Some(Self::ElementNames),
            'i' => Some(Self::Ions),
            'o' => Some(Self::Tuples),
            'O' => Some(Self::NamedTuples),
            _ => None,
        }
    }

    pub fn as_flag(self) -> char {
        match self {
            Self::ElementNumbers => 'n',
            Self::ElementNames => 'N',
            Self::Ions => 'i',
            Self::Tuples => 'o',
            Self::NamedTuples => 'O',
        }
    }
}

/// One parsed configuration together with the input text that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedOccNums {
    pub label: String,
    pub occ_nums: OccNums,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccNumsAst {
    pub entries: Vec<NamedOccNums>,
}

impl OccNumsAst {
    pub fn push(&mut self, label: impl Into<String>, occ_nums: OccNums) {
        self.entries.push(NamedOccNums {
            label: label.into(),
            occ_nums,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One parsed `-z ... -f ... -v ... [-o ...]` format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatStringAst {
    pub charges: Vec<i32>,
    pub format: OccNumsFormat,
    pub occ_nums: OccNumsAst,
    pub output_path: Option<PathBuf>,
}
