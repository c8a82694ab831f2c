//! Parsers for occupation-number values and calculation format strings.

use super::model::{FormatStringAst, OccNumsAst, OccNumsFormat};
use crate::atomic_data::{element_number, ground_state};
use crate::domain::{OccNum, OccNums, QuantumNumberError};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown occupation-number format flag '{flag}'")]
    UnknownFormat { flag: char },
    #[error("input does not match the '{format}' occupation-number format: {input}")]
    MalformedOccNums { format: char, input: String },
    #[error("element '{name}' is not tabulated")]
    UnknownElement { name: String },
    #[error("element number {number} is not tabulated")]
    ElementOutOfRange { number: i32 },
    #[error("'{text}' is not a Roman numeral")]
    InvalidRomanNumeral { text: String },
    #[error("ionization degree in '{label}' exceeds the electron count")]
    IonizationTooLarge { label: String },
    #[error("malformed format string: {input}")]
    MalformedFormatString { input: String },
    #[error("flag -{flag} appears more than once")]
    DuplicateFlag { flag: char },
    #[error("flag -{flag} is required")]
    MissingFlag { flag: char },
    #[error("invalid charge '{text}': charges must be in 1..=100")]
    InvalidCharge { text: String },
    #[error(transparent)]
    QuantumNumbers(#[from] QuantumNumberError),
}

static ELEMENT_NUMBERS_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{1,3}(\s*,\s*\d{1,3})*\s*$").expect("valid regex"));
static ELEMENT_NAMES_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Z][a-z]?(\s*,\s*[A-Z][a-z]?)*\s*$").expect("valid regex")
});
static IONS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Z][a-z]?\s+[IVXLC]+(\s*,\s*[A-Z][a-z]?\s+[IVXLC]+)*\s*$")
        .expect("valid regex")
});
static ION_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-z]?)\s+([IVXLC]+)$").expect("valid regex"));
static TUPLE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*\{[^{}]*\}(?:\s*,\s*\{[^{}]*\})*\s*\}").expect("valid regex")
});
static TUPLE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*\}")
        .expect("valid regex")
});
static NAMED_TUPLE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]?)\s*(\{\s*\{[^{}]*\}(?:\s*,\s*\{[^{}]*\})*\s*\})")
        .expect("valid regex")
});
static ROMAN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").expect("valid regex")
});
static FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-[zfvo]").expect("valid regex"));
static CHARGE_LIST_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{1,3}(\s*,\s*\d{1,3})*\s*$").expect("valid regex"));

/// Parses one occupation-number value string in the given format.
pub fn parse_occ_nums(input: &str, format: OccNumsFormat) -> Result<OccNumsAst, InputError> {
    match format {
        OccNumsFormat::ElementNumbers => parse_element_numbers(input),
        OccNumsFormat::ElementNames => parse_element_names(input),
        OccNumsFormat::Ions => parse_ions(input),
        OccNumsFormat::Tuples => parse_tuples(input),
        OccNumsFormat::NamedTuples => parse_named_tuples(input),
    }
}

/// Parses a whole `-z ... -f ... -v ... [-o ...];` input, one AST per
/// semicolon-separated format string.
pub fn parse_format_strings(input: &str) -> Result<Vec<FormatStringAst>, InputError> {
    let mut parsed = Vec::new();
    for segment in input.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        parsed.push(parse_format_string(segment)?);
    }
    if parsed.is_empty() {
        return Err(InputError::MalformedFormatString {
            input: input.to_string(),
        });
    }
    Ok(parsed)
}

fn parse_format_string(segment: &str) -> Result<FormatStringAst, InputError> {
    let flag_spans: Vec<(usize, usize)> = FLAG
        .find_iter(segment)
        .map(|found| (found.start(), found.end()))
        .collect();
    if flag_spans.is_empty() || !segment[..flag_spans[0].0].trim().is_empty() {
        return Err(InputError::MalformedFormatString {
            input: segment.trim().to_string(),
        });
    }

    let mut charges_value: Option<&str> = None;
    let mut format_value: Option<&str> = None;
    let mut occ_nums_value: Option<&str> = None;
    let mut output_value: Option<&str> = None;
    for (index, (start, end)) in flag_spans.iter().enumerate() {
        let value_end = flag_spans
            .get(index + 1)
            .map(|(next_start, _)| *next_start)
            .unwrap_or(segment.len());
        let value = &segment[*end..value_end];
        let flag = segment[*start..*end]
            .chars()
            .nth(1)
            .expect("flag matches are two characters");
        let slot = match flag {
            'z' => &mut charges_value,
            'f' => &mut format_value,
            'v' => &mut occ_nums_value,
            _ => &mut output_value,
        };
        if slot.is_some() {
            return Err(InputError::DuplicateFlag { flag });
        }
        *slot = Some(value);
    }

    let charges = parse_charges(charges_value.ok_or(InputError::MissingFlag { flag: 'z' })?)?;
    let format = parse_format_flag(format_value.ok_or(InputError::MissingFlag { flag: 'f' })?)?;
    let occ_nums = parse_occ_nums(
        occ_nums_value.ok_or(InputError::MissingFlag { flag: 'v' })?,
        format,
    )?;
    let output_path = output_value
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    Ok(FormatStringAst {
        charges,
        format,
        occ_nums,
        output_path,
    })
}

fn parse_charges(value: &str) -> Result<Vec<i32>, InputError> {
    if !CHARGE_LIST_SHAPE.is_match(value) {
        return Err(InputError::InvalidCharge {
            text: value.trim().to_string(),
        });
    }
    let mut charges = Vec::new();
    for token in value.split(',') {
        let token = token.trim();
        let charge: i32 = token.parse().map_err(|_| InputError::InvalidCharge {
            text: token.to_string(),
        })?;
        if !(1..=100).contains(&charge) {
            return Err(InputError::InvalidCharge {
                text: token.to_string(),
            });
        }
        charges.push(charge);
    }
    Ok(charges)
}

fn parse_format_flag(value: &str) -> Result<OccNumsFormat, InputError> {
    let trimmed = value.trim();
    let mut characters = trimmed.chars();
    match (characters.next(), characters.next()) {
        (Some(flag), None) => {
            OccNumsFormat::from_flag(flag).ok_or(InputError::UnknownFormat { flag })
        }
        _ => Err(InputError::MalformedFormatString {
            input: format!("-f {trimmed}"),
        }),
    }
}

fn parse_element_numbers(input: &str) -> Result<OccNumsAst, InputError> {
    if !ELEMENT_NUMBERS_SHAPE.is_match(input) {
        return Err(malformed('n', input));
    }
    let mut ast = OccNumsAst::default();
    for token in input.split(',') {
        let token = token.trim();
        let number: i32 = token
            .parse()
            .map_err(|_| malformed('n', input))?;
        let configuration =
            ground_state(number).ok_or(InputError::ElementOutOfRange { number })?;
        ast.push(token, configuration.to_vec());
    }
    Ok(ast)
}

fn parse_element_names(input: &str) -> Result<OccNumsAst, InputError> {
    if !ELEMENT_NAMES_SHAPE.is_match(input) {
        return Err(malformed('N', input));
    }
    let mut ast = OccNumsAst::default();
    for token in input.split(',') {
        let name = token.trim();
        ast.push(name, element_ground_state(name)?);
    }
    Ok(ast)
}

fn parse_ions(input: &str) -> Result<OccNumsAst, InputError> {
    if !IONS_SHAPE.is_match(input) {
        return Err(malformed('i', input));
    }
    let mut ast = OccNumsAst::default();
    for token in input.split(',') {
        let entry = token.trim();
        let captures = ION_ENTRY.captures(entry).ok_or_else(|| malformed('i', input))?;
        let name = captures.get(1).expect("captured").as_str();
        let numeral = captures.get(2).expect("captured").as_str();
        let mut configuration = element_ground_state(name)?;
        let degree = roman_to_arabic(numeral)?;
        let removed = degree - 1;
        if removed as usize >= configuration.len() {
            return Err(InputError::IonizationTooLarge {
                label: entry.to_string(),
            });
        }
        configuration.truncate(configuration.len() - removed as usize);
        ast.push(entry, configuration);
    }
    Ok(ast)
}

fn parse_tuples(input: &str) -> Result<OccNumsAst, InputError> {
    let significant = |c: &char| !c.is_whitespace() && *c != ',';
    let mut ast = OccNumsAst::default();
    let mut consumed = 0;
    for group in TUPLE_GROUP.find_iter(input) {
        consumed += group.as_str().chars().filter(significant).count();
        ast.push(group.as_str(), parse_tuple_group(group.as_str())?);
    }
    if ast.is_empty() || consumed != input.chars().filter(significant).count() {
        return Err(malformed('o', input));
    }
    Ok(ast)
}

fn parse_named_tuples(input: &str) -> Result<OccNumsAst, InputError> {
    let mut ast = OccNumsAst::default();
    for captures in NAMED_TUPLE_GROUP.captures_iter(input) {
        let name = captures.get(1).expect("captured").as_str();
        let group = captures.get(2).expect("captured").as_str();
        let mut configuration = element_ground_state(name)?;
        configuration.extend(parse_tuple_group(group)?);
        let label = captures.get(0).expect("captured").as_str();
        ast.push(label, configuration);
    }
    if ast.is_empty() {
        return Err(malformed('O', input));
    }
    Ok(ast)
}

fn parse_tuple_group(group: &str) -> Result<OccNums, InputError> {
    let mut occ_nums = OccNums::new();
    for tuple in TUPLE_ENTRY.captures_iter(group) {
        let component = |index: usize| -> i32 {
            tuple
                .get(index)
                .expect("captured")
                .as_str()
                .parse()
                .expect("digit groups parse as integers")
        };
        occ_nums.push(OccNum::new(
            component(1),
            component(2),
            component(3),
            component(4),
        )?);
    }
    if occ_nums.is_empty() {
        return Err(malformed('o', group));
    }
    Ok(occ_nums)
}

fn element_ground_state(name: &str) -> Result<OccNums, InputError> {
    let number = element_number(name).ok_or_else(|| InputError::UnknownElement {
        name: name.to_string(),
    })?;
    let configuration = ground_state(number).ok_or(InputError::ElementOutOfRange { number })?;
    Ok(configuration.to_vec())
}

/// Converts a Roman numeral (ionization degree, `I` through `XC`) to its
/// value, validating the digit grammar first.
fn roman_to_arabic(text: &str) -> Result<i32, InputError> {
    if text.is_empty() || !ROMAN_SHAPE.is_match(text) {
        return Err(InputError::InvalidRomanNumeral {
            text: text.to_string(),
        });
    }
    let value_of = |digit: char| -> i32 {
        match digit {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            _ => 100,
        }
    };
    let mut total = 0;
    let mut highest_seen = 0;
    for digit in text.chars().rev() {
        let value = value_of(digit);
        if value < highest_seen {
            total -= value;
        } else {
            total += value;
            highest_seen = value;
        }
    }
    Ok(total)
}

fn malformed(format: char, input: &str) -> InputError {
    InputError::MalformedOccNums {
        format,
        input: input.trim().to_string(),
    }
}
