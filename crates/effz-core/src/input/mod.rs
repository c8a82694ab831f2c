//! Textual input: occupation-number values and calculation format strings.

mod model;
mod parser;

pub use model::{FormatStringAst, NamedOccNums, OccNumsAst, OccNumsFormat};
pub use parser::{InputError, parse_format_strings, parse_occ_nums};
