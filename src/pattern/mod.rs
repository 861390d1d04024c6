mod ast;
mod compiled;
mod error;
mod lexer;
mod options;
mod parser;

pub use ast::{Part, PartModifier, PartType};
pub use compiled::{
    escape_pattern_string, generate_pattern_string, generate_regular_expression_and_name_list,
};
pub use error::{PatternError, PatternResult};
pub use lexer::{Token, TokenType, is_valid_name_code_point, tokenize};
pub use options::Options;
pub use parser::parse_pattern_string;
