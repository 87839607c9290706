pub mod lexer;
pub mod token;

pub use lexer::tokenize;
pub use token::{Token, TokenType, find_next_non_empty, find_prev_non_empty};
