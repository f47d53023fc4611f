// Domain types and the function-length check.

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod function_length;
