// Infrastructure implementations for pyhygiene.

pub mod logging;
pub mod python_parser;
pub mod reporter;
pub mod source_loader;
pub mod syntax_rules;

pub use logging::init_logging;
pub use python_parser::TreeSitterPythonParser;
pub use reporter::{JsonReporter, TextReporter};
pub use source_loader::SourceLoader;
