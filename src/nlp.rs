pub mod highlight;
pub mod parser;
pub mod recognizer;
pub mod regex_patterns;
pub mod rules;
pub mod types;

pub use highlight::{Highlight, HighlightKind};
pub use parser::SentenceParser;
pub use recognizer::{DateMatch, DateRecognizer, EnglishDateRecognizer, NoDates, RecognizerOptions};
pub use types::{Label, ParseResult, Priority, RecurrenceDescriptor};
