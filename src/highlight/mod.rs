// * Scoring, Keyword Highlighting & Reversal
// * Everything that writes analysis results back onto the live document.

pub mod clear;
pub mod elements;
pub mod highlighter;
pub mod keywords;
pub mod scorer;
pub mod stopwords;
pub mod styling;
pub mod tokenizer;

// * Re-exports for convenient access
pub use clear::{clear, ClearReport};
pub use elements::select_text_elements;
pub use highlighter::{highlight, markers};
pub use keywords::extract_keywords;
pub use scorer::{match_sections, score, ImportanceClass, ScoredElement, ScoringContext};
pub use tokenizer::{compile_keyword, CjkTokenizer, LatinTokenizer, Tokenizer};
