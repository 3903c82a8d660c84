// * Configuration Constants
// * Central location for all extraction, scoring and presentation thresholds

// * Container validation: minimum trimmed text length in characters
pub const MIN_CONTAINER_TEXT_CHARS: usize = 100;

// * Container validation: minimum number of <p> descendants
pub const MIN_CONTAINER_PARAGRAPHS: usize = 2;

// * Container validation: maximum share of text a noise descendant may own
pub const MAX_NOISE_TEXT_RATIO: f64 = 0.3;

// * Sections shorter than this (finalized text, characters) are dropped
pub const MIN_SECTION_CHARS: usize = 30;

// * Fallback extraction: paragraphs must be strictly longer than this
pub const MIN_FALLBACK_PARAGRAPH_CHARS: usize = 50;

// * Fallback extraction: cap on paragraphs handed to the summarizer
pub const MAX_FALLBACK_PARAGRAPHS: usize = 15;

// * Keyword extraction: cap on derived keywords
pub const MAX_EXTRACTED_KEYWORDS: usize = 15;

// * Relevance scoring
pub const SCORE_BASE: f64 = 0.3;
pub const SCORE_PER_KEYWORD: f64 = 0.2;
pub const SCORE_KEYWORD_CAP: f64 = 0.4;
pub const SCORE_KEY_POINT_BONUS: f64 = 0.3;
pub const SCORE_POSITION_BONUS: f64 = 0.2;
pub const SCORE_LENGTH_BONUS: f64 = 0.1;
pub const SCORE_MAX: f64 = 1.0;

// * Leading share of scoreable elements that earns the positional bonus
pub const POSITION_BONUS_FRACTION: f64 = 0.3;

// * Element text longer than this earns the length bonus
pub const LENGTH_BONUS_CHARS: usize = 200;

// * Prefix length used for key point overlap in both directions
pub const KEY_POINT_PREFIX_CHARS: usize = 10;

// * Importance class thresholds (low < 0.4 <= medium < 0.7 <= high)
pub const IMPORTANCE_MEDIUM_THRESHOLD: f64 = 0.4;
pub const IMPORTANCE_HIGH_THRESHOLD: f64 = 0.7;

// * Scored sections above this importance are projected onto the page
pub const SECTION_IMPORTANCE_THRESHOLD: f64 = 0.7;

// * Prefix length used to locate a scored section in the page
pub const SECTION_MATCH_PREFIX_CHARS: usize = 50;

// * Keyword callout lifetime in milliseconds
pub const CALLOUT_LIFETIME_MS: u64 = 3_000;

// * Side panel width bounds in pixels
pub const SIDEBAR_MIN_WIDTH: u32 = 300;
pub const SIDEBAR_MAX_WIDTH: u32 = 600;
pub const SIDEBAR_DEFAULT_WIDTH: u32 = 400;

// * Preview length reported for a jump target
pub const JUMP_PREVIEW_CHARS: usize = 80;

// * Summarization request defaults
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const REQUEST_TEMPERATURE: f64 = 0.7;
pub const REQUEST_MAX_TOKENS: u32 = 500;
