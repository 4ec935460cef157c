pub mod gemini_analyzer;
pub mod traits;
