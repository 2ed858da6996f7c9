//! Model implementations.

pub mod gemini;

pub use gemini::GeminiModel;
