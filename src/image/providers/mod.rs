//! Image service implementations.

mod gemini;

pub use gemini::{
    GeminiModel, GeminiProvider, GeminiProviderBuilder, API_KEY_ENV_VARS, DEFAULT_BASE_URL,
};
