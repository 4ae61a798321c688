//! Gateway adapters: the real Gemini client and a scriptable mock.

mod gemini;
mod mock;

pub use gemini::{GeminiConfig, GeminiGateway};
pub use mock::{MockFailure, MockGateway};
