//! Text generation
//!
//! [`TextGenerator`] is the seam to the external language model. The
//! evaluator only ever sees raw text coming back from it.

pub mod openai;

use async_trait::async_trait;

pub use openai::{ChatRequest, Message, OpenAiClient};

use crate::Result;

/// External text-generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` under the `system` instruction and return the raw text
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}
