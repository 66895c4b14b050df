//! Remote completion service boundary
//!
//! The session and the model catalog only see [`CompletionService`]; the
//! production implementation is [`OpenAiClient`], tests plug in scripted fakes.
//! Every call is blocking: control does not return to the user until the
//! request resolves or fails.

pub mod error;
pub mod openai;

pub use error::ServiceError;
pub use openai::OpenAiClient;

use crate::models::Message;

pub trait CompletionService {
    /// List the identifiers of every model the credential can use
    fn list_models(&self) -> Result<Vec<String>, ServiceError>;

    /// Send the full conversation and return the single reply message
    fn create_completion(&self, model: &str, messages: &[Message]) -> Result<Message, ServiceError>;
}
