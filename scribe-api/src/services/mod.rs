//! Service layer: prompt construction, upstream gateway, response
//! normalization, keyword heuristic and research dataset

pub mod heuristic;
pub mod llm_gateway;
pub mod normalizer;
pub mod prompt_builder;
pub mod research_data;

pub use llm_gateway::{CompletionBackend, GatewayError, HttpCompletionBackend, LlmGateway};
pub use research_data::ResearchData;
