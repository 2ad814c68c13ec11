//! Prompt templates for the council flow

mod template;

pub use template::PromptTemplate;
