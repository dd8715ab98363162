//! Generation pipeline for design ideation.
//!
//! Fills prompt templates with a design challenge, sends them to a text
//! completion collaborator, renders sketch images through an image
//! collaborator, and parses every response with [`ideagen_parse`] into an
//! [`IdeaBundle`](ideagen_core::IdeaBundle).
//!
//! The collaborators are traits ([`TextCompleter`], [`ImageGenerator`]);
//! [`OpenAiClient`] implements both over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use ideagen_generate::{Generator, GeneratorConfig, OpenAiClient, PromptLibrary};
//!
//! let config = GeneratorConfig::default();
//! let client = OpenAiClient::from_config(&config).unwrap();
//! let generator = Generator::new(client.clone(), client, PromptLibrary::builtin(), config);
//!
//! let bundle = generator.generate_all("Make bus stops safer at night").unwrap();
//! println!("{} statement themes", bundle.statements.theme_count());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod refine;

pub use client::{CompletionRequest, ImageGenerator, OpenAiClient, TextCompleter};
pub use config::{
    ApiConfig, GeneratorConfig, ModelConfig, RequestConfig, RequestParams, SessionConfig,
};
pub use error::{GenerateError, Result};
pub use pipeline::Generator;
pub use prompt::{PromptLibrary, concept_prompt, fill_template, system_message, template_name};
pub use refine::{combine_selected_ideas, refine_challenge, selected_idea_texts};
