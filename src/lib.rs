//! schema-annotator - Schema.org property suggestions for JSON data
//!
//! Annotates the key/value pairs of a JSON document with Schema.org property
//! names suggested by a chat model, either a local inference server or a
//! hosted chat-completion API, and scores those suggestions against a
//! labeled test set.
//!
//! # Suggestion Example
//!
//! ```rust,no_run
//! use schema_annotator::providers::LocalChatBackend;
//! use schema_annotator::{Suggest, Suggester};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> schema_annotator::Result<()> {
//!     let backend = LocalChatBackend::new("llama3:latest")?;
//!     let suggester = Suggester::new(Box::new(backend));
//!
//!     let prediction = suggester
//!         .suggest("preco", &serde_json::json!(19.9))
//!         .await?;
//!     println!("{prediction}");
//!     Ok(())
//! }
//! ```
//!
//! # Evaluation Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use schema_annotator::eval::{Evaluator, load_test_cases};
//! use schema_annotator::providers::LocalChatBackend;
//! use schema_annotator::Suggester;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> schema_annotator::Result<()> {
//!     let suggester = Suggester::new(Box::new(LocalChatBackend::new("llama3:latest")?));
//!     let cases = load_test_cases(Path::new("test_cases.json"))?;
//!
//!     let report = Evaluator::new().evaluate(&suggester, &cases).await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod annotate;
pub mod config;
pub mod error;
pub mod eval;
pub mod prompt;
pub mod providers;
pub mod source;
pub mod suggest;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use annotate::{
    AnnotatedDataset, Annotation, Decision, ReviewMode, Reviewer, annotate_document,
};
pub use config::{BackendKind, Config, Secrets};
pub use error::{AnnotatorError, Result};
pub use source::{JsonSource, SourceDocument};
pub use suggest::{Suggest, Suggester};
pub use types::{Message, Prediction, Role, TestCase};
pub use version::{PKG_VERSION, version_string};
