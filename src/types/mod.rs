//! Public types for the annotator API.

mod message;
mod prediction;
mod test_case;

pub use message::{Message, Role};
pub use prediction::{ERROR_MARKER_PREFIX, NOT_APPLICABLE, Prediction, error_marker};
pub use test_case::TestCase;
