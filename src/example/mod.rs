//! Example payload generation
//!
//! - nested JSON examples rooted at one entity, in a full and a list
//!   ("simple") variant, optionally wrapped in a pagination envelope
//! - flat single-row CSV examples, one per entity

mod generator;
mod tabular;

pub use generator::{
    DOC_EXAMPLES, DocExample, MUTUAL_REFERENCE_OVERRIDES, MutualReferenceOverride,
    apply_overrides, doc_examples, example_document, generate_example, paginate,
};
pub use tabular::{TabularExample, tabular_examples};
