//! Identity similarity: canonicalization, edit distance and the
//! short-code / long-symbol clone classifier

mod canonical;
mod classifier;
mod distance;

pub use canonical::{canonicalize, CanonicalIdentity};
pub use classifier::{Regime, SimilarityClassifier, SimilarityThresholds};
pub use distance::edit_distance;
