pub mod classifier;
pub mod label;
pub mod types;

pub use classifier::{ClassifierError, SentimentClassifier};
pub use label::SentimentLabel;
pub use types::{ClassificationResult, SentimentScores};
