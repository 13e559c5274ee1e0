pub mod candidates;
pub mod outcome;

pub use candidates::CandidateSet;
pub use outcome::{round2, Classification, GuessOutcome, Rank};
