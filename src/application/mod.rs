pub mod diagnostics;
pub mod indexing;
pub mod search;
