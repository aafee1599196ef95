pub mod handlers;
pub mod import;
pub mod matching;
pub mod normalize;
pub mod stats;
pub mod store;
