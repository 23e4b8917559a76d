pub mod body;
pub mod metrics;
pub mod providers;
pub mod translation;

pub use providers::{GifProvider, GifSearch, ProviderError, TextProvider};
