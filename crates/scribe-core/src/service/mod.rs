//! Application services - orchestrate ports on behalf of a principal.

mod posts;

pub use posts::{COVER_FOLDER, DEFAULT_MAX_COVER_BYTES, PER_PAGE, PostService};

#[cfg(test)]
mod tests;
