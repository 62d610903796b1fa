pub mod category_guard;
pub mod normalizer;
pub mod patterns;
pub mod profanity;
pub mod reply;
pub mod restore;
pub mod rewriter;
