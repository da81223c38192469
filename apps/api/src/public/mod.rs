pub mod fallback;
pub mod handlers;
pub mod render;
pub mod section;
