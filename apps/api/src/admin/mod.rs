pub mod auth;
pub mod form;
pub mod handlers;
pub mod inbox;
pub mod notice;
pub mod save;
