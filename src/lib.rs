pub mod cli;
pub mod controller;
pub mod date;
pub mod emitter;
pub mod error;
pub mod excel;
pub mod path_policy;
pub mod record;
pub mod summary;
pub mod text_decode;
pub use error::{Error, Result};
