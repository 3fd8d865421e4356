pub mod ooxml;
pub mod styles;
pub mod writer;
pub mod xlsx_container;
mod xml;
