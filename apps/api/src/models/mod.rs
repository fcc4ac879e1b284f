pub mod document;
pub mod project;
