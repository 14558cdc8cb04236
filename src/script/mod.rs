pub mod action;
pub mod assemble;
pub mod model;
pub mod registry;
pub mod tokenize;
