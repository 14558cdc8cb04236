pub mod curves;
pub mod plan;
