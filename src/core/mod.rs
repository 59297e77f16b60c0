pub mod agent;
pub mod aggregator;
