pub mod age;
pub mod aggregate;
pub mod attributes;
pub mod config;
pub mod dataset;
pub mod derived;
pub mod fake_dataset;
pub mod lookup;
pub mod selection;
pub mod state;
pub mod store;
pub mod trend;
pub mod views;
