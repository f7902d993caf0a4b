pub mod boot;
pub mod output;
pub mod servers;
