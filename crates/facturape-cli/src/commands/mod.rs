pub mod batch;
pub mod config;
pub mod enhance;
pub mod extract;
pub mod merchants;
pub mod ruc;
