pub mod config_ops;
pub mod session_ops;
