//! Interface layer
//! CLI 입력과 composition root.

pub mod cli;
