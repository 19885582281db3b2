//! CLI command implementations.
//!
//! | Module   | Commands handled      |
//! |----------|-----------------------|
//! | `board`  | `Show`, `Move`        |
//! | `config` | `Config`              |

pub mod board;
pub mod config;

pub use board::{cmd_move, cmd_show};
pub use config::cmd_config;
