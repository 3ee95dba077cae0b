pub mod config;
pub mod cpu;
pub mod display;
pub mod error;
pub mod keyboard;
pub mod ram;
pub mod registers;
pub mod stack;

pub use config::{Config, TimerMode};
pub use cpu::{ExecState, Status, CPU};
pub use error::{Fault, Result};
