pub mod listener;

pub use listener::{StartupError, bind, serve};
