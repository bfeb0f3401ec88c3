//! Back end of the BPL compiler: name resolution and type checking,
//! stack frame layout, and x86-64 code generation.

pub mod ast;
pub mod compile;
pub mod config;
pub mod error;
pub mod frame;
pub mod resolve;
pub mod types;
pub mod util;

pub use compile::{compile, generate, Labels};
pub use config::{Config, Scope};
pub use error::Error;
pub use frame::layout;
pub use resolve::resolve;
pub use types::Type;
pub use util::maps::FrameMap;
