pub mod cli;
pub mod config;
pub mod interface;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use interface::*;
pub use server::*;
pub use state::*;
