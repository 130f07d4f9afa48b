pub mod client_config;
pub mod context;
pub mod file_entry;
pub mod format;
pub mod page;
pub mod route;
pub mod template;
pub mod version;
pub mod view_mode;

pub use client_config::*;
pub use context::*;
pub use file_entry::*;
pub use format::*;
pub use page::*;
pub use route::*;
pub use template::*;
pub use version::*;
pub use view_mode::*;
