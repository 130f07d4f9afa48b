pub mod href;
pub mod icons;
pub mod links;
pub mod paths;
pub mod route_table;
pub mod version;

pub use href::*;
pub use icons::*;
pub use links::*;
pub use paths::*;
pub use route_table::*;
pub use version::*;
