pub mod assets;
pub mod handlers;
pub mod proxy;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use routes::*;
pub use state::*;
