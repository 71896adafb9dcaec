pub mod ids;
pub mod filter;
pub mod pagination;
pub mod taxonomy;
pub mod session;
pub mod review;
pub mod recipe;

pub use ids::*;
pub use filter::*;
pub use pagination::*;
pub use taxonomy::*;
pub use session::*;
pub use review::*;
pub use recipe::*;
