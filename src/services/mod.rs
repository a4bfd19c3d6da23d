pub mod assignment;
pub mod auth;
pub mod capacity;
pub mod complaints;
pub mod menu;

pub use assignment::AssignmentService;
pub use auth::Claims;
pub use complaints::{ComplaintsApi, HttpComplaintsClient};
