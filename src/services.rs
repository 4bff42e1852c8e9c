pub mod auth;
pub mod note_service;
pub mod plan_service;
pub mod seed;
pub mod token;

pub use auth::AuthService;
pub use note_service::NoteService;
pub use plan_service::PlanService;
pub use token::TokenService;
