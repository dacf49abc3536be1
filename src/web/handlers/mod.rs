pub mod job_handlers;
pub mod profile_handlers;
pub mod skill_handlers;
pub mod system_handlers;

pub use job_handlers::*;
pub use profile_handlers::*;
pub use skill_handlers::*;
pub use system_handlers::*;
