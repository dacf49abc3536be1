pub mod records;

pub use records::{Job, JobDraft, JobType, NewJob, Profile, ProfileUpdate, TermList, ValidationError};
