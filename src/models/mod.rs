pub mod application;
pub mod document;
pub mod field;
pub mod job;
pub mod loaders;
pub mod settings;

pub use application::{ApplicationDraft, ApplicationRecord, ApplicationSource, ApplicationStatus};
pub use document::{ErrorLogEntry, JobSiteData, SessionState, Stats, StoreDocument, SuccessfulApplication};
pub use field::{FieldDescriptor, FieldKind};
pub use job::{JobCandidate, JobSummary, Platform};
pub use loaders::{load_profile_seed, ProfileSeed};
pub use settings::{DelayBounds, KeywordAnswer, SalaryRange, Settings, UserProfile};
