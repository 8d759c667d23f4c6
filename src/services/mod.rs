pub mod application_ledger;
pub mod field_classifier;
pub mod form_filler;
pub mod job_scanner;
pub mod progress;
pub mod scoring;
pub mod value_applier;

pub use application_ledger::ApplicationLedger;
pub use field_classifier::{Classification, FieldClassifier, Resolved};
pub use form_filler::{FillReport, FormFiller};
pub use job_scanner::JobScanner;
pub use progress::{LogProgress, PageOverlay, ProgressSink, ToastKind};
pub use scoring::{extract_salary, match_score, JobFilter};
pub use value_applier::ValueApplier;
