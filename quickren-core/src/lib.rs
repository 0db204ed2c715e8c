#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod apply;
pub mod collision;
pub mod config;
pub mod entry;
pub mod error;
pub mod fs;
pub mod history;
pub mod operations;
pub mod output;
pub mod pattern;
pub mod plan;
pub mod preview;
pub mod selection;
pub mod session;
pub mod undo;

pub use apply::{ApplyFailure, ApplyResult, Executor};
pub use collision::{CollisionResolver, Resolved, MAX_DISAMBIGUATION_ATTEMPTS};
pub use config::Config;
pub use entry::{FileCategory, FileEntry};
pub use error::{FsErrorKind, RenameError};
pub use fs::{detect_case_insensitive_fs, FileSystem, OsFileSystem};
pub use history::{format_history, History, HistoryEntry, HistoryKind};
pub use operations::{
    apply_operation, history_operation, list_operation, plan_operation, rename_operation,
    status_operation, undo_operation, PlanRequest, RenameOutcome,
};
pub use output::{
    format_size, ApplyReport, HistoryResult, ListResult, ListedFile, OutputFormat,
    OutputFormatter, PendingPlan, PlanResult, RenameReport, StatusResult, UndoAvailable,
    UndoReport, VersionResult,
};
pub use pattern::{generate_name, NameGenerator, Numbering, PatternDescriptor, TemplateToken};
pub use plan::{
    build_plan, load_plan, write_plan, OperationStatus, PlanBuilder, PlanStats, RenameOperation,
    RenamePlan,
};
pub use preview::{render_plan, write_preview, Preview};
pub use selection::{select_files, SelectionOptions, SizeFilter};
pub use session::Session;
pub use undo::UndoRecord;
