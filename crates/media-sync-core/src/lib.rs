pub mod operator;
pub mod sync;
pub mod transform;

pub use operator::{Confirmation, Operator, PromptError, SyncEvent};
pub use sync::{
    error_chain_message, AbortReason, SyncError, SyncOrchestrator, SyncOutcome, SyncReport,
    SyncStage,
};
pub use transform::{build_sync_request, SourceItem, TargetItem};
