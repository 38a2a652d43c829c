pub mod prompts;
pub mod sync;
pub mod sync_ui;
