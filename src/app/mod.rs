// Application layer - Use case interactors

pub mod container;
pub mod export_interactor;
pub mod import_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use export_interactor::{ExportInteractor, ExportOutcome};
pub use import_interactor::ImportInteractor;
