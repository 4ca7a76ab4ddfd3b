// Console adapters - file selection from arguments and stderr alerts

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;

/// File picker answering with paths given up front on the command line
#[derive(Debug, Clone, Default)]
pub struct ArgsFilePicker {
    sources: Vec<PathBuf>,
    destination: Option<PathBuf>,
}

impl ArgsFilePicker {
    pub fn new(sources: Vec<PathBuf>, destination: Option<PathBuf>) -> Self {
        Self {
            sources,
            destination,
        }
    }

    pub fn sources(sources: Vec<PathBuf>) -> Self {
        Self::new(sources, None)
    }

    pub fn destination(destination: impl Into<PathBuf>) -> Self {
        Self::new(Vec::new(), Some(destination.into()))
    }
}

#[async_trait]
impl FilePickerPort for ArgsFilePicker {
    async fn pick_sources(&self) -> Result<Vec<PathBuf>, DomainError> {
        Ok(self.sources.clone())
    }

    async fn pick_destination(&self) -> Option<PathBuf> {
        self.destination.clone()
    }
}

/// Alert written straight to stderr, bypassing the log filter
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAlert;

impl AlertPort for StderrAlert {
    fn alert(&self, message: &str) {
        eprintln!("perseus: {}", message);
    }
}
