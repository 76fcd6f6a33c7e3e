//! Click recording service.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Records clicks into the append-only history.
///
/// Each write resolves the short code against the store again; the resolution
/// cache is never consulted here.
pub struct ClickService<C: ClickRepository + ?Sized> {
    click_repository: Arc<C>,
}

impl<C: ClickRepository + ?Sized> ClickService<C> {
    /// Creates a new click service.
    pub fn new(click_repository: Arc<C>) -> Self {
        Self { click_repository }
    }

    /// Persists one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this short code.
    /// Returns [`AppError::Internal`] (tracking failed) when the write fails.
    pub async fn record(&self, click: NewClick) -> Result<Click, AppError> {
        let short_code = click.short_code.clone();

        match self.click_repository.record(click).await {
            Ok(Some(stored)) => {
                debug!(short_code, click_id = %stored.id, "Click recorded");
                Ok(stored)
            }
            Ok(None) => Err(AppError::link_not_found(&short_code)),
            Err(e) => Err(AppError::tracking_failed(e.to_string())),
        }
    }
}
