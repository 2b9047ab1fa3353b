//! Explicit application state: company profile and quote list snapshot.

use super::company_client::CompanyClient;
use super::editor::QuoteEditor;
use super::quote_client::QuoteStore;
use crate::error::AppError;
use crate::models::{CompanyProfile, LogoUpload, Quote, QuoteId, QuoteSummary};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counts view changes. A response is only applied while the ticket taken
/// for it is still the latest one.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct ViewTicket {
    generation: u64,
    navigation: Navigation,
}

impl Navigation {
    pub fn begin(&self) -> ViewTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ViewTicket {
            generation,
            navigation: self.clone(),
        }
    }
}

impl ViewTicket {
    pub fn is_current(&self) -> bool {
        self.navigation.generation.load(Ordering::SeqCst) == self.generation
    }
}

pub struct Session {
    quotes: Arc<dyn QuoteStore>,
    company: Arc<CompanyClient>,
    navigation: Navigation,
    profile: CompanyProfile,
    quote_list: Vec<Quote>,
}

impl Session {
    /// Load the company profile and the quote list.
    pub async fn start(
        quotes: Arc<dyn QuoteStore>,
        company: Arc<CompanyClient>,
    ) -> Result<Self, AppError> {
        let (profile, quote_list) = tokio::try_join!(company.get(), quotes.list())?;
        tracing::info!(quotes = quote_list.len(), "Session started");

        Ok(Self {
            quotes,
            company,
            navigation: Navigation::default(),
            profile,
            quote_list,
        })
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quote_list
    }

    pub fn summary(&self, now: DateTime<Utc>) -> QuoteSummary {
        QuoteSummary::from_quotes(&self.quote_list, now)
    }

    pub async fn refresh_quotes(&mut self) -> Result<&[Quote], AppError> {
        self.quote_list = self.quotes.list().await?;
        Ok(&self.quote_list)
    }

    /// Fetch one quote for the view identified by `ticket`. `None` when the
    /// user navigated elsewhere before the answer arrived.
    pub async fn open_quote(
        &self,
        ticket: &ViewTicket,
        id: &QuoteId,
    ) -> Result<Option<Quote>, AppError> {
        let result = self.quotes.get(id).await;
        // Failures of an abandoned view are dropped as well.
        if !ticket.is_current() {
            tracing::debug!(quote_id = %id, ok = result.is_ok(), "Discarding stale quote response");
            return Ok(None);
        }
        result.map(Some)
    }

    /// Editor for an existing quote, loaded from the store.
    pub async fn edit_quote(&self, id: &QuoteId) -> Result<QuoteEditor, AppError> {
        QuoteEditor::open(self.quotes.as_ref(), id).await
    }

    /// Save `editor`'s draft, then refresh the list.
    ///
    /// The quote is stored once this returns `Ok`; a failed refresh only
    /// leaves the cached list behind and is logged.
    pub async fn save_quote(&mut self, editor: &mut QuoteEditor) -> Result<Quote, AppError> {
        let saved = editor.save(self.quotes.as_ref()).await?;
        self.quote_saved(&saved).await;
        Ok(saved)
    }

    async fn quote_saved(&mut self, quote: &Quote) {
        match self.quote_list.iter().position(|q| q.id == quote.id) {
            Some(slot) => self.quote_list[slot] = quote.clone(),
            None => self.quote_list.insert(0, quote.clone()),
        }
        self.refresh_after_change(&quote.id).await;
    }

    /// Delete a quote. Once the server confirms, the quote leaves the cached
    /// list even if the follow-up refresh fails.
    pub async fn delete_quote(&mut self, id: &QuoteId) -> Result<(), AppError> {
        self.quotes.delete(id).await?;
        self.quote_list.retain(|q| &q.id != id);
        self.refresh_after_change(id).await;
        Ok(())
    }

    async fn refresh_after_change(&mut self, id: &QuoteId) {
        if let Err(e) = self.refresh_quotes().await {
            tracing::warn!(quote_id = %id, error = %e, "Quote list refresh failed, keeping local copy");
        }
    }

    /// Persist `profile`; the cached copy becomes the server's answer.
    pub async fn save_company(&mut self, profile: &CompanyProfile) -> Result<&CompanyProfile, AppError> {
        self.profile = self.company.update(profile).await?;
        Ok(&self.profile)
    }

    /// Upload a new logo; the server records its path on the profile.
    pub async fn upload_logo(&mut self, path: &Path) -> Result<LogoUpload, AppError> {
        let upload = self.company.upload_logo_file(path).await?;
        self.profile.logo_path = Some(upload.logo_path.clone());
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_navigation_invalidates_ticket() {
        let navigation = Navigation::default();
        let first = navigation.begin();
        assert!(first.is_current());

        let second = navigation.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn clones_share_the_counter() {
        let navigation = Navigation::default();
        let ticket = navigation.begin();
        navigation.clone().begin();
        assert!(!ticket.is_current());
    }
}
