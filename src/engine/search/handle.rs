use tokio::sync::{mpsc, oneshot};

use crate::engine::events::SearchCommand;
use crate::engine::search::sort::SortOrder;
use crate::engine::search::worker::{SearcherId, SearchSnapshot};
use crate::errors::StorefrontError;

/// Handle to drive a searcher owned by the engine.
///
/// All methods are asynchronous commands to the searcher's worker task.
/// Handles are cheap to clone; every clone commands the same searcher.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    searcher_id: SearcherId,
    cmd_tx: mpsc::Sender<SearchCommand>,
}

impl SearchHandle {
    pub(crate) fn new(searcher_id: SearcherId, cmd_tx: mpsc::Sender<SearchCommand>) -> Self {
        Self { searcher_id, cmd_tx }
    }

    pub fn id(&self) -> SearcherId {
        self.searcher_id
    }

    /// Replaces the free-text input. The new text is committed once the
    /// settle window passes without further edits.
    pub async fn set_text(&self, text: impl Into<String>) -> Result<(), StorefrontError> {
        self.send(SearchCommand::SetText { text: text.into() }).await
    }

    /// Restricts results to one item type, or lifts the restriction with
    /// `None`. Takes effect immediately.
    pub async fn set_item_type(&self, type_id: Option<String>) -> Result<(), StorefrontError> {
        self.send(SearchCommand::SetItemType { type_id }).await
    }

    /// Sets or clears (`None` or blank) one property constraint. Takes
    /// effect immediately.
    pub async fn set_property(
        &self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Result<(), StorefrontError> {
        self.send(SearchCommand::SetProperty { name: name.into(), value }).await
    }

    /// Drops all property constraints at once.
    pub async fn clear_properties(&self) -> Result<(), StorefrontError> {
        self.send(SearchCommand::ClearProperties).await
    }

    /// Changes the result ordering. Re-orders in place, never refetches.
    pub async fn set_sort(&self, order: SortOrder) -> Result<(), StorefrontError> {
        self.send(SearchCommand::SetSort { order }).await
    }

    /// Refetches the committed filter even if it is unchanged.
    pub async fn refresh(&self) -> Result<(), StorefrontError> {
        self.send(SearchCommand::Refresh).await
    }

    /// Returns the searcher's current filter, status, and results.
    pub async fn snapshot(&self) -> Result<SearchSnapshot, StorefrontError> {
        let (tx, rx) = oneshot::channel();
        self.send(SearchCommand::Snapshot { reply: tx }).await?;
        rx.await.map_err(|_| StorefrontError::ChannelClosed)
    }

    /// Closes the searcher. Its worker task exits and further commands on
    /// any clone of this handle fail with
    /// [`StorefrontError::ChannelClosed`].
    pub async fn close(&self) -> Result<(), StorefrontError> {
        self.send(SearchCommand::Close).await
    }

    async fn send(&self, cmd: SearchCommand) -> Result<(), StorefrontError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| StorefrontError::ChannelClosed)
    }
}
