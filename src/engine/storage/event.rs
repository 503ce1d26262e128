/// A change applied to the shared storage area.
///
/// Published on the storage bus by the notifying wrapper in
/// [`StorageService`](crate::engine::storage::StorageService).
#[derive(Clone, Debug)]
pub struct StorageEvent {
    /// Key that changed; `None` when the whole area was cleared.
    pub key: Option<String>,
    /// Value before the change, if any.
    pub old_value: Option<String>,
    /// Value after the change; `None` for removals and clears.
    pub new_value: Option<String>,
}
