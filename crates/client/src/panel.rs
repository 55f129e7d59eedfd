//! Display and editing panels for one category of one department.

use std::sync::atomic::{AtomicBool, Ordering};

use campus_core::category::ContentCategory;
use campus_core::content::ContentItem;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::api::CampusApi;
use crate::error::ClientError;
use crate::form::ContentForm;

/// What a panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Loading,
    /// Fetched, but nothing exists yet. Carries the "No <label> yet" message.
    Empty(String),
    Loaded(Vec<T>),
    /// The fetch failed. Carries the message to show instead of the list.
    Failed(String),
}

impl<T> PanelState<T> {
    fn from_fetch(category: ContentCategory, result: Result<Vec<T>, ClientError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => {
                PanelState::Empty(format!("No {} yet", category.descriptor().label))
            }
            Ok(items) => PanelState::Loaded(items),
            Err(e) => PanelState::Failed(format!("Could not load content: {e}")),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            PanelState::Loaded(items) => items,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Public panel
// ---------------------------------------------------------------------------

/// Read-only listing of one category for one department.
///
/// `T` is [`ContentItem`] for most categories and
/// [`Album`](campus_core::content::Album) for the gallery.
#[derive(Debug)]
pub struct PublicPanel<T = ContentItem> {
    api: CampusApi,
    category: ContentCategory,
    department: String,
    state: PanelState<T>,
}

impl<T: DeserializeOwned> PublicPanel<T> {
    pub fn new(api: CampusApi, category: ContentCategory, department: impl Into<String>) -> Self {
        Self {
            api,
            category,
            department: department.into(),
            state: PanelState::Loading,
        }
    }

    /// Fetch the listing and return the resulting state.
    pub async fn load(&mut self) -> &PanelState<T> {
        self.state = PanelState::Loading;
        let result = self.api.fetch_list(self.category, &self.department).await;
        self.state = PanelState::from_fetch(self.category, result);
        &self.state
    }

    pub fn state(&self) -> &PanelState<T> {
        &self.state
    }
}

// ---------------------------------------------------------------------------
// Admin panel
// ---------------------------------------------------------------------------

/// Editing panel: the form, the current listing, and the last error.
///
/// Methods take `&self` so the panel can be shared between UI tasks. A
/// second submit or delete while one is running fails with
/// [`ClientError::Busy`]. Nothing is retried.
#[derive(Debug)]
pub struct AdminPanel {
    api: CampusApi,
    category: ContentCategory,
    department: String,
    form: Mutex<ContentForm>,
    state: Mutex<PanelState<ContentItem>>,
    last_error: Mutex<Option<String>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ClientError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AdminPanel {
    /// `api` must carry an access token.
    pub fn new(api: CampusApi, category: ContentCategory, department: impl Into<String>) -> Self {
        Self {
            api,
            category,
            department: department.into(),
            form: Mutex::new(ContentForm::new(category)),
            state: Mutex::new(PanelState::Loading),
            last_error: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn state(&self) -> PanelState<ContentItem> {
        self.state.lock().await.clone()
    }

    /// Message of the last failed submit or delete, verbatim from the server.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    pub async fn form(&self) -> ContentForm {
        self.form.lock().await.clone()
    }

    /// Change the form inputs.
    pub async fn edit_form(&self, edit: impl FnOnce(&mut ContentForm)) {
        edit(&mut *self.form.lock().await);
    }

    /// Load an existing record into the form for editing.
    pub async fn begin_edit(&self, item: &ContentItem) {
        *self.form.lock().await = ContentForm::edit(item);
    }

    /// Re-fetch the listing.
    pub async fn refresh(&self) {
        let result = self.api.list(self.category, &self.department).await;
        *self.state.lock().await = PanelState::from_fetch(self.category, result);
    }

    /// Validate and submit the form (create, or update when editing).
    ///
    /// On success the listing is re-fetched and the form cleared. On failure
    /// the form keeps its inputs and the message is kept in
    /// [`Self::last_error`].
    pub async fn submit(&self) -> Result<ContentItem, ClientError> {
        let _guard = InFlight::acquire(&self.in_flight)?;

        let form = self.form.lock().await.clone();
        let result = self.send(&form).await;
        self.finish(&result).await;

        if result.is_ok() {
            self.form.lock().await.clear();
        }
        result
    }

    /// Delete a record after `confirm` approves the prompt.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn delete(
        &self,
        item: &ContentItem,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ClientError> {
        if !confirm(&format!("Delete '{}'?", item.title)) {
            return Ok(false);
        }
        let _guard = InFlight::acquire(&self.in_flight)?;

        let result = self.api.delete(self.category, item.id).await;
        self.finish(&result).await;
        result.map(|()| true)
    }

    async fn send(&self, form: &ContentForm) -> Result<ContentItem, ClientError> {
        form.validate()?;
        let payload = form.to_payload(&self.department);
        let file = form.file.as_ref();

        match form.editing() {
            Some(id) => self.api.update(self.category, id, &payload, file).await,
            None => self.api.create(self.category, &payload, file).await,
        }
    }

    async fn finish<T>(&self, result: &Result<T, ClientError>) {
        match result {
            Ok(_) => {
                *self.last_error.lock().await = None;
                self.refresh().await;
            }
            Err(e) => {
                tracing::debug!(category = self.category.slug(), error = %e, "Admin panel request failed");
                *self.last_error.lock().await = Some(e.to_string());
            }
        }
    }
}
