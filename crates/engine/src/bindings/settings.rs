use std::sync::Arc;

use parking_lot::Mutex;

use folio_core::MessageId;
use folio_core::models::{ContactMessage, ContactSettings, ContactSettingsForm, SiteSettings, SiteSettingsForm};
use folio_storage::{DocumentStore, MessageStore, StoreError};

use crate::controller::Deletion;
use crate::document::DocumentController;
use crate::error::EngineError;
use crate::notify::Ui;
use crate::status::{Activity, Status};

/// Site and contact settings, each a whole-document save.
#[derive(Clone)]
pub struct SettingsBinding {
    site: DocumentController<SiteSettings>,
    contact: DocumentController<ContactSettings>,
}

impl SettingsBinding {
    pub fn new(
        site: Arc<dyn DocumentStore<SiteSettings>>,
        contact: Arc<dyn DocumentStore<ContactSettings>>,
        ui: Ui,
    ) -> Self {
        Self {
            site: DocumentController::new(site, ui.clone()),
            contact: DocumentController::new(contact, ui),
        }
    }

    pub fn site(&self) -> &DocumentController<SiteSettings> {
        &self.site
    }

    pub fn contact(&self) -> &DocumentController<ContactSettings> {
        &self.contact
    }

    pub async fn load(&self) -> Result<(), EngineError> {
        self.site.load().await?;
        self.contact.load().await?;
        Ok(())
    }

    pub async fn save_site(&self, form: SiteSettingsForm) -> Result<SiteSettings, EngineError> {
        self.site.save(form).await
    }

    /// A hidden subject field is never saved as required.
    pub async fn save_contact(
        &self,
        form: ContactSettingsForm,
    ) -> Result<ContactSettings, EngineError> {
        self.contact.save(form.normalized()).await
    }
}

struct InboxState {
    messages: Vec<ContactMessage>,
    unread: usize,
    activity: Activity,
    mounted: bool,
}

/// Contact-form messages with an unread counter kept in step locally.
pub struct Inbox {
    store: Arc<dyn MessageStore>,
    ui: Ui,
    state: Mutex<InboxState>,
}

impl Inbox {
    pub fn new(store: Arc<dyn MessageStore>, ui: Ui) -> Self {
        Self {
            store,
            ui,
            state: Mutex::new(InboxState {
                messages: Vec::new(),
                unread: 0,
                activity: Activity::default(),
                mounted: true,
            }),
        }
    }

    pub fn messages(&self) -> Vec<ContactMessage> {
        self.state.lock().messages.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().unread
    }

    pub fn status(&self) -> Status {
        self.state.lock().activity.status()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Detaches the inbox; results that arrive afterwards are dropped.
    pub fn unmount(&self) {
        self.state.lock().mounted = false;
    }

    pub async fn load(&self) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock();
            if !state.mounted {
                return Err(EngineError::Unmounted);
            }
            state.activity.begin_load();
        }
        let result = async {
            let messages = self.store.messages().await?;
            let unread = self.store.unread_count().await?;
            Ok::<_, StoreError>((messages, unread))
        }
        .await;

        let mut state = self.state.lock();
        state
            .activity
            .end_load(result.as_ref().err().map(ToString::to_string));
        if !state.mounted {
            tracing::debug!("inbox result dropped after unmount");
            return result.map(|_| ()).map_err(|source| EngineError::Fetch {
                resource: "messages",
                source,
            });
        }
        match result {
            Ok((messages, unread)) => {
                state.messages = messages;
                state.unread = unread;
                Ok(())
            }
            Err(source) => {
                drop(state);
                tracing::warn!(error = %source, "failed to load messages");
                self.ui.error("Failed to load messages");
                Err(EngineError::Fetch {
                    resource: "messages",
                    source,
                })
            }
        }
    }

    pub async fn mark_read(&self, id: &MessageId) -> Result<(), EngineError> {
        self.begin_save()?;
        let result = self.store.mark_read(id).await;
        self.finish(result, "mark message as read", |state| {
            if let Some(m) = state.messages.iter_mut().find(|m| &m.id == id) {
                if !m.is_read {
                    m.is_read = true;
                    state.unread = state.unread.saturating_sub(1);
                }
            }
        })
        .map(|_| ())
    }

    pub async fn mark_all_read(&self) -> Result<(), EngineError> {
        self.begin_save()?;
        let result = self.store.mark_all_read().await;
        let mounted = self.finish(result, "mark all messages as read", |state| {
            for m in &mut state.messages {
                m.is_read = true;
            }
            state.unread = 0;
        })?;
        if mounted {
            self.ui.success("All messages marked as read");
        }
        Ok(())
    }

    pub async fn delete(&self, id: &MessageId) -> Result<Deletion, EngineError> {
        if !self.ui.confirm("Are you sure you want to delete this message?") {
            return Ok(Deletion::Cancelled);
        }
        self.begin_save()?;
        let result = self.store.delete_message(id).await;
        let mounted = self.finish(result, "delete message", |state| {
            if let Some(pos) = state.messages.iter().position(|m| &m.id == id) {
                let removed = state.messages.remove(pos);
                if !removed.is_read {
                    state.unread = state.unread.saturating_sub(1);
                }
            }
        })?;
        if mounted {
            self.ui.success("Message deleted");
        }
        Ok(Deletion::Deleted)
    }

    fn begin_save(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if !state.mounted {
            return Err(EngineError::Unmounted);
        }
        state.activity.begin_save();
        Ok(())
    }

    /// Ends a save and, while mounted, applies and reports it. The caller's
    /// success notice is only due when this returns `Ok(true)`.
    fn finish(
        &self,
        result: Result<(), StoreError>,
        action: &str,
        apply: impl FnOnce(&mut InboxState),
    ) -> Result<bool, EngineError> {
        let mut state = self.state.lock();
        state
            .activity
            .end_save(result.as_ref().err().map(ToString::to_string));
        let mounted = state.mounted;
        match result {
            Ok(()) => {
                if mounted {
                    apply(&mut state);
                }
                Ok(mounted)
            }
            Err(source) => {
                drop(state);
                tracing::warn!(%action, error = %source, "inbox update failed");
                if mounted {
                    self.ui.error(&format!("Failed to {action}"));
                }
                Err(EngineError::Mutation {
                    action: action.to_string(),
                    source,
                })
            }
        }
    }
}
