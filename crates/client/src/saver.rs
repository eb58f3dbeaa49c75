//! Save and reopen forms through a [`FormGateway`].

use formsmith_core::builder::FormBuilder;
use formsmith_core::field::FieldInstance;
use formsmith_core::form::FormRecord;
use formsmith_core::gateway::{FormGateway, GatewayError, SaveKey, SaveTracker};
use formsmith_core::types::DbId;

/// Drives create/update calls for the builder.
///
/// Callers pass a snapshot (`FormBuilder::submission()`), so the builder can
/// keep changing while a save is outstanding and a failed save loses no
/// edits. A second save for the same form while one is in flight fails
/// immediately with [`GatewayError::SaveInFlight`]. Nothing is retried.
pub struct FormSaver<G> {
    gateway: G,
    tracker: SaveTracker,
}

impl<G: FormGateway> FormSaver<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            tracker: SaveTracker::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether a save for this form is outstanding. `None` is the unsaved form.
    pub fn is_saving(&self, id: Option<DbId>) -> bool {
        self.tracker.is_in_flight(SaveKey::for_form(id))
    }

    /// Store a snapshot: create when `id` is `None`, otherwise update.
    pub async fn save(
        &self,
        id: Option<DbId>,
        name: &str,
        fields: Vec<FieldInstance>,
    ) -> Result<FormRecord, GatewayError> {
        let key = SaveKey::for_form(id);
        let _guard = self.tracker.begin(key)?;

        let result = match id {
            None => self.gateway.create_form(name, &fields).await,
            Some(id) => self.gateway.update_form(id, name, &fields).await,
        };

        match &result {
            Ok(record) => tracing::debug!(
                form_id = record.id,
                field_count = record.fields.len(),
                "Form saved",
            ),
            Err(e) => tracing::warn!(%key, error = %e, "Form save failed"),
        }
        result
    }

    /// Fetch a stored form and reopen it for editing.
    pub async fn open(&self, id: DbId) -> Result<(FormRecord, FormBuilder), GatewayError> {
        let record = self.gateway.get_form(id).await?;
        let builder = FormBuilder::from_fields(record.fields.clone())
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok((record, builder))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use formsmith_core::form::FormSummary;
    use tokio::sync::Notify;

    use super::*;

    fn record(id: DbId, name: &str, fields: &[FieldInstance]) -> FormRecord {
        let now = chrono::Utc::now();
        FormRecord {
            id,
            name: name.to_string(),
            fields: fields.to_vec(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Blocks every save until `release` is notified.
    #[derive(Default)]
    struct SlowGateway {
        started: Notify,
        release: Notify,
        creates: AtomicUsize,
        fail: bool,
    }

    impl SlowGateway {
        async fn hold(&self) -> Result<(), GatewayError> {
            self.started.notify_one();
            self.release.notified().await;
            if self.fail {
                return Err(GatewayError::Transport("connection reset".into()));
            }
            Ok(())
        }
    }

    impl FormGateway for SlowGateway {
        async fn list_forms(&self) -> Result<Vec<FormSummary>, GatewayError> {
            Ok(Vec::new())
        }

        async fn get_form(&self, id: DbId) -> Result<FormRecord, GatewayError> {
            Err(GatewayError::NotFound { id })
        }

        async fn create_form(
            &self,
            name: &str,
            fields: &[FieldInstance],
        ) -> Result<FormRecord, GatewayError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.hold().await?;
            Ok(record(1, name, fields))
        }

        async fn update_form(
            &self,
            id: DbId,
            name: &str,
            fields: &[FieldInstance],
        ) -> Result<FormRecord, GatewayError> {
            self.hold().await?;
            Ok(record(id, name, fields))
        }
    }

    #[tokio::test]
    async fn concurrent_save_of_same_form_rejected() {
        let saver = FormSaver::new(SlowGateway::default());

        let first = saver.save(Some(5), "Survey", Vec::new());
        let second = async {
            saver.gateway().started.notified().await;
            assert!(saver.is_saving(Some(5)));
            assert!(!saver.is_saving(Some(6)));

            let rejected = saver.save(Some(5), "Survey", Vec::new()).await;
            saver.gateway().release.notify_one();
            rejected
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap().id, 5);
        assert_matches!(
            second,
            Err(GatewayError::SaveInFlight(SaveKey::Existing(5)))
        );
        assert!(!saver.is_saving(Some(5)));
    }

    #[tokio::test]
    async fn unsaved_form_allows_one_create_at_a_time() {
        let saver = FormSaver::new(SlowGateway::default());

        let first = saver.save(None, "New", Vec::new());
        let second = async {
            saver.gateway().started.notified().await;
            let rejected = saver.save(None, "New", Vec::new()).await;
            saver.gateway().release.notify_one();
            rejected
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.is_ok());
        assert_matches!(second, Err(GatewayError::SaveInFlight(SaveKey::New)));
        assert_eq!(saver.gateway().creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_save_releases_slot() {
        let gateway = SlowGateway {
            fail: true,
            ..SlowGateway::default()
        };
        gateway.release.notify_one();
        let saver = FormSaver::new(gateway);

        let result = saver.save(Some(3), "Broken", Vec::new()).await;
        assert_matches!(result, Err(GatewayError::Transport(_)));
        assert!(!saver.is_saving(Some(3)));
    }

    #[tokio::test]
    async fn open_missing_form_is_not_found() {
        let saver = FormSaver::new(SlowGateway::default());
        assert_matches!(
            saver.open(9).await,
            Err(GatewayError::NotFound { id: 9 })
        );
    }
}
