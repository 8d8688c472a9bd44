// ── Remote data gateway ──
//
// One typed boundary per entity between the view controller and the REST
// service. Every call is a single request: no retries, no caching.

use std::future::Future;
use std::sync::Arc;

use canopy_api::{ApiClient, Filter};
use tracing::debug;

use crate::entity::Entity;
use crate::error::CoreError;
use crate::model::EntityId;

/// Async CRUD operations for one entity type.
pub trait Gateway<E: Entity>: Send + Sync {
    fn list_all(&self) -> impl Future<Output = Result<Vec<E>, CoreError>> + Send;

    fn list_by_filter(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<E>, CoreError>> + Send;

    fn get(&self, id: EntityId) -> impl Future<Output = Result<E, CoreError>> + Send;

    /// Create from a draft without an id; the server assigns one.
    fn create(&self, draft: &E) -> impl Future<Output = Result<E, CoreError>> + Send;

    /// Full replace. Callers merge partial edits before calling.
    fn update(&self, id: EntityId, record: &E) -> impl Future<Output = Result<E, CoreError>> + Send;

    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Gateway backed by the REST service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Arc<ApiClient>,
}

impl HttpGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

/// Attach the entity and id to a bare 404.
fn record_error<E: Entity>(err: canopy_api::Error, id: EntityId) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: E::KIND.title().into(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

impl<E: Entity> Gateway<E> for HttpGateway {
    async fn list_all(&self) -> Result<Vec<E>, CoreError> {
        let records = self.client.list(E::KIND.collection()).await?;
        debug!(kind = %E::KIND, count = records.len(), "listed records");
        Ok(records)
    }

    async fn list_by_filter(&self, filter: &Filter) -> Result<Vec<E>, CoreError> {
        let records = self
            .client
            .list_filtered(E::KIND.collection(), filter)
            .await?;
        debug!(kind = %E::KIND, ?filter, count = records.len(), "listed filtered records");
        Ok(records)
    }

    async fn get(&self, id: EntityId) -> Result<E, CoreError> {
        self.client
            .fetch(E::KIND.collection(), id.get())
            .await
            .map_err(|e| record_error::<E>(e, id))
    }

    async fn create(&self, draft: &E) -> Result<E, CoreError> {
        Ok(self.client.create(E::KIND.collection(), draft).await?)
    }

    async fn update(&self, id: EntityId, record: &E) -> Result<E, CoreError> {
        self.client
            .update(E::KIND.collection(), id.get(), record)
            .await
            .map_err(|e| record_error::<E>(e, id))
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.client
            .remove(E::KIND.collection(), id.get())
            .await
            .map_err(|e| record_error::<E>(e, id))
    }
}

// ── In-memory gateway for controller tests ───────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod memory {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use serde_json::Value;

    use super::*;

    /// Mimics the service: assigns ids, filters by exact match, 404s on
    /// unknown ids. `fail_next` makes the next call fail with a 500.
    pub(crate) struct MemoryGateway<E> {
        records: Mutex<Vec<E>>,
        next_id: AtomicU64,
        fail_next: AtomicBool,
    }

    impl<E: Entity> MemoryGateway<E> {
        pub(crate) fn new(seed: Vec<E>) -> Self {
            let next = seed
                .iter()
                .filter_map(|r| r.id())
                .map(EntityId::get)
                .max()
                .unwrap_or(0)
                + 1;
            Self {
                records: Mutex::new(seed),
                next_id: AtomicU64::new(next),
                fail_next: AtomicBool::new(false),
            }
        }

        pub(crate) fn fail_next(&self) {
            self.fail_next.store(true, Ordering::SeqCst);
        }

        pub(crate) fn snapshot(&self) -> Vec<E> {
            self.records.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), CoreError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                Err(CoreError::Server {
                    status: 500,
                    message: "API Error: 500 Internal Server Error".into(),
                })
            } else {
                Ok(())
            }
        }

        fn missing(id: EntityId) -> CoreError {
            CoreError::NotFound {
                entity_type: E::KIND.title().into(),
                identifier: id.to_string(),
            }
        }

        fn matches(record: &E, filter: &Filter) -> bool {
            let json = serde_json::to_value(record).unwrap();
            let text = |key: &str| json.get(key).and_then(Value::as_str).unwrap_or("").to_owned();
            match filter {
                Filter::Zone(zone) => record.zone() == zone,
                Filter::ConservationStatus(s) => text("conservationStatus") == *s,
                Filter::HealthStatus(s) => text("healthStatus") == *s,
                Filter::Type(t) => text("resourceType") == *t,
                Filter::Medicinal => json.get("medicinalUse") == Some(&Value::Bool(true)),
                Filter::Active => text("status") == "Active",
                Filter::Date(d) => text("visitDate") == *d,
                Filter::DateRange { start, end } => {
                    let date = text("visitDate");
                    !date.is_empty() && date.as_str() >= start.as_str() && date.as_str() <= end.as_str()
                }
            }
        }
    }

    impl<E: Entity> Gateway<E> for MemoryGateway<E> {
        async fn list_all(&self) -> Result<Vec<E>, CoreError> {
            self.check()?;
            Ok(self.snapshot())
        }

        async fn list_by_filter(&self, filter: &Filter) -> Result<Vec<E>, CoreError> {
            self.check()?;
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|r| Self::matches(r, filter))
                .collect())
        }

        async fn get(&self, id: EntityId) -> Result<E, CoreError> {
            self.check()?;
            self.snapshot()
                .into_iter()
                .find(|r| r.id() == Some(id))
                .ok_or_else(|| Self::missing(id))
        }

        async fn create(&self, draft: &E) -> Result<E, CoreError> {
            self.check()?;
            let mut record = draft.clone();
            record.set_id(EntityId::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: EntityId, record: &E) -> Result<E, CoreError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let slot = records
                .iter_mut()
                .find(|r| r.id() == Some(id))
                .ok_or_else(|| Self::missing(id))?;
            let mut replacement = record.clone();
            replacement.set_id(id);
            *slot = replacement.clone();
            Ok(replacement)
        }

        async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id() != Some(id));
            if records.len() == before {
                Err(Self::missing(id))
            } else {
                Ok(())
            }
        }
    }
}
