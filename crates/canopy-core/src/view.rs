// ── View state controller ──
//
// Generic state machine behind every entity screen and command. User
// intents are turned into owned `Request`s; a request runs against a
// gateway (inline or on a spawned task) and its `Outcome` is folded back
// in with `complete`. Failures become notifications and never clear the
// current list.

use std::collections::VecDeque;

use canopy_api::Filter;
use chrono::{Local, NaiveDate};
use serde_json::Map;
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::error::CoreError;
use crate::filter::FilterInputs;
use crate::form::{Draft, from_json_map, to_json_map};
use crate::gateway::Gateway;
use crate::model::EntityId;
use crate::schema::QuickFilter;
use crate::stats::Stat;

// ── Form mode ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Add,
    EditFull(EntityId),
    /// Quick update: only the entity's reduced field subset.
    EditPartial(EntityId),
}

impl FormMode {
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn target(self) -> Option<EntityId> {
        match self {
            Self::EditFull(id) | Self::EditPartial(id) => Some(id),
            Self::Closed | Self::Add => None,
        }
    }

    pub fn title(self, entity: &str) -> String {
        match self {
            Self::Closed => String::new(),
            Self::Add => format!("Add {entity}"),
            Self::EditFull(id) => format!("Edit {entity} #{id}"),
            Self::EditPartial(id) => format!("Quick Update {entity} #{id}"),
        }
    }
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

// ── Requests & outcomes ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    /// Full edit.
    Edited,
    /// Quick update.
    Updated,
    Deleted,
}

impl Mutation {
    fn past_tense(self) -> &'static str {
        match self {
            Self::Created => "added",
            Self::Edited => "edited",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Created | Self::Edited => "save",
            Self::Updated => "update",
            Self::Deleted => "delete",
        }
    }
}

/// An owned gateway call, detached from the controller so it can run
/// anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Request<E> {
    Load,
    Filter(Filter),
    Create(E),
    Replace {
        id: EntityId,
        record: E,
        mutation: Mutation,
    },
    Delete(EntityId),
}

/// Result of a `Request`, ready to be applied with `ViewController::complete`.
#[derive(Debug)]
pub enum Outcome<E> {
    Loaded {
        filter: Option<Filter>,
        result: Result<Vec<E>, CoreError>,
    },
    Mutated {
        mutation: Mutation,
        result: Result<Option<E>, CoreError>,
        /// Full list fetched after a successful mutation.
        refreshed: Option<Result<Vec<E>, CoreError>>,
    },
}

impl<E: Entity> Request<E> {
    pub async fn execute<G: Gateway<E>>(self, gateway: &G) -> Outcome<E> {
        match self {
            Self::Load => Outcome::Loaded {
                filter: None,
                result: gateway.list_all().await,
            },
            Self::Filter(filter) => {
                let result = gateway.list_by_filter(&filter).await;
                Outcome::Loaded {
                    filter: Some(filter),
                    result,
                }
            }
            Self::Create(draft) => {
                let result = gateway.create(&draft).await.map(Some);
                Self::refresh_after(gateway, Mutation::Created, result).await
            }
            Self::Replace {
                id,
                record,
                mutation,
            } => {
                let result = gateway.update(id, &record).await.map(Some);
                Self::refresh_after(gateway, mutation, result).await
            }
            Self::Delete(id) => {
                let result = gateway.delete(id).await.map(|()| None);
                Self::refresh_after(gateway, Mutation::Deleted, result).await
            }
        }
    }

    async fn refresh_after<G: Gateway<E>>(
        gateway: &G,
        mutation: Mutation,
        result: Result<Option<E>, CoreError>,
    ) -> Outcome<E> {
        let refreshed = if result.is_ok() {
            Some(gateway.list_all().await)
        } else {
            None
        };
        Outcome::Mutated {
            mutation,
            result,
            refreshed,
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// State of one entity management view.
#[derive(Debug)]
pub struct ViewController<E: Entity> {
    records: Vec<E>,
    mode: FormMode,
    /// Record the open edit form was started from.
    active: Option<E>,
    draft: Draft,
    filters: FilterInputs,
    applied_filter: Option<Filter>,
    loading: bool,
    pending_delete: Option<EntityId>,
    notifications: VecDeque<Notification>,
    last_saved: Option<E>,
    last_error: Option<CoreError>,
    today: Option<NaiveDate>,
}

impl<E: Entity> Default for ViewController<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> ViewController<E> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            mode: FormMode::Closed,
            active: None,
            draft: Draft::default(),
            filters: FilterInputs::default(),
            applied_filter: None,
            loading: false,
            pending_delete: None,
            notifications: VecDeque::new(),
            last_saved: None,
            last_error: None,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn record(&self, id: EntityId) -> Option<&E> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn filters(&self) -> &FilterInputs {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterInputs {
        &mut self.filters
    }

    pub fn applied_filter(&self) -> Option<&Filter> {
        self.applied_filter.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.pending_delete
    }

    /// Record returned by the last successful create or update.
    pub fn last_saved(&self) -> Option<&E> {
        self.last_saved.as_ref()
    }

    pub fn take_error(&mut self) -> Option<CoreError> {
        self.last_error.take()
    }

    pub fn stats(&self) -> Vec<Stat> {
        E::summarize(&self.records, self.today())
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ── Loading & filtering ──────────────────────────────────────────

    /// Fetch the full list (initial mount or manual refresh).
    pub fn refresh(&mut self) -> Request<E> {
        self.loading = true;
        Request::Load
    }

    /// Apply the highest-priority non-empty filter input, or reload
    /// everything if all are empty.
    pub fn apply_filters(&mut self) -> Option<Request<E>> {
        match self.filters.resolve(E::FILTERS) {
            Ok(Some(filter)) => {
                self.loading = true;
                Some(Request::Filter(filter))
            }
            Ok(None) => Some(self.refresh()),
            Err(err) => {
                self.fail("Failed to apply filters", err);
                None
            }
        }
    }

    pub fn apply_quick_filter(&mut self, quick: QuickFilter) -> Option<Request<E>> {
        if E::QUICK_FILTERS.contains(&quick) {
            self.loading = true;
            Some(Request::Filter(quick.into()))
        } else {
            self.fail(
                "Failed to apply filters",
                CoreError::Unsupported {
                    operation: format!("{} filter for {}", quick.label(), E::KIND.noun()),
                },
            );
            None
        }
    }

    pub fn clear_filters(&mut self) -> Request<E> {
        self.filters.clear();
        self.refresh()
    }

    // ── Forms ────────────────────────────────────────────────────────

    pub fn open_add(&mut self) {
        self.mode = FormMode::Add;
        self.active = None;
        self.draft = Draft::blank::<E>(self.today());
    }

    pub fn open_edit(&mut self, id: EntityId) -> Result<(), CoreError> {
        let record = self.find(id)?.clone();
        self.draft = Draft::from_record(&record, E::FIELDS)?;
        self.active = Some(record);
        self.mode = FormMode::EditFull(id);
        Ok(())
    }

    pub fn open_quick_update(&mut self, id: EntityId) -> Result<(), CoreError> {
        if !E::supports_quick_update() {
            return Err(CoreError::Unsupported {
                operation: format!("quick update for {}", E::KIND.noun()),
            });
        }
        let record = self.find(id)?.clone();
        self.draft = Draft::from_record(&record, E::quick_fields())?;
        self.active = Some(record);
        self.mode = FormMode::EditPartial(id);
        Ok(())
    }

    /// Close any open form, discarding the draft.
    pub fn cancel(&mut self) {
        self.mode = FormMode::Closed;
        self.active = None;
        self.draft = Draft::default();
    }

    /// Validate the draft and produce the save request. On a local
    /// validation failure the form stays open and an error is queued.
    pub fn save(&mut self) -> Option<Request<E>> {
        match self.build_save() {
            Ok(request) => {
                self.loading = true;
                Some(request)
            }
            Err(err) => {
                let verb = match self.mode {
                    FormMode::EditPartial(_) => "update",
                    _ => "save",
                };
                self.fail(&format!("Failed to {verb} {}", E::KIND.noun()), err);
                None
            }
        }
    }

    fn build_save(&self) -> Result<Request<E>, CoreError> {
        match self.mode {
            FormMode::Closed => Err(CoreError::validation("No form is open")),
            FormMode::Add => {
                self.draft.validate(E::FIELDS)?;
                let record = from_json_map(self.draft.merge_into(Map::new(), None))?;
                Ok(Request::Create(record))
            }
            FormMode::EditFull(id) => {
                self.draft.validate(E::FIELDS)?;
                let original = match self.active.as_ref() {
                    Some(record) => record,
                    None => self.find(id)?,
                };
                let merged = self.draft.merge_into(to_json_map(original)?, None);
                let mut record: E = from_json_map(merged)?;
                record.set_id(id);
                Ok(Request::Replace {
                    id,
                    record,
                    mutation: Mutation::Edited,
                })
            }
            FormMode::EditPartial(id) => {
                self.draft.validate(E::quick_fields())?;
                // Merge over the record as it is in the list now, not as it
                // was when the form opened.
                let current = match (self.record(id), self.active.as_ref()) {
                    (Some(record), _) | (None, Some(record)) => record,
                    (None, None) => return Err(Self::not_found(id)),
                };
                let keys: Vec<&str> = E::quick_fields().map(|f| f.key).collect();
                let merged = self.draft.merge_into(to_json_map(current)?, Some(keys.as_slice()));
                let mut record: E = from_json_map(merged)?;
                record.set_id(id);
                Ok(Request::Replace {
                    id,
                    record,
                    mutation: Mutation::Updated,
                })
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: EntityId) {
        self.pending_delete = Some(id);
    }

    /// Resolve the pending confirmation. Declining has no effect.
    pub fn resolve_delete(&mut self, confirmed: bool) -> Option<Request<E>> {
        let id = self.pending_delete.take()?;
        if confirmed {
            self.loading = true;
            Some(Request::Delete(id))
        } else {
            debug!(kind = %E::KIND, %id, "delete declined");
            None
        }
    }

    // ── Outcomes ─────────────────────────────────────────────────────

    /// Fold a finished request back into the view.
    pub fn complete(&mut self, outcome: Outcome<E>) {
        self.loading = false;
        match outcome {
            Outcome::Loaded { filter, result } => match result {
                Ok(records) => {
                    debug!(kind = %E::KIND, count = records.len(), "list loaded");
                    self.records = records;
                    self.applied_filter = filter;
                }
                Err(err) => {
                    let context = if filter.is_some() {
                        "Failed to apply filters".to_owned()
                    } else {
                        format!("Failed to fetch {}s", E::KIND.noun())
                    };
                    self.fail(&context, err);
                }
            },
            Outcome::Mutated {
                mutation,
                result,
                refreshed,
            } => match result {
                Ok(record) => {
                    if mutation != Mutation::Deleted {
                        self.cancel();
                    }
                    self.last_saved = record;
                    self.notifications.push_back(Notification::success(format!(
                        "{} {} successfully!",
                        E::KIND.title(),
                        mutation.past_tense()
                    )));
                    if let Some(result) = refreshed {
                        self.complete(Outcome::Loaded {
                            filter: None,
                            result,
                        });
                    }
                }
                Err(err) => {
                    let context = format!("Failed to {} {}", mutation.verb(), E::KIND.noun());
                    self.fail(&context, err);
                }
            },
        }
    }

    /// Execute a request inline and apply its outcome, surfacing the
    /// failure (already reported as a notification) to the caller.
    pub async fn run<G: Gateway<E>>(
        &mut self,
        gateway: &G,
        request: Request<E>,
    ) -> Result<(), CoreError> {
        self.last_error = None;
        let outcome = request.execute(gateway).await;
        self.complete(outcome);
        match self.last_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn find(&self, id: EntityId) -> Result<&E, CoreError> {
        self.record(id).ok_or_else(|| Self::not_found(id))
    }

    fn not_found(id: EntityId) -> CoreError {
        CoreError::NotFound {
            entity_type: E::KIND.title().into(),
            identifier: id.to_string(),
        }
    }

    fn fail(&mut self, context: &str, err: CoreError) {
        warn!(kind = %E::KIND, error = %err, "{context}");
        self.notifications
            .push_back(Notification::error(format!("{context}: {err}")));
        self.last_error = Some(err);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::gateway::memory::MemoryGateway;
    use crate::model::{Animal, ForestOfficer, Tree, Visitor};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn animals() -> Vec<Animal> {
        serde_json::from_value(json!([
            { "animalId": 1, "name": "Tiger", "scientificName": "Panthera tigris",
              "zone": "Zone A", "count": 10, "conservationStatus": "Endangered",
              "location": "North ridge", "speciesType": "Mammal" },
            { "animalId": 2, "name": "Deer", "zone": "zone a", "count": 0,
              "conservationStatus": "Least Concern" },
            { "animalId": 3, "name": "Pangolin", "zone": "Zone B", "count": 25,
              "conservationStatus": "Critically Endangered" }
        ]))
        .unwrap()
    }

    async fn mounted(seed: Vec<Animal>) -> (MemoryGateway<Animal>, ViewController<Animal>) {
        let gateway = MemoryGateway::new(seed);
        let mut view = ViewController::new().with_today(today());
        let request = view.refresh();
        assert!(view.is_loading());
        view.run(&gateway, request).await.unwrap();
        assert!(!view.is_loading());
        (gateway, view)
    }

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw)
    }

    #[tokio::test]
    async fn mount_loads_everything() {
        let (_, view) = mounted(animals()).await;
        assert_eq!(view.records().len(), 3);
        assert_eq!(view.mode(), FormMode::Closed);
        let population = view
            .stats()
            .into_iter()
            .find(|s| s.label == "Total Population")
            .unwrap();
        assert_eq!(population.value.to_string(), "35");
    }

    #[tokio::test]
    async fn create_update_delete_are_reflected_by_list() {
        let (gateway, mut view) = mounted(animals()).await;

        view.open_add();
        let name = Animal::field("name").unwrap();
        let zone = Animal::field("zone").unwrap();
        view.draft_mut().set_input(name, "Hornbill");
        view.draft_mut().set_input(zone, "Zone C");
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();
        assert_eq!(view.mode(), FormMode::Closed);
        assert_eq!(view.records().len(), 4);
        let created = view.last_saved().unwrap().clone();
        assert_eq!(created.id, Some(id(4)));
        assert_eq!(created.last_sighting_date, Some(today()));

        view.open_edit(id(1)).unwrap();
        view.draft_mut().set_input(Animal::field("count").unwrap(), "11");
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();

        view.request_delete(id(2));
        let request = view.resolve_delete(true).unwrap();
        view.run(&gateway, request).await.unwrap();

        assert_eq!(view.records(), gateway.snapshot().as_slice());
        let ids: Vec<u64> = view.records().iter().filter_map(|a| a.id).map(EntityId::get).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(view.record(id(1)).unwrap().count, 11);

        let messages: Vec<String> = view.drain_notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Animal added successfully!",
                "Animal edited successfully!",
                "Animal deleted successfully!"
            ]
        );
    }

    #[tokio::test]
    async fn quick_update_touches_only_its_fields() {
        let (gateway, mut view) = mounted(animals()).await;
        let before = view.record(id(1)).unwrap().clone();

        view.open_quick_update(id(1)).unwrap();
        assert_eq!(view.mode(), FormMode::EditPartial(id(1)));
        assert_eq!(view.draft().values().len(), 3);
        view.draft_mut().set_input(Animal::field("count").unwrap(), "14");
        view.draft_mut().set_input(Animal::field("conservationStatus").unwrap(), "Vulnerable");
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();

        let after = view.record(id(1)).unwrap();
        assert_eq!(after.count, 14);
        assert_eq!(after.conservation_status, "Vulnerable");
        assert_eq!(after.zone, before.zone);
        assert_eq!(after.name, before.name);
        assert_eq!(after.scientific_name, before.scientific_name);
        assert_eq!(after.location, before.location);
        assert_eq!(after.id, before.id);
    }

    #[tokio::test]
    async fn full_edit_keeps_fields_the_draft_omits() {
        let (gateway, mut view) = mounted(animals()).await;
        view.open_edit(id(1)).unwrap();
        // A draft that never saw scientificName keeps the original.
        let mut draft = Draft::default();
        draft.set_value("name", json!("Bengal Tiger"));
        draft.set_value("zone", json!("Zone A"));
        *view.draft_mut() = draft;
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();

        let after = view.record(id(1)).unwrap();
        assert_eq!(after.name, "Bengal Tiger");
        assert_eq!(after.scientific_name, "Panthera tigris");
        assert_eq!(after.count, 10);
    }

    #[tokio::test]
    async fn zone_filter_is_exact_and_case_sensitive() {
        let (gateway, mut view) = mounted(animals()).await;
        view.filters_mut().zone = "Zone A".into();
        let request = view.apply_filters().unwrap();
        view.run(&gateway, request).await.unwrap();

        assert_eq!(view.records().len(), 1);
        assert!(view.records().iter().all(|a| a.zone == "Zone A"));
        assert_eq!(view.applied_filter(), Some(&Filter::Zone("Zone A".into())));

        let request = view.clear_filters();
        view.run(&gateway, request).await.unwrap();
        assert!(view.filters().is_empty());
        assert_eq!(view.records().len(), 3);
        assert_eq!(view.applied_filter(), None);
    }

    #[tokio::test]
    async fn deleting_a_missing_id_reports_not_found() {
        let (gateway, mut view) = mounted(animals()).await;
        view.request_delete(id(42));
        let request = view.resolve_delete(true).unwrap();
        let err = view.run(&gateway, request).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(view.records().len(), 3);
        assert!(!view.is_loading());
        let notes = view.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert!(notes[0].message.starts_with("Failed to delete animal"));
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() {
        let (gateway, mut view) = mounted(animals()).await;
        view.request_delete(id(1));
        assert_eq!(view.pending_delete(), Some(id(1)));
        assert!(view.resolve_delete(false).is_none());
        assert_eq!(view.pending_delete(), None);
        assert!(!view.is_loading());
        assert_eq!(gateway.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_list() {
        let (gateway, mut view) = mounted(animals()).await;
        gateway.fail_next();
        let request = view.refresh();
        let err = view.run(&gateway, request).await.unwrap_err();

        assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
        assert_eq!(view.records().len(), 3);
        assert!(!view.is_loading());
        let notes = view.drain_notifications();
        assert_eq!(
            notes[0].message,
            "Failed to fetch animals: API Error: 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn failed_save_keeps_form_open() {
        let (gateway, mut view) = mounted(animals()).await;
        view.open_edit(id(3)).unwrap();
        gateway.fail_next();
        let request = view.save().unwrap();
        assert!(view.run(&gateway, request).await.is_err());
        assert_eq!(view.mode(), FormMode::EditFull(id(3)));
        assert_eq!(view.records().len(), 3);
    }

    #[tokio::test]
    async fn invalid_number_blocks_save_without_a_request() {
        let (_, mut view) = mounted(animals()).await;
        view.open_quick_update(id(1)).unwrap();
        view.draft_mut().set_input(Animal::field("count").unwrap(), "lots");
        assert!(view.save().is_none());
        assert!(!view.is_loading());
        assert_eq!(view.mode(), FormMode::EditPartial(id(1)));
        let err = view.take_error().unwrap();
        assert_eq!(err.to_string(), "Population: expected a whole number");
    }

    #[tokio::test]
    async fn cancel_discards_the_draft() {
        let (_, mut view) = mounted(animals()).await;
        view.open_add();
        view.draft_mut().set_input(Animal::field("name").unwrap(), "Owl");
        view.cancel();
        assert_eq!(view.mode(), FormMode::Closed);
        assert!(view.draft().values().is_empty());
    }

    #[tokio::test]
    async fn editing_an_unknown_record_is_not_found() {
        let (_, mut view) = mounted(animals()).await;
        assert!(view.open_edit(id(99)).unwrap_err().is_not_found());
        assert_eq!(view.mode(), FormMode::Closed);
    }

    #[tokio::test]
    async fn quick_update_is_limited_to_supporting_entities() {
        let gateway: MemoryGateway<Tree> = MemoryGateway::new(
            serde_json::from_value(json!([{ "treeId": 1, "commonName": "Oak", "zone": "Zone A" }]))
                .unwrap(),
        );
        let mut view = ViewController::<Tree>::new();
        let request = view.refresh();
        view.run(&gateway, request).await.unwrap();
        assert!(matches!(
            view.open_quick_update(id(1)),
            Err(CoreError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn officer_quick_update_merges_over_current_record() {
        let gateway: MemoryGateway<ForestOfficer> = MemoryGateway::new(
            serde_json::from_value(json!([{
                "officerId": 5, "firstName": "Asha", "lastName": "Rao", "employeeId": "EMP-5",
                "designation": "Ranger", "assignedZone": "Zone A", "contactNumber": "+100",
                "email": "asha@forest.example", "status": "Active"
            }]))
            .unwrap(),
        );
        let mut view = ViewController::<ForestOfficer>::new();
        let request = view.refresh();
        view.run(&gateway, request).await.unwrap();

        view.open_quick_update(id(5)).unwrap();
        view.draft_mut().set_input(ForestOfficer::field("status").unwrap(), "On Leave");
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();

        let officer = view.record(id(5)).unwrap();
        assert_eq!(officer.status, "On Leave");
        assert_eq!(officer.email, "asha@forest.example");
        assert_eq!(officer.employee_id, "EMP-5");
        let last = view.drain_notifications().pop().unwrap();
        assert_eq!(last.message, "Forest Officer updated successfully!");
    }

    #[tokio::test]
    async fn adding_a_tree_yields_one_new_record() {
        let gateway: MemoryGateway<Tree> = MemoryGateway::new(Vec::new());
        let mut view = ViewController::<Tree>::new();
        let request = view.refresh();
        view.run(&gateway, request).await.unwrap();

        view.open_add();
        let draft = view.draft_mut();
        draft.set_input(Tree::field("commonName").unwrap(), "Oak");
        draft.set_input(Tree::field("heightMeters").unwrap(), "12.5");
        draft.set_input(Tree::field("healthStatus").unwrap(), "Healthy");
        draft.set_input(Tree::field("zone").unwrap(), "Zone A");
        let request = view.save().unwrap();
        view.run(&gateway, request).await.unwrap();

        assert_eq!(view.records().len(), 1);
        let tree = &view.records()[0];
        assert!(tree.id.is_some());
        assert_eq!(tree.common_name, "Oak");
        assert_eq!(tree.height_meters, Some(12.5));
        assert_eq!(tree.health_status, "Healthy");
    }

    #[tokio::test]
    async fn visitor_date_range_needs_both_ends() {
        let gateway: MemoryGateway<Visitor> = MemoryGateway::new(
            serde_json::from_value(json!([
                { "visitorId": 1, "fullName": "A", "visitDate": "2024-12-31", "zoneVisited": "Zone A" },
                { "visitorId": 2, "fullName": "B", "visitDate": "2025-01-01", "zoneVisited": "Zone A" },
                { "visitorId": 3, "fullName": "C", "visitDate": "2025-01-31", "zoneVisited": "Zone B" },
                { "visitorId": 4, "fullName": "D", "visitDate": "2025-02-01", "zoneVisited": "Zone B" }
            ]))
            .unwrap(),
        );
        let mut view = ViewController::<Visitor>::new();
        let request = view.refresh();
        view.run(&gateway, request).await.unwrap();

        view.filters_mut().from = "2025-01-01".into();
        assert!(view.apply_filters().is_none());
        assert!(!view.is_loading());
        let note = view.drain_notifications().pop().unwrap();
        assert_eq!(
            note.message,
            "Failed to apply filters: Please select both start and end dates"
        );

        view.filters_mut().to = "2025-01-31".into();
        let request = view.apply_filters().unwrap();
        view.run(&gateway, request).await.unwrap();
        let ids: Vec<u64> = view.records().iter().filter_map(|v| v.id).map(EntityId::get).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn quick_filters_are_entity_specific() {
        let (_, mut view) = mounted(animals()).await;
        assert!(view.apply_quick_filter(QuickFilter::Medicinal).is_none());
        assert!(view.take_error().is_some());
    }
}
