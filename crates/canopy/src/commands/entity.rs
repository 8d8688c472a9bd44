//! Record command handlers, one generic implementation for every entity.
//!
//! Each invocation drives a fresh `ViewController` the same way the TUI
//! does: build an intent, run the resulting request, then report the
//! controller's notifications.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use canopy_core::view::Request;
use canopy_core::{
    ApiClient, Draft, Entity, EntityId, FieldSpec, FilterField, Gateway, HttpGateway,
    NotificationLevel, QuickFilter, ViewController,
};

use crate::cli::{EntityArgs, EntityCommand, FilterArgs, WriteArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle<E: Entity>(
    client: ApiClient,
    args: EntityArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let gateway = HttpGateway::new(Arc::new(client));
    let mut view = ViewController::<E>::new();
    let noun = E::KIND.noun();

    match args.command {
        EntityCommand::List(filters) => {
            let request = filter_request(&mut view, &filters)?;
            run(&mut view, &gateway, settings, format!("Loading {noun}s"), request).await?;
            let out = output::render_records(settings.output, view.records(), settings.color)?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        EntityCommand::Get { id } => {
            let id = EntityId::new(id);
            let fetch = <HttpGateway as Gateway<E>>::get(&gateway, id);
            let record = util::with_spinner(settings, format!("Fetching {noun} #{id}"), fetch).await?;
            let out = output::render_record(settings.output, &record, settings.color)?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        EntityCommand::Add(write) => {
            view.open_add();
            apply_write::<E>(view.draft_mut(), &write, E::FIELDS.iter())?;
            save(&mut view, &gateway, settings).await
        }

        EntityCommand::Edit { id, write } => {
            load(&mut view, &gateway, settings).await?;
            view.open_edit(EntityId::new(id))?;
            apply_write::<E>(view.draft_mut(), &write, E::FIELDS.iter())?;
            save(&mut view, &gateway, settings).await
        }

        EntityCommand::Update { id, write } => {
            if !E::supports_quick_update() {
                return Err(CliError::Unsupported {
                    operation: format!("quick update for {noun}s"),
                });
            }
            load(&mut view, &gateway, settings).await?;
            view.open_quick_update(EntityId::new(id))?;
            apply_write::<E>(view.draft_mut(), &write, E::quick_fields())?;
            save(&mut view, &gateway, settings).await
        }

        EntityCommand::Delete { id } => {
            let id = EntityId::new(id);
            let prompt = format!("Are you sure you want to delete this {noun} (#{id})?");
            if !util::confirm(&prompt, &format!("{noun}s delete"), settings)? {
                return Ok(());
            }
            view.request_delete(id);
            if let Some(request) = view.resolve_delete(true) {
                run(&mut view, &gateway, settings, format!("Deleting {noun} #{id}"), request)
                    .await?;
            }
            announce(&mut view, settings);
            Ok(())
        }

        EntityCommand::Stats(filters) => {
            let request = filter_request(&mut view, &filters)?;
            run(&mut view, &gateway, settings, format!("Loading {noun}s"), request).await?;
            let out = output::render_stats(settings.output, &view.stats())?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        EntityCommand::Fields => {
            let out = output::render_fields::<E>(settings.output)?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

// ── Controller plumbing ─────────────────────────────────────────────

async fn run<E: Entity>(
    view: &mut ViewController<E>,
    gateway: &HttpGateway,
    settings: &Settings,
    message: String,
    request: Request<E>,
) -> Result<(), CliError> {
    util::with_spinner(settings, message, view.run(gateway, request)).await?;
    Ok(())
}

async fn load<E: Entity>(
    view: &mut ViewController<E>,
    gateway: &HttpGateway,
    settings: &Settings,
) -> Result<(), CliError> {
    let request = view.refresh();
    let message = format!("Loading {}s", E::KIND.noun());
    run(view, gateway, settings, message, request).await
}

async fn save<E: Entity>(
    view: &mut ViewController<E>,
    gateway: &HttpGateway,
    settings: &Settings,
) -> Result<(), CliError> {
    let request = view.save().ok_or_else(|| pending_error(view))?;
    let message = format!("Saving {}", E::KIND.noun());
    run(view, gateway, settings, message, request).await?;
    announce(view, settings);

    if let Some(record) = view.last_saved() {
        let out = output::render_record(settings.output, record, settings.color)?;
        output::print_output(&out, settings.quiet);
    }
    Ok(())
}

/// The error behind an intent that produced no request.
fn pending_error<E: Entity>(view: &mut ViewController<E>) -> CliError {
    view.take_error().map_or_else(
        || CliError::Internal(format!("no request was produced for {}", E::KIND.noun())),
        CliError::from,
    )
}

/// Echo success notifications to stderr. Failures come back as errors.
fn announce<E: Entity>(view: &mut ViewController<E>, settings: &Settings) {
    for note in view.drain_notifications() {
        if settings.quiet || note.level != NotificationLevel::Success {
            continue;
        }
        if settings.color {
            eprintln!("{}", note.message.green());
        } else {
            eprintln!("{}", note.message);
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

fn filter_request<E: Entity>(
    view: &mut ViewController<E>,
    args: &FilterArgs,
) -> Result<Request<E>, CliError> {
    let quick = if args.medicinal {
        Some(QuickFilter::Medicinal)
    } else if args.active {
        Some(QuickFilter::Active)
    } else {
        None
    };
    if let Some(quick) = quick {
        return view.apply_quick_filter(quick).ok_or_else(|| pending_error(view));
    }

    let status_field = [FilterField::ConservationStatus, FilterField::HealthStatus]
        .into_iter()
        .find(|f| E::FILTERS.contains(f));
    let given = [
        (Some(FilterField::Zone), "zone", &args.zone),
        (status_field, "status", &args.status),
        (Some(FilterField::Type), "type", &args.kind),
        (Some(FilterField::Date), "date", &args.date),
        (Some(FilterField::DateRange), "from", &args.from),
        (Some(FilterField::DateRange), "to", &args.to),
    ];
    for (field, flag, value) in given {
        let supported = field.is_some_and(|f| E::FILTERS.contains(&f));
        if value.is_some() && !supported {
            return Err(CliError::Validation {
                field: flag.into(),
                reason: format!("{}s cannot be filtered by {flag}", E::KIND.noun()),
            });
        }
    }

    let inputs = view.filters_mut();
    inputs.zone = args.zone.clone().unwrap_or_default();
    inputs.status = args.status.clone().unwrap_or_default();
    inputs.kind = args.kind.clone().unwrap_or_default();
    inputs.date = args.date.clone().unwrap_or_default();
    inputs.from = args.from.clone().unwrap_or_default();
    inputs.to = args.to.clone().unwrap_or_default();

    view.apply_filters().ok_or_else(|| pending_error(view))
}

// ── Field assignment ────────────────────────────────────────────────

/// Copy `--from-file` values, then `--set` assignments, into the draft.
/// Only `allowed` fields may be written.
fn apply_write<'a, E: Entity>(
    draft: &mut Draft,
    write: &WriteArgs,
    allowed: impl IntoIterator<Item = &'a FieldSpec>,
) -> Result<(), CliError> {
    if write.set.is_empty() && write.from_file.is_none() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: "nothing to write; pass --set KEY=VALUE or --from-file PATH".into(),
        });
    }
    let allowed: Vec<&FieldSpec> = allowed.into_iter().collect();

    if let Some(ref path) = write.from_file {
        for (key, value) in util::read_json_object(path)? {
            let field = writable_field::<E>(&allowed, &key)?;
            match value {
                Value::String(raw) => draft.set_input(field, &raw),
                other => draft.set_value(field.key, other),
            }
        }
    }

    for raw in &write.set {
        let (key, value) = util::split_assignment(raw)?;
        let field = writable_field::<E>(&allowed, key)?;
        draft.set_input(field, value);
    }
    Ok(())
}

fn writable_field<'a, E: Entity>(
    allowed: &[&'a FieldSpec],
    key: &str,
) -> Result<&'a FieldSpec, CliError> {
    if let Some(field) = allowed.iter().copied().find(|f| f.key == key) {
        return Ok(field);
    }
    let noun = E::KIND.noun();
    let reason = if E::field(key).is_some() {
        "not part of the quick update form; use `edit`".to_owned()
    } else {
        format!("unknown {noun} field (see `canopy {noun}s fields`)")
    };
    Err(CliError::Validation {
        field: key.to_owned(),
        reason,
    })
}
