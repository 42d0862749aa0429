//! Domain layer: the `Widget` entity and the repository port it is read and
//! written through. Held to the same layer-boundary contract as
//! `hexaframe_service::domain` -- no framework imports, no I/O.

mod widget;

pub use widget::{CreateWidget, UpdateWidget, Widget, WidgetId};

use hexaframe_service::repository::Repository;

/// The port this service's one use case depends on. Any adapter that can
/// satisfy `Repository<WidgetId, Widget, CreateWidget, UpdateWidget>`
/// (in-memory, SQL, ...) can stand in here; `infra::InMemoryWidgetRepository`
/// is the one adapter this repo ships.
pub trait WidgetRepository: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> {}

impl<R> WidgetRepository for R where R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> {}
