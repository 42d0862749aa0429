//! Adapters for the ports declared in `domain` and `app`. This is the only
//! layer allowed to know about storage/transport concretes.

mod in_memory_widget_repository;

pub use in_memory_widget_repository::InMemoryWidgetRepository;
