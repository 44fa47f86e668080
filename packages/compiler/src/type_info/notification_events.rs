//! Read-only dependency properties cannot be written by the binding engine, so
//! `OneWayToSource` bindings onto them are driven by a notification event the
//! owning element raises when the value changes.

use indexmap::IndexMap;

use super::{QualifiedType, TypeResolver};

/// Event raised by `owner` when a read-only property changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub owner: QualifiedType,
    pub event_name: String,
}

/// Resolves the notification event for a read-only property by walking the
/// base types of the target element. Table keys are `Assembly|Namespace.Type`.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyPropertyNotificationEventResolver {
    events: IndexMap<String, IndexMap<String, String>>,
}

impl ReadOnlyPropertyNotificationEventResolver {
    pub fn new(events: IndexMap<String, IndexMap<String, String>>) -> Self {
        ReadOnlyPropertyNotificationEventResolver { events }
    }

    pub fn resolve(
        &self,
        type_resolver: &dyn TypeResolver,
        qualified_type: &QualifiedType,
        property_name: &str,
    ) -> Option<NotificationEvent> {
        let mut current = type_resolver.get_type_symbol(qualified_type);
        let mut remaining = 64;
        while let Some(symbol) = current {
            let key = format!(
                "{}|{}",
                symbol.qualified_type.assembly_name,
                symbol.qualified_type.full_name()
            );
            if let Some(event_name) = self.events.get(&key).and_then(|p| p.get(property_name)) {
                return Some(NotificationEvent {
                    owner: symbol.qualified_type,
                    event_name: event_name.clone(),
                });
            }

            remaining -= 1;
            if remaining == 0 {
                break;
            }
            current = symbol.base_type.and_then(|base| type_resolver.get_type_symbol(&base));
        }

        None
    }
}
