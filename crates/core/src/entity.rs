//! Entity trait: identity + continuity across state changes.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{DomainError, DomainResult};
use crate::id::UniqueEntityId;

/// Entity marker + minimal interface.
///
/// Identity, not the property bag, decides equality and lifecycle continuity.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Domain property bag carried by the entity.
    type Props: Serialize;

    /// Returns the wrapped identity.
    fn unique_entity_id(&self) -> &UniqueEntityId;

    /// Read access to the property bag.
    fn props(&self) -> &Self::Props;

    /// Raw identifier string.
    fn id(&self) -> &str {
        self.unique_entity_id().value()
    }

    /// Whether both entities share the same identity, regardless of properties.
    fn same_identity_as(&self, other: &Self) -> bool {
        self.unique_entity_id() == other.unique_entity_id()
    }

    /// Flat `{ id, ...props }` record used for persistence and assertions.
    fn to_json(&self) -> DomainResult<JsonValue> {
        flatten_with_id(self.unique_entity_id(), self.props())
    }
}

/// Serialize `props` and prepend the `id` key.
///
/// Props must serialize to a JSON object; anything else is a programming error in
/// the entity definition and is reported as `Unexpected`.
pub fn flatten_with_id<P: Serialize>(id: &UniqueEntityId, props: &P) -> DomainResult<JsonValue> {
    let value = serde_json::to_value(props)
        .map_err(|e| DomainError::unexpected(format!("props serialization failed: {e}")))?;

    let JsonValue::Object(fields) = value else {
        return Err(DomainError::unexpected("entity props must serialize to an object"));
    };

    let mut record = Map::with_capacity(fields.len() + 1);
    record.insert("id".to_string(), JsonValue::String(id.value().to_string()));
    record.extend(fields);
    Ok(JsonValue::Object(record))
}

/// Generic entity: an identity coupled with an arbitrary property bag.
///
/// Concrete entities with their own invariants (see the category crate) implement
/// [`Entity`] directly; this type covers entities that need none.
#[derive(Debug, Clone)]
pub struct BaseEntity<P> {
    id: UniqueEntityId,
    props: P,
}

impl<P> BaseEntity<P> {
    /// Build from props and an optional identity (generated when absent).
    pub fn new(props: P, id: Option<UniqueEntityId>) -> Self {
        Self {
            id: id.unwrap_or_default(),
            props,
        }
    }

    /// Mutable access for entity implementors.
    pub fn props_mut(&mut self) -> &mut P {
        &mut self.props
    }

    pub fn into_props(self) -> P {
        self.props
    }
}

impl<P> PartialEq for BaseEntity<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for BaseEntity<P> {}

impl<P> Entity for BaseEntity<P>
where
    P: Serialize + Clone + Send + Sync + 'static,
{
    type Props = P;

    fn unique_entity_id(&self) -> &UniqueEntityId {
        &self.id
    }

    fn props(&self) -> &P {
        &self.props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize)]
    struct StubProps {
        name: String,
        price: u32,
    }

    fn stub(name: &str, price: u32) -> BaseEntity<StubProps> {
        BaseEntity::new(
            StubProps {
                name: name.to_string(),
                price,
            },
            None,
        )
    }

    #[test]
    fn generates_identity_when_absent() {
        let entity = stub("name value", 5);
        assert!(UniqueEntityId::parse(entity.id()).is_ok());
    }

    #[test]
    fn keeps_supplied_identity() {
        let id = UniqueEntityId::parse("f6a17767-184a-4f12-8d51-29463077e276").unwrap();
        let entity = BaseEntity::new(
            StubProps {
                name: "name value".to_string(),
                price: 5,
            },
            Some(id.clone()),
        );
        assert_eq!(entity.unique_entity_id(), &id);
        assert_eq!(entity.id(), "f6a17767-184a-4f12-8d51-29463077e276");
    }

    #[test]
    fn to_json_flattens_id_and_props() {
        let entity = stub("name value", 5);
        assert_eq!(
            entity.to_json().unwrap(),
            json!({ "id": entity.id(), "name": "name value", "price": 5 })
        );
    }

    #[test]
    fn equality_is_by_identity_only() {
        let a = stub("a", 1);
        let mut b = a.clone();
        b.props_mut().name = "changed".to_string();
        assert_eq!(a, b);
        assert!(a.same_identity_as(&b));
        assert_ne!(a, stub("a", 1));
    }

    #[test]
    fn non_object_props_are_rejected() {
        let entity = BaseEntity::new(42u32, None);
        assert!(matches!(entity.to_json(), Err(DomainError::Unexpected(_))));
    }
}
