//! Collection envelopes.
//!
//! TeamCity wraps collections as `{"count": N, "href": "...", "<item>": [...]}`
//! where the array's key depends on the resource (`project`, `build`,
//! `agent`, ...). [`Envelope<T>`] decodes that shape for any item type that
//! names its key through [`EnvelopeItem`].

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// An item type that appears in collection envelopes.
///
/// ```
/// use serde::Deserialize;
/// use teamcity_rest::{Envelope, EnvelopeItem};
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Item { id: u32 }
///
/// impl EnvelopeItem for Item {
///     const KEY: &'static str = "item";
/// }
///
/// let envelope: Envelope<Item> =
///     serde_json::from_str(r#"{"count":2,"item":[{"id":1},{"id":2}]}"#).unwrap();
/// assert_eq!(envelope.items, vec![Item { id: 1 }, Item { id: 2 }]);
/// ```
pub trait EnvelopeItem: DeserializeOwned {
    /// The key of the item array inside the envelope.
    const KEY: &'static str;
}

/// A decoded collection envelope.
///
/// Items keep the order the server sent them in. `count` is reported as-is
/// and never checked against the number of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    /// The server-reported count, if present.
    pub count: Option<u64>,
    /// Link to this collection.
    pub href: Option<String>,
    /// Link to the next page, if any.
    pub next_href: Option<String>,
    /// The items, in server order.
    pub items: Vec<T>,
}

impl<T> Envelope<T> {
    /// Consumes the envelope, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            count: None,
            href: None,
            next_href: None,
            items: Vec::new(),
        }
    }
}

impl<'de, T: EnvelopeItem> Deserialize<'de> for Envelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvelopeVisitor<T>(PhantomData<T>);

        impl<'de, T: EnvelopeItem> Visitor<'de> for EnvelopeVisitor<T> {
            type Value = Envelope<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a collection envelope with a `{}` array", T::KEY)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut envelope = Envelope::default();
                let mut seen_items = false;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "count" => envelope.count = map.next_value()?,
                        "href" => envelope.href = map.next_value()?,
                        "nextHref" => envelope.next_href = map.next_value()?,
                        k if k == T::KEY => {
                            if seen_items {
                                return Err(de::Error::duplicate_field(T::KEY));
                            }
                            seen_items = true;
                            envelope.items = map.next_value::<Option<Vec<T>>>()?.unwrap_or_default();
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(envelope)
            }
        }

        deserializer.deserialize_map(EnvelopeVisitor(PhantomData))
    }
}
