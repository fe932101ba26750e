//! Values produced by translation resolution and accepted as interpolation
//! data.

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque renderable element owned by the embedding UI layer.
///
/// The core never inspects elements; it only carries them from
/// interpolation data into fragment results. Equality is identity.
#[derive(Clone)]
pub struct Element(Arc<dyn Any + Send + Sync>);

impl Element {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Element(..)")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fragment {
    Text(String),
    Element(Element),
}

/// A resolved translation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Translated {
    /// Plain text, to be escaped by the renderer.
    Text(String),
    /// Text that looks like markup and was requested to render live.
    Markup(String),
    /// Text interleaved with elements supplied as interpolation data.
    Fragments(Vec<Fragment>),
}

impl Translated {
    /// The text content, if this result carries no elements.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Translated::Text(text) | Translated::Markup(text) => Some(text),
            Translated::Fragments(_) => None,
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Translated::Markup(_))
    }
}

impl fmt::Display for Translated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translated::Text(text) | Translated::Markup(text) => f.write_str(text),
            Translated::Fragments(fragments) => {
                for fragment in fragments {
                    if let Fragment::Text(text) = fragment {
                        f.write_str(text)?;
                    }
                }
                Ok(())
            },
        }
    }
}

/// A value substituted for a `${name}` placeholder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlaceholderValue {
    Text(String),
    Element(Element),
}

impl From<&str> for PlaceholderValue {
    fn from(value: &str) -> Self {
        PlaceholderValue::Text(value.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(value: String) -> Self {
        PlaceholderValue::Text(value)
    }
}

impl From<Element> for PlaceholderValue {
    fn from(value: Element) -> Self {
        PlaceholderValue::Element(value)
    }
}

macro_rules! placeholder_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PlaceholderValue {
                fn from(value: $ty) -> Self {
                    PlaceholderValue::Text(value.to_string())
                }
            }
        )*
    };
}

placeholder_from_display!(bool, char, i32, i64, u32, u64, usize, f32, f64);

/// Interpolation data keyed by placeholder name.
pub type PlaceholderData = IndexMap<String, PlaceholderValue>;

/// Builds [`PlaceholderData`] from `name => value` pairs.
#[macro_export]
macro_rules! placeholders {
    () => {
        $crate::PlaceholderData::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::PlaceholderData::new();
        $(
            data.insert(::std::string::String::from($name), $crate::PlaceholderValue::from($value));
        )+
        data
    }};
}
