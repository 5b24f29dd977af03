//! Tagged payloads for trace records
//!
//! Every record carries a [`Content`] value with one deterministic textual form
//! per variant, so the same payload always renders to the same text.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Payload of a trace record
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Ordered key/value pairs, rendered in insertion order
    Map(Vec<(String, Content)>),
    /// Ordered sequence
    Seq(Vec<Content>),
    /// Free text
    Text(String),
    /// Integer or floating point number
    Number(serde_json::Number),
    Bool(bool),
    Null,
    /// Value that could not be converted; only its type name survives
    Opaque { type_name: String },
}

impl Content {
    /// Start building a `Map` payload
    pub fn map() -> MapBuilder {
        MapBuilder::default()
    }

    /// Convert any serializable value into content.
    ///
    /// Serialization failures never propagate: the value becomes
    /// [`Content::Opaque`] carrying the Rust type name.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Content::from(v),
            Err(_) => Content::opaque::<T>(),
        }
    }

    /// Placeholder content for a value of type `T`
    pub fn opaque<T: ?Sized>() -> Self {
        Content::Opaque {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Render to text. Top-level text is emitted raw; text nested inside a
    /// map or sequence is emitted as a quoted JSON string.
    pub fn render(&self) -> String {
        match self {
            Content::Text(s) => s.clone(),
            other => {
                let mut out = String::new();
                other.render_nested(&mut out);
                out
            }
        }
    }

    fn render_nested(&self, out: &mut String) {
        match self {
            Content::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&quote(key));
                    out.push_str(": ");
                    value.render_nested(out);
                }
                out.push('}');
            }
            Content::Seq(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render_nested(out);
                }
                out.push(']');
            }
            Content::Text(s) => out.push_str(&quote(s)),
            Content::Number(n) => out.push_str(&n.to_string()),
            Content::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Content::Null => out.push_str("null"),
            Content::Opaque { type_name } => {
                out.push('<');
                out.push_str(type_name);
                out.push('>');
            }
        }
    }
}

fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builder for [`Content::Map`] payloads
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    entries: Vec<(String, Content)>,
}

impl MapBuilder {
    /// Append a field; order of calls is the render order
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Content>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Content {
        Content::Map(self.entries)
    }
}

impl From<MapBuilder> for Content {
    fn from(builder: MapBuilder) -> Self {
        builder.build()
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Content::Null,
            Value::Bool(b) => Content::Bool(b),
            Value::Number(n) => Content::Number(n),
            Value::String(s) => Content::Text(s),
            Value::Array(items) => Content::Seq(items.into_iter().map(Content::from).collect()),
            Value::Object(map) => {
                Content::Map(map.into_iter().map(|(k, v)| (k, Content::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for Content {
    fn from(value: &Value) -> Self {
        Content::from(value.clone())
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&String> for Content {
    fn from(s: &String) -> Self {
        Content::Text(s.clone())
    }
}

impl From<bool> for Content {
    fn from(b: bool) -> Self {
        Content::Bool(b)
    }
}

macro_rules! content_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Content {
                fn from(n: $t) -> Self {
                    Content::Number(n.into())
                }
            }
        )*
    };
}

content_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for Content {
    fn from(n: f64) -> Self {
        // NaN and infinities have no JSON number form
        serde_json::Number::from_f64(n)
            .map(Content::Number)
            .unwrap_or_else(Content::opaque::<f64>)
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(items: Vec<T>) -> Self {
        Content::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Content::Null)
    }
}
