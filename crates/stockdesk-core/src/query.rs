//! Query string encoding for list filters and sort specs
//!
//! Only truthy values make it into the query: empty strings, zero numbers,
//! `false` and `None` are dropped so the server never sees blank filters.

use std::borrow::Cow;

/// A value that may contribute a `key=value` pair to a query string.
pub trait QueryValue {
    /// The raw (unencoded) value, or `None` when it is falsy.
    fn query_value(&self) -> Option<Cow<'_, str>>;
}

impl QueryValue for str {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        (!self.is_empty()).then_some(Cow::Borrowed(self))
    }
}

impl QueryValue for String {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        self.as_str().query_value()
    }
}

impl QueryValue for bool {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        self.then_some(Cow::Borrowed("true"))
    }
}

impl QueryValue for f64 {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        (*self != 0.0 && !self.is_nan()).then(|| Cow::Owned(self.to_string()))
    }
}

macro_rules! integer_query_value {
    ($($t:ty),*) => {
        $(
            impl QueryValue for $t {
                fn query_value(&self) -> Option<Cow<'_, str>> {
                    (*self != 0).then(|| Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

integer_query_value!(i32, i64, u32, u64, usize);

impl<T: QueryValue> QueryValue for Option<T> {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|value| value.query_value())
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn query_value(&self) -> Option<Cow<'_, str>> {
        (**self).query_value()
    }
}

/// Encode `(name, value)` pairs as `a=1&b=2`, skipping falsy values.
///
/// Pairs are emitted in input order; names and values are percent-encoded.
pub fn build_query_string<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: QueryValue,
{
    fields
        .into_iter()
        .filter_map(|(key, value)| {
            value.query_value().map(|raw| {
                format!(
                    "{}={}",
                    urlencoding::encode(key.as_ref()),
                    urlencoding::encode(&raw)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Join already-encoded query fragments with `&`, skipping empty ones.
pub fn join_query<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .filter(|part| !part.as_ref().is_empty())
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("&")
}

/// `path` or `path?query` when the query is non-empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
