use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::Display;

/// Sentinel the recommendation backend uses in place of a ticket URL
pub const SOLD_OUT: &str = "sold_out";

/// Identity of a recommended item, used as the decision key
///
/// The backend hands out either numeric movie ids or string ids; both are accepted
/// as-is and two records are the same item whenever their keys are equal. Integral
/// numbers that fit an `i64` are always `Int`, so `5` and `5.0` name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ItemKey {
    Int(i64),
    /// Numeric ids outside the `i64` range, or with a fractional part
    Number(Number),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Number(Number),
    Str(String),
}

// 2^53, the largest range in which every integer is exact as an f64
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl From<Number> for ItemKey {
    fn from(n: Number) -> Self {
        if let Some(id) = n.as_i64() {
            return ItemKey::Int(id);
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => ItemKey::Int(f as i64),
            _ => ItemKey::Number(n),
        }
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Number(n) => n.into(),
            RawKey::Str(id) => ItemKey::Str(id),
        })
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKey::Int(id) => write!(f, "{}", id),
            ItemKey::Number(id) => write!(f, "{}", id),
            ItemKey::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(id: i64) -> Self {
        ItemKey::Int(id)
    }
}

impl From<&str> for ItemKey {
    fn from(id: &str) -> Self {
        ItemKey::Str(id.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(id: String) -> Self {
        ItemKey::Str(id)
    }
}

/// One screening of a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Showtime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Screenings grouped under the cinema that shows them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CinemaShowtimes {
    pub cinema: String,
    #[serde(default)]
    pub showtimes: Vec<Showtime>,
}

/// A display-ready recommendation as returned by the recommendation backend
///
/// Only `id` matters to the swipe pipeline. The display fields are the ones the
/// backend is known to send; anything else lands in `extra` and is passed through
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<ItemKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Scrapers report the year as either a string or a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    /// Minutes from the database, free text from some scrapers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub showtimes: Vec<Showtime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cinemas: Vec<CinemaShowtimes>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemRecord {
    /// Creates a record carrying only an id
    pub fn with_id(id: impl Into<ItemKey>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Builds a record from an arbitrary JSON value without ever failing
    ///
    /// A non-object payload still represents a swipeable card; it just has no id and
    /// no display fields. Inside an object, a field with an unexpected type is moved
    /// to `extra` so the rest of the record, `id` included, survives.
    pub fn from_value(value: Value) -> Self {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                tracing::warn!(payload = %other, "Item payload is not an object, using empty record");
                return Self::default();
            }
        };

        match serde_json::from_value(Value::Object(fields.clone())) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed item fields, parsing field by field");
                Self::from_fields(fields)
            }
        }
    }

    fn from_fields(fields: Map<String, Value>) -> Self {
        let (mut valid, mut rejected) = (Map::new(), Map::new());
        for (key, value) in fields {
            let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            if serde_json::from_value::<ItemRecord>(single).is_ok() {
                valid.insert(key, value);
            } else {
                tracing::debug!(field = %key, "Keeping mistyped item field as extra");
                rejected.insert(key, value);
            }
        }

        let mut record: ItemRecord =
            serde_json::from_value(Value::Object(valid)).unwrap_or_default();
        record.extra.extend(rejected);
        record
    }

    /// Ticket URL, or `None` when missing or sold out
    pub fn ticket_link(&self) -> Option<&str> {
        self.ticket_link
            .as_deref()
            .filter(|link| !link.trim().is_empty() && !link.trim().eq_ignore_ascii_case(SOLD_OUT))
    }

    /// Whether the backend flagged the screening as sold out
    pub fn is_sold_out(&self) -> bool {
        self.ticket_link
            .as_deref()
            .is_some_and(|link| link.trim().eq_ignore_ascii_case(SOLD_OUT))
    }
}
