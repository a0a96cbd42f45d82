//! Record types shown in the table and the field access the pipeline relies on.
//!
//! The pipeline never looks at concrete structs; it asks a [`Record`] for a
//! named field and compares or searches the resulting [`FieldValue`].
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A single scalar read out of a record by field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Value used for a field a record does not have.
    pub fn missing() -> Self {
        FieldValue::Text(String::new())
    }

    /// Three-way comparison used by the sort stage.
    ///
    /// Integers compare numerically and text compares lexicographically.
    /// A mixed pair falls back to comparing the string representations so
    /// that the order stays total.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

/// Anything the filter/sort/page pipeline can operate on.
pub trait Record {
    /// Stable unique identifier.
    fn id(&self) -> u64;

    /// Look up a field by name. `None` means the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Field lookup with the missing-field fallback applied.
    fn field_or_empty(&self, name: &str) -> FieldValue {
        self.field(name).unwrap_or_else(FieldValue::missing)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> u64 {
        (**self).id()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

/// Postal address attached to every user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn street(&self) -> String {
        format!("{} {}", self.street_name, self.street_address)
    }
}

/// One user as returned by the remote directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub address: Address,
}

impl User {
    /// Display name, `first last`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Up to two uppercase initials, shown where the avatar image would be.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|s| s.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Record for User {
    fn id(&self) -> u64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let a = &self.address;
        let v = match name {
            // Ids above i64::MAX do not occur in practice; saturate rather than wrap.
            "id" => FieldValue::Int(i64::try_from(self.id).unwrap_or(i64::MAX)),
            "first_name" => self.first_name.as_str().into(),
            "last_name" => self.last_name.as_str().into(),
            "name" => self.full_name().into(),
            "username" => self.username.as_str().into(),
            "email" => self.email.as_str().into(),
            "avatar" => self.avatar.as_str().into(),
            "street" => a.street().into(),
            "street_name" => a.street_name.as_str().into(),
            "street_address" => a.street_address.as_str().into(),
            "city" => a.city.as_str().into(),
            "state" => a.state.as_str().into(),
            "country" => a.country.as_str().into(),
            "zip" | "zip_code" => a.zip_code.as_str().into(),
            _ => return None,
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_values_compare_by_text() {
        let a = FieldValue::Int(10);
        let b = FieldValue::Text("9".into());
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(FieldValue::Int(9).compare(&FieldValue::Int(10)), Ordering::Less);
    }

    #[test]
    fn user_fields_resolve_including_derived_ones() {
        let u = User {
            id: 7,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            address: Address { street_name: "Main".into(), street_address: "12".into(), ..Default::default() },
            ..Default::default()
        };
        assert_eq!(u.field("id"), Some(FieldValue::Int(7)));
        assert_eq!(u.field("name"), Some(FieldValue::Text("Ada Lovelace".into())));
        assert_eq!(u.field("street"), Some(FieldValue::Text("Main 12".into())));
        assert_eq!(u.field("nope"), None);
        assert_eq!(u.field_or_empty("nope"), FieldValue::missing());
        assert_eq!(u.initials(), "AL");
    }

    #[test]
    fn deserializes_and_ignores_unknown_fields() {
        let json = r#"{"id":3,"uid":"x","first_name":"A","last_name":"B","username":"ab",
            "email":"a@x.com","avatar":"http://img","address":{"city":"C","coordinates":{"lat":1.0}}}"#;
        let u: User = serde_json::from_str(json).unwrap();
        assert_eq!(u.id, 3);
        assert_eq!(u.address.city, "C");
        assert_eq!(u.address.zip_code, "");
    }
}
