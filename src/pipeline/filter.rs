//! Filter stage: substring search on one designated field.
use crate::model::Record;

/// Search condition applied to a single field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub field: String,
    pub query: String,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self { field: field.into(), query: query.into() }
    }

    /// Case-sensitive containment on the field's string form.
    ///
    /// A record without the field is searched as the empty string.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if self.query.is_empty() {
            return true;
        }
        record.field_or_empty(&self.field).to_string().contains(&self.query)
    }
}

/// Keep the records matching `predicate`, in their original order.
pub fn filter<R: Record + Clone>(records: &[R], predicate: &FilterPredicate) -> Vec<R> {
    if predicate.query.is_empty() {
        return records.to_vec();
    }
    records.iter().filter(|r| predicate.matches(*r)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    fn mk(id: u64, email: &str, username: &str) -> User {
        User { id, email: email.into(), username: username.into(), ..Default::default() }
    }

    #[test]
    fn keeps_order_and_is_case_sensitive() {
        let users = vec![mk(1, "Bob@x.com", "b"), mk(2, "bob@y.com", "bb"), mk(3, "ann@x.com", "a")];
        let out = filter(&users, &FilterPredicate::new("email", "bob"));
        assert_eq!(out.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2]);

        let out = filter(&users, &FilterPredicate::new("email", "@x"));
        assert_eq!(out.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn numeric_fields_are_searched_as_text() {
        let users = vec![mk(12, "", ""), mk(3, "", ""), mk(21, "", "")];
        let out = filter(&users, &FilterPredicate::new("id", "1"));
        assert_eq!(out.iter().map(|u| u.id).collect::<Vec<_>>(), vec![12, 21]);
    }

    #[test]
    fn missing_field_only_matches_empty_query() {
        let users = vec![mk(1, "a@x.com", "a")];
        assert!(filter(&users, &FilterPredicate::new("phone", "a")).is_empty());
        assert_eq!(filter(&users, &FilterPredicate::new("phone", "")), users);
    }

    #[test]
    fn works_over_borrowed_records() {
        let users = vec![mk(1, "a@x.com", "a"), mk(2, "b@x.com", "b")];
        let refs: Vec<&User> = users.iter().collect();
        let out = filter(&refs, &FilterPredicate::new("username", "b"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }
}
