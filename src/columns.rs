//! Column metadata handed to the table renderer.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One table header: which field it shows and how.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Field name, also used as the sort key.
    pub id: &'static str,
    pub text: &'static str,
    pub align: Align,
    pub numeric: bool,
    pub sortable: bool,
}

impl ColumnHeader {
    const fn new(id: &'static str, text: &'static str, align: Align, numeric: bool, sortable: bool) -> Self {
        Self { id, text, align, numeric, sortable }
    }
}

pub const USER_COLUMNS: [ColumnHeader; 5] = [
    ColumnHeader::new("id", "ID", Align::Left, true, true),
    ColumnHeader::new("avatar", "Avatar", Align::Center, false, false),
    ColumnHeader::new("name", "Name", Align::Left, false, true),
    ColumnHeader::new("username", "Username", Align::Left, false, true),
    ColumnHeader::new("email", "Email", Align::Right, false, true),
];

pub const ADDRESS_COLUMNS: [ColumnHeader; 5] = [
    ColumnHeader::new("street", "Street", Align::Left, false, false),
    ColumnHeader::new("city", "City", Align::Left, false, false),
    ColumnHeader::new("state", "State", Align::Left, false, false),
    ColumnHeader::new("country", "Country", Align::Left, false, false),
    ColumnHeader::new("zip", "Zip", Align::Right, false, false),
];

/// The `n`th sortable user column (1-based), as bound to the digit keys.
pub fn sortable_column(n: usize) -> Option<&'static ColumnHeader> {
    USER_COLUMNS.iter().filter(|c| c.sortable).nth(n.checked_sub(1)?)
}

/// Whether `field` names a sortable user column.
pub fn is_sortable(field: &str) -> bool {
    USER_COLUMNS.iter().any(|c| c.sortable && c.id == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_sortable_columns_in_order() {
        assert_eq!(sortable_column(1).map(|c| c.id), Some("id"));
        assert_eq!(sortable_column(2).map(|c| c.id), Some("name"));
        assert_eq!(sortable_column(4).map(|c| c.id), Some("email"));
        assert!(sortable_column(0).is_none());
        assert!(sortable_column(5).is_none());
        assert!(!is_sortable("avatar"));
    }
}
