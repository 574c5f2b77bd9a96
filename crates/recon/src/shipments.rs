use std::collections::HashSet;

/// Insertion-ordered set of shipment identifiers.
#[derive(Debug, Clone, Default)]
pub struct ShipmentList {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl ShipmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn push(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.items.push(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn join(&self, separator: &str) -> String {
        self.items.join(separator)
    }
}

impl PartialEq for ShipmentList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ShipmentList {}

impl<'a> FromIterator<&'a str> for ShipmentList {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut list = ShipmentList::new();
        for id in iter {
            list.push(id);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order_without_duplicates() {
        let list: ShipmentList = ["SH2", "SH1", "SH2", "SH3", "SH1"].into_iter().collect();
        assert_eq!(list.as_slice(), &["SH2", "SH1", "SH3"]);
        assert_eq!(list.join(", "), "SH2, SH1, SH3");
    }

    #[test]
    fn identical_ids_collapse() {
        let mut list = ShipmentList::new();
        assert!(list.push("SH9"));
        assert!(!list.push("SH9"));
        assert!(!list.push("SH9"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.join(", "), "SH9");
    }

    #[test]
    fn equality_ignores_lookup_set() {
        let a: ShipmentList = ["x", "y"].into_iter().collect();
        let b: ShipmentList = ["x", "y", "x"].into_iter().collect();
        let c: ShipmentList = ["y", "x"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
