//! Ordered attribute maps attached to tags.

/// A single `name=value` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value, verbatim (quotes are kept).
    pub value: String,
}

/// Attributes of a tag, in the order they were written.
///
/// Names are unique: inserting an existing name replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|a| a.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.entries.push(Attribute { name, value });
                None
            }
        }
    }

    /// Get the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    /// If this map holds exactly one attribute named `name`, its value.
    pub fn only(&self, name: &str) -> Option<&str> {
        match self.entries.as_slice() {
            [single] if single.name == name => Some(&single.value),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_insertion_order_is_kept() {
        let attrs = Attributes::from([("unit", "Kelvin"), ("dim", "3"), ("a", "b")]);
        let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["unit", "dim", "a"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut attrs = Attributes::from([("a", "1"), ("b", "2")]);
        assert_eq!(attrs.insert("a", "3"), Some("1".to_string()));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("a"), Some("3"));
        assert_eq!(attrs.iter().next().map(|a| a.name.as_str()), Some("a"));
    }

    #[test]
    fn test_only() {
        let attrs = Attributes::from([("default", "kelvin")]);
        assert_eq!(attrs.only("default"), Some("kelvin"));
        assert_eq!(attrs.only("unit"), None);
        assert_eq!(Attributes::new().only("default"), None);
    }
}
