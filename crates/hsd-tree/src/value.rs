//! Element type for HSD documents.
//!
//! Every HSD tag becomes an [`Element`]:
//! - `Temperature [Kelvin] = 300` is an element named `Temperature` with the
//!   attribute `default=Kelvin`, the equals flag set, and the text `300`
//! - `Filling = Fermi { ... }` is `Filling` (equals form) with one child
//!   `Fermi`, which holds the block content
//! - text of a block is kept verbatim, so `2 S\nGa As` stays one string

use hsd_parse::Attributes;

/// A tag together with its attributes, text and nested tags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes from `[...]`.
    pub attributes: Attributes,
    /// Written as `name = ...` rather than `name { ... }`.
    pub has_equals_form: bool,
    /// Line (zero-based) the tag was opened on.
    pub start_line: usize,
    /// Text content; several text runs are joined with a newline.
    pub text: Option<String>,
    /// Nested tags, in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Attributes::new(),
            has_equals_form: false,
            start_line: 0,
            text: None,
            children: Vec::new(),
        }
    }

    /// Set the text content, builder style.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an attribute, builder style.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Add a child, builder style.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Mark as written in equals form, builder style.
    pub fn equals_form(mut self) -> Self {
        self.has_equals_form = true;
        self
    }

    /// Append a text run.
    pub fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.text = Some(text.to_string()),
        }
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Mutable access to the first child with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .find(|c| c.name == name)
    }

    /// All children with the given name.
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'n> {
        self.children
            .iter()
            .filter(move |c| c.name == name)
    }

    /// Look up a descendant by a dotted path like `Hamiltonian.DFTB.SCC`.
    pub fn get(&self, path: &str) -> Option<&Element> {
        if path.is_empty() {
            return None;
        }
        path.split('.')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Whether this element has neither children nor text.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn sample() -> Element {
        Element::new("hsd").with_child(
            Element::new("Hamiltonian").equals_form().with_child(
                Element::new("DFTB")
                    .with_child(Element::new("SCC").equals_form().with_text("Yes"))
                    .with_child(Element::new("KPoint").with_text("0 0 0"))
                    .with_child(Element::new("KPoint").with_text("1 1 1")),
            ),
        )
    }

    #[test]
    fn test_path_lookup() {
        let root = sample();
        assert_eq!(
            root.get("Hamiltonian.DFTB.SCC").and_then(Element::text),
            Some("Yes")
        );
        assert!(root.get("Hamiltonian.Missing").is_none());
        assert!(root.get("").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let root = sample();
        assert!(root.get("hamiltonian").is_none());
    }

    #[test]
    fn test_children_named() {
        let root = sample();
        let dftb = root.get("Hamiltonian.DFTB").unwrap();
        let texts: Vec<_> = dftb.children_named("KPoint").filter_map(Element::text).collect();
        assert_eq!(texts, vec!["0 0 0", "1 1 1"]);
    }

    #[test]
    fn test_lookup_outlives_name() {
        let root = sample();
        let dftb = {
            let path = String::from("Hamiltonian.DFTB");
            root.get(&path)
        };
        let scc = {
            let name = "SCC".to_string();
            dftb.and_then(|e| e.child(&name))
        };
        assert_eq!(scc.and_then(Element::text), Some("Yes"));

        let kpoints: Vec<&Element> = {
            let name = String::from("KPoint");
            dftb.map(|e| e.children_named(&name).collect())
                .unwrap_or_default()
        };
        assert_eq!(kpoints.len(), 2);
    }

    #[test]
    fn test_push_text_joins_with_newline() {
        let mut element = Element::new("a");
        element.push_text("1 2");
        element.push_text("3 4");
        assert_eq!(element.text(), Some("1 2\n3 4"));
    }
}
