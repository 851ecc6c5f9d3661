//! Structured parsing: XML text into a generic ordered tree.
//!
//! The directory format carries its data in attributes, and repeats
//! elements without any schema-level list marker. The tree type therefore
//! keeps attributes and child elements in separate ordered maps, and
//! represents repetition explicitly: a repeated child is a
//! [`XmlValue::Sequence`], a unique child a scalar. Fields named in the
//! always-sequence rules are forced into sequences even when they occur
//! once, so downstream code never has to branch on cardinality.

use indexmap::IndexMap;
use roxmltree::{Document, Node};

use crate::error::Result;

/// Parsed document: ordered map from root tag name to its value.
pub type ParsedTree = IndexMap<String, XmlValue>;

/// One value in the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    /// Character data of an element without attributes or child elements.
    Text(String),
    /// An element with attributes and/or child elements.
    Element(XmlElement),
    /// Repeated (or coerced-to-sequence) occurrences of one child name,
    /// in document order.
    Sequence(Vec<XmlValue>),
}

/// An element, with attributes kept apart from child elements so the two
/// namespaces can never collide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub attributes: IndexMap<String, String>,
    pub children: IndexMap<String, XmlValue>,
}

impl XmlValue {
    /// View this value as an element, if it is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Iterate the value as a sequence.
    ///
    /// A `Sequence` yields its items; any other value yields itself once.
    pub fn values(&self) -> std::slice::Iter<'_, XmlValue> {
        match self {
            XmlValue::Sequence(items) => items.iter(),
            other => std::slice::from_ref(other).iter(),
        }
    }
}

/// Table of dotted paths whose values are always parsed as sequences.
///
/// Paths are measured from just below the document root; the root
/// element's own tag name is stripped before matching, because the
/// publisher varies it per publication date.
#[derive(Debug, Clone, Default)]
pub struct SequenceRules {
    paths: Vec<String>,
}

impl SequenceRules {
    /// Build rules from a list of dotted paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the element at `path` (root segment already stripped) must
    /// always be a sequence.
    #[must_use]
    pub fn is_sequence(&self, path: &str) -> bool {
        self.paths.iter().any(|candidate| candidate == path)
    }
}

/// Parse XML text into a [`ParsedTree`].
///
/// # Arguments
/// * `xml` - Decoded document text
/// * `rules` - Always-sequence path table
///
/// # Errors
/// `HarvesterError::XmlParse` if the text is not well-formed XML.
pub fn parse_document(xml: &str, rules: &SequenceRules) -> Result<ParsedTree> {
    let document = Document::parse(xml)?;
    let root = document.root_element();

    let mut tree = ParsedTree::new();
    tree.insert(
        root.tag_name().name().to_string(),
        build_value(root, "", rules),
    );
    Ok(tree)
}

/// Build the value for one element, recursing into its children.
///
/// `path` is the dotted path of this element below the document root
/// (empty for the root itself).
fn build_value(node: Node<'_, '_>, path: &str, rules: &SequenceRules) -> XmlValue {
    let mut element = XmlElement::default();

    for attribute in node.attributes() {
        element
            .attributes
            .insert(attribute.name().to_string(), attribute.value().to_string());
    }

    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        let child_path = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}.{name}")
        };

        let value = build_value(child, &child_path, rules);
        insert_child(&mut element, name, value, rules.is_sequence(&child_path));
    }

    if element.attributes.is_empty() && element.children.is_empty() {
        XmlValue::Text(node.text().map(str::trim).unwrap_or_default().to_string())
    } else {
        XmlValue::Element(element)
    }
}

/// Insert a child value, promoting to a sequence on repetition or when the
/// rules demand one.
fn insert_child(element: &mut XmlElement, name: &str, value: XmlValue, force_sequence: bool) {
    match element.children.get_mut(name) {
        Some(XmlValue::Sequence(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, XmlValue::Sequence(Vec::with_capacity(2)));
            if let XmlValue::Sequence(items) = existing {
                items.push(first);
                items.push(value);
            }
        }
        None => {
            let initial = if force_sequence {
                XmlValue::Sequence(vec![value])
            } else {
                value
            };
            element.children.insert(name.to_string(), initial);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALWAYS_SEQUENCE_PATHS;
    use pretty_assertions::assert_eq;

    fn directory_rules() -> SequenceRules {
        SequenceRules::new(ALWAYS_SEQUENCE_PATHS.iter().copied())
    }

    fn root_element<'a>(tree: &'a ParsedTree, name: &str) -> &'a XmlElement {
        tree.get(name).and_then(XmlValue::as_element).unwrap()
    }

    #[test]
    fn test_malformed_xml_fails() {
        let result = parse_document("<root><unclosed>", &SequenceRules::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_attributes_kept_apart_from_same_named_child() {
        let xml = r#"<root Entry="attr-value"><Entry>child-value</Entry></root>"#;
        let tree = parse_document(xml, &SequenceRules::default()).unwrap();
        let root = root_element(&tree, "root");

        assert_eq!(root.attributes.get("Entry").unwrap(), "attr-value");
        assert_eq!(
            root.children.get("Entry").unwrap(),
            &XmlValue::Text("child-value".to_string())
        );
    }

    #[test]
    fn test_repetition_promotes_to_sequence() {
        let xml = "<root><item>1</item><item>2</item><other>x</other></root>";
        let tree = parse_document(xml, &SequenceRules::default()).unwrap();
        let root = root_element(&tree, "root");

        assert_eq!(
            root.children.get("item").unwrap(),
            &XmlValue::Sequence(vec![
                XmlValue::Text("1".to_string()),
                XmlValue::Text("2".to_string()),
            ])
        );
        assert_eq!(
            root.children.get("other").unwrap(),
            &XmlValue::Text("x".to_string())
        );
    }

    #[test]
    fn test_single_accounts_under_entry_is_coerced() {
        let xml = r#"<Directory>
            <BICDirectoryEntry BIC="044525225">
                <Accounts Account="30101810400000000225"/>
            </BICDirectoryEntry>
        </Directory>"#;
        let tree = parse_document(xml, &directory_rules()).unwrap();
        let root = root_element(&tree, "Directory");
        let entry = root
            .children
            .get("BICDirectoryEntry")
            .and_then(XmlValue::as_element)
            .unwrap();

        match entry.children.get("Accounts").unwrap() {
            XmlValue::Sequence(items) => assert_eq!(items.len(), 1),
            other => panic!("Accounts should be a sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_coercion_ignores_root_tag_name() {
        // The root tag varies per publication; the rule path starts below it.
        for root_tag in ["ED807", "BICDirectoryData", "whatever"] {
            let xml = format!(
                r#"<{root_tag}><BICDirectoryEntry><Accounts Account="1"/></BICDirectoryEntry></{root_tag}>"#
            );
            let tree = parse_document(&xml, &directory_rules()).unwrap();
            let root = root_element(&tree, root_tag);
            let entry = root
                .children
                .get("BICDirectoryEntry")
                .and_then(XmlValue::as_element)
                .unwrap();

            assert!(
                matches!(entry.children.get("Accounts"), Some(XmlValue::Sequence(_))),
                "coercion should not depend on the root tag {root_tag}"
            );
        }
    }

    #[test]
    fn test_accounts_at_unrelated_path_not_coerced() {
        let xml = r#"<root>
            <Unrelated><Accounts Account="1"/></Unrelated>
            <Accounts Account="2"/>
        </root>"#;
        let tree = parse_document(xml, &directory_rules()).unwrap();
        let root = root_element(&tree, "root");

        let unrelated = root
            .children
            .get("Unrelated")
            .and_then(XmlValue::as_element)
            .unwrap();
        assert!(matches!(
            unrelated.children.get("Accounts"),
            Some(XmlValue::Element(_))
        ));
        assert!(matches!(
            root.children.get("Accounts"),
            Some(XmlValue::Element(_))
        ));
    }

    #[test]
    fn test_values_iterates_scalar_once() {
        let scalar = XmlValue::Text("x".to_string());
        assert_eq!(scalar.values().count(), 1);

        let sequence = XmlValue::Sequence(vec![
            XmlValue::Text("a".to_string()),
            XmlValue::Text("b".to_string()),
        ]);
        assert_eq!(sequence.values().count(), 2);
    }

    #[test]
    fn test_leaf_text_trimmed() {
        let tree = parse_document("<root>  padded  </root>", &SequenceRules::default()).unwrap();
        assert_eq!(
            tree.get("root").unwrap(),
            &XmlValue::Text("padded".to_string())
        );
    }

    #[test]
    fn test_document_order_preserved() {
        let xml = "<root><b/><a/><c/></root>";
        let tree = parse_document(xml, &SequenceRules::default()).unwrap();
        let root = root_element(&tree, "root");
        let names: Vec<_> = root.children.keys().cloned().collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
