/// Node model shared by the classifier and compiler termini.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classes assigned to a node.
///
/// Classifiers emit either a plain list of class names or a mapping of
/// class name to class parameters. Both shapes are kept as received so the
/// compiler sees exactly what the classifier said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeClasses {
    /// `["base", "nginx"]`
    List(Vec<String>),
    /// `{"base": {}, "nginx": {"port": 80}}`
    Parameterized(Map<String, Value>),
}

impl Default for NodeClasses {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl NodeClasses {
    /// Class names in classifier order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::List(names) => names.iter().map(String::as_str).collect(),
            Self::Parameterized(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

/// A classified node, fetched per invocation and handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Certname the node was looked up by.
    pub name: String,
    /// Assigned classes.
    #[serde(default)]
    pub classes: NodeClasses,
    /// Top-scope parameters supplied by the classifier.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    /// Environment chosen by the classifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl Node {
    /// An unclassified node with no classes or parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: NodeClasses::default(),
            parameters: Map::new(),
            environment: None,
        }
    }

    /// Replace the class list outright. Class parameters from the classifier
    /// are dropped along with the classes they belonged to.
    pub fn set_classes(&mut self, classes: Vec<String>) {
        self.classes = NodeClasses::List(classes);
    }
}

/// The document an external node classifier prints for one node.
///
/// Every key is optional and may be explicitly `null`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierOutput {
    #[serde(default)]
    pub classes: Option<NodeClasses>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl ClassifierOutput {
    /// Attach the classifier answer to a node name.
    #[must_use]
    pub fn into_node(self, name: &str) -> Node {
        let mut node = Node::new(name);
        node.classes = self.classes.unwrap_or_default();
        node.parameters = self.parameters.unwrap_or_default();
        node.environment = self.environment;
        node
    }
}

/// Split a `--classlist` value into class names.
///
/// Segments are trimmed and empty segments dropped, so `"a, b,,c,"` yields
/// `["a", "b", "c"]`.
#[must_use]
pub fn parse_classlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_classlist() {
        assert_eq!(parse_classlist("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_classlist(" a , b,,c,"), vec!["a", "b", "c"]);
        assert!(parse_classlist("").is_empty());
    }

    #[test]
    fn test_set_classes_replaces_parameterized() {
        let mut node: Node = serde_json::from_value(json!({
            "name": "web01",
            "classes": {"base": {"motd": "hi"}, "ntp": {}},
        }))
        .unwrap();
        assert_eq!(node.classes.names(), vec!["base", "ntp"]);

        node.set_classes(vec!["nginx".to_owned()]);
        assert_eq!(node.classes, NodeClasses::List(vec!["nginx".to_owned()]));
    }

    #[test]
    fn test_classifier_yaml_with_nulls() {
        let out: ClassifierOutput =
            serde_yml::from_str("classes:\nparameters:\n  role: web\nenvironment: staging\n")
                .unwrap();
        let node = out.into_node("web01");
        assert_eq!(node.name, "web01");
        assert!(node.classes.names().is_empty());
        assert_eq!(node.parameters["role"], json!("web"));
        assert_eq!(node.environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_node_json_omits_empty_fields() {
        let node = Node::new("db01");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"name": "db01", "classes": []}));
    }
}
