//! Helpers for constructing manifest fixtures in tests.

use serde_json::{Map, Value, json};

/// Incrementally build a JSON manifest.
///
/// # Examples
///
/// ```
/// use test_support::ManifestBuilder;
///
/// let text = ManifestBuilder::default()
///     .target("all", "true", "lib")
///     .target("lib", "true", "")
///     .to_json();
/// assert!(text.contains("\"lib\""));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ManifestBuilder {
    default_goal: Option<String>,
    variables: Map<String, Value>,
    targets: Map<String, Value>,
}

impl ManifestBuilder {
    /// Declare the goal used when none is given on the command line.
    #[must_use]
    pub fn default_goal(mut self, goal: &str) -> Self {
        self.default_goal = Some(goal.to_owned());
        self
    }

    /// Declare a variable; declaration order is preserved.
    #[must_use]
    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_owned(), json!(value));
        self
    }

    /// Declare a target whose output name matches its key.
    #[must_use]
    pub fn target(mut self, key: &str, recipe: &str, prerequisites: &str) -> Self {
        self.targets.insert(
            key.to_owned(),
            json!({ "recipe": recipe, "prerequisites": prerequisites }),
        );
        self
    }

    /// Declare a target with an explicit output name.
    #[must_use]
    pub fn named_target(mut self, key: &str, name: &str, recipe: &str, prerequisites: &str) -> Self {
        self.targets.insert(
            key.to_owned(),
            json!({ "name": name, "recipe": recipe, "prerequisites": prerequisites }),
        );
        self
    }

    /// Render the manifest as pretty-printed JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut root = Map::new();
        if let Some(goal) = &self.default_goal {
            root.insert("defaultGoal".to_owned(), json!(goal));
        }
        if !self.variables.is_empty() {
            root.insert("variables".to_owned(), Value::Object(self.variables.clone()));
        }
        root.insert("targets".to_owned(), Value::Object(self.targets.clone()));
        Value::Object(root).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_empty_sections() {
        let text = ManifestBuilder::default().target("all", "true", "").to_json();
        let value: Value = serde_json::from_str(&text).expect("valid json");
        assert!(value.get("variables").is_none());
        assert!(value.get("defaultGoal").is_none());
        assert_eq!(value["targets"]["all"]["recipe"], "true");
    }

    #[test]
    fn keeps_variable_order() {
        let text = ManifestBuilder::default()
            .variable("Z", "1")
            .variable("A", "2")
            .to_json();
        let z = text.find("\"Z\"").expect("Z present");
        let a = text.find("\"A\"").expect("A present");
        assert!(z < a);
    }
}
