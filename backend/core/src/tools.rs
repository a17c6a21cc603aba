use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::traits::Tool;

/// Name, description and input schema of a registered tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Descriptors for every registered tool, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.list()
            .into_iter()
            .filter_map(|name| self.tools.get(&name))
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn parameters(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, args: Value) -> anyhow::Result<Value> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn registry_lists_sorted_and_dispatches() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("zeta")));
        registry.register(Arc::new(Echo("alpha")));

        assert_eq!(registry.list(), vec!["alpha", "zeta"]);
        assert_eq!(registry.descriptors()[0].name, "alpha");

        let tool = registry.get("zeta").unwrap();
        let out = tool.execute(json!({ "x": 1 })).await.unwrap();
        assert_eq!(out["x"], 1);
        assert!(registry.get("missing").is_none());
    }
}
