//! Action bridge — one schema-validated tool per catalog action.
//!
//! Tools are built once at startup and never mutated afterwards; each call is
//! an independent round trip through the shared executor, so the set can be
//! shared across concurrent callers behind an `Arc` without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::actionkit::{
    ActionDescriptor, ActionExecutor, Catalog, CatalogSource, Credential, CredentialSource,
};
use crate::tools::schema::{SchemaTranslator, ToolSchema};
use crate::types::{ActionName, BuildPolicy, Config, Error, InvocationId, Result};

// =============================================================================
// Tool
// =============================================================================

/// A registered tool bound to one remote action.
pub struct ActionTool {
    name: ActionName,
    integration: String,
    description: String,
    schema: ToolSchema,
    executor: Arc<dyn ActionExecutor>,
    credentials: Arc<dyn CredentialSource>,
}

impl fmt::Debug for ActionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTool")
            .field("name", &self.name)
            .field("integration", &self.integration)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl ActionTool {
    pub fn name(&self) -> &ActionName {
        &self.name
    }

    pub fn integration(&self) -> &str {
        &self.integration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    /// Validate `arguments` and run the remote action.
    ///
    /// Invalid arguments never reach the remote service. Remote failures are
    /// returned unchanged.
    pub async fn call(&self, arguments: &Value) -> Result<Value> {
        let parameters = self.schema.validate(arguments)?;
        let credential = self.credentials.credential()?;
        let invocation = InvocationId::new();

        tracing::debug!(invocation = %invocation, action = %self.name, "Invoking action");

        match self.executor.execute(&self.name, &parameters, &credential).await {
            Ok(result) => {
                tracing::debug!(invocation = %invocation, action = %self.name, "Action completed");
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    invocation = %invocation,
                    action = %self.name,
                    error = %e,
                    "Action invocation failed"
                );
                Err(e)
            }
        }
    }

    /// Tool listing entry: `{name, description, inputSchema}`.
    pub fn to_listing(&self) -> Value {
        serde_json::json!({
            "name": self.name.as_str(),
            "description": self.description,
            "inputSchema": self.schema.to_input_schema(),
        })
    }
}

// =============================================================================
// Tool set
// =============================================================================

/// Registered tools in catalog order, keyed by action name.
#[derive(Debug, Default)]
pub struct ToolSet {
    tools: Vec<ActionTool>,
    index: HashMap<String, usize>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Action names are unique across the whole set.
    pub fn register(&mut self, tool: ActionTool) -> Result<()> {
        let name = tool.name.as_str();
        if self.index.contains_key(name) {
            return Err(Error::build(format!(
                "duplicate action name '{}' (integration '{}')",
                name, tool.integration
            )));
        }
        self.index.insert(name.to_string(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Tools in catalog order.
    pub fn tools(&self) -> &[ActionTool] {
        &self.tools
    }

    /// Call a tool by name.
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Unknown tool: {}", name)))?;
        tool.call(arguments).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Bridge
// =============================================================================

/// Builds tool sets from catalogs.
pub struct ActionBridge {
    translator: SchemaTranslator,
    policy: BuildPolicy,
    executor: Arc<dyn ActionExecutor>,
}

impl fmt::Debug for ActionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBridge")
            .field("translator", &self.translator)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ActionBridge {
    pub fn new(
        executor: Arc<dyn ActionExecutor>,
        translator: SchemaTranslator,
        policy: BuildPolicy,
    ) -> Self {
        Self {
            translator,
            policy,
            executor,
        }
    }

    pub fn from_config(executor: Arc<dyn ActionExecutor>, config: &Config) -> Self {
        Self::new(
            executor,
            SchemaTranslator::new(&config.schema),
            config.bridge.policy,
        )
    }

    /// Register every action in `catalog`, in catalog order.
    ///
    /// Under [`BuildPolicy::Abort`] the first descriptor that cannot be
    /// registered fails the whole build. Under [`BuildPolicy::Skip`] it is
    /// logged and left out.
    pub fn build(
        &self,
        catalog: &Catalog,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<ToolSet> {
        let mut tools = ToolSet::new();
        let mut skipped = 0usize;

        for (integration, descriptor) in catalog.actions() {
            let registered = self
                .make_tool(integration, descriptor, &credentials)
                .and_then(|tool| tools.register(tool));

            if let Err(e) = registered {
                match self.policy {
                    BuildPolicy::Abort => {
                        tracing::error!(
                            integration,
                            action = %descriptor.name,
                            error = %e,
                            "Could not create all ActionKit tools"
                        );
                        return Err(into_build_failure(&descriptor.name, e));
                    }
                    BuildPolicy::Skip => {
                        tracing::warn!(
                            integration,
                            action = %descriptor.name,
                            error = %e,
                            "Skipping action"
                        );
                        skipped += 1;
                    }
                }
            }
        }

        tracing::info!(tools = tools.len(), skipped, "Registered ActionKit tools");
        Ok(tools)
    }

    fn make_tool(
        &self,
        integration: &str,
        descriptor: &ActionDescriptor,
        credentials: &Arc<dyn CredentialSource>,
    ) -> Result<ActionTool> {
        let name = ActionName::from_string(descriptor.name.clone())
            .map_err(|e| Error::build(format!("integration '{}': {}", integration, e)))?;
        let schema = self.translator.translate(descriptor)?;

        Ok(ActionTool {
            name,
            integration: integration.to_string(),
            description: descriptor.description.clone(),
            schema,
            executor: Arc::clone(&self.executor),
            credentials: Arc::clone(credentials),
        })
    }

    /// Fetch the catalog with `credential` and build the tool set from it.
    ///
    /// A fetch failure is returned as-is: no tools exist without a catalog.
    pub async fn hydrate(
        &self,
        source: &dyn CatalogSource,
        credential: Credential,
    ) -> Result<ToolSet> {
        let catalog = source.fetch_catalog(&credential).await?;
        self.build(&catalog, Arc::new(credential))
    }
}

fn into_build_failure(action: &str, err: Error) -> Error {
    if err.is_build_failure() {
        err
    } else {
        Error::build(format!("action '{}': {}", action, err))
    }
}
