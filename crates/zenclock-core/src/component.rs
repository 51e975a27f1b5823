use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// A long-lived resource with an explicit lifecycle (tone output, weather
/// service, ...). Registered with [`crate::App`], which tears it down on exit.
pub trait Component: Send + Sync {
    /// Unique identifier for this component
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Initialize the component with the given context
    fn initialize(&mut self, ctx: &ComponentContext) -> Result<()>;

    /// Release whatever the component holds; must be safe to call twice
    fn shutdown(&mut self) -> Result<()>;
}

/// Context provided to components during initialization
pub struct ComponentContext {
    pub config: Arc<Config>,
}

impl ComponentContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}
