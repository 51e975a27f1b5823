use anyhow::Result;
use std::sync::Arc;

use crate::{Component, ComponentContext, Config};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    components: Vec<Box<dyn Component>>,
    context: ComponentContext,
    shut_down: bool,
}

impl App {
    pub fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        let context = ComponentContext::new(config.clone());

        Self {
            config,
            components: Vec::new(),
            context,
            shut_down: false,
        }
    }

    /// Register a component with the application
    pub fn register(&mut self, component: Box<dyn Component>) {
        tracing::info!("Registering component: {}", component.name());
        self.components.push(component);
    }

    /// Initialize all registered components
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application with {} components",
            self.components.len()
        );

        for component in &mut self.components {
            tracing::debug!("Initializing component: {}", component.name());
            component.initialize(&self.context)?;
        }

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    /// Shut down all components in reverse registration order
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        tracing::info!("Shutting down application");

        for component in self.components.iter_mut().rev() {
            tracing::debug!("Shutting down component: {}", component.name());
            if let Err(e) = component.shutdown() {
                tracing::error!("Error shutting down component {}: {}", component.name(), e);
            }
        }

        self.shut_down = true;
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the configuration
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }
}
