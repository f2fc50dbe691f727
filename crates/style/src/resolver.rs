use crate::style::Style;
use emboss_types::NodeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-node style lookup.
///
/// The production resolver is a declarative node-matching engine living
/// outside this workspace; the layout core only requires this trait.
pub trait StyleResolver {
    fn resolve(&self, node: NodeId) -> Arc<Style>;
}

/// A plain map-backed resolver with a default style.
///
/// Stands in for the rule engine in tests and simple embedders.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    default: Arc<Style>,
    styles: HashMap<NodeId, Arc<Style>>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(style: Style) -> Self {
        Self {
            default: Arc::new(style),
            styles: HashMap::new(),
        }
    }

    pub fn set(&mut self, node: NodeId, style: Style) {
        self.styles.insert(node, Arc::new(style));
    }
}

impl StyleResolver for StyleMap {
    fn resolve(&self, node: NodeId) -> Arc<Style> {
        self.styles
            .get(&node)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}
