use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action a widget posts back to the server when the user interacts with it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl ActionConfig {
    pub fn new(action_type: &str) -> Self {
        ActionConfig {
            action_type: action_type.to_string(),
            payload: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RadioOption {
    pub label: String,
    pub value: String,
    pub disabled: bool,
}

/// Display-only tree consumed by the client renderer. Never parsed back
/// into quiz state.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum WidgetNode {
    Card {
        children: Vec<WidgetNode>,
    },
    Row {
        children: Vec<WidgetNode>,
    },
    Col {
        gap: u8,
        children: Vec<WidgetNode>,
    },
    Title {
        value: String,
    },
    Text {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Badge {
        label: String,
        color: String,
    },
    Spacer {},
    Divider {},
    Form {
        on_submit_action: ActionConfig,
        children: Vec<WidgetNode>,
    },
    RadioGroup {
        name: String,
        options: Vec<RadioOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
        disabled: bool,
    },
    Button {
        label: String,
        #[serde(default)]
        submit: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_click_action: Option<ActionConfig>,
        disabled: bool,
        style: String,
    },
}

pub type WidgetRoot = WidgetNode;

impl WidgetNode {
    pub fn text(value: impl Into<String>) -> Self {
        WidgetNode::Text {
            value: value.into(),
            weight: None,
            color: None,
        }
    }

    pub fn children(&self) -> &[WidgetNode] {
        match self {
            WidgetNode::Card { children }
            | WidgetNode::Row { children }
            | WidgetNode::Col { children, .. }
            | WidgetNode::Form { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first walk over this node and all descendants.
    pub fn walk(&self) -> Vec<&WidgetNode> {
        let mut nodes = vec![self];
        for child in self.children() {
            nodes.extend(child.walk());
        }
        nodes
    }
}
