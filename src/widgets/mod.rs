pub mod quiz_widget;
pub mod widget_node;

pub use quiz_widget::{render_quiz, RESET_ACTION, SUBMIT_ACTION};
pub use widget_node::{ActionConfig, RadioOption, WidgetNode, WidgetRoot};
