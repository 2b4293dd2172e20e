//! Widget session lifecycle.

mod widget_session;

pub use widget_session::WidgetSession;
