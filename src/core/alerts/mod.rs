pub mod alert_models;
pub mod alert_service;

pub use alert_models::{AlertCaller, AlertEvent};
pub use alert_service::{raise_alert, AlertError, AlertReceipt, AlertSink};
