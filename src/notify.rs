pub mod offset;
pub mod planner;
pub mod store;
pub mod template;

pub use offset::{NotificationOffset, NotificationUnit, Timing, UiOffset, to_internal};
pub use planner::{NotificationKind, PlannedNotification, plan};
pub use store::{FileStore, MemoryStore, TemplateStore, load_default_template, save_default_template};
pub use template::{NotificationTemplate, OffsetField, SmartKind, TemplateError};
