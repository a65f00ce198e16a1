pub mod commands;
pub mod error;
pub mod event;
pub mod modes;
pub mod options;
pub mod setting;
pub mod topbar;
pub mod validate;


pub use error::{ErrorCode, OptionsError, OptionsResult};
pub use event::{EventSink, NullSink};
pub use modes::{PlayMode, ScrollMode};
pub use options::Options;
pub use setting::{Setting, SettingType};
pub use topbar::{Position, Topbar, TopbarLine, MAX_LINES};
