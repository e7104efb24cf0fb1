//! Menu navigation: button tags, per-list cursors, the dispatcher and the
//! two conversational flows (route creation and reviews).

pub mod command;
pub mod cursor;
pub mod dispatcher;
pub mod outcome;
pub mod reviews;
pub mod wizard;

pub use command::{Command, ListContext, ReviewTarget};
pub use cursor::Direction;
pub use dispatcher::{Event, Input, Navigator};
pub use outcome::{Card, CardKind, Notice, Outcome, Prompt, Render, ReviewPage};
pub use wizard::WizardStep;
