pub mod card;
pub mod error;
pub mod event;
pub mod tools;
pub mod traits;

pub use card::{Card, CardEnvelope, CardHeader, ImageWidget, Section, TextParagraph, Widget};
pub use error::CardwireError;
pub use event::{MessageEvent, MessageEventKind};
pub use tools::{ToolDescriptor, ToolRegistry};
pub use traits::{EventObserver, ImageValidationResult, ImageValidator, NullObserver, Tool};
