pub use super::cursor::Cursor;
pub use super::formats::Format;
pub use super::model::{Message, ParseError, StepError};

/// One step of a format: consumes bytes from the cursor and fills in the message.
///
/// Implemented for every `Fn(&mut Cursor, &mut Message) -> Result<(), StepError>`,
/// so plain functions and closures can be used directly.
pub trait FieldParser: Send + Sync {
    fn parse(&self, cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError>;
}

impl<F> FieldParser for F
where
    F: Fn(&mut Cursor<'_>, &mut Message) -> Result<(), StepError> + Send + Sync,
{
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
        self(cursor, msg)
    }
}

pub type Step = Box<dyn FieldParser>;

/// Boxes a list of field parsers into a `Vec<Step>`.
#[macro_export]
macro_rules! steps {
    ($($step:expr),* $(,)?) => {
        vec![$(Box::new($step) as $crate::parser::traits::Step),*]
    };
}

pub trait LogParser: Send + Sync {
    /// parse a raw log line into a message
    fn parse(&self, raw: &[u8]) -> Result<Message, ParseError>;
    fn format(&self) -> &Format;
}
