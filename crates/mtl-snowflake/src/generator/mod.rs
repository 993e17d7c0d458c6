mod mutex;
mod timeline_generator;

pub(crate) use mutex::*;
pub use timeline_generator::*;
