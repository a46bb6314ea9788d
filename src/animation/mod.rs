pub(crate) mod color;
pub(crate) mod progress;
pub(crate) mod reveal;
