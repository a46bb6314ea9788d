pub(crate) mod config;
pub(crate) mod engine;
pub(crate) mod lock;
pub(crate) mod stage;
pub(crate) mod sync;
