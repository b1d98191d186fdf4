pub(crate) mod frame;
pub(crate) mod spec;
pub(crate) mod store;
