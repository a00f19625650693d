pub(crate) mod layout;
pub(crate) mod overlay;
pub(crate) mod wrap;
