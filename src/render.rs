pub(crate) mod composite;
pub(crate) mod crop;
pub(crate) mod overlay;
