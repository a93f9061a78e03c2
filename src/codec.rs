pub(crate) mod backend;
pub(crate) mod image_codec;
