//! NetworkManager constants and flag types.

pub(crate) mod constants;
