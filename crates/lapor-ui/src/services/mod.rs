//! Browser implementations of the client seams.
pub(crate) mod images;
pub(crate) mod preferences;
pub(crate) mod session;
pub(crate) mod transport;
