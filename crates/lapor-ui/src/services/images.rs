//! Object-URL image handles.

use gloo::console;
use lapor_client::{ClientError, ImageHandleFactory};
use web_sys::Url;

use super::transport::bytes_to_blob;

/// Creates `blob:` URLs and revokes them on release.
pub(crate) struct ObjectUrlFactory;

impl ImageHandleFactory for ObjectUrlFactory {
    fn create(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, ClientError> {
        let blob = bytes_to_blob(bytes, content_type).map_err(|message| ClientError::Image { message })?;
        Url::create_object_url_with_blob(&blob).map_err(|err| ClientError::Image {
            message: format!("{err:?}"),
        })
    }

    fn release(&self, handle: &str) {
        if Url::revoke_object_url(handle).is_err() {
            console::warn!("failed to revoke object URL", handle);
        }
    }
}
