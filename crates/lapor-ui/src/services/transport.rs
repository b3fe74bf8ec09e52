//! `fetch`-backed transport over gloo-net.

use async_trait::async_trait;
use gloo_net::http::Request;
use js_sys::{Array, Uint8Array};
use lapor_client::{
    ClientError, CredentialsMode, FilePart, FormValue, HttpRequest, HttpResponse, HttpTransport,
    Method, MultipartForm, RequestBody,
};
use web_sys::{Blob, BlobPropertyBag, FormData, RequestCredentials};

/// [`HttpTransport`] over the browser fetch API. No timeout is applied.
pub(crate) struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if request.credentials == CredentialsMode::Include {
            builder = builder.credentials(RequestCredentials::Include);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value).map_err(ClientError::transport)?,
            RequestBody::Multipart(form) => builder.body(form_data(form)?),
        };

        let response = builder.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        let status_text = response.status_text();
        let content_type = response.headers().get("content-type");
        let body = response.binary().await.map_err(ClientError::transport)?;
        Ok(HttpResponse {
            status,
            status_text,
            content_type,
            body,
        })
    }
}

fn form_data(form: MultipartForm) -> Result<FormData, ClientError> {
    let data = FormData::new().map_err(|err| ClientError::transport(format!("{err:?}")))?;
    for (name, value) in form.into_fields() {
        match value {
            FormValue::Text(text) => data
                .append_with_str(&name, &text)
                .map_err(|err| ClientError::transport(format!("{err:?}")))?,
            FormValue::File(file) => {
                let blob = blob_from(&file)?;
                data.append_with_blob_and_filename(&name, &blob, &file.filename)
                    .map_err(|err| ClientError::transport(format!("{err:?}")))?;
            }
        }
    }
    Ok(data)
}

fn blob_from(file: &FilePart) -> Result<Blob, ClientError> {
    bytes_to_blob(&file.bytes, Some(&file.content_type))
        .map_err(|message| ClientError::Image { message })
}

/// Wrap bytes in a `Blob`, tagging the MIME type when known.
pub(crate) fn bytes_to_blob(bytes: &[u8], content_type: Option<&str>) -> Result<Blob, String> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    if let Some(content_type) = content_type {
        options.set_type(content_type);
    }
    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(|err| format!("{err:?}"))
}
