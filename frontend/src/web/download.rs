//! 浏览器文件下载
//!
//! 把字节包装为 Blob，通过临时 `<a download>` 触发保存。

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{Blob, HtmlAnchorElement, Url};

use crate::error::{ClientError, ClientResult};

fn js_err(e: wasm_bindgen::JsValue) -> ClientError {
    ClientError::transport(format!("{:?}", e))
}

pub fn save_bytes(file_name: &str, bytes: &[u8]) -> ClientResult<()> {
    let window = web_sys::window().ok_or_else(|| ClientError::transport("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| ClientError::transport("no document"))?;

    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_err)?;
    let href = Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| ClientError::transport("anchor element expected"))?;
    anchor.set_href(&href);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&href).map_err(js_err)
}
