//! Exported entry points for page scripts.

use std::rc::Rc;

use inpage_provider::{initialize_provider, InpageProvider, ProtectedProvider, ProviderTransport};
use wasm_bindgen::prelude::*;

use crate::{
    binder::browser_environment,
    decode::{decode_initialize_options, decode_provider_options, stream_transport},
    interop::{js_error, provider_object},
};

/// Creates the provider, installs it as `window.ethereum` and optionally shims `window.web3`.
///
/// Returns the page-facing provider object. Validation failures throw before any global is
/// touched.
#[wasm_bindgen(js_name = initializeProvider)]
pub fn initialize_provider_js(options: JsValue) -> Result<JsValue, JsValue> {
    let provider = initialize_provider(decode_initialize_options(&options), &browser_environment())
        .map_err(|err| js_error(&err))?;
    Ok(provider_object(&provider))
}

/// Creates a protected provider for `stream` without installing anything.
#[wasm_bindgen(js_name = createProvider)]
pub fn create_provider_js(stream: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let options = decode_provider_options(&options);
    let transport = stream_transport(stream, &options)
        .map(|transport| transport as Rc<dyn ProviderTransport>);
    let provider = InpageProvider::new(transport, options).map_err(|err| js_error(&err))?;
    Ok(provider_object(&ProtectedProvider::new(provider)))
}
