use std::cell::RefCell;

use inpage_provider::{
    PropertySurface, ProviderError, ReceivedValue, RequestArguments, CURRENT_PROVIDER,
    PROVIDER_STATE_PROPERTIES, SHIM_MARKER,
};
use js_sys::{Array, Object, Promise, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use super::*;

#[wasm_bindgen(inline_js = r#"
function isObject(value) {
  return value !== null && typeof value === 'object';
}

export function jsStreamReadable(stream) {
  return isObject(stream)
    && typeof stream.pipe === 'function'
    && stream.readable !== false
    && typeof stream._read === 'function'
    && isObject(stream._readableState);
}

export function jsStreamWritable(stream) {
  return isObject(stream)
    && typeof stream.pipe === 'function'
    && stream.writable !== false
    && typeof stream._write === 'function'
    && isObject(stream._writableState);
}

export function jsWriteRpc(stream, name, payload) {
  const chunk = name ? { name, data: payload } : payload;
  return new Promise((resolve, reject) => {
    try {
      stream.write(chunk, (err) => (err ? reject(err) : resolve(null)));
    } catch (err) {
      reject(err);
    }
  });
}

export function jsMakeProvider(bridge, stateProperties) {
  const target = {
    isConnected: () => bridge.isConnected(),
    request: (args) => bridge.request(args),
  };
  const isState = (prop) => typeof prop === 'string' && stateProperties.includes(prop);
  return new Proxy(target, {
    get: (t, prop, receiver) => (isState(prop) ? bridge.getProperty(prop) : Reflect.get(t, prop, receiver)),
    set: (t, prop, value, receiver) => (isState(prop) ? bridge.setProperty(prop, value) : Reflect.set(t, prop, value, receiver)),
    has: (t, prop) => isState(prop) || Reflect.has(t, prop),
    deleteProperty: () => true,
  });
}

export function jsMakeShim(bridge, marker, currentProviderKey, provider) {
  const target = { [currentProviderKey]: provider };
  Object.defineProperty(target, marker, {
    value: true,
    enumerable: false,
    configurable: false,
    writable: false,
  });
  return new Proxy(target, {
    get: (t, prop, receiver) => {
      if (typeof prop === 'string') {
        bridge.noteRead(prop);
      }
      return Reflect.get(t, prop, receiver);
    },
    set: (t, prop, value, receiver) => {
      if (typeof prop === 'string') {
        bridge.noteWrite();
      }
      return Reflect.set(t, prop, value, receiver);
    },
  });
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsStreamReadable)]
    fn js_stream_readable(stream: &JsValue) -> bool;
    #[wasm_bindgen(js_name = jsStreamWritable)]
    fn js_stream_writable(stream: &JsValue) -> bool;
    #[wasm_bindgen(js_name = jsWriteRpc)]
    fn js_write_rpc(stream: &JsValue, name: &JsValue, payload: &JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsMakeProvider)]
    fn js_make_provider(bridge: ProviderBridge, state_properties: &Array) -> JsValue;
    #[wasm_bindgen(js_name = jsMakeShim)]
    fn js_make_shim(
        bridge: ShimBridge,
        marker: &str,
        current_provider_key: &str,
        provider: &JsValue,
    ) -> JsValue;
}

thread_local! {
    static PROVIDER_OBJECT: RefCell<Option<(ProtectedProvider, JsValue)>> = RefCell::new(None);
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

/// Converts a provider error into a JS `Error`.
pub fn js_error(err: &ProviderError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

/// Converts an untyped JS value into its JSON form; non-finite numbers become `null`.
pub fn js_to_raw(value: &JsValue) -> Value {
    if value.is_null() || value.is_undefined() {
        return Value::Null;
    }
    if let Some(flag) = value.as_bool() {
        return Value::Bool(flag);
    }
    if let Some(number) = value.as_f64() {
        return number_value(number);
    }
    if let Some(text) = value.as_string() {
        return Value::String(text);
    }
    from_value(value.clone()).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}

/// Converts an options value for validation, keeping `NaN` and infinities as received.
pub fn js_to_received(value: &JsValue) -> ReceivedValue {
    match value.as_f64() {
        Some(number) if !number.is_finite() => ReceivedValue::NonFinite(number),
        _ => ReceivedValue::Json(js_to_raw(value)),
    }
}

/// Returns the page-facing object for `provider`.
///
/// The object for the most recent provider is kept so the `ethereum` global and the shim's
/// `currentProvider` are the same object.
pub fn provider_object(provider: &ProtectedProvider) -> JsValue {
    let cached = PROVIDER_OBJECT.with(|slot| {
        slot.borrow()
            .as_ref()
            .filter(|(known, _)| known.same_instance(provider))
            .map(|(_, object)| object.clone())
    });
    if let Some(object) = cached {
        return object;
    }
    let state_properties: Array = PROVIDER_STATE_PROPERTIES
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect();
    let object = js_make_provider(
        ProviderBridge {
            provider: provider.clone(),
        },
        &state_properties,
    );
    PROVIDER_OBJECT.with(|slot| *slot.borrow_mut() = Some((provider.clone(), object.clone())));
    object
}

#[wasm_bindgen]
pub struct ProviderBridge {
    provider: ProtectedProvider,
}

#[wasm_bindgen]
impl ProviderBridge {
    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.provider.is_connected()
    }

    pub fn request(&self, args: JsValue) -> Promise {
        let provider = self.provider.clone();
        future_to_promise(async move {
            let args = request_arguments(&args).map_err(|err| js_error(&err))?;
            let result = provider
                .request(args)
                .await
                .map_err(|err| js_error(&err))?;
            to_js(&result)
        })
    }

    #[wasm_bindgen(js_name = getProperty)]
    pub fn get_property(&self, name: &str) -> JsValue {
        self.provider
            .get_property(name)
            .and_then(|value| to_js(&value).ok())
            .unwrap_or(JsValue::UNDEFINED)
    }

    #[wasm_bindgen(js_name = setProperty)]
    pub fn set_property(&self, name: &str, value: JsValue) -> bool {
        self.provider.set_property(name, js_to_raw(&value))
    }
}

fn request_arguments(args: &JsValue) -> Result<RequestArguments, ProviderError> {
    if !args.is_object() || Array::is_array(args) {
        return Err(ProviderError::InvalidRequestArgs);
    }
    let raw: Value = from_value(args.clone()).map_err(|_| ProviderError::InvalidRequestArgs)?;
    RequestArguments::try_from(raw)
}

#[wasm_bindgen]
pub struct ShimBridge {
    shim: Rc<LegacyShim>,
}

#[wasm_bindgen]
impl ShimBridge {
    #[wasm_bindgen(js_name = noteRead)]
    pub fn note_read(&self, name: &str) {
        self.shim.note_read(name);
    }

    #[wasm_bindgen(js_name = noteWrite)]
    pub fn note_write(&self) {
        self.shim.note_write();
    }
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

fn bind_value(name: &str, value: &JsValue, attributes: SlotAttributes) -> Result<(), String> {
    let window = window()?;
    let key = JsValue::from_str(name);
    let applied = if attributes == SlotAttributes::assignment() {
        Reflect::set(&window, &key, value).map_err(js_error_to_string)?
    } else {
        let descriptor = Object::new();
        for (field, setting) in [
            ("value", value.clone()),
            ("enumerable", JsValue::from_bool(attributes.enumerable)),
            ("configurable", JsValue::from_bool(attributes.configurable)),
            ("writable", JsValue::from_bool(attributes.writable)),
        ] {
            Reflect::set(&descriptor, &JsValue::from_str(field), &setting)
                .map_err(js_error_to_string)?;
        }
        Reflect::define_property(&window, &key, &descriptor).map_err(js_error_to_string)?
    };
    if applied {
        Ok(())
    } else {
        Err(format!("window.{name} rejected the assignment"))
    }
}

pub fn global_is_bound(name: &str) -> Result<bool, String> {
    let window = window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .map(|value| value.is_truthy())
        .map_err(js_error_to_string)
}

pub fn bind_provider(
    name: &str,
    provider: &ProtectedProvider,
    attributes: SlotAttributes,
) -> Result<(), String> {
    bind_value(name, &provider_object(provider), attributes)
}

fn shim_object(shim: Rc<LegacyShim>) -> JsValue {
    let provider = provider_object(shim.provider());
    js_make_shim(ShimBridge { shim }, SHIM_MARKER, CURRENT_PROVIDER, &provider)
}

pub fn bind_legacy_shim(
    name: &str,
    shim: Rc<LegacyShim>,
    attributes: SlotAttributes,
) -> Result<(), String> {
    bind_value(name, &shim_object(shim), attributes)
}

pub fn dispatch_event(name: &str) -> Result<(), String> {
    let window = window()?;
    let event = web_sys::Event::new(name).map_err(js_error_to_string)?;
    window
        .dispatch_event(&event)
        .map(|_| ())
        .map_err(js_error_to_string)
}

pub fn spawn_local(future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
    wasm_bindgen_futures::spawn_local(future);
    Ok(())
}

pub fn stream_capabilities(stream: &JsValue) -> TransportCapabilities {
    TransportCapabilities {
        readable: js_stream_readable(stream),
        writable: js_stream_writable(stream),
    }
}

pub async fn write_rpc(
    stream: &JsValue,
    stream_name: Option<&str>,
    request: &RpcRequest,
) -> Result<Value, String> {
    let payload = request
        .serialize(&Serializer::json_compatible())
        .map_err(|err| err.to_string())?;
    let name = stream_name.map_or(JsValue::UNDEFINED, JsValue::from_str);
    JsFuture::from(js_write_rpc(stream, &name, &payload))
        .await
        .map_err(js_error_to_string)?;
    Ok(Value::Null)
}
