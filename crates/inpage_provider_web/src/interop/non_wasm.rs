use super::*;

fn unsupported() -> String {
    "Browser host APIs are only available when compiled for wasm32".to_string()
}

pub fn global_is_bound(_name: &str) -> Result<bool, String> {
    Err(unsupported())
}

pub fn bind_provider(
    _name: &str,
    _provider: &ProtectedProvider,
    _attributes: SlotAttributes,
) -> Result<(), String> {
    Err(unsupported())
}

pub fn bind_legacy_shim(
    _name: &str,
    _shim: Rc<LegacyShim>,
    _attributes: SlotAttributes,
) -> Result<(), String> {
    Err(unsupported())
}

pub fn dispatch_event(_name: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn spawn_local(_future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
    Err(SpawnError::shutdown())
}

pub fn stream_capabilities(_stream: &JsValue) -> TransportCapabilities {
    TransportCapabilities::default()
}

pub async fn write_rpc(
    _stream: &JsValue,
    _stream_name: Option<&str>,
    _request: &RpcRequest,
) -> Result<Value, String> {
    Err(unsupported())
}
