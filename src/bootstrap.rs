use crate::error::HostError;
use crate::host::ReadySource;

/// How the ready callback was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyDispatch {
    Immediate,
    Deferred,
}

/// Run `callback` once the document can be queried.
///
/// Calls it synchronously when parsing is already done, otherwise registers
/// a single one-shot content-loaded listener.
pub fn on_document_ready<S, F>(source: &S, callback: F) -> Result<ReadyDispatch, HostError>
where
    S: ReadySource + ?Sized,
    F: FnOnce() + 'static,
{
    let state = source.ready_state();
    if state.is_queryable() {
        log::debug!("document already {state:?}, initializing now");
        callback();
        return Ok(ReadyDispatch::Immediate);
    }

    source.on_content_loaded_once(Box::new(callback))?;
    log::debug!("waiting for DOMContentLoaded");
    Ok(ReadyDispatch::Deferred)
}
