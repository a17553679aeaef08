use serde_json::{Map, Value};

/// Analytics sink the bridge reports feedback outcomes into.
///
/// Supplied by the tag management SDK when the remote command is attached
/// to an instance. Implementations must not block for long: `track` is
/// called from broadcast delivery and SDK callback threads.
pub trait RemoteCommandContext: Send + Sync {
    fn track(&self, event_name: &str, data: Map<String, Value>);
}
