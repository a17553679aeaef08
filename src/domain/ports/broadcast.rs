use crate::domain::models::Intent;

/// Listener for process-local broadcasts.
///
/// Delivery happens on whichever thread sent the broadcast. Receivers must
/// not panic and should return quickly.
pub trait BroadcastReceiver: Send + Sync {
    fn on_receive(&self, intent: &Intent);
}
