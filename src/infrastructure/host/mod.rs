//! Host-side adapters for running the bridge outside a device.

pub mod headless;

pub use headless::{AttachedFragment, HeadlessFragmentManager, HeadlessScreen};
