#![allow(dead_code)]

use interpose::{Filter, FilterHandle, Host, HostId, Next, Slot};
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Hosts
// ============================================================================

/// A host owning a greeting method, addressed through a registry.
pub struct Greeter {
    pub id: HostId,
    pub salutation: String,
}

impl Greeter {
    pub fn new(salutation: &str) -> Self {
        Self {
            id: HostId::new(),
            salutation: salutation.to_string(),
        }
    }
}

impl Host for Greeter {
    fn host_id(&self) -> HostId {
        self.id
    }
}

pub type GreetSlot = Slot<(), String, String>;

pub fn greet_slot() -> GreetSlot {
    Slot::new("greet", |_: &(), name: String| format!("Hi {name}"))
}

// ============================================================================
// Test Filters
// ============================================================================

/// Prefixes the downstream result with `tag:`.
pub fn tag(slot: &GreetSlot, tag: &'static str) -> FilterHandle<(), String, String> {
    slot.attach_fn(move |_, args, next| format!("{tag}:{}", next.run(args)))
}

/// Records its id on entry, then forwards.
pub struct OrderRecordingFilter {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl Filter<(), String, String> for OrderRecordingFilter {
    fn apply(&self, _ctx: &(), args: String, next: Next<'_, (), String, String>) -> String {
        self.order.lock().unwrap().push(self.id);
        next.run(args)
    }
}

/// Records its id, then stops the chain.
pub struct StoppingFilter {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl Filter<(), String, String> for StoppingFilter {
    fn apply(&self, _ctx: &(), _args: String, _next: Next<'_, (), String, String>) -> String {
        self.order.lock().unwrap().push(self.id);
        format!("stopped by {}", self.id)
    }
}
