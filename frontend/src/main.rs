use leptos::prelude::*;
use ticketdesk_frontend::App;
use ticketdesk_frontend::config::ClientConfig;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    ticketdesk_frontend::logging::init(&ClientConfig::from_build_env());
    mount_to_body(App);
}
