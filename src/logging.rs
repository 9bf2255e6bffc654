//! Console Logging
//!
//! Routes the `log` facade to the browser console.

pub fn init(level: log::Level) {
    wasm_logger::init(wasm_logger::Config::new(level));
    log::debug!("[APP] console logging at {level}");
}
