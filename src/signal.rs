use crate::error::Result;
use signal_hook::consts::SIGWINCH;
use signal_hook::SigId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Raises a flag when terminal window was resized. The flag is polled from the input loop
// since reading keys times out every 1/10 second
pub struct SigwinchWatcher {
    resized: Arc<AtomicBool>,
    signal_id: SigId,
}

impl SigwinchWatcher {
    pub fn new() -> Result<Self> {
        let resized = Arc::new(AtomicBool::new(false));
        let signal_id = signal_hook::flag::register(SIGWINCH, Arc::clone(&resized))?;
        Ok(Self { resized, signal_id })
    }

    // Returns true once per resize
    pub fn notified(&mut self) -> bool {
        self.resized.swap(false, Ordering::Relaxed)
    }
}

impl Drop for SigwinchWatcher {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.signal_id);
    }
}
