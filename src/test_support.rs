use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

/// Process-wide lock for tests that mutate environment variables.
/// Use `.blocking_lock()` in sync tests and `.lock().await` in async tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Holds [`ENV_LOCK`] and puts every variable it touched back on drop.
pub struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Lock the environment and unset `vars` until the guard drops.
    pub fn cleared(vars: &[&'static str]) -> Self {
        let lock = ENV_LOCK.blocking_lock();
        let saved = vars
            .iter()
            .map(|var| (*var, std::env::var_os(var)))
            .collect();
        for var in vars {
            std::env::remove_var(var);
        }
        Self { saved, _lock: lock }
    }

    pub fn set(&mut self, var: &'static str, value: &str) {
        if !self.saved.iter().any(|(saved, _)| *saved == var) {
            self.saved.push((var, std::env::var_os(var)));
        }
        std::env::set_var(var, value);
    }

    pub fn remove(&mut self, var: &'static str) {
        if !self.saved.iter().any(|(saved, _)| *saved == var) {
            self.saved.push((var, std::env::var_os(var)));
        }
        std::env::remove_var(var);
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (var, value) in self.saved.drain(..) {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
