#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    /// Close the session and stop the runtime.
    Shutdown,
}
