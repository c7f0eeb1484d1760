/// A gameplay character the remote device can steer while in runtime mode.
///
/// Installed on the service by the host; commands arriving with nothing
/// installed are accepted and ignored.
pub trait Controllable: Send {
    /// Step by a device vector. Leftward steps use `x`, rightward steps use `y`,
    /// and `(0.0, 0.0)` stops.
    fn move_by(&mut self, x: f32, y: f32);

    /// The character's special action (fire, shake, spike).
    fn action(&mut self);

    /// Called once before the character is handed back to its own AI.
    fn release(&mut self);
}
