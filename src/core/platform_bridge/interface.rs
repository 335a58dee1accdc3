//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Render surface contract consumed by the main loop.
//
// The core only needs a monotonic millisecond clock, a frame cycle
// (clear → draw → sync), a platform pump, a running flag, and sprite /
// cursor loading for the startup cursor and the loading indicator.
// Drawing primitives beyond that belong to scenes.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::error::Result;

//=== Point ===============================================================

/// Screen-space integer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

//=== RenderWindow ========================================================

/// Render surface and platform clock.
///
/// Implemented by the rendering backend. All methods are called from the
/// main loop thread.
pub trait RenderWindow: Send {
    /// Backend sprite handle. Memoized in the engine cache, so it must be
    /// shareable across threads.
    type Sprite: Send + Sync + 'static;

    /// Backend cursor handle.
    type Cursor;

    /// Monotonic milliseconds since an arbitrary origin.
    ///
    /// Signed so that a misbehaving clock shows up as a negative delta
    /// instead of wrapping.
    fn ticks(&self) -> i64;

    /// False once the platform asked the application to quit.
    fn is_running(&self) -> bool;

    /// Pumps platform input and window events.
    fn update(&mut self) -> Result<()>;

    /// Clears the back buffer.
    fn clear(&mut self) -> Result<()>;

    /// Draws a sprite onto the back buffer.
    fn draw(&mut self, sprite: &Self::Sprite) -> Result<()>;

    /// Presents the back buffer.
    fn sync(&mut self) -> Result<()>;

    /// Loads a sprite from an archive path, colored with the named palette.
    fn load_sprite(&mut self, path: &str, palette: &str, position: Point) -> Result<Self::Sprite>;

    /// Builds a mouse cursor from one frame of a sprite.
    fn load_cursor(
        &mut self,
        sprite: &Self::Sprite,
        frame: usize,
        hotspot: Point,
    ) -> Result<Self::Cursor>;

    /// Replaces the mouse cursor.
    fn set_mouse_cursor(&mut self, cursor: Self::Cursor);
}
