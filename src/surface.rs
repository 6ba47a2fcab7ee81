use crate::geometry::Direction;
use std::io;
use std::time::Duration;

/// Decoded key press. Anything outside the game's vocabulary is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Arrow(Direction),
    Space,
    Restart,
    Quit,
    Other,
}

/// Handle to a rectangular drawing region owned by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    Plain,
    /// Top corners drawn as tee joints, for a panel stacked under another.
    Joined,
}

/// The drawing and input capabilities the game needs from a terminal.
///
/// Row/col arguments are relative to the region. Writes outside the region
/// are dropped. Nothing becomes visible until [`Surface::refresh`].
pub trait Surface {
    fn create_region(&mut self, height: u16, width: u16, top: u16, left: u16) -> io::Result<Region>;

    fn destroy_region(&mut self, region: Region) -> io::Result<()>;

    fn clear(&mut self, region: Region) -> io::Result<()>;

    fn draw_border(&mut self, region: Region, border: Border) -> io::Result<()>;

    fn write_text(&mut self, region: Region, row: i32, col: i32, text: &str) -> io::Result<()>;

    fn write_char(&mut self, region: Region, row: i32, col: i32, ch: char) -> io::Result<()>;

    fn refresh(&mut self, region: Region) -> io::Result<()>;

    /// (height, width) of the region.
    fn size(&self, region: Region) -> (u16, u16);

    /// Wait up to `timeout` for a key press. `None` means nothing arrived.
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}
