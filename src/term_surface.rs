use crate::geometry::Direction;
use crate::surface::{Border, Key, Region, Surface};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

/// A region's character buffer. Cells touched since the last refresh are
/// marked dirty; refresh paints only those, so overlapping regions can
/// overlay each other.
#[derive(Debug)]
struct Panel {
    top: u16,
    left: u16,
    height: u16,
    width: u16,
    cells: Vec<char>,
    dirty: Vec<bool>,
}

impl Panel {
    fn new(height: u16, width: u16, top: u16, left: u16) -> Self {
        let len = height as usize * width as usize;
        Self {
            top,
            left,
            height,
            width,
            cells: vec![' '; len],
            dirty: vec![false; len],
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.height as i32 || col >= self.width as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    fn put(&mut self, row: i32, col: i32, ch: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = ch;
            self.dirty[i] = true;
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
        self.dirty.fill(true);
    }

    fn border(&mut self, border: Border) {
        let (h, w) = (self.height as i32, self.width as i32);
        if h < 2 || w < 2 {
            return;
        }
        for col in 1..w - 1 {
            self.put(0, col, '─');
            self.put(h - 1, col, '─');
        }
        for row in 1..h - 1 {
            self.put(row, 0, '│');
            self.put(row, w - 1, '│');
        }
        let (top_left, top_right) = match border {
            Border::Plain => ('┌', '┐'),
            Border::Joined => ('├', '┤'),
        };
        self.put(0, 0, top_left);
        self.put(0, w - 1, top_right);
        self.put(h - 1, 0, '└');
        self.put(h - 1, w - 1, '┘');
    }

    /// Dirty runs as (row, col, text), clearing the dirty marks.
    fn take_dirty_runs(&mut self) -> Vec<(u16, u16, String)> {
        let mut runs = Vec::new();
        let width = self.width as usize;
        for row in 0..self.height as usize {
            let mut col = 0;
            while col < width {
                let i = row * width + col;
                if !self.dirty[i] {
                    col += 1;
                    continue;
                }
                let start = col;
                let mut text = String::new();
                while col < width && self.dirty[row * width + col] {
                    text.push(self.cells[row * width + col]);
                    self.dirty[row * width + col] = false;
                    col += 1;
                }
                runs.push((row as u16, start as u16, text));
            }
        }
        runs
    }
}

/// Terminal-backed [`Surface`]. Regions are emulated on top of a single
/// alternate screen.
pub struct TermSurface {
    stdout: io::Stdout,
    panels: Vec<Option<Panel>>,
    active: bool,
}

impl TermSurface {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            panels: Vec::new(),
            active: false,
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    /// Undoes [`TermSurface::init`]. Safe to call more than once.
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn panel(&self, region: Region) -> io::Result<&Panel> {
        self.panels
            .get(region.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| unknown_region(region))
    }

    fn panel_mut(&mut self, region: Region) -> io::Result<&mut Panel> {
        self.panels
            .get_mut(region.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| unknown_region(region))
    }
}

impl Default for TermSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_region(region: Region) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unknown region {}", region.0),
    )
}

/// Maps a terminal key event onto the game's vocabulary.
pub fn decode(event: KeyEvent) -> Key {
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Key::Quit;
    }
    match event.code {
        KeyCode::Up => Key::Arrow(Direction::Up),
        KeyCode::Left => Key::Arrow(Direction::Left),
        KeyCode::Down => Key::Arrow(Direction::Down),
        KeyCode::Right => Key::Arrow(Direction::Right),
        KeyCode::Char(' ') => Key::Space,
        KeyCode::F(2) => Key::Restart,
        KeyCode::F(4) => Key::Quit,
        _ => Key::Other,
    }
}

impl Surface for TermSurface {
    fn create_region(&mut self, height: u16, width: u16, top: u16, left: u16) -> io::Result<Region> {
        self.panels.push(Some(Panel::new(height, width, top, left)));
        Ok(Region(self.panels.len() - 1))
    }

    fn destroy_region(&mut self, region: Region) -> io::Result<()> {
        self.clear(region)?;
        self.refresh(region)?;
        self.panels[region.0] = None;
        Ok(())
    }

    fn clear(&mut self, region: Region) -> io::Result<()> {
        self.panel_mut(region)?.clear();
        Ok(())
    }

    fn draw_border(&mut self, region: Region, border: Border) -> io::Result<()> {
        self.panel_mut(region)?.border(border);
        Ok(())
    }

    fn write_text(&mut self, region: Region, row: i32, col: i32, text: &str) -> io::Result<()> {
        let panel = self.panel_mut(region)?;
        for (i, ch) in text.chars().enumerate() {
            panel.put(row, col + i as i32, ch);
        }
        Ok(())
    }

    fn write_char(&mut self, region: Region, row: i32, col: i32, ch: char) -> io::Result<()> {
        self.panel_mut(region)?.put(row, col, ch);
        Ok(())
    }

    fn refresh(&mut self, region: Region) -> io::Result<()> {
        let panel = self.panel_mut(region)?;
        let (top, left) = (panel.top, panel.left);
        let runs = panel.take_dirty_runs();
        for (row, col, text) in runs {
            queue!(self.stdout, cursor::MoveTo(left + col, top + row), Print(text))?;
        }
        self.stdout.flush()
    }

    fn size(&self, region: Region) -> (u16, u16) {
        self.panel(region)
            .map(|panel| (panel.height, panel.width))
            .unwrap_or((0, 0))
    }

    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(decode(key)));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
