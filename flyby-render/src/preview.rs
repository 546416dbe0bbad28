/// Interactive terminal preview of a single view
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use flyby_core::{CameraState, Frame, LightConfig, Mesh, Result};
use std::io::{self, stdout, Write};
use std::time::Duration;

use crate::context::{RenderContext, RenderSettings};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Degrees per orbit key press
const ORBIT_STEP: f32 = 5.0;

/// Zoom multiplier per zoom key press
const ZOOM_STEP: f32 = 1.25;

/// A frame reduced to terminal characters.
///
/// Terminal cells are about twice as tall as they are wide, so each cell
/// covers two rows of the source frame.
pub struct AsciiSurface {
    width: usize,
    height: usize,
    chars: Vec<char>,
}

impl AsciiSurface {
    pub fn from_frame(frame: &Frame) -> Self {
        let width = frame.width() as usize;
        let height = (frame.height() as usize).div_ceil(2);
        let mut chars = Vec::with_capacity(width * height);

        for row in 0..height as u32 {
            for x in 0..frame.width() {
                let top = row * 2;
                let bottom = (top + 1).min(frame.height() - 1);
                let luma = (frame.luminance(x, top) + frame.luminance(x, bottom)) / 2.0;
                chars.push(ramp_char(luma));
            }
        }

        Self {
            width,
            height,
            chars,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.chars[y * self.width + x]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16 + 1))?;
            for x in 0..self.width {
                let c = self.char_at(x, y);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    _ => Color::Yellow,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn ramp_char(luma: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (luma.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// What a key press asks the preview to do
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    Orbit(f32, f32),
    Zoom(f32),
    Quit,
    Ignore,
}

fn key_action(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => KeyAction::Quit,
        KeyCode::Char('a') | KeyCode::Left => KeyAction::Orbit(-ORBIT_STEP, 0.0),
        KeyCode::Char('d') | KeyCode::Right => KeyAction::Orbit(ORBIT_STEP, 0.0),
        KeyCode::Char('w') | KeyCode::Up => KeyAction::Orbit(0.0, ORBIT_STEP),
        KeyCode::Char('s') | KeyCode::Down => KeyAction::Orbit(0.0, -ORBIT_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::Zoom(ZOOM_STEP),
        KeyCode::Char('-') => KeyAction::Zoom(1.0 / ZOOM_STEP),
        _ => KeyAction::Ignore,
    }
}

/// Restores the terminal when dropped, including on error or panic
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
    }
}

/// Terminal window showing the model from an adjustable orbit
pub struct TerminalPreview<'a> {
    mesh: &'a Mesh,
    camera: CameraState,
    light: LightConfig,
    settings: RenderSettings,
    context: RenderContext,
    running: bool,
}

impl<'a> TerminalPreview<'a> {
    /// `settings` supplies the material and background; the viewport follows
    /// the terminal size.
    pub fn new(
        mesh: &'a Mesh,
        camera: CameraState,
        light: LightConfig,
        settings: RenderSettings,
    ) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        let settings = viewport_for(settings, cols, rows);
        Ok(Self {
            mesh,
            camera,
            light,
            context: RenderContext::acquire(settings)?,
            settings,
            running: true,
        })
    }

    /// Show the preview until the user quits
    pub fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        self.main_loop()
    }

    /// Camera as last adjusted by the user
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    fn main_loop(&mut self) -> Result<()> {
        self.render()?;

        while self.running {
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }

            let redraw = match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    self.handle_key(code)
                }
                Event::Resize(cols, rows) => {
                    self.settings = viewport_for(self.settings, cols, rows);
                    self.context = RenderContext::acquire(self.settings)?;
                    true
                }
                _ => false,
            };

            if redraw && self.running {
                self.render()?;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match key_action(code) {
            KeyAction::Quit => {
                self.running = false;
                false
            }
            KeyAction::Orbit(d_az, d_el) => {
                self.camera = self.camera.orbit(d_az, d_el);
                true
            }
            KeyAction::Zoom(factor) => {
                self.camera.zoom *= factor;
                true
            }
            KeyAction::Ignore => false,
        }
    }

    fn render(&mut self) -> Result<()> {
        let frame = self.context.render(self.mesh, &self.camera, &self.light)?;
        let surface = AsciiSurface::from_frame(&frame);

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        surface.draw(&mut stdout)?;

        // Status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "az {:5.1}  el {:5.1}  zoom {:.3} | WASD/Arrows=Orbit +/-=Zoom Q=Continue",
                self.camera.azimuth, self.camera.elevation, self.camera.zoom
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Viewport covering the terminal below the status line, two pixel rows per cell
fn viewport_for(settings: RenderSettings, cols: u16, rows: u16) -> RenderSettings {
    RenderSettings {
        width: u32::from(cols.max(1)),
        height: u32::from(rows.saturating_sub(1).max(1)) * 2,
        ..settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp_char(0.0), ' ');
        assert_eq!(ramp_char(1.0), '@');
        assert_eq!(ramp_char(-3.0), ' ');
        assert_eq!(ramp_char(7.0), '@');
    }

    #[test]
    fn test_surface_halves_rows() {
        let mut frame = Frame::filled(3, 4, [0.0, 0.0, 0.0]);
        frame.set_pixel(0, 0, [1.0, 1.0, 1.0]);
        frame.set_pixel(0, 1, [1.0, 1.0, 1.0]);
        frame.set_pixel(2, 3, [1.0, 1.0, 1.0]);

        let surface = AsciiSurface::from_frame(&frame);
        assert_eq!((surface.width(), surface.height()), (3, 2));
        assert_eq!(surface.char_at(0, 0), '@');
        assert_eq!(surface.char_at(1, 0), ' ');
        // Half-covered cell lands mid-ramp
        let mid = surface.char_at(2, 1);
        assert!(mid != ' ' && mid != '@', "got {:?}", mid);
    }

    #[test]
    fn test_surface_odd_height() {
        let frame = Frame::filled(2, 3, [1.0, 1.0, 1.0]);
        let surface = AsciiSurface::from_frame(&frame);
        assert_eq!(surface.height(), 2);
        assert_eq!(surface.char_at(1, 1), '@');
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(key_action(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Left), KeyAction::Orbit(-ORBIT_STEP, 0.0));
        assert_eq!(key_action(KeyCode::Char('w')), KeyAction::Orbit(0.0, ORBIT_STEP));
        assert_eq!(key_action(KeyCode::Char('+')), KeyAction::Zoom(ZOOM_STEP));
        assert_eq!(key_action(KeyCode::Char('x')), KeyAction::Ignore);
    }

    #[test]
    fn test_viewport_for_terminal() {
        let settings = viewport_for(RenderSettings::default(), 80, 25);
        assert_eq!((settings.width, settings.height), (80, 48));

        let tiny = viewport_for(RenderSettings::default(), 0, 0);
        assert_eq!((tiny.width, tiny.height), (1, 2));
    }
}
