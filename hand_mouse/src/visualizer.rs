//! Software-rendered debug window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  ┌ active region (mapping margins) ─────────┐  │
//! │  │                                          │  │
//! │  │          hand skeleton                   │  │
//! │  │                                          │  │
//! │  └──────────────────────────────────────────┘  │
//! │  measurements (debug overlay)                  │
//! │  status bar: ACTIVE | MOVING                   │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The window is also the simulation input device: its cursor position and
//! shape keys become [`SimInput`]s, and the hotkeys become
//! [`ControlCommand`]s.

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::Result;
use hand_gesture::{DebugSnapshot, HandPose, HandShape, Joint, HAND_SKELETON};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::DisplayState;
use crate::config::AppConfig;
use crate::control::ControlCommand;
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:      u32 = 0xFF1A1A2E;
const REGION_COLOR:  u32 = 0xFF3A3A5E;
const BONE_COLOR:    u32 = 0xFF00C8FF;
const JOINT_COLOR:   u32 = 0xFFFFFFFF;
const TIP_COLOR:     u32 = 0xFFFFD700;  // index tip, the pointer
const TEXT_BG:       u32 = 0xFF0F3460;
const ACTIVE_COLOR:  u32 = 0xFF50FF78;
const PAUSED_COLOR:  u32 = 0xFFFF5050;
const DEBUG_COLOR:   u32 = 0xFFAADDFF;
const LEGEND_COLOR:  u32 = 0xFF888888;

const STATUS_H:      usize = 28;
const LEGEND:        &str  = "CTRL+SHIFT+H=toggle  BKSP=reset  Q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Canvas: ARGB framebuffer with drawing primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    w:   usize,
    h:   usize,
    buf: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { w, h, buf: vec![BG_COLOR; w * h] }
    }

    pub fn width(&self) -> usize  { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn set_signed(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Bresenham line; off-canvas pixels are skipped.
    pub fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), color: u32) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_signed(x, y, color);
            if x == to.0 && y == to.1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn draw_dot(&mut self, c: (isize, isize), r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_signed(c.0 + dx, c.1 + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale`×`scale` block.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let advance = 4 * scale; // 3 wide + 1 gap
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.w { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += advance;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    sim_tx:     Sender<SimInput>,
    control_tx: Sender<ControlCommand>,

    /// Active region in frame units, `(x0, y0, x1, y1)`.
    region:     (f32, f32, f32, f32),
    overlay:    bool,
    pointer:    Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(
        cfg:        &AppConfig,
        sim_tx:     Sender<SimInput>,
        control_tx: Sender<ControlCommand>,
    ) -> Result<Self> {
        let (w, h) = (cfg.tracker.camera_width, cfg.tracker.camera_height);
        let mut window = Window::new(
            "Hand Mouse",
            w, h + STATUS_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to open debug window: {}", e))?;

        let rate = cfg.session.frame_rate.max(1) as f64;
        window.limit_update_rate(Some(Duration::from_secs_f64(1.0 / rate)));

        let mx = cfg.mapping.margin_x as f32;
        let my = cfg.mapping.margin_y as f32;
        Ok(Visualizer {
            window,
            canvas: Canvas::new(w, h + STATUS_H),
            sim_tx,
            control_tx,
            region: (mx, my, 1.0 - mx, 1.0 - my),
            overlay: cfg.session.debug_overlay,
            pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Translate window input into simulation inputs and control commands.
    pub fn poll_input(&mut self) {
        if !self.window.is_open() { return; }

        let ctrl  = self.window.is_key_down(Key::LeftCtrl)
                 || self.window.is_key_down(Key::RightCtrl);
        let shift = self.window.is_key_down(Key::LeftShift)
                 || self.window.is_key_down(Key::RightShift);

        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            let command = match key {
                Key::H if ctrl && shift   => Some(ControlCommand::Toggle),
                Key::Backspace            => Some(ControlCommand::Reset),
                Key::Q | Key::Escape      => Some(ControlCommand::Quit),
                _                         => None,
            };
            if let Some(cmd) = command {
                let _ = self.control_tx.send(cmd);
            } else if let Some(shape) = shape_for_key(key) {
                let _ = self.sim_tx.send(SimInput::ShapeDown(shape));
            }
        }
        for key in self.window.get_keys_released() {
            if let Some(shape) = shape_for_key(key) {
                let _ = self.sim_tx.send(SimInput::ShapeUp(shape));
            }
        }

        // ── Cursor → index tip ────────────────────────────────────────────
        let (w, h) = (self.canvas.width() as f32, (self.canvas.height() - STATUS_H) as f32);
        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .filter(|&(_, y)| y < h)
            .map(|(x, y)| (x / w, y / h));
        if pointer != self.pointer {
            self.pointer = pointer;
            let input = match pointer {
                Some((x, y)) => SimInput::Pointer { x, y },
                None         => SimInput::PointerLost,
            };
            let _ = self.sim_tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(&mut self, pose: Option<&HandPose>, display: &DisplayState, debug: &DebugSnapshot) {
        draw_frame(&mut self.canvas, self.region, pose, display, self.overlay.then_some(debug));
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.window.update_with_buffer(self.canvas.pixels(), w, h).ok();
    }
}

/// Draw the whole window contents into `canvas`.
fn draw_frame(
    canvas:  &mut Canvas,
    region:  (f32, f32, f32, f32),
    pose:    Option<&HandPose>,
    display: &DisplayState,
    debug:   Option<&DebugSnapshot>,
) {
    canvas.clear(BG_COLOR);
    let w = canvas.width();
    let h = canvas.height() - STATUS_H;
    let to_px = |x: f32, y: f32| ((x * w as f32) as isize, (y * h as f32) as isize);

    // ── Active region ─────────────────────────────────────────────────────
    let (x0, y0) = to_px(region.0, region.1);
    let (x1, y1) = to_px(region.2, region.3);
    canvas.draw_border(
        x0.max(0) as usize,
        y0.max(0) as usize,
        (x1 - x0).max(1) as usize,
        (y1 - y0).max(1) as usize,
        REGION_COLOR,
    );

    // ── Hand ──────────────────────────────────────────────────────────────
    if let Some(pose) = pose.filter(|p| p.is_finite()) {
        let px = |j: Joint| {
            let lm = pose.get(j);
            to_px(lm.x, lm.y)
        };
        if debug.is_some() {
            for &(a, b) in HAND_SKELETON.iter() {
                canvas.draw_line(px(a), px(b), BONE_COLOR);
            }
            for &j in Joint::ALL.iter() {
                canvas.draw_dot(px(j), 2, JOINT_COLOR);
            }
        }
        canvas.draw_dot(px(Joint::IndexTip), 4, TIP_COLOR);
    }

    // ── Measurements ──────────────────────────────────────────────────────
    if let Some(d) = debug {
        let fingers: String = d
            .fingers
            .as_array()
            .iter()
            .map(|&up| if up { '1' } else { '0' })
            .collect();
        let lines = [
            format!("CROSS {:+.3}  MIDDLE {:.3}  PINKY {:.3}", d.thumb_cross, d.thumb_middle, d.thumb_pinky),
            format!("FINGERS {}  THUMB {}  SCROLL {:+.3}", fingers, d.thumb_extended as u8, d.scroll_dy),
        ];
        for (i, line) in lines.iter().enumerate() {
            canvas.draw_label(line, 8, 8 + i * 10, 1, DEBUG_COLOR);
        }
    }

    // ── Status bar ────────────────────────────────────────────────────────
    canvas.fill_rect(0, h, w, STATUS_H, TEXT_BG);
    let color = if display.active { ACTIVE_COLOR } else { PAUSED_COLOR };
    canvas.draw_label(&display.to_string(), 8, h + 4, 2, color);
    canvas.draw_label(
        LEGEND,
        w.saturating_sub(4 * LEGEND.len() + 8),
        h + STATUS_H - 8,
        1,
        LEGEND_COLOR,
    );
}

/// Shape key bindings for the simulation source.
pub fn shape_for_key(key: Key) -> Option<HandShape> {
    match key {
        Key::F    => Some(HandShape::Fist),
        Key::Key2 => Some(HandShape::TwoFinger),
        Key::O    => Some(HandShape::OpenPalm),
        Key::C    => Some(HandShape::ThumbCross),
        Key::X    => Some(HandShape::PinkyPinch),
        Key::G    => Some(HandShape::DragPinch),
        _         => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font: only what the status, legend and measurement lines use
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_MISSING: [u8; 5] = [0b000, 0b000, 0b010, 0b000, 0b000];

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ' ' => [0b000; 5],
        _   => GLYPH_MISSING,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{synth_pose, GestureTag};

    fn count(canvas: &Canvas, color: u32) -> usize {
        canvas.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(8, 8, 5, 5, 0xFFFFFFFF);
        assert_eq!(count(&c, 0xFFFFFFFF), 4);
    }

    #[test]
    fn line_reaches_both_ends() {
        let mut c = Canvas::new(20, 20);
        c.draw_line((2, 3), (15, 11), 0xFF00FF00);
        assert_eq!(c.pixel(2, 3), Some(0xFF00FF00));
        assert_eq!(c.pixel(15, 11), Some(0xFF00FF00));
        // One pixel per step along the major axis.
        assert_eq!(count(&c, 0xFF00FF00), 14);
    }

    #[test]
    fn off_canvas_line_does_not_panic() {
        let mut c = Canvas::new(8, 8);
        c.draw_line((-5, -5), (20, 3), 0xFF00FF00);
        c.draw_dot((-1, 7), 3, 0xFF00FF00);
        assert!(count(&c, 0xFF00FF00) > 0);
    }

    #[test]
    fn label_scale_multiplies_ink() {
        let mut small = Canvas::new(64, 32);
        small.draw_label("H", 0, 0, 1, 0xFFFFFFFF);
        let mut big = Canvas::new(64, 32);
        big.draw_label("H", 0, 0, 2, 0xFFFFFFFF);
        assert_eq!(count(&small, 0xFFFFFFFF), 11);
        assert_eq!(count(&big, 0xFFFFFFFF), 44);
    }

    #[test]
    fn every_drawn_label_has_glyphs() {
        use hand_gesture::GestureTag::*;
        let tags = [
            Idle, Moving, LeftClick, RightClick, Dragging, DragEnd, Scrolling, SwipeLeft, SwipeRight,
        ];
        let mut texts: Vec<String> = tags
            .iter()
            .flat_map(|&tag| {
                [true, false].map(|active| DisplayState { active, hand: Some(tag) }.to_string())
            })
            .collect();
        texts.push(DisplayState { active: true, hand: None }.to_string());
        texts.push(LEGEND.to_string());
        texts.push("CROSS +0.123  MIDDLE 0.456  PINKY 0.789".to_string());
        texts.push("FINGERS 0101  THUMB 1  SCROLL -0.100".to_string());
        for text in &texts {
            for ch in text.chars() {
                assert_ne!(char_glyph(ch), GLYPH_MISSING, "no glyph for {:?} in {:?}", ch, text);
            }
        }
    }

    #[test]
    fn shape_keys() {
        assert_eq!(shape_for_key(Key::G), Some(HandShape::DragPinch));
        assert_eq!(shape_for_key(Key::Key2), Some(HandShape::TwoFinger));
        assert_eq!(shape_for_key(Key::H), None);
    }

    #[test]
    fn frame_draws_pointer_and_status() {
        let mut c = Canvas::new(320, 240 + STATUS_H);
        let pose = synth_pose(HandShape::Point, 0.5, 0.5);
        let display = DisplayState { active: true, hand: Some(GestureTag::Moving) };
        draw_frame(&mut c, (0.15, 0.15, 0.85, 0.85), Some(&pose), &display, Some(&DebugSnapshot::default()));

        let tip = pose.get(Joint::IndexTip);
        let (tx, ty) = ((tip.x * 320.0) as usize, (tip.y * 240.0) as usize);
        assert_eq!(c.pixel(tx, ty), Some(TIP_COLOR));
        assert!(count(&c, BONE_COLOR) > 0);
        assert!(count(&c, ACTIVE_COLOR) > 0);
        assert_eq!(count(&c, PAUSED_COLOR), 0);
    }

    #[test]
    fn overlay_off_hides_skeleton() {
        let mut c = Canvas::new(320, 240 + STATUS_H);
        let pose = synth_pose(HandShape::OpenPalm, 0.5, 0.5);
        let display = DisplayState { active: false, hand: None };
        draw_frame(&mut c, (0.1, 0.1, 0.9, 0.9), Some(&pose), &display, None);
        assert_eq!(count(&c, BONE_COLOR), 0);
        assert!(count(&c, TIP_COLOR) > 0);
        assert!(count(&c, PAUSED_COLOR) > 0);
    }
}
