use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use crate::state::Viewport;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("getContext(\"2d\") failed: {0}")]
    Context(String),
}

/// The 2D operations the background draws with.
pub trait Surface {
    fn size(&self) -> Viewport;
    /// Set the pixel size. Existing content is discarded.
    fn resize(&mut self, viewport: Viewport);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
    /// A line whose colour runs from `head_color` at `head` to `tail_color` at `tail`.
    fn stroke_streak(&mut self, head: (f64, f64), tail: (f64, f64), head_color: &str, tail_color: &str, width: f64);
}

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SurfaceError::Context(format!("{:?}", e)))?
            .ok_or(SurfaceError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::NoContext)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for WebSurface {
    fn size(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(0.0) as u32);
        self.canvas.set_height(viewport.height.max(0.0) as u32);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius.max(0.0), 0.0, std::f64::consts::PI * 2.0);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_streak(&mut self, head: (f64, f64), tail: (f64, f64), head_color: &str, tail_color: &str, width: f64) {
        let gradient = self.ctx.create_linear_gradient(head.0, head.1, tail.0, tail.1);
        let _ = gradient.add_color_stop(0.0_f32, head_color);
        let _ = gradient.add_color_stop(1.0_f32, tail_color);
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(head.0, head.1);
        self.ctx.line_to(tail.0, tail.1);
        self.ctx.stroke();
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Resize(Viewport),
        Rect { w: f64, h: f64, color: String },
        Circle { x: f64, y: f64, radius: f64, color: String },
        Streak { head: (f64, f64), tail: (f64, f64), head_color: String },
    }

    /// Records draw calls instead of rasterising them.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub size: Viewport,
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn new(w: f64, h: f64) -> Self {
            Self { size: Viewport::new(w, h), ops: Vec::new() }
        }

        pub fn circles(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count()
        }

        pub fn streaks(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Streak { .. })).count()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Viewport {
            self.size
        }

        fn resize(&mut self, viewport: Viewport) {
            self.size = viewport;
            self.ops.clear();
            self.ops.push(DrawOp::Resize(viewport));
        }

        fn fill_rect(&mut self, _x: f64, _y: f64, w: f64, h: f64, color: &str) {
            self.ops.push(DrawOp::Rect { w, h, color: color.to_string() });
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
            self.ops.push(DrawOp::Circle { x, y, radius, color: color.to_string() });
        }

        fn stroke_streak(&mut self, head: (f64, f64), tail: (f64, f64), head_color: &str, _tail_color: &str, _width: f64) {
            self.ops.push(DrawOp::Streak { head, tail, head_color: head_color.to_string() });
        }
    }
}
