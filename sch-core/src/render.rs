//! 图元渲染与包围盒计算的接收端接口。
//!
//! 图元只依赖这两个 trait，不关心具体实现是屏幕画布、导出后端还是仅计算范围。

use crate::geometry::{Bounds, half_width};
use crate::style::{FillStyle, LineStyle};

pub trait ItemRenderer {
    fn close_path(&mut self);
    fn render_absolute_move_to(&mut self, x: i32, y: i32);
    fn render_absolute_line_to(&mut self, x: i32, y: i32);
    fn render_relative_move_to(&mut self, dx: i32, dy: i32);
    fn render_relative_line_to(&mut self, dx: i32, dy: i32);
    /// `start` 与 `sweep` 单位为度；整圆以 `sweep = 360` 表示。
    fn render_arc(&mut self, x: i32, y: i32, radius: i32, start: i32, sweep: i32);
    fn render_text(&mut self, insert_x: i32, insert_y: i32, text: &str);
    fn set_color(&mut self, color: i32);
    fn set_fill_style(&mut self, style: &FillStyle);
    fn set_line_style(&mut self, style: &LineStyle);
}

pub trait BoundsCalculator {
    fn calculate_from_corners(&self, x0: i32, y0: i32, x1: i32, y1: i32, line_width: i32)
    -> Bounds;
}

/// 仅根据几何角点与线宽计算范围，不考虑具体画布的像素对齐。
#[derive(Debug, Default, Clone, Copy)]
pub struct CornerBoundsCalculator;

impl BoundsCalculator for CornerBoundsCalculator {
    fn calculate_from_corners(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        line_width: i32,
    ) -> Bounds {
        Bounds::from_corners(x0, y0, x1, y1).expand(half_width(line_width))
    }
}

/// 渲染调用的记录形式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    ClosePath,
    AbsoluteMoveTo(i32, i32),
    AbsoluteLineTo(i32, i32),
    RelativeMoveTo(i32, i32),
    RelativeLineTo(i32, i32),
    Arc {
        x: i32,
        y: i32,
        radius: i32,
        start: i32,
        sweep: i32,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
    },
    Color(i32),
    FillStyle(FillStyle),
    LineStyle(LineStyle),
}

/// 将所有渲染调用按顺序记录下来，供 CLI 统计与测试断言使用。
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    ops: Vec<RenderOp>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn take(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// 统计实际绘制的几何操作数量（不含样式设置）。
    pub fn drawing_op_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| {
                !matches!(
                    op,
                    RenderOp::Color(_) | RenderOp::FillStyle(_) | RenderOp::LineStyle(_)
                )
            })
            .count()
    }
}

impl ItemRenderer for RecordingRenderer {
    fn close_path(&mut self) {
        self.ops.push(RenderOp::ClosePath);
    }

    fn render_absolute_move_to(&mut self, x: i32, y: i32) {
        self.ops.push(RenderOp::AbsoluteMoveTo(x, y));
    }

    fn render_absolute_line_to(&mut self, x: i32, y: i32) {
        self.ops.push(RenderOp::AbsoluteLineTo(x, y));
    }

    fn render_relative_move_to(&mut self, dx: i32, dy: i32) {
        self.ops.push(RenderOp::RelativeMoveTo(dx, dy));
    }

    fn render_relative_line_to(&mut self, dx: i32, dy: i32) {
        self.ops.push(RenderOp::RelativeLineTo(dx, dy));
    }

    fn render_arc(&mut self, x: i32, y: i32, radius: i32, start: i32, sweep: i32) {
        self.ops.push(RenderOp::Arc {
            x,
            y,
            radius,
            start,
            sweep,
        });
    }

    fn render_text(&mut self, insert_x: i32, insert_y: i32, text: &str) {
        self.ops.push(RenderOp::Text {
            x: insert_x,
            y: insert_y,
            text: text.to_string(),
        });
    }

    fn set_color(&mut self, color: i32) {
        self.ops.push(RenderOp::Color(color));
    }

    fn set_fill_style(&mut self, style: &FillStyle) {
        self.ops.push(RenderOp::FillStyle(*style));
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.ops.push(RenderOp::LineStyle(*style));
    }
}
