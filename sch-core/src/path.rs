use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point2, Vector2};
use crate::render::ItemRenderer;

/// 路径命令。绝对命令携带位置，相对命令携带方向向量。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathCommand {
    AbsoluteMoveTo { point: Point2 },
    AbsoluteLineTo { point: Point2 },
    RelativeMoveTo { offset: Vector2 },
    RelativeLineTo { offset: Vector2 },
    ClosePath,
}

impl PathCommand {
    #[inline]
    pub fn absolute_move_to(x: i32, y: i32) -> Self {
        PathCommand::AbsoluteMoveTo {
            point: Point2::new(x, y),
        }
    }

    #[inline]
    pub fn absolute_line_to(x: i32, y: i32) -> Self {
        PathCommand::AbsoluteLineTo {
            point: Point2::new(x, y),
        }
    }

    #[inline]
    pub fn relative_move_to(dx: i32, dy: i32) -> Self {
        PathCommand::RelativeMoveTo {
            offset: Vector2::new(dx, dy),
        }
    }

    #[inline]
    pub fn relative_line_to(dx: i32, dy: i32) -> Self {
        PathCommand::RelativeLineTo {
            offset: Vector2::new(dx, dy),
        }
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        matches!(
            self,
            PathCommand::AbsoluteMoveTo { .. } | PathCommand::AbsoluteLineTo { .. }
        )
    }

    #[inline]
    pub fn is_relative(&self) -> bool {
        matches!(
            self,
            PathCommand::RelativeMoveTo { .. } | PathCommand::RelativeLineTo { .. }
        )
    }

    /// 绝对命令绕 `center` 旋转；相对命令只旋转方向向量，支点恒为原点。
    pub fn rotate(&mut self, center: Point2, angle: i32) {
        match self {
            PathCommand::AbsoluteMoveTo { point } | PathCommand::AbsoluteLineTo { point } => {
                *point = point.rotate(center, angle);
            }
            PathCommand::RelativeMoveTo { offset } | PathCommand::RelativeLineTo { offset } => {
                *offset = offset.rotate(angle);
            }
            PathCommand::ClosePath => {}
        }
    }

    /// 只有绝对命令受平移影响。
    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            PathCommand::AbsoluteMoveTo { point } | PathCommand::AbsoluteLineTo { point } => {
                *point = point.translate(Vector2::new(dx, dy));
            }
            PathCommand::RelativeMoveTo { .. }
            | PathCommand::RelativeLineTo { .. }
            | PathCommand::ClosePath => {}
        }
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        match *self {
            PathCommand::AbsoluteMoveTo { point } => {
                renderer.render_absolute_move_to(point.x(), point.y())
            }
            PathCommand::AbsoluteLineTo { point } => {
                renderer.render_absolute_line_to(point.x(), point.y())
            }
            PathCommand::RelativeMoveTo { offset } => {
                renderer.render_relative_move_to(offset.x(), offset.y())
            }
            PathCommand::RelativeLineTo { offset } => {
                renderer.render_relative_line_to(offset.x(), offset.y())
            }
            PathCommand::ClosePath => renderer.close_path(),
        }
    }
}

/// 沿命令序列追踪当前点，用于求路径的几何范围。
#[derive(Debug, Default, Clone, Copy)]
pub struct PathCursor {
    current: Point2,
    subpath_start: Point2,
}

impl PathCursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Point2 {
        self.current
    }

    /// 执行一条命令并返回命令到达的点；`ClosePath` 回到子路径起点。
    pub fn advance(&mut self, command: &PathCommand) -> Point2 {
        match *command {
            PathCommand::AbsoluteMoveTo { point } => {
                self.current = point;
                self.subpath_start = point;
            }
            PathCommand::AbsoluteLineTo { point } => {
                self.current = point;
            }
            PathCommand::RelativeMoveTo { offset } => {
                self.current = self.current.translate(offset);
                self.subpath_start = self.current;
            }
            PathCommand::RelativeLineTo { offset } => {
                self.current = self.current.translate(offset);
            }
            PathCommand::ClosePath => {
                self.current = self.subpath_start;
            }
        }
        self.current
    }
}

/// 命令序列经过的所有点组成的范围（不含线宽）。
pub fn path_extent(commands: &[PathCommand]) -> Bounds {
    let mut cursor = PathCursor::new();
    let mut bounds = Bounds::empty();
    for command in commands {
        let point = cursor.advance(command);
        bounds.include_point(point);
    }
    bounds
}
