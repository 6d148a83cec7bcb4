//! 交互式绘图工具的两状态机：S0 等待第一个点，S1 跟踪第二个点。

use sch_core::geometry::{Bounds, Point2};
use sch_core::item::GraphicLine;
use sch_core::render::{CornerBoundsCalculator, ItemRenderer};
use tracing::{debug, warn};

use crate::builder::ItemBuilder;
use crate::subject::ToolContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolState {
    /// 空闲，等待第一个点。
    #[default]
    S0,
    /// 第一个点已放置，跟随指针更新第二个点。
    S1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKey {
    Escape,
    Other(u32),
}

pub trait DrawingTool {
    fn name(&self) -> &'static str;

    fn state(&self) -> ToolState;

    /// 返回事件是否被工具处理。
    fn button_pressed(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool;

    fn motion_notify(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool;

    /// `Escape` 放弃正在进行的图元。
    fn key_pressed(&mut self, context: &mut ToolContext<'_>, key: ToolKey) -> bool;

    fn key_released(&mut self, _context: &mut ToolContext<'_>, _key: ToolKey) -> bool {
        false
    }

    /// 绘制 S1 状态下的实时预览。
    fn draw(&self, renderer: &mut dyn ItemRenderer);
}

/// 线段工具。提交后复用原型，其端点回到初始状态，样式与颜色保留。
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    prototype: GraphicLine,
    state: ToolState,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(mut prototype: GraphicLine) -> Self {
        prototype.endpoints = [Point2::default(); 2];
        Self {
            prototype,
            state: ToolState::S0,
        }
    }

    #[inline]
    pub fn prototype(&self) -> &GraphicLine {
        &self.prototype
    }

    fn preview_bounds(&self) -> Bounds {
        self.prototype.calculate_bounds(&CornerBoundsCalculator)
    }

    fn reset_with_point(&mut self, point: Point2) {
        self.prototype.endpoints = [point; 2];
        self.state = ToolState::S1;
    }

    fn update_with_point(&mut self, context: &mut ToolContext<'_>, point: Point2) {
        if self.state != ToolState::S1 {
            return;
        }
        let before = self.preview_bounds();
        self.prototype.set_endpoint1(point);
        context
            .subject
            .invalidate_item(before.union(&self.preview_bounds()));
    }

    fn finish(&mut self, context: &mut ToolContext<'_>) {
        let item = self.prototype.clone();
        let id = context.subject.add_item(item.into());
        debug!(
            id = id.get(),
            x0 = self.prototype.endpoint0().x(),
            y0 = self.prototype.endpoint0().y(),
            x1 = self.prototype.endpoint1().x(),
            y1 = self.prototype.endpoint1().y(),
            "线段工具已提交图元"
        );
        self.reset();
    }

    fn reset(&mut self) {
        self.prototype.endpoints = [Point2::default(); 2];
        self.state = ToolState::S0;
    }
}

impl DrawingTool for LineTool {
    fn name(&self) -> &'static str {
        "line"
    }

    #[inline]
    fn state(&self) -> ToolState {
        self.state
    }

    fn button_pressed(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool {
        let point = Point2::new(x, y);
        match self.state {
            ToolState::S0 => self.reset_with_point(point),
            ToolState::S1 => {
                self.update_with_point(context, point);
                self.finish(context);
            }
        }
        true
    }

    fn motion_notify(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool {
        if self.state != ToolState::S1 {
            return false;
        }
        self.update_with_point(context, Point2::new(x, y));
        true
    }

    fn key_pressed(&mut self, context: &mut ToolContext<'_>, key: ToolKey) -> bool {
        if key != ToolKey::Escape || self.state != ToolState::S1 {
            return false;
        }
        let bounds = self.preview_bounds();
        self.reset();
        context.subject.invalidate_item(bounds);
        debug!("线段工具已取消");
        true
    }

    fn draw(&self, renderer: &mut dyn ItemRenderer) {
        if self.state == ToolState::S1 {
            self.prototype.render(renderer);
        }
    }
}

/// 在任意 [`ItemBuilder`] 上运行同样的两状态机，提交 `create_items()` 的结果。
#[derive(Debug, Clone)]
pub struct BuilderTool<B> {
    builder: B,
    state: ToolState,
    name: &'static str,
}

impl<B: ItemBuilder> BuilderTool<B> {
    pub fn new(name: &'static str, builder: B) -> Self {
        Self {
            builder,
            state: ToolState::S0,
            name,
        }
    }

    #[inline]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    fn put_point(&mut self, index: usize, point: Point2) {
        if let Err(err) = self.builder.put_point(index, point.x(), point.y()) {
            warn!(tool = self.name, error = %err, "构建器拒绝了控制点");
        }
    }

    fn put_trailing_point(&mut self, context: &mut ToolContext<'_>, point: Point2) {
        let before = self.builder.calculate_bounds(&CornerBoundsCalculator);
        for index in 1..self.builder.point_count() {
            self.put_point(index, point);
        }
        let after = self.builder.calculate_bounds(&CornerBoundsCalculator);
        context.subject.invalidate_item(before.union(&after));
    }

    fn finish(&mut self, context: &mut ToolContext<'_>) {
        let items = self.builder.create_items();
        if items.is_empty() {
            debug!(tool = self.name, "图元退化，未提交");
        }
        for item in items {
            let id = context.subject.add_item(item);
            debug!(tool = self.name, id = id.get(), "构建器工具已提交图元");
        }
        self.builder.reset();
        self.state = ToolState::S0;
    }
}

impl<B: ItemBuilder> DrawingTool for BuilderTool<B> {
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn state(&self) -> ToolState {
        self.state
    }

    fn button_pressed(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool {
        let point = Point2::new(x, y);
        match self.state {
            ToolState::S0 => {
                for index in 0..self.builder.point_count() {
                    self.put_point(index, point);
                }
                self.state = ToolState::S1;
            }
            ToolState::S1 => {
                self.put_trailing_point(context, point);
                self.finish(context);
            }
        }
        true
    }

    fn motion_notify(&mut self, context: &mut ToolContext<'_>, x: i32, y: i32) -> bool {
        if self.state != ToolState::S1 {
            return false;
        }
        self.put_trailing_point(context, Point2::new(x, y));
        true
    }

    fn key_pressed(&mut self, context: &mut ToolContext<'_>, key: ToolKey) -> bool {
        if key != ToolKey::Escape || self.state != ToolState::S1 {
            return false;
        }
        let bounds = self.builder.calculate_bounds(&CornerBoundsCalculator);
        self.builder.reset();
        self.state = ToolState::S0;
        context.subject.invalidate_item(bounds);
        true
    }

    fn draw(&self, renderer: &mut dyn ItemRenderer) {
        if self.state == ToolState::S1 {
            self.builder.render_items(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BoxBuilder, CircleBuilder};
    use crate::subject::ToolSubject;
    use sch_core::item::GraphicItem;
    use sch_core::render::RecordingRenderer;
    use sch_core::schematic::ItemId;

    #[derive(Default)]
    struct CollectingSubject {
        items: Vec<GraphicItem>,
        invalidations: Vec<Bounds>,
    }

    impl ToolSubject for CollectingSubject {
        fn add_item(&mut self, item: GraphicItem) -> ItemId {
            self.items.push(item);
            ItemId::new(self.items.len() as u64 - 1)
        }

        fn invalidate_item(&mut self, bounds: Bounds) {
            self.invalidations.push(bounds);
        }
    }

    #[test]
    fn line_tool_rubber_bands_then_commits() {
        let mut subject = CollectingSubject::default();
        let mut tool = LineTool::new();
        assert_eq!(tool.state(), ToolState::S0);

        let mut context = ToolContext::new(&mut subject);
        assert!(tool.button_pressed(&mut context, 10, 10));
        assert_eq!(tool.state(), ToolState::S1);
        assert_eq!(tool.prototype().endpoints, [Point2::new(10, 10); 2]);

        tool.motion_notify(&mut context, 50, 20);
        assert_eq!(tool.state(), ToolState::S1);
        assert_eq!(tool.prototype().endpoint0(), Point2::new(10, 10));
        assert_eq!(tool.prototype().endpoint1(), Point2::new(50, 20));

        tool.button_pressed(&mut context, 50, 20);
        assert_eq!(tool.state(), ToolState::S0);

        assert_eq!(subject.items.len(), 1);
        match &subject.items[0] {
            GraphicItem::Line(line) => {
                assert_eq!(line.endpoint0(), Point2::new(10, 10));
                assert_eq!(line.endpoint1(), Point2::new(50, 20));
            }
            other => panic!("unexpected item {other:?}"),
        }
        assert!(!subject.invalidations.is_empty());
    }

    #[test]
    fn line_tool_prototype_returns_to_zero_state_after_commit() {
        let mut subject = CollectingSubject::default();
        let mut prototype = GraphicLine::default();
        prototype.line_style.width = 10;
        let mut tool = LineTool::with_prototype(prototype);
        let mut context = ToolContext::new(&mut subject);

        tool.button_pressed(&mut context, 1, 2);
        tool.button_pressed(&mut context, 3, 4);
        assert_eq!(tool.prototype().endpoints, [Point2::default(); 2]);
        assert_eq!(tool.prototype().line_style.width, 10);

        tool.button_pressed(&mut context, 7, 7);
        assert_eq!(tool.prototype().endpoints, [Point2::new(7, 7); 2]);
    }

    #[test]
    fn motion_in_idle_state_changes_nothing() {
        let mut subject = CollectingSubject::default();
        let mut tool = LineTool::new();
        let mut context = ToolContext::new(&mut subject);
        assert!(!tool.motion_notify(&mut context, 99, 99));
        assert_eq!(tool.state(), ToolState::S0);
        assert_eq!(tool.prototype().endpoints, [Point2::default(); 2]);
        assert!(subject.invalidations.is_empty());
    }

    #[test]
    fn escape_abandons_in_progress_line() {
        let mut subject = CollectingSubject::default();
        let mut tool = LineTool::new();
        let mut context = ToolContext::new(&mut subject);
        tool.button_pressed(&mut context, 0, 0);
        assert!(!tool.key_pressed(&mut context, ToolKey::Other(65)));
        assert!(tool.key_pressed(&mut context, ToolKey::Escape));
        assert!(!tool.key_released(&mut context, ToolKey::Escape));
        assert_eq!(tool.state(), ToolState::S0);
        assert!(subject.items.is_empty());
    }

    #[test]
    fn draw_renders_only_while_tracking() {
        let mut subject = CollectingSubject::default();
        let mut tool = LineTool::new();
        let mut renderer = RecordingRenderer::new();
        tool.draw(&mut renderer);
        assert!(renderer.ops().is_empty());

        let mut context = ToolContext::new(&mut subject);
        tool.button_pressed(&mut context, 0, 0);
        assert!(tool.motion_notify(&mut context, 10, 0));
        tool.draw(&mut renderer);
        assert_eq!(renderer.drawing_op_count(), 2);
    }

    #[test]
    fn builder_tool_skips_degenerate_circle() {
        let mut subject = CollectingSubject::default();
        let mut tool = BuilderTool::new("circle", CircleBuilder::new());
        let mut context = ToolContext::new(&mut subject);

        tool.button_pressed(&mut context, 10, 10);
        tool.button_pressed(&mut context, 10, 10);
        assert_eq!(tool.state(), ToolState::S0);

        assert!(!tool.motion_notify(&mut context, 25, 25));
        tool.button_pressed(&mut context, 10, 10);
        assert!(tool.motion_notify(&mut context, 40, 10));
        tool.button_pressed(&mut context, 40, 10);

        assert_eq!(subject.items.len(), 1);
        match &subject.items[0] {
            GraphicItem::Circle(circle) => {
                assert_eq!(circle.center, Point2::new(10, 10));
                assert_eq!(circle.radius(), 30);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn builder_tool_commits_boxes() {
        let mut subject = CollectingSubject::default();
        let mut tool = BuilderTool::new("box", BoxBuilder::new());
        let mut context = ToolContext::new(&mut subject);
        tool.button_pressed(&mut context, 0, 0);
        tool.button_pressed(&mut context, 30, 40);
        assert!(matches!(subject.items.as_slice(), [GraphicItem::Box(_)]));
    }
}
