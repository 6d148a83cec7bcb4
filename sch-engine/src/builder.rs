//! 拖拽式图元构建器：由若干控制点维护一个原型图元。

use sch_core::geometry::{Bounds, Point2};
use sch_core::item::{GraphicBox, GraphicCircle, GraphicItem, GraphicLine};
use sch_core::render::{BoundsCalculator, ItemRenderer};

use crate::errors::EngineError;

pub trait ItemBuilder {
    /// 构建器接受的控制点数量。
    fn point_count(&self) -> usize {
        2
    }

    fn put_point(&mut self, index: usize, x: i32, y: i32) -> Result<(), EngineError>;

    /// 原型有效时返回其克隆，否则返回空列表。
    fn create_items(&self) -> Vec<GraphicItem>;

    fn render_items(&self, renderer: &mut dyn ItemRenderer);

    fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds;

    /// 控制点与原型几何回到初始状态，样式与颜色保留。
    fn reset(&mut self);
}

fn check_index(index: usize, count: usize) -> Result<(), EngineError> {
    if index < count {
        Ok(())
    } else {
        Err(EngineError::PointIndexOutOfRange { index, count })
    }
}

/// 两点间距离的整数部分。
fn integer_distance(from: Point2, to: Point2) -> i32 {
    let squared = from.vector_to(to).length_squared().unsigned_abs();
    i32::try_from(squared.isqrt()).unwrap_or(i32::MAX)
}

/// 圆：第一个点为圆心，第二个点位于圆周上。
#[derive(Debug, Clone, Default)]
pub struct CircleBuilder {
    points: [Point2; 2],
    prototype: GraphicCircle,
}

impl CircleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定图元的样式与颜色作为原型。
    pub fn with_prototype(mut prototype: GraphicCircle) -> Self {
        prototype.center = Point2::default();
        prototype.set_radius(0);
        Self {
            points: [Point2::default(); 2],
            prototype,
        }
    }

    #[inline]
    pub fn prototype(&self) -> &GraphicCircle {
        &self.prototype
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied()
    }

    fn update_prototype(&mut self) {
        let [center, rim] = self.points;
        self.prototype.center = center;
        self.prototype.set_radius(integer_distance(center, rim));
    }
}

impl ItemBuilder for CircleBuilder {
    fn put_point(&mut self, index: usize, x: i32, y: i32) -> Result<(), EngineError> {
        check_index(index, self.points.len())?;
        self.points[index] = Point2::new(x, y);
        self.update_prototype();
        Ok(())
    }

    fn create_items(&self) -> Vec<GraphicItem> {
        if self.prototype.is_significant() {
            vec![self.prototype.clone().into()]
        } else {
            Vec::new()
        }
    }

    fn render_items(&self, renderer: &mut dyn ItemRenderer) {
        self.prototype.render(renderer);
    }

    fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        self.prototype.calculate_bounds(calculator)
    }

    fn reset(&mut self) {
        self.points = [Point2::default(); 2];
        self.update_prototype();
    }
}

/// 矩形：两个控制点即两个对角点。
#[derive(Debug, Clone, Default)]
pub struct BoxBuilder {
    prototype: GraphicBox,
}

impl BoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(mut prototype: GraphicBox) -> Self {
        prototype.corners = [Point2::default(); 2];
        Self { prototype }
    }

    #[inline]
    pub fn prototype(&self) -> &GraphicBox {
        &self.prototype
    }
}

impl ItemBuilder for BoxBuilder {
    fn put_point(&mut self, index: usize, x: i32, y: i32) -> Result<(), EngineError> {
        check_index(index, self.prototype.corners.len())?;
        self.prototype.corners[index] = Point2::new(x, y);
        Ok(())
    }

    fn create_items(&self) -> Vec<GraphicItem> {
        if self.prototype.is_significant() {
            vec![self.prototype.clone().into()]
        } else {
            Vec::new()
        }
    }

    fn render_items(&self, renderer: &mut dyn ItemRenderer) {
        self.prototype.render(renderer);
    }

    fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        self.prototype.calculate_bounds(calculator)
    }

    fn reset(&mut self) {
        self.prototype.corners = [Point2::default(); 2];
    }
}

/// 线段：两个控制点即两个端点。
#[derive(Debug, Clone, Default)]
pub struct LineBuilder {
    prototype: GraphicLine,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(mut prototype: GraphicLine) -> Self {
        prototype.endpoints = [Point2::default(); 2];
        Self { prototype }
    }

    #[inline]
    pub fn prototype(&self) -> &GraphicLine {
        &self.prototype
    }
}

impl ItemBuilder for LineBuilder {
    fn put_point(&mut self, index: usize, x: i32, y: i32) -> Result<(), EngineError> {
        check_index(index, self.prototype.endpoints.len())?;
        self.prototype.endpoints[index] = Point2::new(x, y);
        Ok(())
    }

    fn create_items(&self) -> Vec<GraphicItem> {
        if self.prototype.is_significant() {
            vec![self.prototype.clone().into()]
        } else {
            Vec::new()
        }
    }

    fn render_items(&self, renderer: &mut dyn ItemRenderer) {
        self.prototype.render(renderer);
    }

    fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        self.prototype.calculate_bounds(calculator)
    }

    fn reset(&mut self) {
        self.prototype.endpoints = [Point2::default(); 2];
    }
}
