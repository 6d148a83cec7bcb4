use serde::{Deserialize, Serialize};

use crate::geometry::{self, Bounds, Point2};
use crate::path::{PathCommand, PathCursor, path_extent};
use crate::render::{BoundsCalculator, ItemRenderer};
use crate::style::{FillStyle, LineStyle};

/// 图形图元默认颜色索引。
pub const DEFAULT_GRAPHIC_COLOR: i32 = 3;
/// 引脚默认颜色索引。
pub const DEFAULT_PIN_COLOR: i32 = 1;
/// 文本默认颜色索引。
pub const DEFAULT_TEXT_COLOR: i32 = 9;
/// 文本默认字号（磅）。
pub const DEFAULT_TEXT_SIZE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Line,
    Box,
    Circle,
    Arc,
    Path,
    Pin,
    Text,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Line => "line",
            ItemKind::Box => "box",
            ItemKind::Circle => "circle",
            ItemKind::Arc => "arc",
            ItemKind::Path => "path",
            ItemKind::Pin => "pin",
            ItemKind::Text => "text",
        }
    }
}

/// 原理图图元。封闭集合，每个变体独占自己的样式对象。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphicItem {
    Line(GraphicLine),
    Box(GraphicBox),
    Circle(GraphicCircle),
    Arc(GraphicArc),
    Path(GraphicPath),
    Pin(GraphicPin),
    Text(GraphicText),
}

impl GraphicItem {
    #[inline]
    pub fn kind(&self) -> ItemKind {
        match self {
            GraphicItem::Line(_) => ItemKind::Line,
            GraphicItem::Box(_) => ItemKind::Box,
            GraphicItem::Circle(_) => ItemKind::Circle,
            GraphicItem::Arc(_) => ItemKind::Arc,
            GraphicItem::Path(_) => ItemKind::Path,
            GraphicItem::Pin(_) => ItemKind::Pin,
            GraphicItem::Text(_) => ItemKind::Text,
        }
    }

    /// 计算含描边余量的包围盒。只读、幂等。
    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        match self {
            GraphicItem::Line(line) => line.calculate_bounds(calculator),
            GraphicItem::Box(rect) => rect.calculate_bounds(calculator),
            GraphicItem::Circle(circle) => circle.calculate_bounds(calculator),
            GraphicItem::Arc(arc) => arc.calculate_bounds(calculator),
            GraphicItem::Path(path) => path.calculate_bounds(calculator),
            GraphicItem::Pin(pin) => pin.calculate_bounds(calculator),
            GraphicItem::Text(text) => text.calculate_bounds(calculator),
        }
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        match self {
            GraphicItem::Line(line) => line.render(renderer),
            GraphicItem::Box(rect) => rect.render(renderer),
            GraphicItem::Circle(circle) => circle.render(renderer),
            GraphicItem::Arc(arc) => arc.render(renderer),
            GraphicItem::Path(path) => path.render(renderer),
            GraphicItem::Pin(pin) => pin.render(renderer),
            GraphicItem::Text(text) => text.render(renderer),
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            GraphicItem::Line(line) => line.translate(dx, dy),
            GraphicItem::Box(rect) => rect.translate(dx, dy),
            GraphicItem::Circle(circle) => circle.translate(dx, dy),
            GraphicItem::Arc(arc) => arc.translate(dx, dy),
            GraphicItem::Path(path) => path.translate(dx, dy),
            GraphicItem::Pin(pin) => pin.translate(dx, dy),
            GraphicItem::Text(text) => text.translate(dx, dy),
        }
    }

    /// 几何范围非退化的图元才允许由构建器提交到文档。
    pub fn is_significant(&self) -> bool {
        match self {
            GraphicItem::Line(line) => line.is_significant(),
            GraphicItem::Box(rect) => rect.is_significant(),
            GraphicItem::Circle(circle) => circle.is_significant(),
            GraphicItem::Arc(arc) => arc.is_significant(),
            GraphicItem::Path(path) => path.is_significant(),
            GraphicItem::Pin(pin) => pin.is_significant(),
            GraphicItem::Text(text) => text.is_significant(),
        }
    }

    #[inline]
    pub fn color(&self) -> i32 {
        match self {
            GraphicItem::Line(line) => line.color,
            GraphicItem::Box(rect) => rect.color,
            GraphicItem::Circle(circle) => circle.color,
            GraphicItem::Arc(arc) => arc.color,
            GraphicItem::Path(path) => path.color,
            GraphicItem::Pin(pin) => pin.color,
            GraphicItem::Text(text) => text.color,
        }
    }

    pub fn set_color(&mut self, color: i32) {
        match self {
            GraphicItem::Line(line) => line.color = color,
            GraphicItem::Box(rect) => rect.color = color,
            GraphicItem::Circle(circle) => circle.color = color,
            GraphicItem::Arc(arc) => arc.color = color,
            GraphicItem::Path(path) => path.color = color,
            GraphicItem::Pin(pin) => pin.color = color,
            GraphicItem::Text(text) => text.color = color,
        }
    }

    /// 文本没有线型，引脚线宽由引脚类型决定；其余图元总是持有一份。
    pub fn line_style(&self) -> Option<&LineStyle> {
        match self {
            GraphicItem::Line(line) => Some(&line.line_style),
            GraphicItem::Box(rect) => Some(&rect.line_style),
            GraphicItem::Circle(circle) => Some(&circle.line_style),
            GraphicItem::Arc(arc) => Some(&arc.line_style),
            GraphicItem::Path(path) => Some(&path.line_style),
            GraphicItem::Pin(_) | GraphicItem::Text(_) => None,
        }
    }

    pub fn line_style_mut(&mut self) -> Option<&mut LineStyle> {
        match self {
            GraphicItem::Line(line) => Some(&mut line.line_style),
            GraphicItem::Box(rect) => Some(&mut rect.line_style),
            GraphicItem::Circle(circle) => Some(&mut circle.line_style),
            GraphicItem::Arc(arc) => Some(&mut arc.line_style),
            GraphicItem::Path(path) => Some(&mut path.line_style),
            GraphicItem::Pin(_) | GraphicItem::Text(_) => None,
        }
    }

    pub fn fill_style(&self) -> Option<&FillStyle> {
        match self {
            GraphicItem::Box(rect) => Some(&rect.fill_style),
            GraphicItem::Circle(circle) => Some(&circle.fill_style),
            GraphicItem::Path(path) => Some(&path.fill_style),
            GraphicItem::Line(_)
            | GraphicItem::Arc(_)
            | GraphicItem::Pin(_)
            | GraphicItem::Text(_) => None,
        }
    }

    pub fn fill_style_mut(&mut self) -> Option<&mut FillStyle> {
        match self {
            GraphicItem::Box(rect) => Some(&mut rect.fill_style),
            GraphicItem::Circle(circle) => Some(&mut circle.fill_style),
            GraphicItem::Path(path) => Some(&mut path.fill_style),
            GraphicItem::Line(_)
            | GraphicItem::Arc(_)
            | GraphicItem::Pin(_)
            | GraphicItem::Text(_) => None,
        }
    }
}

impl From<GraphicLine> for GraphicItem {
    fn from(value: GraphicLine) -> Self {
        GraphicItem::Line(value)
    }
}

impl From<GraphicBox> for GraphicItem {
    fn from(value: GraphicBox) -> Self {
        GraphicItem::Box(value)
    }
}

impl From<GraphicCircle> for GraphicItem {
    fn from(value: GraphicCircle) -> Self {
        GraphicItem::Circle(value)
    }
}

impl From<GraphicArc> for GraphicItem {
    fn from(value: GraphicArc) -> Self {
        GraphicItem::Arc(value)
    }
}

impl From<GraphicPath> for GraphicItem {
    fn from(value: GraphicPath) -> Self {
        GraphicItem::Path(value)
    }
}

impl From<GraphicPin> for GraphicItem {
    fn from(value: GraphicPin) -> Self {
        GraphicItem::Pin(value)
    }
}

impl From<GraphicText> for GraphicItem {
    fn from(value: GraphicText) -> Self {
        GraphicItem::Text(value)
    }
}

/// 线段图元。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicLine {
    pub endpoints: [Point2; 2],
    pub line_style: LineStyle,
    pub color: i32,
}

impl GraphicLine {
    pub fn new(endpoint0: Point2, endpoint1: Point2) -> Self {
        Self {
            endpoints: [endpoint0, endpoint1],
            ..Self::default()
        }
    }

    #[inline]
    pub fn endpoint0(&self) -> Point2 {
        self.endpoints[0]
    }

    #[inline]
    pub fn endpoint1(&self) -> Point2 {
        self.endpoints[1]
    }

    #[inline]
    pub fn set_endpoint0(&mut self, point: Point2) {
        self.endpoints[0] = point;
    }

    #[inline]
    pub fn set_endpoint1(&mut self, point: Point2) {
        self.endpoints[1] = point;
    }

    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        let [p0, p1] = self.endpoints;
        calculator.calculate_from_corners(p0.x(), p0.y(), p1.x(), p1.y(), self.line_style.width)
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        let [p0, p1] = self.endpoints;
        renderer.set_color(self.color);
        renderer.set_line_style(&self.line_style);
        renderer.render_absolute_move_to(p0.x(), p0.y());
        renderer.render_absolute_line_to(p1.x(), p1.y());
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, &mut self.endpoints);
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        self.endpoints[0] != self.endpoints[1]
    }
}

impl Default for GraphicLine {
    fn default() -> Self {
        Self {
            endpoints: [Point2::default(); 2],
            line_style: LineStyle::default(),
            color: DEFAULT_GRAPHIC_COLOR,
        }
    }
}

/// 引脚类型，决定绘制线宽。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    #[default]
    Net,
    Bus,
}

impl PinType {
    pub fn code(self) -> i32 {
        match self {
            PinType::Net => 0,
            PinType::Bus => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PinType::Net),
            1 => Some(PinType::Bus),
            _ => None,
        }
    }

    #[inline]
    pub fn line_width(self) -> i32 {
        match self {
            PinType::Net => 10,
            PinType::Bus => 30,
        }
    }
}

/// 可连接的引脚端点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinEnd {
    #[default]
    First,
    Second,
}

impl PinEnd {
    pub fn code(self) -> i32 {
        match self {
            PinEnd::First => 0,
            PinEnd::Second => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PinEnd::First),
            1 => Some(PinEnd::Second),
            _ => None,
        }
    }
}

/// 引脚图元：带连接端的线段，线宽由类型决定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicPin {
    pub endpoints: [Point2; 2],
    pub pin_type: PinType,
    pub active_end: PinEnd,
    pub color: i32,
}

impl GraphicPin {
    pub fn new(endpoint0: Point2, endpoint1: Point2) -> Self {
        Self {
            endpoints: [endpoint0, endpoint1],
            ..Self::default()
        }
    }

    /// 可连接端的坐标。
    #[inline]
    pub fn active_point(&self) -> Point2 {
        match self.active_end {
            PinEnd::First => self.endpoints[0],
            PinEnd::Second => self.endpoints[1],
        }
    }

    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        let [p0, p1] = self.endpoints;
        calculator.calculate_from_corners(
            p0.x(),
            p0.y(),
            p1.x(),
            p1.y(),
            self.pin_type.line_width(),
        )
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        let [p0, p1] = self.endpoints;
        let style = LineStyle {
            width: self.pin_type.line_width(),
            ..LineStyle::default()
        };
        renderer.set_color(self.color);
        renderer.set_line_style(&style);
        renderer.render_absolute_move_to(p0.x(), p0.y());
        renderer.render_absolute_line_to(p1.x(), p1.y());
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, &mut self.endpoints);
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        self.endpoints[0] != self.endpoints[1]
    }
}

impl Default for GraphicPin {
    fn default() -> Self {
        Self {
            endpoints: [Point2::default(); 2],
            pin_type: PinType::Net,
            active_end: PinEnd::First,
            color: DEFAULT_PIN_COLOR,
        }
    }
}

/// 矩形框图元，由两个对角点定义，角点不要求归一化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicBox {
    pub corners: [Point2; 2],
    pub line_style: LineStyle,
    pub fill_style: FillStyle,
    pub color: i32,
}

impl GraphicBox {
    pub fn new(corner0: Point2, corner1: Point2) -> Self {
        Self {
            corners: [corner0, corner1],
            ..Self::default()
        }
    }

    #[inline]
    pub fn corner0(&self) -> Point2 {
        self.corners[0]
    }

    #[inline]
    pub fn corner1(&self) -> Point2 {
        self.corners[1]
    }

    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        let [c0, c1] = self.corners;
        calculator.calculate_from_corners(c0.x(), c0.y(), c1.x(), c1.y(), self.line_style.width)
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        let [c0, c1] = self.corners;
        renderer.set_color(self.color);
        renderer.set_line_style(&self.line_style);
        renderer.set_fill_style(&self.fill_style);
        renderer.render_absolute_move_to(c0.x(), c0.y());
        renderer.render_absolute_line_to(c1.x(), c0.y());
        renderer.render_absolute_line_to(c1.x(), c1.y());
        renderer.render_absolute_line_to(c0.x(), c1.y());
        renderer.close_path();
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, &mut self.corners);
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        let [c0, c1] = self.corners;
        c0.x() != c1.x() && c0.y() != c1.y()
    }
}

impl Default for GraphicBox {
    fn default() -> Self {
        Self {
            corners: [Point2::default(); 2],
            line_style: LineStyle::default(),
            fill_style: FillStyle::default(),
            color: DEFAULT_GRAPHIC_COLOR,
        }
    }
}

/// 圆图元。半径恒为非负。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicCircle {
    pub center: Point2,
    radius: i32,
    pub line_style: LineStyle,
    pub fill_style: FillStyle,
    pub color: i32,
}

impl GraphicCircle {
    pub fn new(center: Point2, radius: i32) -> Self {
        let mut circle = Self {
            center,
            ..Self::default()
        };
        circle.set_radius(radius);
        circle
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// 负半径属于调用方违约，仅在调试构建中断言。
    #[inline]
    pub fn set_radius(&mut self, radius: i32) {
        debug_assert!(radius >= 0, "circle radius must be non-negative");
        self.radius = radius.max(0);
    }

    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        calculator.calculate_from_corners(
            self.center.x().saturating_sub(self.radius),
            self.center.y().saturating_sub(self.radius),
            self.center.x().saturating_add(self.radius),
            self.center.y().saturating_add(self.radius),
            self.line_style.width,
        )
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        renderer.set_color(self.color);
        renderer.set_line_style(&self.line_style);
        renderer.set_fill_style(&self.fill_style);
        renderer.render_arc(self.center.x(), self.center.y(), self.radius, 0, 360);
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, std::slice::from_mut(&mut self.center));
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        self.radius > 0
    }
}

impl Default for GraphicCircle {
    fn default() -> Self {
        Self {
            center: Point2::default(),
            radius: 0,
            line_style: LineStyle::default(),
            fill_style: FillStyle::default(),
            color: DEFAULT_GRAPHIC_COLOR,
        }
    }
}

/// 圆弧图元，角度单位为度，逆时针为正。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicArc {
    pub center: Point2,
    radius: i32,
    pub start_angle: i32,
    pub sweep_angle: i32,
    pub line_style: LineStyle,
    pub color: i32,
}

impl GraphicArc {
    pub fn new(center: Point2, radius: i32, start_angle: i32, sweep_angle: i32) -> Self {
        let mut arc = Self {
            center,
            start_angle,
            sweep_angle,
            ..Self::default()
        };
        arc.set_radius(radius);
        arc
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn set_radius(&mut self, radius: i32) {
        debug_assert!(radius >= 0, "arc radius must be non-negative");
        self.radius = radius.max(0);
    }

    /// 与整圆相同的外接正方形范围。
    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        calculator.calculate_from_corners(
            self.center.x().saturating_sub(self.radius),
            self.center.y().saturating_sub(self.radius),
            self.center.x().saturating_add(self.radius),
            self.center.y().saturating_add(self.radius),
            self.line_style.width,
        )
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        renderer.set_color(self.color);
        renderer.set_line_style(&self.line_style);
        renderer.render_arc(
            self.center.x(),
            self.center.y(),
            self.radius,
            self.start_angle,
            self.sweep_angle,
        );
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, std::slice::from_mut(&mut self.center));
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        self.radius > 0 && self.sweep_angle != 0
    }
}

impl Default for GraphicArc {
    fn default() -> Self {
        Self {
            center: Point2::default(),
            radius: 0,
            start_angle: 0,
            sweep_angle: 90,
            line_style: LineStyle::default(),
            color: DEFAULT_GRAPHIC_COLOR,
        }
    }
}

/// 多段路径图元。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicPath {
    pub commands: Vec<PathCommand>,
    pub line_style: LineStyle,
    pub fill_style: FillStyle,
    pub color: i32,
}

impl GraphicPath {
    pub fn new(commands: impl IntoIterator<Item = PathCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::ClosePath))
    }

    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        let extent = path_extent(&self.commands);
        if extent.is_empty() {
            return extent;
        }
        calculator.calculate_from_corners(
            extent.min_x(),
            extent.min_y(),
            extent.max_x(),
            extent.max_y(),
            self.line_style.width,
        )
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        renderer.set_color(self.color);
        renderer.set_line_style(&self.line_style);
        renderer.set_fill_style(&self.fill_style);
        for command in &self.commands {
            command.render(renderer);
        }
    }

    /// 只平移绝对命令；相对命令是位移量，与原点无关。
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for command in &mut self.commands {
            command.translate(dx, dy);
        }
    }

    pub fn rotate(&mut self, center: Point2, angle: i32) {
        for command in &mut self.commands {
            command.rotate(center, angle);
        }
    }

    /// 至少有一段画线命令真正移动了当前点。
    pub fn is_significant(&self) -> bool {
        let mut cursor = PathCursor::new();
        self.commands.iter().any(|command| {
            let before = cursor.current();
            let after = cursor.advance(command);
            !matches!(
                command,
                PathCommand::AbsoluteMoveTo { .. } | PathCommand::RelativeMoveTo { .. }
            ) && before != after
        })
    }
}

impl Default for GraphicPath {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            line_style: LineStyle::default(),
            fill_style: FillStyle::default(),
            color: DEFAULT_GRAPHIC_COLOR,
        }
    }
}

/// 属性文本显示方式：显示名称与值、仅值或仅名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowNameValue {
    #[default]
    NameValue,
    Value,
    Name,
}

impl ShowNameValue {
    pub fn code(self) -> i32 {
        match self {
            ShowNameValue::NameValue => 0,
            ShowNameValue::Value => 1,
            ShowNameValue::Name => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ShowNameValue::NameValue),
            1 => Some(ShowNameValue::Value),
            2 => Some(ShowNameValue::Name),
            _ => None,
        }
    }
}

/// 文本图元。多行内容以 `\n` 连接保存，渲染时逐行调用 `render_text`，
/// 行间排版由渲染端按字号决定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicText {
    pub insert: Point2,
    pub color: i32,
    pub size: i32,
    pub visible: bool,
    pub show: ShowNameValue,
    pub angle: i32,
    pub alignment: i32,
    pub text: String,
}

impl GraphicText {
    pub fn new(insert: Point2, text: impl Into<String>) -> Self {
        Self {
            insert,
            text: text.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// 文本范围依赖字体度量，这里退化为插入点。
    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Bounds {
        calculator.calculate_from_corners(
            self.insert.x(),
            self.insert.y(),
            self.insert.x(),
            self.insert.y(),
            0,
        )
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        if !self.visible {
            return;
        }
        renderer.set_color(self.color);
        for line in self.text.split('\n') {
            renderer.render_text(self.insert.x(), self.insert.y(), line);
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        geometry::translate(dx, dy, std::slice::from_mut(&mut self.insert));
    }

    #[inline]
    pub fn is_significant(&self) -> bool {
        !self.text.is_empty()
    }
}

impl Default for GraphicText {
    fn default() -> Self {
        Self {
            insert: Point2::default(),
            color: DEFAULT_TEXT_COLOR,
            size: DEFAULT_TEXT_SIZE,
            visible: true,
            show: ShowNameValue::NameValue,
            angle: 0,
            alignment: 0,
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CornerBoundsCalculator, RecordingRenderer, RenderOp};
    use crate::style::{CapType, DashType, FillType};

    fn sample_items() -> Vec<GraphicItem> {
        let mut line = GraphicLine::new(Point2::new(0, 0), Point2::new(100, 0));
        line.line_style = LineStyle {
            width: 10,
            cap_type: CapType::Round,
            dash_type: DashType::Dashed,
            dash_length: 75,
            dash_space: 25,
        };
        let mut rect = GraphicBox::new(Point2::new(-10, -20), Point2::new(300, 400));
        rect.fill_style.fill_type = FillType::Hatch;
        rect.fill_style.angle1 = 45;
        rect.fill_style.pitch1 = 100;
        let circle = GraphicCircle::new(Point2::new(500, 500), 75);
        let arc = GraphicArc::new(Point2::new(-200, 50), 40, 30, 270);
        let path = GraphicPath::new([
            PathCommand::absolute_move_to(0, 0),
            PathCommand::absolute_line_to(100, 0),
            PathCommand::relative_line_to(0, 100),
            PathCommand::ClosePath,
        ]);
        let mut pin = GraphicPin::new(Point2::new(0, 200), Point2::new(300, 200));
        pin.active_end = PinEnd::Second;
        let text = GraphicText::new(Point2::new(40, 40), "refdes=R1\nvalue=10k");
        vec![
            line.into(),
            rect.into(),
            circle.into(),
            arc.into(),
            path.into(),
            pin.into(),
            text.into(),
        ]
    }

    #[test]
    fn line_bounds_pad_by_half_width() {
        let mut line = GraphicLine::new(Point2::new(0, 0), Point2::new(100, 0));
        line.line_style.width = 4;
        let bounds = GraphicItem::from(line).calculate_bounds(&CornerBoundsCalculator);
        assert_eq!(bounds, Bounds::new(-2, -2, 102, 2));
    }

    #[test]
    fn circle_and_arc_bounds_use_radius() {
        let mut circle = GraphicCircle::new(Point2::new(10, 10), 30);
        circle.line_style.width = 2;
        assert_eq!(
            circle.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(-21, -21, 41, 41)
        );
        let arc = GraphicArc::new(Point2::new(0, 0), 5, 0, 90);
        assert_eq!(
            arc.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(-5, -5, 5, 5)
        );
    }

    #[test]
    fn radius_bounds_saturate_near_coordinate_limits() {
        let circle = GraphicCircle::new(Point2::new(i32::MAX - 47, 0), 100);
        assert_eq!(
            circle.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(i32::MAX - 147, -100, i32::MAX, 100)
        );
        let arc = GraphicArc::new(Point2::new(0, i32::MIN + 10), 100, 0, 90);
        assert_eq!(
            arc.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(-100, i32::MIN, 100, i32::MIN + 110)
        );
    }

    #[test]
    fn pin_width_follows_pin_type() {
        let mut pin = GraphicPin::new(Point2::new(0, 0), Point2::new(200, 0));
        assert_eq!(
            pin.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(-5, -5, 205, 5)
        );
        pin.pin_type = PinType::Bus;
        assert_eq!(
            pin.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(-15, -15, 215, 15)
        );
        assert_eq!(pin.active_point(), Point2::new(0, 0));
        pin.active_end = PinEnd::Second;
        assert_eq!(pin.active_point(), Point2::new(200, 0));

        let mut renderer = RecordingRenderer::new();
        GraphicItem::from(pin).render(&mut renderer);
        assert_eq!(
            renderer.take(),
            vec![
                RenderOp::Color(DEFAULT_PIN_COLOR),
                RenderOp::LineStyle(LineStyle {
                    width: 30,
                    ..LineStyle::default()
                }),
                RenderOp::AbsoluteMoveTo(0, 0),
                RenderOp::AbsoluteLineTo(200, 0),
            ]
        );
    }

    #[test]
    fn path_bounds_follow_relative_commands() {
        let mut path = GraphicPath::new([
            PathCommand::absolute_move_to(10, 10),
            PathCommand::relative_line_to(50, 0),
            PathCommand::relative_line_to(0, -30),
        ]);
        path.line_style.width = 2;
        assert_eq!(
            path.calculate_bounds(&CornerBoundsCalculator),
            Bounds::new(9, -21, 61, 11)
        );
        assert!(
            GraphicPath::default()
                .calculate_bounds(&CornerBoundsCalculator)
                .is_empty()
        );
    }

    #[test]
    fn bounds_are_idempotent() {
        for item in sample_items() {
            let first = item.calculate_bounds(&CornerBoundsCalculator);
            let second = item.calculate_bounds(&CornerBoundsCalculator);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn translate_round_trip_restores_items() {
        for offsets in [(0, 0), (13, -7), (-1000, 1000), (i32::MAX, i32::MIN)] {
            for original in sample_items() {
                let mut item = original.clone();
                item.translate(offsets.0, offsets.1);
                item.translate(offsets.0.wrapping_neg(), offsets.1.wrapping_neg());
                assert_eq!(item, original, "offset {offsets:?}");
            }
        }
    }

    #[test]
    fn clone_is_deep() {
        for original in sample_items() {
            let mut copy = original.clone();
            copy.translate(1, 1);
            copy.set_color(12);
            if let Some(style) = copy.line_style_mut() {
                style.width += 1;
            }
            if let Some(style) = copy.fill_style_mut() {
                style.fill_type = FillType::Mesh;
            }
            assert_ne!(copy, original);
            assert_ne!(copy.color(), original.color());
        }
    }

    #[test]
    fn translate_only_moves_defining_points() {
        let mut path = GraphicPath::new([
            PathCommand::absolute_move_to(0, 0),
            PathCommand::relative_line_to(10, 10),
        ]);
        path.translate(5, 5);
        assert_eq!(path.commands[0], PathCommand::absolute_move_to(5, 5));
        assert_eq!(path.commands[1], PathCommand::relative_line_to(10, 10));

        let mut arc = GraphicArc::new(Point2::new(1, 1), 9, 45, 90);
        arc.translate(10, 0);
        assert_eq!(arc.center, Point2::new(11, 1));
        assert_eq!(arc.radius(), 9);
        assert_eq!(arc.start_angle, 45);
    }

    #[test]
    fn render_pushes_style_before_geometry() {
        let mut renderer = RecordingRenderer::new();
        let rect = GraphicBox::new(Point2::new(0, 0), Point2::new(10, 20));
        GraphicItem::from(rect.clone()).render(&mut renderer);
        assert_eq!(
            renderer.take(),
            vec![
                RenderOp::Color(DEFAULT_GRAPHIC_COLOR),
                RenderOp::LineStyle(rect.line_style),
                RenderOp::FillStyle(rect.fill_style),
                RenderOp::AbsoluteMoveTo(0, 0),
                RenderOp::AbsoluteLineTo(10, 0),
                RenderOp::AbsoluteLineTo(10, 20),
                RenderOp::AbsoluteLineTo(0, 20),
                RenderOp::ClosePath,
            ]
        );

        GraphicItem::from(GraphicCircle::new(Point2::new(3, 4), 5)).render(&mut renderer);
        assert_eq!(
            renderer.ops().last(),
            Some(&RenderOp::Arc {
                x: 3,
                y: 4,
                radius: 5,
                start: 0,
                sweep: 360,
            })
        );
    }

    #[test]
    fn path_render_closes_when_closed() {
        let path = GraphicPath::new([
            PathCommand::absolute_move_to(0, 0),
            PathCommand::relative_line_to(10, 0),
            PathCommand::ClosePath,
        ]);
        assert!(path.is_closed());
        let mut renderer = RecordingRenderer::new();
        path.render(&mut renderer);
        assert_eq!(renderer.ops().last(), Some(&RenderOp::ClosePath));
        assert_eq!(renderer.drawing_op_count(), 3);
    }

    #[test]
    fn multi_line_text_renders_each_line() {
        let text = GraphicText::new(Point2::new(40, 40), "refdes=R1\nvalue=10k");
        let mut renderer = RecordingRenderer::new();
        text.render(&mut renderer);
        assert_eq!(
            renderer.take(),
            vec![
                RenderOp::Color(DEFAULT_TEXT_COLOR),
                RenderOp::Text {
                    x: 40,
                    y: 40,
                    text: "refdes=R1".to_string(),
                },
                RenderOp::Text {
                    x: 40,
                    y: 40,
                    text: "value=10k".to_string(),
                },
            ]
        );
    }

    #[test]
    fn hidden_text_is_not_rendered() {
        let mut text = GraphicText::new(Point2::new(0, 0), "pinlabel=A");
        text.visible = false;
        let mut renderer = RecordingRenderer::new();
        text.render(&mut renderer);
        assert!(renderer.ops().is_empty());
    }

    #[test]
    fn significance_rejects_degenerate_shapes() {
        assert!(!GraphicLine::new(Point2::new(5, 5), Point2::new(5, 5)).is_significant());
        assert!(GraphicLine::new(Point2::new(5, 5), Point2::new(5, 6)).is_significant());
        assert!(!GraphicBox::new(Point2::new(0, 0), Point2::new(10, 0)).is_significant());
        assert!(!GraphicCircle::new(Point2::new(0, 0), 0).is_significant());
        assert!(!GraphicArc::new(Point2::new(0, 0), 10, 0, 0).is_significant());
        assert!(!GraphicPin::new(Point2::new(7, 7), Point2::new(7, 7)).is_significant());
        assert!(
            !GraphicPath::new([
                PathCommand::absolute_move_to(0, 0),
                PathCommand::relative_move_to(10, 10),
                PathCommand::relative_line_to(0, 0),
            ])
            .is_significant()
        );
        assert!(
            GraphicPath::new([
                PathCommand::absolute_move_to(0, 0),
                PathCommand::absolute_line_to(0, 10),
            ])
            .is_significant()
        );
        assert!(!GraphicText::default().is_significant());
    }

    #[test]
    fn every_shape_owns_its_style() {
        for item in sample_items() {
            match item.kind() {
                ItemKind::Pin | ItemKind::Text => assert!(item.line_style().is_none()),
                _ => assert!(item.line_style().is_some()),
            }
            let has_fill = matches!(item.kind(), ItemKind::Box | ItemKind::Circle | ItemKind::Path);
            assert_eq!(item.fill_style().is_some(), has_fill, "{}", item.kind().name());
        }
    }
}
