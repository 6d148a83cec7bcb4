pub mod item;
pub mod path;
pub mod render;
pub mod schematic;

pub mod geometry {
    use glam::IVec2;
    use serde::{Deserialize, Serialize};

    /// 栅格坐标点，内部以 `glam::IVec2` 表示，所有运算均为精确整数运算。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Point2(pub IVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: i32, y: i32) -> Self {
            Self(IVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> i32 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> i32 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0.wrapping_add(offset.0))
        }

        #[inline]
        pub fn vector_to(self, other: Point2) -> Vector2 {
            Vector2(other.0.wrapping_sub(self.0))
        }

        /// 绕 `center` 旋转 `angle` 度。
        #[inline]
        pub fn rotate(self, center: Point2, angle: i32) -> Self {
            rotate(center, angle, self)
        }

        #[inline]
        pub fn as_ivec2(self) -> IVec2 {
            self.0
        }
    }

    impl From<IVec2> for Point2 {
        fn from(value: IVec2) -> Self {
            Self(value)
        }
    }

    /// 二维方向向量，用于相对路径命令与平移量。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Vector2(pub IVec2);

    impl Vector2 {
        #[inline]
        pub fn new(dx: i32, dy: i32) -> Self {
            Self(IVec2::new(dx, dy))
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            start.vector_to(end)
        }

        #[inline]
        pub fn x(self) -> i32 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> i32 {
            self.0.y
        }

        #[inline]
        pub fn is_zero(self) -> bool {
            self.0 == IVec2::ZERO
        }

        /// 向量总是绕原点旋转，与其所在位置无关。
        #[inline]
        pub fn rotate(self, angle: i32) -> Self {
            Self(rotate(Point2::default(), angle, Point2(self.0)).0)
        }

        /// 平方长度，使用 i64 避免溢出。
        #[inline]
        pub fn length_squared(self) -> i64 {
            let x = i64::from(self.0.x);
            let y = i64::from(self.0.y);
            x * x + y * y
        }
    }

    impl From<IVec2> for Vector2 {
        fn from(value: IVec2) -> Self {
            Self(value)
        }
    }

    /// 将角度归一化到 `[0, 360)`。
    #[inline]
    pub fn normalize_angle(angle: i32) -> i32 {
        angle.rem_euclid(360)
    }

    /// 绕 `center` 旋转点 `point`（逆时针，单位：度）。
    ///
    /// 只做直角旋转，全部为整数运算，四次 90 度旋转恒等；
    /// 非直角先取整到最近的直角（45 度向上取整）。
    pub fn rotate(center: Point2, angle: i32, point: Point2) -> Point2 {
        let offset = point.0.wrapping_sub(center.0);
        let rotated = match quarter_turns(angle) {
            0 => offset,
            1 => IVec2::new(offset.y.wrapping_neg(), offset.x),
            2 => IVec2::ZERO.wrapping_sub(offset),
            _ => IVec2::new(offset.y, offset.x.wrapping_neg()),
        };
        Point2(center.0.wrapping_add(rotated))
    }

    /// 角度对应的逆时针直角次数，取值 `0..4`。
    #[inline]
    pub fn quarter_turns(angle: i32) -> i32 {
        ((normalize_angle(angle) + 45) / 90) % 4
    }

    /// 原地平移一组点。平移使用环绕加法，因此 `(dx, dy)` 与 `(-dx, -dy)` 严格互逆。
    pub fn translate(dx: i32, dy: i32, points: &mut [Point2]) {
        let offset = IVec2::new(dx, dy);
        for point in points {
            point.0 = point.0.wrapping_add(offset);
        }
    }

    /// 计算线宽一半（向上取整），作为包围盒的描边余量。
    #[inline]
    pub fn half_width(line_width: i32) -> i32 {
        (line_width.max(0) + 1) / 2
    }

    /// 轴对齐整数包围盒。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Bounds {
        min: Point2,
        max: Point2,
    }

    impl Bounds {
        #[inline]
        pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
            Self {
                min: Point2::new(min_x, min_y),
                max: Point2::new(max_x, max_y),
            }
        }

        /// 由任意两个对角点构造，自动归一化。
        pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
            Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
        }

        #[inline]
        pub fn empty() -> Self {
            Self::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN)
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min_x(&self) -> i32 {
            self.min.x()
        }

        #[inline]
        pub fn min_y(&self) -> i32 {
            self.min.y()
        }

        #[inline]
        pub fn max_x(&self) -> i32 {
            self.max.x()
        }

        #[inline]
        pub fn max_y(&self) -> i32 {
            self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> i32 {
            if self.is_empty() {
                0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn height(&self) -> i32 {
            if self.is_empty() {
                0
            } else {
                self.max.y() - self.min.y()
            }
        }

        /// 四周各扩展 `amount`，空包围盒保持为空。
        pub fn expand(self, amount: i32) -> Self {
            if self.is_empty() {
                return self;
            }
            Self::new(
                self.min.x().saturating_sub(amount),
                self.min.y().saturating_sub(amount),
                self.max.x().saturating_add(amount),
                self.max.y().saturating_add(amount),
            )
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point2(self.min.0.min(point.0));
            self.max = Point2(self.max.0.max(point.0));
        }

        pub fn include_bounds(&mut self, other: &Bounds) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        pub fn union(mut self, other: &Bounds) -> Self {
            self.include_bounds(other);
            self
        }

        #[inline]
        pub fn contains(&self, point: Point2) -> bool {
            !self.is_empty()
                && point.x() >= self.min.x()
                && point.x() <= self.max.x()
                && point.y() >= self.min.y()
                && point.y() <= self.max.y()
        }

        pub fn intersects(&self, other: &Bounds) -> bool {
            !self.is_empty()
                && !other.is_empty()
                && self.min.x() <= other.max.x()
                && other.min.x() <= self.max.x()
                && self.min.y() <= other.max.y()
                && other.min.y() <= self.max.y()
        }

        /// 中心点（整除向负无穷取整）。
        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let x = (i64::from(self.min.x()) + i64::from(self.max.x())).div_euclid(2);
            let y = (i64::from(self.min.y()) + i64::from(self.max.y())).div_euclid(2);
            Point2::new(x as i32, y as i32)
        }
    }

    impl Default for Bounds {
        fn default() -> Self {
            Self::empty()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn right_angle_rotation_is_exact() {
            let center = Point2::new(100, 100);
            let point = Point2::new(150, 120);
            assert_eq!(rotate(center, 90, point), Point2::new(80, 150));
            assert_eq!(rotate(center, 180, point), Point2::new(50, 80));
            assert_eq!(rotate(center, 270, point), Point2::new(120, 50));
            assert_eq!(rotate(center, -90, point), Point2::new(120, 50));
            assert_eq!(rotate(center, 360, point), point);
        }

        #[test]
        fn four_quarter_turns_are_identity() {
            let center = Point2::new(-37, 1200);
            for point in [
                Point2::new(0, 0),
                Point2::new(-500, 42),
                Point2::new(i32::MAX / 4, -7),
            ] {
                let mut rotated = point;
                for _ in 0..4 {
                    rotated = rotate(center, 90, rotated);
                }
                assert_eq!(rotated, point);
            }
        }

        #[test]
        fn other_angles_snap_to_nearest_right_angle() {
            let point = Point2::new(100, 0);
            assert_eq!(rotate(Point2::default(), 44, point), point);
            assert_eq!(rotate(Point2::default(), 45, point), Point2::new(0, 100));
            assert_eq!(rotate(Point2::default(), 100, point), Point2::new(0, 100));
            assert_eq!(rotate(Point2::default(), -30, point), point);
            assert_eq!(rotate(Point2::default(), 330, point), point);
            assert_eq!(rotate(Point2::default(), 315, point), point);
            assert_eq!(rotate(Point2::default(), 314, point), Point2::new(0, -100));
        }

        #[test]
        fn translate_is_invertible() {
            let original = [Point2::new(1, 2), Point2::new(-300, 400), Point2::new(i32::MAX, 0)];
            let mut points = original;
            translate(25, -17, &mut points);
            assert_eq!(points[0], Point2::new(26, -15));
            translate(-25, 17, &mut points);
            assert_eq!(points, original);
        }

        #[test]
        fn vector_rotation_ignores_position() {
            let vector = Vector2::new(10, 0);
            assert_eq!(vector.rotate(90), Vector2::new(0, 10));
            assert_eq!(vector.rotate(180), Vector2::new(-10, 0));
        }

        #[test]
        fn bounds_from_corners_normalizes_and_expands() {
            let bounds = Bounds::from_corners(100, 0, 0, 50).expand(half_width(4));
            assert_eq!(bounds, Bounds::new(-2, -2, 102, 52));
            assert_eq!(half_width(3), 2);
            assert_eq!(half_width(0), 0);
            assert!(Bounds::empty().expand(10).is_empty());
        }

        #[test]
        fn bounds_union_skips_empty() {
            let mut bounds = Bounds::empty();
            bounds.include_bounds(&Bounds::empty());
            assert!(bounds.is_empty());
            bounds.include_bounds(&Bounds::new(0, 0, 10, 10));
            bounds.include_point(Point2::new(-5, 20));
            assert_eq!(bounds, Bounds::new(-5, 0, 10, 20));
            assert_eq!(bounds.center(), Point2::new(2, 10));
            assert!(bounds.contains(Point2::new(10, 20)));
            assert!(bounds.intersects(&Bounds::new(10, 20, 30, 30)));
            assert!(!bounds.intersects(&Bounds::new(11, 0, 30, 30)));
        }
    }
}

pub mod style {
    use serde::{Deserialize, Serialize};

    /// 线端样式，数值与旧版文件格式中的编码一致。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CapType {
        #[default]
        None,
        Square,
        Round,
    }

    impl CapType {
        pub fn code(self) -> i32 {
            match self {
                CapType::None => 0,
                CapType::Square => 1,
                CapType::Round => 2,
            }
        }

        pub fn from_code(code: i32) -> Option<Self> {
            match code {
                0 => Some(CapType::None),
                1 => Some(CapType::Square),
                2 => Some(CapType::Round),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DashType {
        #[default]
        Solid,
        Dotted,
        Dashed,
        Center,
        Phantom,
    }

    impl DashType {
        pub fn code(self) -> i32 {
            match self {
                DashType::Solid => 0,
                DashType::Dotted => 1,
                DashType::Dashed => 2,
                DashType::Center => 3,
                DashType::Phantom => 4,
            }
        }

        pub fn from_code(code: i32) -> Option<Self> {
            match code {
                0 => Some(DashType::Solid),
                1 => Some(DashType::Dotted),
                2 => Some(DashType::Dashed),
                3 => Some(DashType::Center),
                4 => Some(DashType::Phantom),
                _ => None,
            }
        }

        /// 实线与点线不使用虚线长度参数。
        pub fn uses_length(self) -> bool {
            matches!(self, DashType::Dashed | DashType::Center | DashType::Phantom)
        }

        pub fn uses_space(self) -> bool {
            !matches!(self, DashType::Solid)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FillType {
        #[default]
        Hollow,
        Fill,
        Mesh,
        Hatch,
        Void,
    }

    impl FillType {
        pub fn code(self) -> i32 {
            match self {
                FillType::Hollow => 0,
                FillType::Fill => 1,
                FillType::Mesh => 2,
                FillType::Hatch => 3,
                FillType::Void => 4,
            }
        }

        pub fn from_code(code: i32) -> Option<Self> {
            match code {
                0 => Some(FillType::Hollow),
                1 => Some(FillType::Fill),
                2 => Some(FillType::Mesh),
                3 => Some(FillType::Hatch),
                4 => Some(FillType::Void),
                _ => None,
            }
        }

        /// 网格填充使用两组角度/间距，阴影线只用第一组。
        pub fn uses_second_hatch(self) -> bool {
            matches!(self, FillType::Mesh)
        }

        pub fn uses_first_hatch(self) -> bool {
            matches!(self, FillType::Mesh | FillType::Hatch)
        }
    }

    /// 线型。每个图元独占一份，按值持有。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LineStyle {
        pub width: i32,
        pub cap_type: CapType,
        pub dash_type: DashType,
        pub dash_length: i32,
        pub dash_space: i32,
    }

    impl LineStyle {
        #[inline]
        pub fn with_width(width: i32) -> Self {
            Self {
                width,
                ..Self::default()
            }
        }

        #[inline]
        pub fn half_width(&self) -> i32 {
            crate::geometry::half_width(self.width)
        }
    }

    impl Default for LineStyle {
        fn default() -> Self {
            Self {
                width: 0,
                cap_type: CapType::None,
                dash_type: DashType::Solid,
                dash_length: -1,
                dash_space: -1,
            }
        }
    }

    /// 填充样式：填充类型与阴影线参数。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FillStyle {
        pub fill_type: FillType,
        pub width: i32,
        pub angle1: i32,
        pub pitch1: i32,
        pub angle2: i32,
        pub pitch2: i32,
    }

    impl FillStyle {
        pub fn solid() -> Self {
            Self {
                fill_type: FillType::Fill,
                ..Self::default()
            }
        }

        #[inline]
        pub fn is_filled(&self) -> bool {
            !matches!(self.fill_type, FillType::Hollow | FillType::Void)
        }
    }

    impl Default for FillStyle {
        fn default() -> Self {
            Self {
                fill_type: FillType::Hollow,
                width: -1,
                angle1: -1,
                pitch1: -1,
                angle2: -1,
                pitch2: -1,
            }
        }
    }

}
