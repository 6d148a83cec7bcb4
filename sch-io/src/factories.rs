//! 各图形记录的解析工厂。字段顺序与写出端保持一致。

use sch_core::geometry::{Point2, Vector2};
use sch_core::item::{
    GraphicArc, GraphicBox, GraphicCircle, GraphicItem, GraphicLine, GraphicPath, GraphicPin,
    GraphicText, PinEnd, PinType, ShowNameValue,
};

use crate::ParseError;
use crate::path_data;
use crate::reader::{Record, RecordReader, parse_i32};
use crate::registry::ItemFactory;

#[derive(Debug, Default, Clone, Copy)]
pub struct LineFactory;

impl LineFactory {
    pub const TOKEN: &'static str = "L";
}

impl ItemFactory for LineFactory {
    fn create(
        &self,
        record: &Record<'_>,
        _reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let mut cursor = record.cursor();
        let endpoint0 = Point2::new(cursor.next_i32("x1")?, cursor.next_i32("y1")?);
        let endpoint1 = Point2::new(cursor.next_i32("x2")?, cursor.next_i32("y2")?);
        let mut line = GraphicLine::new(endpoint0, endpoint1);
        line.color = cursor.next_i32("color")?;
        line.line_style = cursor.optional_line_style(0)?;
        cursor.finish()?;
        Ok(line.into())
    }
}

/// `B x y width height ...`：宽高可为负，第二个角点按原样还原。
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxFactory;

impl BoxFactory {
    pub const TOKEN: &'static str = "B";
}

impl ItemFactory for BoxFactory {
    fn create(
        &self,
        record: &Record<'_>,
        _reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let mut cursor = record.cursor();
        let corner0 = Point2::new(cursor.next_i32("x")?, cursor.next_i32("y")?);
        let size = Vector2::new(cursor.next_i32("width")?, cursor.next_i32("height")?);
        let mut rect = GraphicBox::new(corner0, corner0.translate(size));
        rect.color = cursor.next_i32("color")?;
        rect.line_style = cursor.optional_line_style(0)?;
        rect.fill_style = cursor.optional_fill_style(0)?;
        cursor.finish()?;
        Ok(rect.into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CircleFactory;

impl CircleFactory {
    pub const TOKEN: &'static str = "V";
}

impl ItemFactory for CircleFactory {
    fn create(
        &self,
        record: &Record<'_>,
        _reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let mut cursor = record.cursor();
        let center = Point2::new(cursor.next_i32("x")?, cursor.next_i32("y")?);
        let radius = cursor.next_non_negative("radius")?;
        let mut circle = GraphicCircle::new(center, radius);
        circle.color = cursor.next_i32("color")?;
        circle.line_style = cursor.optional_line_style(0)?;
        circle.fill_style = cursor.optional_fill_style(0)?;
        cursor.finish()?;
        Ok(circle.into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ArcFactory;

impl ArcFactory {
    pub const TOKEN: &'static str = "A";
}

impl ItemFactory for ArcFactory {
    fn create(
        &self,
        record: &Record<'_>,
        _reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let mut cursor = record.cursor();
        let center = Point2::new(cursor.next_i32("x")?, cursor.next_i32("y")?);
        let radius = cursor.next_non_negative("radius")?;
        let start_angle = cursor.next_i32("start angle")?;
        let sweep_angle = cursor.next_i32("sweep angle")?;
        let mut arc = GraphicArc::new(center, radius, start_angle, sweep_angle);
        arc.color = cursor.next_i32("color")?;
        arc.line_style = cursor.optional_line_style(0)?;
        cursor.finish()?;
        Ok(arc.into())
    }
}

/// `P x1 y1 x2 y2 color pintype whichend`
#[derive(Debug, Default, Clone, Copy)]
pub struct PinFactory;

impl PinFactory {
    pub const TOKEN: &'static str = "P";
}

impl ItemFactory for PinFactory {
    fn create(
        &self,
        record: &Record<'_>,
        _reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let mut cursor = record.cursor();
        let endpoint0 = Point2::new(cursor.next_i32("x1")?, cursor.next_i32("y1")?);
        let endpoint1 = Point2::new(cursor.next_i32("x2")?, cursor.next_i32("y2")?);
        let mut pin = GraphicPin::new(endpoint0, endpoint1);
        pin.color = cursor.next_i32("color")?;
        pin.pin_type = cursor.next_code("pintype", PinType::from_code)?;
        pin.active_end = cursor.next_code("whichend", PinEnd::from_code)?;
        cursor.finish()?;
        Ok(pin.into())
    }
}

/// `H color ... numlines`，随后 `numlines` 行路径数据。
#[derive(Debug, Default, Clone, Copy)]
pub struct PathFactory;

impl PathFactory {
    pub const TOKEN: &'static str = "H";
}

impl ItemFactory for PathFactory {
    fn create(
        &self,
        record: &Record<'_>,
        reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        // 先取走续行，首行字段出错时读取器仍停在下一条记录上
        let count = trailing_count(record, "numlines")?;
        let lines = reader.take_lines(record, count)?;

        let mut cursor = record.cursor();
        let mut path = GraphicPath::default();
        path.color = cursor.next_i32("color")?;
        path.line_style = cursor.optional_line_style(1)?;
        path.fill_style = cursor.optional_fill_style(1)?;
        cursor.next_count("numlines")?;
        cursor.finish()?;

        for (line, raw) in lines {
            path.commands.extend(path_data::parse_line(raw, line)?);
        }
        Ok(path.into())
    }
}

/// `T x y color size visibility show angle alignment num_lines`，随后 `num_lines` 行文本。
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFactory;

impl TextFactory {
    pub const TOKEN: &'static str = "T";
}

impl ItemFactory for TextFactory {
    fn create(
        &self,
        record: &Record<'_>,
        reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let count = trailing_count(record, "num_lines")?;
        let lines = reader.take_lines(record, count)?;

        let mut cursor = record.cursor();
        let insert = Point2::new(cursor.next_i32("x")?, cursor.next_i32("y")?);
        let mut text = GraphicText::new(insert, String::new());
        text.color = cursor.next_i32("color")?;
        text.size = cursor.next_i32("size")?;
        text.visible = cursor.next_bool("visibility")?;
        text.show = cursor.next_code("show_name_value", ShowNameValue::from_code)?;
        text.angle = cursor.next_i32("angle")?;
        text.alignment = cursor.next_i32("alignment")?;
        cursor.next_count("num_lines")?;
        cursor.finish()?;

        text.text = lines
            .into_iter()
            .map(|(_, raw)| raw)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text.into())
    }
}

fn trailing_count(record: &Record<'_>, field: &'static str) -> Result<usize, ParseError> {
    let raw = record.fields.last().ok_or_else(|| ParseError::MissingField {
        line: record.line,
        token: record.token.to_string(),
        field,
    })?;
    let count = parse_i32(raw, record.line, field)?;
    usize::try_from(count).map_err(|_| ParseError::MalformedField {
        line: record.line,
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sch_core::path::PathCommand;
    use sch_core::style::{CapType, DashType, FillType, LineStyle};

    fn parse_one(source: &str, factory: &dyn ItemFactory) -> Result<GraphicItem, ParseError> {
        let mut reader = RecordReader::new(source);
        let record = reader.next_record().expect("record");
        factory.create(&record, &mut reader)
    }

    #[test]
    fn line_without_style_uses_defaults() {
        let item = parse_one("L 0 0 100 0 3\n", &LineFactory).expect("line");
        let GraphicItem::Line(line) = item else {
            panic!("expected a line");
        };
        assert_eq!(line.endpoint1(), Point2::new(100, 0));
        assert_eq!(line.line_style, LineStyle::default());
    }

    #[test]
    fn box_with_negative_extent_keeps_corner_order() {
        let item = parse_one("B 100 100 -40 -60 3 10 2 1 -1 -1 3 5 45 100 135 100\n", &BoxFactory)
            .expect("box");
        let GraphicItem::Box(rect) = item else {
            panic!("expected a box");
        };
        assert_eq!(rect.corner0(), Point2::new(100, 100));
        assert_eq!(rect.corner1(), Point2::new(60, 40));
        assert_eq!(rect.line_style.cap_type, CapType::Round);
        assert_eq!(rect.line_style.dash_type, DashType::Dotted);
        assert_eq!(rect.fill_style.fill_type, FillType::Hatch);
        assert_eq!(rect.fill_style.pitch2, 100);
    }

    #[test]
    fn circle_rejects_negative_radius() {
        let err = parse_one("V 0 0 -5 3\n", &CircleFactory).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedField {
                field: "radius",
                ..
            }
        ));
    }

    #[test]
    fn pin_reads_type_and_active_end() {
        let item = parse_one("P 300 100 0 100 1 1 1\n", &PinFactory).expect("pin");
        let GraphicItem::Pin(pin) = item else {
            panic!("expected a pin");
        };
        assert_eq!(pin.pin_type, PinType::Bus);
        assert_eq!(pin.active_point(), Point2::new(0, 100));

        let err = parse_one("P 0 0 10 0 1 2 0\n", &PinFactory).unwrap_err();
        assert!(matches!(
            err,
            ParseError::BadCode {
                field: "pintype",
                code: 2,
                ..
            }
        ));
        let err = parse_one("P 0 0 10 0 1 0\n", &PinFactory).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                field: "whichend",
                ..
            }
        ));
    }

    #[test]
    fn path_reads_continuation_lines() {
        let source = "H 3 10 0 0 -1 -1 0 -1 -1 -1 -1 -1 4\nM 0,0\nL 100,0\nl 0,100\nz\nL 1 2 3 4 5\n";
        let mut reader = RecordReader::new(source);
        let record = reader.next_record().expect("record");
        let item = PathFactory.create(&record, &mut reader).expect("path");
        let GraphicItem::Path(path) = item else {
            panic!("expected a path");
        };
        assert_eq!(
            path.commands,
            vec![
                PathCommand::absolute_move_to(0, 0),
                PathCommand::absolute_line_to(100, 0),
                PathCommand::relative_line_to(0, 100),
                PathCommand::ClosePath,
            ]
        );
        assert_eq!(path.line_style.width, 10);
        assert_eq!(reader.next_record().map(|record| record.token), Some("L"));
    }

    #[test]
    fn path_header_error_still_consumes_body() {
        let source = "H 3 10 0 2\nM 0,0\nL 5,5\nL 1 2 3 4 5\n";
        let mut reader = RecordReader::new(source);
        let record = reader.next_record().expect("record");
        let err = PathFactory.create(&record, &mut reader).unwrap_err();
        assert!(matches!(err, ParseError::PartialBlock { .. }));
        assert_eq!(reader.next_record().map(|record| record.line), Some(4));
    }

    #[test]
    fn text_joins_lines() {
        let source = "T 10 20 9 12 0 1 90 3 2\nrefdes=U1\n\n";
        let item = parse_one(source, &TextFactory).expect("text");
        let GraphicItem::Text(text) = item else {
            panic!("expected text");
        };
        assert_eq!(text.text, "refdes=U1\n");
        assert!(!text.visible);
        assert_eq!(text.show, ShowNameValue::Value);
        assert_eq!(text.angle, 90);
        assert_eq!(text.size, 12);
    }

    #[test]
    fn text_body_truncation_is_reported() {
        let err = parse_one("T 0 0 9 10 1 0 0 0 3\nonly one\n", &TextFactory).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Truncated {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }
}
