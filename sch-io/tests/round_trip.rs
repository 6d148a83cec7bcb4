use std::path::PathBuf;

use sch_core::geometry::Point2;
use sch_core::item::{
    GraphicArc, GraphicBox, GraphicCircle, GraphicItem, GraphicLine, GraphicPath, GraphicPin,
    GraphicText, PinEnd, PinType, ShowNameValue,
};
use sch_core::path::PathCommand;
use sch_core::schematic::{FileVersion, Schematic};
use sch_core::style::{CapType, DashType, FillStyle, FillType, LineStyle};
use sch_io::{GedaFacade, LoadPolicy, WriteItem, load_path, save_path, write_schematic};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

fn styled_items() -> Vec<GraphicItem> {
    let dashed = LineStyle {
        width: 15,
        cap_type: CapType::Square,
        dash_type: DashType::Phantom,
        dash_length: 100,
        dash_space: 50,
    };
    let hatch = FillStyle {
        fill_type: FillType::Mesh,
        width: 5,
        angle1: 30,
        pitch1: 80,
        angle2: 120,
        pitch2: 60,
    };

    let mut line = GraphicLine::new(Point2::new(-100, 200), Point2::new(300, -400));
    line.line_style = dashed;
    line.color = 4;

    let mut rect = GraphicBox::new(Point2::new(1000, 1000), Point2::new(400, 1200));
    rect.line_style = dashed;
    rect.fill_style = hatch;

    let mut circle = GraphicCircle::new(Point2::new(0, 0), 300);
    circle.fill_style = FillStyle::solid();

    let mut arc = GraphicArc::new(Point2::new(50, 60), 70, 315, -90);
    arc.line_style.cap_type = CapType::Round;

    let mut path = GraphicPath::new([
        PathCommand::absolute_move_to(0, 0),
        PathCommand::absolute_line_to(100, 0),
        PathCommand::relative_line_to(0, 100),
        PathCommand::relative_move_to(-50, 10),
        PathCommand::relative_line_to(-50, -110),
        PathCommand::ClosePath,
    ]);
    path.fill_style = hatch;

    let mut pin = GraphicPin::new(Point2::new(900, 300), Point2::new(600, 300));
    pin.pin_type = PinType::Bus;
    pin.active_end = PinEnd::Second;
    pin.color = 5;

    let mut text = GraphicText::new(Point2::new(10, -10), "device=RESISTOR\n\nfootprint=0805");
    text.show = ShowNameValue::Name;
    text.visible = false;
    text.angle = 270;
    text.alignment = 5;

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
fn every_kind_survives_write_then_parse() {
    let facade = GedaFacade::default();
    for item in styled_items() {
        let record = item.to_record();
        let report = facade.read_str(&record).expect("解析写出的记录失败");
        let parsed: Vec<_> = report.schematic.items().map(|(_, item)| item.clone()).collect();
        assert_eq!(parsed, vec![item], "record: {record}");
    }
}

#[test]
fn clone_writes_identical_text() {
    for item in styled_items() {
        let copy = item.clone();
        let mut original_bytes = Vec::new();
        let mut copy_bytes = Vec::new();
        item.write(&mut original_bytes).expect("写出原图元失败");
        copy.write(&mut copy_bytes).expect("写出副本失败");
        assert_eq!(original_bytes, copy_bytes);
    }
}

#[test]
fn legacy_records_fill_in_default_styles() {
    let report = load_path(fixture("legacy_styles.sch"), LoadPolicy::Abort).expect("读取旧格式失败");
    assert!(report.is_clean());
    let schematic = report.schematic;
    assert_eq!(schematic.version(), Some(FileVersion::new(20_130_925, 2)));
    assert_eq!(schematic.len(), 6);

    for (_, item) in schematic.items() {
        match item {
            GraphicItem::Box(rect) => {
                assert_eq!(rect.line_style.width, 10);
                assert_eq!(rect.fill_style, FillStyle::default());
            }
            GraphicItem::Text(text) => {
                assert_eq!(text.text, "refdes=R1");
                assert_eq!(text.show, ShowNameValue::Value);
            }
            other => {
                if let Some(style) = other.line_style() {
                    assert_eq!(*style, LineStyle::default(), "{}", other.kind().name());
                }
                if let Some(style) = other.fill_style() {
                    assert_eq!(*style, FillStyle::default(), "{}", other.kind().name());
                }
            }
        }
    }
}

#[test]
fn schematic_round_trips_through_file() {
    let mut schematic = Schematic::new();
    schematic.set_version(Some(FileVersion::CURRENT));
    for item in styled_items() {
        schematic.add_item(item);
    }

    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = dir.path().join("round_trip.sch");
    save_path(&schematic, &path).expect("保存失败");
    let loaded = load_path(&path, LoadPolicy::Abort)
        .expect("重新读取失败")
        .schematic;

    assert_eq!(loaded.version(), schematic.version());
    let expected: Vec<_> = schematic.items().map(|(_, item)| item).collect();
    let actual: Vec<_> = loaded.items().map(|(_, item)| item).collect();
    assert_eq!(actual, expected);
}

#[test]
fn written_text_starts_with_version_record() {
    let mut schematic = Schematic::new();
    schematic.set_version(Some(FileVersion::new(20_200_101, 2)));
    schematic.add_item(GraphicLine::new(Point2::new(0, 0), Point2::new(1, 1)));

    let mut buffer = Vec::new();
    write_schematic(&schematic, &mut buffer).expect("写出失败");
    let text = String::from_utf8(buffer).expect("utf-8");
    assert_eq!(text, "v 20200101 2\nL 0 0 1 1 3 0 0 0 -1 -1\n");
}

#[test]
fn json_dump_of_loaded_schematic_names_kinds() {
    let report = load_path(fixture("legacy_styles.sch"), LoadPolicy::Abort).expect("读取失败");
    let value = serde_json::to_value(&report.schematic).expect("序列化失败");
    let kinds: Vec<_> = value["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|entry| entry[1]["kind"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(kinds, vec!["line", "box", "circle", "arc", "path", "text"]);
}
