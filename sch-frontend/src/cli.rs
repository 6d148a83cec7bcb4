use std::fmt::Write as _;
use std::path::PathBuf;

use sch_config::AppConfig;
use sch_core::geometry::{Bounds, Point2};
use sch_core::item::{GraphicItem, PinType};
use sch_core::path::PathCommand;
use sch_core::render::{CornerBoundsCalculator, RecordingRenderer};
use sch_core::schematic::ItemId;
use sch_engine::command::{CommandBus, CommandContext, CommandRequest};
use tracing::info;

use crate::errors::FrontendError;
use crate::loader::{DocumentSource, LoadedDocument, load_document};

/// CLI 参数。
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// 要加载的原理图；缺省时使用示例文件或内置演示。
    pub path: Option<PathBuf>,
    /// 以 JSON 输出原理图而非文字概览。
    pub json: bool,
    /// 依次执行的命令，如 `translate_selection 10 -20`。
    pub commands: Vec<String>,
}

/// 执行 CLI 流程并返回要打印的文本。
pub fn run(options: &CliOptions, config: &AppConfig) -> Result<String, FrontendError> {
    let mut loaded = load_document(options.path.as_deref(), config)?;
    let command_bus = CommandBus::new();
    let mut log = Vec::new();
    {
        let mut context = CommandContext {
            document: &mut loaded.document,
        };
        for line in &options.commands {
            log.push(dispatch_cli_command(&command_bus, line, &mut context)?);
        }
    }

    if options.json {
        return Ok(serde_json::to_string_pretty(loaded.document.schematic())?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "支持的命令: {}", command_bus.available_commands().join(", "));
    for message in &log {
        let _ = writeln!(out, "[命令] {message}");
    }
    out.push_str(&summarize(&loaded));
    Ok(out)
}

/// 将一行文本拆分为命令名与参数后派发。
fn dispatch_cli_command(
    bus: &CommandBus,
    line: &str,
    context: &mut CommandContext<'_>,
) -> Result<String, FrontendError> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let request = CommandRequest::new(name).with_args(parts);
    let response = bus.dispatch(&request, context);
    let message = response.message.unwrap_or_default();
    if response.success {
        Ok(message)
    } else {
        Err(FrontendError::Command {
            name: name.to_string(),
            message,
        })
    }
}

/// 文档概览：来源、版本、图元列表、范围与渲染统计。
pub fn summarize(loaded: &LoadedDocument) -> String {
    let document = &loaded.document;
    let schematic = document.schematic();
    let mut out = String::new();

    match &loaded.source {
        DocumentSource::File(path) => {
            let _ = writeln!(out, "已从文件加载原理图：{}", path.display());
        }
        DocumentSource::Demo => {
            let _ = writeln!(out, "已通过绘图工具构建内置示例图元：");
            if let Some(ids) = &loaded.demo_items {
                let _ = writeln!(out, "  - 基础线段 ID = {}", ids.baseline.get());
                let _ = writeln!(out, "  - 外框 ID = {}", ids.outline.get());
                let _ = writeln!(out, "  - 焊盘圆 ID = {}", ids.pad.get());
                let _ = writeln!(out, "  - 文字 ID = {}", ids.label.get());
            }
        }
    }
    if !loaded.skipped.is_empty() {
        let lines: Vec<String> = loaded
            .skipped
            .iter()
            .map(|error| error.line().to_string())
            .collect();
        let _ = writeln!(out, "跳过的记录行：{}", lines.join(", "));
    }

    match schematic.version() {
        Some(version) => {
            let _ = writeln!(
                out,
                "文件版本：{} (格式 {})",
                version.date, version.file_format
            );
        }
        None => {
            let _ = writeln!(out, "文件版本：<未记录>");
        }
    }

    let _ = writeln!(out, "图元 ({} 个)：", schematic.len());
    for (id, item) in schematic.items() {
        let _ = writeln!(out, "  - {}", describe_item(*id, item));
    }

    let bounds = schematic.calculate_bounds(&CornerBoundsCalculator);
    let _ = writeln!(out, "整体范围：{}", format_bounds(bounds));

    let selection: Vec<String> = document
        .selection()
        .map(|id| id.get().to_string())
        .collect();
    if selection.is_empty() {
        let _ = writeln!(out, "当前尚未选中任何图元。");
    } else {
        let _ = writeln!(
            out,
            "选中集包含图元 ID：{}，范围：{}",
            selection.join(", "),
            format_bounds(document.selection_bounds())
        );
    }

    let mut renderer = RecordingRenderer::new();
    document.render(&mut renderer);
    info!(
        items = schematic.len(),
        drawing_ops = renderer.drawing_op_count(),
        "CLI 文档统计"
    );
    let _ = writeln!(
        out,
        "渲染调用：{} 次（其中几何 {} 次）",
        renderer.ops().len(),
        renderer.drawing_op_count()
    );
    out
}

pub fn describe_item(id: ItemId, item: &GraphicItem) -> String {
    match item {
        GraphicItem::Line(line) => format!(
            "线段 #{}, 颜色={}, 线宽={}, 端点={} -> {}",
            id.get(),
            line.color,
            line.line_style.width,
            format_point(line.endpoints[0]),
            format_point(line.endpoints[1])
        ),
        GraphicItem::Box(rect) => format!(
            "矩形 #{}, 颜色={}, 线宽={}, 角点={} / {}",
            id.get(),
            rect.color,
            rect.line_style.width,
            format_point(rect.corner0()),
            format_point(rect.corner1())
        ),
        GraphicItem::Circle(circle) => format!(
            "圆 #{}, 颜色={}, 圆心={}, 半径={}",
            id.get(),
            circle.color,
            format_point(circle.center),
            circle.radius()
        ),
        GraphicItem::Arc(arc) => format!(
            "圆弧 #{}, 颜色={}, 圆心={}, 半径={}, 起始角={}°, 扫掠角={}°",
            id.get(),
            arc.color,
            format_point(arc.center),
            arc.radius(),
            arc.start_angle,
            arc.sweep_angle
        ),
        GraphicItem::Path(path) => {
            let closed = path
                .commands
                .iter()
                .any(|command| matches!(command, PathCommand::ClosePath));
            format!(
                "路径 #{}, 颜色={}, 命令数={}, 闭合={}",
                id.get(),
                path.color,
                path.commands.len(),
                if closed { "是" } else { "否" }
            )
        }
        GraphicItem::Pin(pin) => format!(
            "引脚 #{}, 颜色={}, 类型={}, 端点={} -> {}, 连接端={}",
            id.get(),
            pin.color,
            match pin.pin_type {
                PinType::Net => "普通",
                PinType::Bus => "总线",
            },
            format_point(pin.endpoints[0]),
            format_point(pin.endpoints[1]),
            format_point(pin.active_point())
        ),
        GraphicItem::Text(text) => format!(
            "文字 #{}, 颜色={}, 位置={}, 字号={}, 可见={}, 内容=\"{}\"",
            id.get(),
            text.color,
            format_point(text.insert),
            text.size,
            if text.visible { "是" } else { "否" },
            text.text.replace('\n', "\\n")
        ),
    }
}

fn format_point(point: Point2) -> String {
    format!("({}, {})", point.x(), point.y())
}

fn format_bounds(bounds: Option<Bounds>) -> String {
    bounds
        .map(|bounds| {
            format!(
                "min=({}, {}), max=({}, {})",
                bounds.min_x(),
                bounds.min_y(),
                bounds.max_x(),
                bounds.max_y()
            )
        })
        .unwrap_or_else(|| "<空>".to_string())
}
