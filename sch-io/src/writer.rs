//! 图元写出：同步写入 `std::io::Write`，异步写入 tokio `AsyncWrite` 并支持取消。

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use sch_core::item::{
    GraphicArc, GraphicBox, GraphicCircle, GraphicItem, GraphicLine, GraphicPath, GraphicPin,
    GraphicText,
};
use sch_core::schematic::{FileVersion, Schematic};
use sch_core::style::{FillStyle, LineStyle};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::{Instrument, debug, debug_span};

use crate::factories::{
    ArcFactory, BoxFactory, CircleFactory, LineFactory, PathFactory, PinFactory, TextFactory,
};
use crate::path_data;
use crate::{VERSION_TOKEN, WriteError};

/// 异步写入的调度优先级。tokio 不区分 I/O 优先级，此值只记录在追踪 span 中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IoPriority {
    Low,
    #[default]
    Default,
    High,
}

/// 可在任意时刻触发的取消信号，克隆体共享同一状态。
#[derive(Debug, Clone)]
pub struct Cancellable {
    sender: Arc<watch::Sender<bool>>,
}

impl Cancellable {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// 在取消被触发后完成；已取消时立即完成。
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // 发送端由 self 持有，等待不会因通道关闭而失败
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for Cancellable {
    fn default() -> Self {
        Self::new()
    }
}

/// 异步写入的结果，交给 [`WriteItem::write_finish`] 转换为 `Result`。
#[derive(Debug)]
pub enum WriteCompletion {
    Done,
    Cancelled,
    Failed(io::Error),
}

pub trait WriteItem {
    /// 图元的完整记录文本（含续行与结尾换行）。
    fn to_record(&self) -> String;

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_record().as_bytes())
    }

    /// 写入前检查取消，写入过程中与取消信号竞争。
    fn write_async<W>(
        &self,
        writer: &mut W,
        priority: IoPriority,
        cancellable: Option<&Cancellable>,
    ) -> impl Future<Output = WriteCompletion>
    where
        W: AsyncWrite + Unpin + ?Sized;

    fn write_finish(&self, completion: WriteCompletion) -> Result<(), WriteError> {
        match completion {
            WriteCompletion::Done => Ok(()),
            WriteCompletion::Cancelled => Err(WriteError::Cancelled),
            WriteCompletion::Failed(source) => Err(WriteError::Io(source)),
        }
    }
}

impl WriteItem for GraphicItem {
    fn to_record(&self) -> String {
        match self {
            GraphicItem::Line(line) => line_record(line),
            GraphicItem::Box(rect) => box_record(rect),
            GraphicItem::Circle(circle) => circle_record(circle),
            GraphicItem::Arc(arc) => arc_record(arc),
            GraphicItem::Path(path) => path_record(path),
            GraphicItem::Pin(pin) => pin_record(pin),
            GraphicItem::Text(text) => text_record(text),
        }
    }

    fn write_async<W>(
        &self,
        writer: &mut W,
        priority: IoPriority,
        cancellable: Option<&Cancellable>,
    ) -> impl Future<Output = WriteCompletion>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let span = debug_span!("write_item", kind = self.kind().name(), ?priority);
        let record = self.to_record();
        async move { write_text_async(writer, &record, cancellable).await }.instrument(span)
    }
}

async fn write_text_async<W>(
    writer: &mut W,
    text: &str,
    cancellable: Option<&Cancellable>,
) -> WriteCompletion
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let result = match cancellable {
        Some(cancellable) if cancellable.is_cancelled() => {
            debug!("写入前已取消");
            return WriteCompletion::Cancelled;
        }
        Some(cancellable) => {
            tokio::select! {
                biased;
                _ = cancellable.cancelled() => {
                    debug!("写入过程中被取消");
                    return WriteCompletion::Cancelled;
                }
                result = writer.write_all(text.as_bytes()) => result,
            }
        }
        None => writer.write_all(text.as_bytes()).await,
    };
    match result {
        Ok(()) => WriteCompletion::Done,
        Err(source) => WriteCompletion::Failed(source),
    }
}

pub fn version_record(version: FileVersion) -> String {
    format!("{VERSION_TOKEN} {} {}\n", version.date, version.file_format)
}

/// 依次写出版本记录与全部图元。
pub fn write_schematic<W: Write + ?Sized>(schematic: &Schematic, writer: &mut W) -> io::Result<()> {
    if let Some(version) = schematic.version() {
        writer.write_all(version_record(version).as_bytes())?;
    }
    for (_, item) in schematic.items() {
        item.write(writer)?;
    }
    writer.flush()
}

pub async fn write_schematic_async<W>(
    schematic: &Schematic,
    writer: &mut W,
    priority: IoPriority,
    cancellable: Option<&Cancellable>,
) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if let Some(version) = schematic.version() {
        match write_text_async(writer, &version_record(version), cancellable).await {
            WriteCompletion::Done => {}
            WriteCompletion::Cancelled => return Err(WriteError::Cancelled),
            WriteCompletion::Failed(source) => return Err(WriteError::Io(source)),
        }
    }
    for (_, item) in schematic.items() {
        let completion = item.write_async(writer, priority, cancellable).await;
        item.write_finish(completion)?;
    }
    writer.flush().await?;
    debug!(items = schematic.len(), "原理图异步写出完成");
    Ok(())
}

fn line_style_fields(style: &LineStyle) -> String {
    format!(
        "{} {} {} {} {}",
        style.width,
        style.cap_type.code(),
        style.dash_type.code(),
        style.dash_length,
        style.dash_space
    )
}

fn fill_style_fields(style: &FillStyle) -> String {
    format!(
        "{} {} {} {} {} {}",
        style.fill_type.code(),
        style.width,
        style.angle1,
        style.pitch1,
        style.angle2,
        style.pitch2
    )
}

fn line_record(line: &GraphicLine) -> String {
    let [p0, p1] = line.endpoints;
    format!(
        "{} {} {} {} {} {} {}\n",
        LineFactory::TOKEN,
        p0.x(),
        p0.y(),
        p1.x(),
        p1.y(),
        line.color,
        line_style_fields(&line.line_style)
    )
}

fn box_record(rect: &GraphicBox) -> String {
    let [c0, c1] = rect.corners;
    let size = c0.vector_to(c1);
    format!(
        "{} {} {} {} {} {} {} {}\n",
        BoxFactory::TOKEN,
        c0.x(),
        c0.y(),
        size.x(),
        size.y(),
        rect.color,
        line_style_fields(&rect.line_style),
        fill_style_fields(&rect.fill_style)
    )
}

fn circle_record(circle: &GraphicCircle) -> String {
    format!(
        "{} {} {} {} {} {} {}\n",
        CircleFactory::TOKEN,
        circle.center.x(),
        circle.center.y(),
        circle.radius(),
        circle.color,
        line_style_fields(&circle.line_style),
        fill_style_fields(&circle.fill_style)
    )
}

fn arc_record(arc: &GraphicArc) -> String {
    format!(
        "{} {} {} {} {} {} {} {}\n",
        ArcFactory::TOKEN,
        arc.center.x(),
        arc.center.y(),
        arc.radius(),
        arc.start_angle,
        arc.sweep_angle,
        arc.color,
        line_style_fields(&arc.line_style)
    )
}

fn path_record(path: &GraphicPath) -> String {
    let mut record = format!(
        "{} {} {} {} {}\n",
        PathFactory::TOKEN,
        path.color,
        line_style_fields(&path.line_style),
        fill_style_fields(&path.fill_style),
        path.commands.len()
    );
    for command in &path.commands {
        record.push_str(&path_data::format_command(command));
        record.push('\n');
    }
    record
}

fn pin_record(pin: &GraphicPin) -> String {
    let [p0, p1] = pin.endpoints;
    format!(
        "{} {} {} {} {} {} {} {}\n",
        PinFactory::TOKEN,
        p0.x(),
        p0.y(),
        p1.x(),
        p1.y(),
        pin.color,
        pin.pin_type.code(),
        pin.active_end.code()
    )
}

fn text_record(text: &GraphicText) -> String {
    let mut record = format!(
        "{} {} {} {} {} {} {} {} {} {}\n",
        TextFactory::TOKEN,
        text.insert.x(),
        text.insert.y(),
        text.color,
        text.size,
        u8::from(text.visible),
        text.show.code(),
        text.angle,
        text.alignment,
        text.line_count()
    );
    for line in text.text.split('\n') {
        record.push_str(line);
        record.push('\n');
    }
    record
}
