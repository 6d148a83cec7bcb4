use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use sch_core::geometry::Point2;
use sch_core::item::{GraphicCircle, GraphicItem, GraphicLine};
use sch_core::schematic::{FileVersion, Schematic};
use sch_io::{
    Cancellable, IoPriority, WriteCompletion, WriteError, WriteItem, write_schematic,
    write_schematic_async,
};
use tokio::io::AsyncWrite;

/// 每次写入都失败的写端。
struct FailingWriter;

impl AsyncWrite for FailingWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// 永远不就绪的写端，用于模拟进行中的写入。
struct StalledWriter;

impl AsyncWrite for StalledWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Pending
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }
}

fn sample_item() -> GraphicItem {
    GraphicCircle::new(Point2::new(10, 10), 30).into()
}

#[tokio::test]
async fn async_write_matches_sync_output() {
    let item = sample_item();
    let mut buffer: Vec<u8> = Vec::new();
    let completion = item
        .write_async(&mut buffer, IoPriority::High, None)
        .await;
    item.write_finish(completion).expect("异步写出失败");

    let mut expected = Vec::new();
    item.write(&mut expected).expect("同步写出失败");
    assert_eq!(buffer, expected);
}

#[tokio::test]
async fn pre_cancelled_write_touches_nothing() {
    let item = sample_item();
    let cancellable = Cancellable::new();
    cancellable.cancel();

    let mut buffer: Vec<u8> = Vec::new();
    let completion = item
        .write_async(&mut buffer, IoPriority::Default, Some(&cancellable))
        .await;
    assert!(matches!(completion, WriteCompletion::Cancelled));
    assert!(buffer.is_empty());
    assert!(matches!(
        item.write_finish(completion),
        Err(WriteError::Cancelled)
    ));
}

#[tokio::test]
async fn cancel_interrupts_in_flight_write() {
    let item = sample_item();
    let cancellable = Cancellable::new();
    let trigger = cancellable.clone();

    let mut writer = StalledWriter;
    let write = item.write_async(&mut writer, IoPriority::Low, Some(&cancellable));
    let cancel = async {
        tokio::task::yield_now().await;
        trigger.cancel();
    };
    let (completion, ()) = tokio::join!(write, cancel);
    assert!(matches!(
        item.write_finish(completion),
        Err(WriteError::Cancelled)
    ));
}

#[tokio::test]
async fn io_failure_is_not_reported_as_cancellation() {
    let item = sample_item();
    let cancellable = Cancellable::new();
    let mut writer = FailingWriter;
    let completion = item
        .write_async(&mut writer, IoPriority::Default, Some(&cancellable))
        .await;
    match item.write_finish(completion) {
        Err(WriteError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("期望 I/O 错误，得到 {other:?}"),
    }
}

#[tokio::test]
async fn schematic_async_write_matches_sync_text() {
    let mut schematic = Schematic::new();
    schematic.set_version(Some(FileVersion::CURRENT));
    schematic.add_item(GraphicLine::new(Point2::new(0, 0), Point2::new(10, 0)));
    schematic.add_item(sample_item());

    let mut async_bytes: Vec<u8> = Vec::new();
    write_schematic_async(&schematic, &mut async_bytes, IoPriority::Default, None)
        .await
        .expect("异步写出失败");

    let mut sync_bytes = Vec::new();
    write_schematic(&schematic, &mut sync_bytes).expect("同步写出失败");
    assert_eq!(async_bytes, sync_bytes);
}

#[tokio::test]
async fn cancelled_schematic_write_stops_early() {
    let mut schematic = Schematic::new();
    schematic.add_item(sample_item());
    let cancellable = Cancellable::new();
    cancellable.cancel();

    let mut buffer: Vec<u8> = Vec::new();
    let err = write_schematic_async(&schematic, &mut buffer, IoPriority::Default, Some(&cancellable))
        .await
        .unwrap_err();
    assert!(matches!(err, WriteError::Cancelled));
    assert!(buffer.is_empty());
}
