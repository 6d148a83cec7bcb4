pub mod builder;
pub mod command;
pub mod document;
pub mod tool;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("item with id {0} not found")]
        ItemNotFound(u64),
        #[error("point index {index} out of range (builder accepts {count} points)")]
        PointIndexOutOfRange { index: usize, count: usize },
    }
}

pub mod subject {
    use sch_core::geometry::Bounds;
    use sch_core::item::GraphicItem;
    use sch_core::schematic::ItemId;

    /// 绘图工具提交图元的目标，通常由持有原理图的文档实现。
    pub trait ToolSubject {
        /// 接收一个已完成的图元（工具原型的克隆），返回其在文档中的标识。
        fn add_item(&mut self, item: GraphicItem) -> ItemId;

        /// 工具预览发生变化，需要重绘 `bounds` 覆盖的区域。
        fn invalidate_item(&mut self, _bounds: Bounds) {}
    }

    /// 传递给工具事件处理函数的上下文。
    pub struct ToolContext<'a> {
        pub subject: &'a mut dyn ToolSubject,
    }

    impl<'a> ToolContext<'a> {
        pub fn new(subject: &'a mut dyn ToolSubject) -> Self {
            Self { subject }
        }
    }
}
