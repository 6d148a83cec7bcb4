use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use sch_core::geometry::{Bounds, Point2};
use sch_core::item::{
    DEFAULT_GRAPHIC_COLOR, GraphicBox, GraphicCircle, GraphicItem, GraphicLine, GraphicText,
};
use sch_core::render::{CornerBoundsCalculator, ItemRenderer};
use sch_core::schematic::{ItemId, Schematic};
use tracing::debug;

use crate::builder::{BoxBuilder, CircleBuilder};
use crate::errors::EngineError;
use crate::subject::{ToolContext, ToolSubject};
use crate::tool::{BuilderTool, DrawingTool, LineTool};

/// 文档变更通知，`bounds` 为需要重绘的区域。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    ItemAdded { id: ItemId, bounds: Bounds },
    ItemRemoved { id: ItemId, bounds: Bounds },
    /// `bounds` 同时覆盖修改前后的范围。
    ItemChanged { id: ItemId, bounds: Bounds },
    /// 整个原理图被替换。
    Reloaded,
    /// 工具预览等非结构性变化。
    InvalidateRegion(Bounds),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&DocumentEvent)>;

/// 持有原理图与运行时状态（选中集、监听者、来源文件）。
pub struct SchematicDocument {
    schematic: Schematic,
    selected: BTreeSet<ItemId>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    source_path: Option<PathBuf>,
}

/// 绘图工具原型的颜色与线宽。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStyle {
    pub color: i32,
    pub line_width: i32,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_GRAPHIC_COLOR,
            line_width: 0,
        }
    }
}

impl ToolStyle {
    pub fn line_prototype(&self) -> GraphicLine {
        let mut line = GraphicLine::default();
        line.line_style.width = self.line_width;
        line.color = self.color;
        line
    }

    pub fn box_prototype(&self) -> GraphicBox {
        let mut rect = GraphicBox::default();
        rect.line_style.width = self.line_width;
        rect.color = self.color;
        rect
    }

    pub fn circle_prototype(&self) -> GraphicCircle {
        let mut circle = GraphicCircle::default();
        circle.line_style.width = self.line_width;
        circle.color = self.color;
        circle
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DemoItems {
    pub baseline: ItemId,
    pub outline: ItemId,
    pub pad: ItemId,
    pub label: ItemId,
}

impl SchematicDocument {
    pub fn new() -> Self {
        Self {
            schematic: Schematic::new(),
            selected: BTreeSet::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
            source_path: None,
        }
    }

    pub fn with_schematic(schematic: Schematic, source_path: Option<PathBuf>) -> Self {
        let mut document = Self::new();
        document.schematic = schematic;
        document.source_path = source_path;
        document
    }

    #[inline]
    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    #[inline]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn set_source_path(&mut self, path: Option<PathBuf>) {
        self.source_path = path;
    }

    /// 注册变更监听者。
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: DocumentEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn bounds_of(&self, id: ItemId) -> Option<Bounds> {
        self.schematic
            .item(id)
            .map(|item| item.calculate_bounds(&CornerBoundsCalculator))
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<GraphicItem, EngineError> {
        let bounds = self
            .bounds_of(id)
            .ok_or(EngineError::ItemNotFound(id.get()))?;
        let item = self
            .schematic
            .remove_item(id)
            .ok_or(EngineError::ItemNotFound(id.get()))?;
        self.selected.remove(&id);
        debug!(id = id.get(), kind = item.kind().name(), "已删除图元");
        self.notify(DocumentEvent::ItemRemoved { id, bounds });
        Ok(item)
    }

    pub fn translate_item(&mut self, id: ItemId, dx: i32, dy: i32) -> Result<(), EngineError> {
        let before = self
            .bounds_of(id)
            .ok_or(EngineError::ItemNotFound(id.get()))?;
        self.schematic.translate_item(id, dx, dy);
        let after = self.bounds_of(id).unwrap_or(before);
        self.notify(DocumentEvent::ItemChanged {
            id,
            bounds: before.union(&after),
        });
        Ok(())
    }

    /// 替换整个原理图并清空选中集，用于从来源文件重新加载。
    pub fn reload(&mut self, schematic: Schematic) {
        self.schematic = schematic;
        self.selected.clear();
        debug!(items = self.schematic.len(), "文档已重新加载");
        self.notify(DocumentEvent::Reloaded);
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        self.schematic.render(renderer);
    }

    #[inline]
    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    #[inline]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// 选中集按标识升序迭代。
    #[inline]
    pub fn selection(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected.iter().copied()
    }

    pub fn select(&mut self, id: ItemId) -> Result<(), EngineError> {
        if self.schematic.item(id).is_none() {
            return Err(EngineError::ItemNotFound(id.get()));
        }
        self.selected.insert(id);
        Ok(())
    }

    pub fn deselect(&mut self, id: ItemId) -> bool {
        self.selected.remove(&id)
    }

    /// 切换选中状态，返回切换后的状态。
    pub fn toggle_selection(&mut self, id: ItemId) -> Result<bool, EngineError> {
        if self.schematic.item(id).is_none() {
            return Err(EngineError::ItemNotFound(id.get()));
        }
        if self.selected.insert(id) {
            Ok(true)
        } else {
            self.selected.remove(&id);
            Ok(false)
        }
    }

    pub fn select_all(&mut self) -> usize {
        self.selected.extend(self.schematic.ids());
        self.selected.len()
    }

    #[inline]
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selection_bounds(&self) -> Option<Bounds> {
        let bounds = self
            .selected
            .iter()
            .filter_map(|id| self.bounds_of(*id))
            .fold(Bounds::empty(), |acc, bounds| acc.union(&bounds));
        (!bounds.is_empty()).then_some(bounds)
    }

    /// 删除所有选中图元，返回删除数量。
    pub fn delete_selection(&mut self) -> usize {
        let ids: Vec<_> = self.selected.iter().copied().collect();
        let mut removed = 0;
        for id in ids {
            if self.remove_item(id).is_ok() {
                removed += 1;
            }
        }
        self.selected.clear();
        removed
    }

    /// 平移所有选中图元，返回平移数量。
    pub fn translate_selection(&mut self, dx: i32, dy: i32) -> usize {
        let ids: Vec<_> = self.selected.iter().copied().collect();
        ids.into_iter()
            .filter(|id| self.translate_item(*id, dx, dy).is_ok())
            .count()
    }

    /// 通过绘图工具构建一组示例图元，返回关键图元标识。
    pub fn populate_demo(&mut self) -> DemoItems {
        self.populate_demo_with_style(ToolStyle::default())
    }

    pub fn populate_demo_with_style(&mut self, style: ToolStyle) -> DemoItems {
        self.clear_selection();

        let baseline = self.drive_tool(
            &mut LineTool::with_prototype(style.line_prototype()),
            &[(0, 0), (1000, 0)],
        );
        let outline = self.drive_tool(
            &mut BuilderTool::new("box", BoxBuilder::with_prototype(style.box_prototype())),
            &[(100, 100), (600, 400)],
        );
        let pad = self.drive_tool(
            &mut BuilderTool::new(
                "circle",
                CircleBuilder::with_prototype(style.circle_prototype()),
            ),
            &[(800, 300), (850, 300)],
        );
        let label = self.add_item(GraphicText::new(Point2::new(100, 450), "refdes=U1").into());

        let ids = DemoItems {
            baseline: baseline.unwrap_or(label),
            outline: outline.unwrap_or(label),
            pad: pad.unwrap_or(label),
            label,
        };
        debug!(
            baseline = ids.baseline.get(),
            outline = ids.outline.get(),
            pad = ids.pad.get(),
            label = ids.label.get(),
            "已创建演示图元"
        );
        ids
    }

    /// 依次点击 `clicks` 中的点，返回工具最后提交的图元。
    fn drive_tool(&mut self, tool: &mut dyn DrawingTool, clicks: &[(i32, i32)]) -> Option<ItemId> {
        let before = self.schematic.len();
        let mut context = ToolContext::new(self);
        for &(x, y) in clicks {
            tool.motion_notify(&mut context, x, y);
            tool.button_pressed(&mut context, x, y);
        }
        if self.schematic.len() > before {
            self.schematic.ids().last()
        } else {
            None
        }
    }
}

impl ToolSubject for SchematicDocument {
    fn add_item(&mut self, item: GraphicItem) -> ItemId {
        let bounds = item.calculate_bounds(&CornerBoundsCalculator);
        let kind = item.kind();
        let id = self.schematic.add_item(item);
        debug!(id = id.get(), kind = kind.name(), "已添加图元");
        self.notify(DocumentEvent::ItemAdded { id, bounds });
        id
    }

    fn invalidate_item(&mut self, bounds: Bounds) {
        self.notify(DocumentEvent::InvalidateRegion(bounds));
    }
}

impl Default for SchematicDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchematicDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchematicDocument")
            .field("schematic", &self.schematic)
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .field("source_path", &self.source_path)
            .finish()
    }
}
