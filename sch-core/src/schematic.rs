use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::item::GraphicItem;
use crate::render::{BoundsCalculator, ItemRenderer};

/// 图元在所属原理图内的稳定标识，删除其他图元不会改变它。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// 文件版本记录：发布日期与文件格式版本。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileVersion {
    pub date: u32,
    pub file_format: u32,
}

impl FileVersion {
    pub const CURRENT: FileVersion = FileVersion {
        date: 20_130_925,
        file_format: 2,
    };

    #[inline]
    pub fn new(date: u32, file_format: u32) -> Self {
        Self { date, file_format }
    }
}

/// 原理图：按插入顺序保存的图元集合，渲染与写出都按此顺序进行。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<FileVersion>,
    items: Vec<(ItemId, GraphicItem)>,
    next_item_id: u64,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn version(&self) -> Option<FileVersion> {
        self.version
    }

    #[inline]
    pub fn set_version(&mut self, version: Option<FileVersion>) {
        self.version = version;
    }

    pub fn add_item(&mut self, item: impl Into<GraphicItem>) -> ItemId {
        let id = self.next_id();
        self.items.push((id, item.into()));
        id
    }

    /// 在 `index` 处插入，`index` 超出末尾时追加。
    pub fn insert_item(&mut self, index: usize, item: impl Into<GraphicItem>) -> ItemId {
        let id = self.next_id();
        let index = index.min(self.items.len());
        self.items.insert(index, (id, item.into()));
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<GraphicItem> {
        let index = self.position(id)?;
        Some(self.items.remove(index).1)
    }

    #[inline]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|(item_id, _)| *item_id == id)
    }

    #[inline]
    pub fn item(&self, id: ItemId) -> Option<&GraphicItem> {
        self.items
            .iter()
            .find_map(|(item_id, item)| (*item_id == id).then_some(item))
    }

    #[inline]
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut GraphicItem> {
        self.items
            .iter_mut()
            .find_map(|(item_id, item)| (*item_id == id).then_some(item))
    }

    #[inline]
    pub fn items(&self) -> impl Iterator<Item = &(ItemId, GraphicItem)> {
        self.items.iter()
    }

    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|(id, _)| *id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 清空图元，保留版本记录；标识继续递增，旧标识不会被复用。
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn translate_item(&mut self, id: ItemId, dx: i32, dy: i32) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    pub fn render(&self, renderer: &mut dyn ItemRenderer) {
        for (_, item) in &self.items {
            item.render(renderer);
        }
    }

    #[inline]
    pub fn item_bounds(&self, id: ItemId, calculator: &dyn BoundsCalculator) -> Option<Bounds> {
        self.item(id)
            .map(|item| item.calculate_bounds(calculator))
            .filter(|bounds| !bounds.is_empty())
    }

    /// 所有图元包围盒的并集；没有任何非空范围时返回 `None`。
    pub fn calculate_bounds(&self, calculator: &dyn BoundsCalculator) -> Option<Bounds> {
        let bounds = self
            .items
            .iter()
            .fold(Bounds::empty(), |acc, (_, item)| {
                acc.union(&item.calculate_bounds(calculator))
            });
        (!bounds.is_empty()).then_some(bounds)
    }

    pub fn items_intersecting(
        &self,
        region: &Bounds,
        calculator: &dyn BoundsCalculator,
    ) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|(_, item)| item.calculate_bounds(calculator).intersects(region))
            .map(|(id, _)| *id)
            .collect()
    }

    fn next_id(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;
        id
    }
}
